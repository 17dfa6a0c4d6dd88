//! Resolution of raw blueprint values into the concrete values a container
//! injects.
//!
//! [`ValueResolver`] dispatches on the [`RawValue`](bp_core::RawValue) variant:
//! references go back to the container, inner blueprints are created as
//! throwaway child objects, collections recurse element by element, and
//! scalars are evaluated and coerced.

mod collection;
mod inner;
mod reference;
mod resolver;
mod scalar;

pub use resolver::ValueResolver;

//! Core data model for BeanPhase value resolution.
//!
//! Raw blueprint values, resolved runtime values, the collaborator traits a
//! container has to provide, and the error taxonomy shared by the resolver.

#[macro_use]
pub mod macros;

pub mod arg;
pub mod blueprint;
pub mod collections;
pub mod config;
pub mod container;
pub mod error;
pub mod raw;
pub mod ty;
pub mod value;

// Re-export commonly used items for convenience
pub use tracing;

pub use arg::ArgName;
pub use blueprint::{Blueprint, BlueprintId, PropertyValue, Scope};
pub use container::{
    BeanContainer, BeanLookup, ExpressionEvaluator, Managed, NamedBean, PassThroughEvaluator,
    TypeCoercer,
};
pub use raw::RawValue;
pub use ty::Ty;
pub use value::Value;

// Alias for error types
pub type Error = crate::error::Error;
pub type Result<T> = crate::error::Result<T>;

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Runtime type a resolved value can be coerced into.
///
/// `Any` is the top type: arrays without a declared element type use it and
/// no coercion happens for it.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
pub enum Ty {
    #[default]
    #[display("any")]
    Any,
    #[display("bool")]
    Bool,
    #[display("int")]
    Int,
    #[display("decimal")]
    Decimal,
    #[display("char")]
    Char,
    #[display("string")]
    String,
    #[display("{_0}")]
    Named(String),
}

impl Ty {
    pub fn named(name: impl Into<String>) -> Self {
        Ty::Named(name.into())
    }

    /// Maps a built-in scalar type name to its `Ty`.
    ///
    /// Accepts the short names used in blueprints (`int`, `long`, `string`, ...)
    /// as well as the Rust spellings.
    pub fn primitive(name: &str) -> Option<Ty> {
        let ty = match name.trim() {
            "any" | "object" => Ty::Any,
            "bool" | "boolean" => Ty::Bool,
            "int" | "integer" | "long" | "short" | "i8" | "i16" | "i32" | "i64" => Ty::Int,
            "decimal" | "double" | "float" | "f32" | "f64" => Ty::Decimal,
            "char" => Ty::Char,
            "string" | "str" | "String" => Ty::String,
            _ => return None,
        };
        Some(ty)
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Ty::Any)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Ty::Bool | Ty::Int | Ty::Decimal | Ty::Char)
    }
}

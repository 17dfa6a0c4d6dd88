use std::fmt::{Display, Formatter};
use std::result;

use thiserror::Error;

use crate::ty::Ty;

/// The bean whose blueprint was being resolved when an error occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeanOrigin {
    pub bean_name: String,
    pub resource_description: Option<String>,
}

impl BeanOrigin {
    pub fn new(bean_name: impl Into<String>, resource_description: Option<String>) -> Self {
        Self {
            bean_name: bean_name.into(),
            resource_description,
        }
    }
}

impl Display for BeanOrigin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error creating bean with name '{}'", self.bean_name)?;
        if let Some(description) = &self.resource_description {
            write!(f, " defined in {}", description)?;
        }
        Ok(())
    }
}

fn of_type(class_name: &Option<String>) -> String {
    match class_name {
        Some(class_name) => format!("of type [{}] ", class_name),
        None => String::new(),
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("{origin}: Invalid bean name '{name}' in bean reference for {arg}")]
    InvalidReference {
        origin: BeanOrigin,
        name: String,
        arg: String,
    },
    #[error("{origin}: Cannot resolve reference to bean {reference} in parent factory: no parent factory available")]
    UnresolvedParentContainer {
        origin: BeanOrigin,
        reference: String,
        arg: String,
    },
    #[error("{origin}: Cannot resolve reference to bean '{reference}' while setting {arg}")]
    BeanReferenceCreation {
        origin: BeanOrigin,
        reference: String,
        arg: String,
        #[source]
        source: Box<Error>,
    },
    #[error("{origin}: Error resolving array type for {arg}")]
    ArrayElementTypeLoad {
        origin: BeanOrigin,
        arg: String,
        #[source]
        source: Box<Error>,
    },
    #[error("{origin}: Cannot create inner bean '{inner_name}' {}while setting {arg}", of_type(.class_name))]
    InnerBeanCreation {
        origin: BeanOrigin,
        inner_name: String,
        class_name: Option<String>,
        arg: String,
        #[source]
        source: Box<Error>,
    },
    #[error("{origin}: Error converting Properties key/value pair for {arg}: resolved to null")]
    PropertiesConversion { origin: BeanOrigin, arg: String },
    #[error("{origin}: Error converting typed String value for {arg}")]
    TypedValueConversion {
        origin: BeanOrigin,
        arg: String,
        #[source]
        source: Box<Error>,
    },

    #[error("No bean named '{0}' available")]
    NoSuchBean(String),
    #[error("No qualifying bean of type '{0}' available")]
    NoSuchBeanOfType(Ty),
    #[error("No qualifying bean of type '{ty}' available: expected single matching bean but found {}: {}", .candidates.len(), .candidates.join(","))]
    NoUniqueBean { ty: Ty, candidates: Vec<String> },
    #[error("Error creating bean with name '{name}': {message}")]
    BeanCreation { name: String, message: String },
    #[error("Cannot load type '{0}'")]
    TypeLoad(String),
    #[error("Cannot convert value '{value}' to type '{target}': {reason}")]
    Conversion {
        value: String,
        target: Ty,
        reason: String,
    },
    #[error("Expression evaluation failed for '{expression}': {reason}")]
    Expression { expression: String, reason: String },
    #[error("Generic error: {0}")]
    Generic(String),
}

pub type Result<T> = result::Result<T, Error>;

impl Error {
    /// The owning bean, for errors raised while resolving one of its values.
    pub fn origin(&self) -> Option<&BeanOrigin> {
        match self {
            Error::InvalidReference { origin, .. }
            | Error::UnresolvedParentContainer { origin, .. }
            | Error::BeanReferenceCreation { origin, .. }
            | Error::ArrayElementTypeLoad { origin, .. }
            | Error::InnerBeanCreation { origin, .. }
            | Error::PropertiesConversion { origin, .. }
            | Error::TypedValueConversion { origin, .. } => Some(origin),
            _ => None,
        }
    }

    /// Argument path the error is attached to, if any.
    pub fn arg(&self) -> Option<&str> {
        match self {
            Error::InvalidReference { arg, .. }
            | Error::UnresolvedParentContainer { arg, .. }
            | Error::BeanReferenceCreation { arg, .. }
            | Error::ArrayElementTypeLoad { arg, .. }
            | Error::InnerBeanCreation { arg, .. }
            | Error::PropertiesConversion { arg, .. }
            | Error::TypedValueConversion { arg, .. } => Some(arg.as_str()),
            _ => None,
        }
    }

    /// Walks from this error down through its causes.
    pub fn chain(&self) -> impl Iterator<Item = &(dyn std::error::Error + 'static)> {
        let first: &(dyn std::error::Error + 'static) = self;
        std::iter::successors(Some(first), |err| err.source())
    }

    /// The innermost cause.
    pub fn root_cause(&self) -> &(dyn std::error::Error + 'static) {
        self.chain().last().unwrap_or(self)
    }

    /// All messages from outermost to innermost, one per line.
    pub fn report(&self) -> String {
        self.chain()
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("\n  caused by: ")
    }
}

// Convert from eyre::Report to our Error type
impl From<eyre::Report> for Error {
    fn from(err: eyre::Report) -> Self {
        Error::Generic(err.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Generic(s)
    }
}

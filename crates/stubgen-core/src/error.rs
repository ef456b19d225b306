//! Synthesis error types.
//!
//! Every [`SynthesisError`] falls into one of three [`ErrorKind`]s, which is what callers
//! are expected to branch on.

use serde::Serialize;
use stubgen_classfile::ClassFileError;
use thiserror::Error;

/// Coarse classification of a [`SynthesisError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A required input is absent or does not name a type.
    InvalidArgument,
    /// The interface is not an interface, or the exception is not a `Throwable`.
    PreconditionViolation,
    /// Reflection over the inputs or serialization of the output failed.
    GenerationFailure,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::PreconditionViolation => "precondition violation",
            ErrorKind::GenerationFailure => "generation failure",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("missing required argument `{0}`")]
    MissingArgument(&'static str),

    #[error("`{value}` is not a valid binary class name for `{argument}`")]
    InvalidName {
        argument: &'static str,
        value: String,
    },

    #[error("{argument} type {name} was not found on the class path")]
    UnknownType {
        argument: &'static str,
        name: String,
    },

    #[error("Class {0} is not an interface!")]
    NotAnInterface(String),

    #[error("Class {0} does not extend Throwable!")]
    NotThrowable(String),

    #[error("exception type {name} cannot be constructed with a message: {reason}")]
    UnusableException { name: String, reason: &'static str },

    #[error("class {0} is referenced by the type hierarchy but was not found on the class path")]
    MissingClass(String),

    #[error("malformed type hierarchy at {class}: {reason}")]
    MalformedHierarchy { class: String, reason: String },

    #[error("failed to read class {class} from {source_name}")]
    Io {
        class: String,
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed class file for {class}")]
    ClassFormat {
        class: String,
        #[source]
        source: ClassFileError,
    },

    #[error("failed to emit class {class}")]
    Emit {
        class: String,
        #[source]
        source: ClassFileError,
    },
}

impl SynthesisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SynthesisError::MissingArgument(_)
            | SynthesisError::InvalidName { .. }
            | SynthesisError::UnknownType { .. } => ErrorKind::InvalidArgument,
            SynthesisError::NotAnInterface(_) | SynthesisError::NotThrowable(_) => {
                ErrorKind::PreconditionViolation
            }
            SynthesisError::UnusableException { .. }
            | SynthesisError::MissingClass(_)
            | SynthesisError::MalformedHierarchy { .. }
            | SynthesisError::Io { .. }
            | SynthesisError::ClassFormat { .. }
            | SynthesisError::Emit { .. } => ErrorKind::GenerationFailure,
        }
    }
}

pub type Result<T> = std::result::Result<T, SynthesisError>;

//! Error types for VC generation and proving

use crate::absyn::Location;
use thiserror::Error;

/// Verification core errors
#[derive(Error, Debug, Clone)]
pub enum Error {
    // Source errors
    /// Malformed input detected while generating verification conditions
    ///
    /// **Triggered by:** A specification clause or declaration the proof rules cannot accept
    /// **Example:** An initialization ensures clause that mentions `#Q`
    #[error("Error at {location}: {message}")]
    SourceError {
        /// Where the offending construct appears
        location: Location,
        /// Error description
        message: String,
    },

    /// Statement kind without a proof rule
    #[error("Error at {location}: Statement type not handled: {kind}")]
    UnhandledStatement {
        /// Statement kind name
        kind: String,
        /// Statement location
        location: Location,
    },

    /// Facility instantiated with the wrong number of arguments
    ///
    /// **Triggered by:** `Facility SF is Stack_Template(Integer)` against a concept taking two parameters
    #[error("Error at {location}: facility {facility} expects {expected} argument(s), found {found}")]
    FacilityArity {
        /// Facility name
        facility: String,
        /// Number of formal parameters
        expected: usize,
        /// Number of actual arguments
        found: usize,
        /// Facility location
        location: Location,
    },

    /// Procedure does not match the operation it implements
    #[error("Error at {location}: procedure {procedure} does not match its operation: {message}")]
    OperationMismatch {
        /// Procedure name
        procedure: String,
        /// Error description
        message: String,
        /// Procedure location
        location: Location,
    },

    /// Reference to a symbol missing from the module scope
    #[error("Error at {location}: no entry for {name} in module scope")]
    NoSuchSymbol {
        /// Symbol name
        name: String,
        /// Reference location
        location: Location,
    },

    // Internal errors
    /// A reduction rule was handed an expression it does not target
    ///
    /// **Triggered by:** Applying `LeftOrRule` to an expression that is not an `or`
    #[error("Unexpected expression while applying rule {rule}: {expression} ({kind})")]
    UnexpectedExpression {
        /// Rule description
        rule: String,
        /// Rendered expression
        expression: String,
        /// Expression kind name
        kind: String,
    },

    /// A VC reached the prover with a non-atomic formula
    #[error("VC {name} is not in atomic form: {formula}")]
    NonAtomicVc {
        /// VC name
        name: String,
        /// Offending formula
        formula: String,
    },

    /// Invalid argument to an internal API
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Report serialization failure
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Thread pool construction failure
    #[error("Thread pool error: {0}")]
    ThreadPoolError(String),
}

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Internal invariant broken; the run cannot continue
    Fatal,
    /// Reported against the current module; other modules may still be processed
    Recoverable,
}

impl Error {
    /// Create a source error at a location
    pub fn source(location: Location, msg: impl Into<String>) -> Self {
        Error::SourceError {
            location,
            message: msg.into(),
        }
    }

    /// Create an invalid-argument error with a message
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Whether this error belongs to the source-error family
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            Error::SourceError { .. }
                | Error::UnhandledStatement { .. }
                | Error::FacilityArity { .. }
                | Error::OperationMismatch { .. }
                | Error::NoSuchSymbol { .. }
        )
    }

    /// Location of a source error, if any
    pub fn location(&self) -> Option<&Location> {
        match self {
            Error::SourceError { location, .. }
            | Error::UnhandledStatement { location, .. }
            | Error::FacilityArity { location, .. }
            | Error::OperationMismatch { location, .. }
            | Error::NoSuchSymbol { location, .. } => Some(location),
            _ => None,
        }
    }

    /// Classify error severity
    pub fn classify(&self) -> ErrorSeverity {
        match self {
            Error::UnexpectedExpression { .. } => ErrorSeverity::Fatal,
            Error::NonAtomicVc { .. } => ErrorSeverity::Fatal,
            Error::InvalidArgument(_) => ErrorSeverity::Fatal,
            Error::ThreadPoolError(_) => ErrorSeverity::Fatal,

            _ => ErrorSeverity::Recoverable,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SerializationError(e.to_string())
    }
}

/// Result type for verification core operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_errors_are_recoverable() {
        let err = Error::source(Location::new("Stack_Template.co", 12, 5), "bad clause");
        assert!(err.is_source_error());
        assert_eq!(err.classify(), ErrorSeverity::Recoverable);
        assert_eq!(err.location().map(|l| l.line), Some(12));
        assert!(err.to_string().contains("bad clause"));
    }

    #[test]
    fn test_rule_mismatch_is_fatal() {
        let err = Error::UnexpectedExpression {
            rule: "Left Or Rule".to_string(),
            expression: "a and b".to_string(),
            kind: "InfixExp".to_string(),
        };
        assert!(!err.is_source_error());
        assert_eq!(err.classify(), ErrorSeverity::Fatal);
        assert!(err.to_string().contains("Unexpected expression"));
    }
}

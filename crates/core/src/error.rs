use std::path::PathBuf;

/// A form draft is not complete enough to submit.
///
/// Only the first missing item is reported, in field order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required text field is empty.
    #[error("field {0} is required")]
    MissingField(&'static str),

    /// No signature has been drawn (or it was cleared).
    #[error("digital signature is required")]
    MissingSignature,
}

/// Errors raised while building a [`crate::Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// An environment variable held a value of the wrong shape.
    #[error("invalid value for {var}: '{value}' ({reason})")]
    InvalidEnv {
        var: &'static str,
        value: String,
        reason: String,
    },
}

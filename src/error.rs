//! Error handling for the device_pulse crate.

/// A specialized `Result` type for device_pulse operations.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// The error type returned by platform probes and configuration loading.
///
/// The collector never hands these to its callers: every probe failure is
/// converted to a sentinel value at the point of the query.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// System table parsing failed
    #[error("Failed to parse system information: {0}")]
    ParseError(String),

    /// The queried OS service exists in principle but returned nothing usable
    #[error("Metric unavailable: {0}")]
    Unavailable(String),

    /// The platform has no way to answer this query
    #[error("Unsupported on this platform: {0}")]
    Unsupported(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic system error
    #[error("System error: {0}")]
    System(String),
}

impl MetricsError {
    /// Create a new parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a new unavailable-metric error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a new unsupported-platform error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new generic system error
    pub fn system_error(msg: impl Into<String>) -> Self {
        Self::System(msg.into())
    }
}

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ArbError {
    /// No USD reference price for the symbol a run depends on
    #[error("Price Unavailable: {0}")]
    PriceUnavailable(String),

    /// Every TWAP step was skipped, nothing to average
    #[error("No valid TWAP steps out of {steps}")]
    NoValidSteps { steps: u32 },

    /// Invalid input parameters
    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    /// Configuration errors
    #[error("Config Error: {0}")]
    ConfigError(String),

    /// Parsing errors for config tables
    #[error("Parse Error: {0}")]
    ParseError(String),

    /// Filesystem errors while loading config
    #[error("IO Error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for ArbError {
    fn from(err: serde_json::Error) -> Self {
        ArbError::ParseError(format!("JSON serialization/deserialization error: {}", err))
    }
}

impl From<std::io::Error> for ArbError {
    fn from(err: std::io::Error) -> Self {
        ArbError::Io(err.to_string())
    }
}

impl ArbError {
    /// Determines if a fresh attempt (next cycle, new snapshot) may succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            ArbError::PriceUnavailable(_) => true, // price feed may refresh
            ArbError::NoValidSteps { .. } => true, // venues may come back
            ArbError::InvalidInput(_) => false,
            ArbError::ConfigError(_) => false,
            ArbError::ParseError(_) => false,
            ArbError::Io(_) => false,
        }
    }

    /// Categorizes error for monitoring
    pub fn categorize(&self) -> ErrorCategory {
        match self {
            ArbError::PriceUnavailable(_) => ErrorCategory::DataFeed,
            ArbError::NoValidSteps { .. } => ErrorCategory::Trading,
            ArbError::InvalidInput(_) | ArbError::ConfigError(_) => ErrorCategory::Configuration,
            ArbError::ParseError(_) => ErrorCategory::Data,
            ArbError::Io(_) => ErrorCategory::Infrastructure,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorCategory {
    DataFeed,
    Trading,
    Data,
    Configuration,
    Infrastructure,
}

pub type Result<T> = std::result::Result<T, ArbError>;

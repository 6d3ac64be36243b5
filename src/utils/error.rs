use thiserror::Error;

#[derive(Error, Debug)]
pub enum HydroError {
    #[error("Invalid argument '{field}' = '{value}': {reason}")]
    InvalidArgument {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Persistence error: {message}")]
    PersistenceError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Persistence,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl HydroError {
    pub fn invalid_argument(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        HydroError::InvalidArgument {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        HydroError::PersistenceError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        HydroError::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            HydroError::InvalidArgument { .. } => ErrorCategory::Input,
            HydroError::PersistenceError { .. } => ErrorCategory::Persistence,
            HydroError::ConfigError { .. } => ErrorCategory::Configuration,
            HydroError::IoError(_) | HydroError::CsvError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            HydroError::InvalidArgument { .. } => ErrorSeverity::Low,
            HydroError::PersistenceError { .. } => ErrorSeverity::Medium,
            HydroError::ConfigError { .. } => ErrorSeverity::High,
            HydroError::IoError(_) | HydroError::CsvError(_) => ErrorSeverity::Critical,
        }
    }

    /// 給操作員看的訊息，不含內部細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            HydroError::InvalidArgument { field, reason, .. } => {
                format!("Invalid value for {}: {}", field, reason)
            }
            HydroError::PersistenceError { message } => {
                format!("Error saving data to the database: {}", message)
            }
            HydroError::ConfigError { message } => format!("Configuration problem: {}", message),
            HydroError::IoError(e) => format!("File or console error: {}", e),
            HydroError::CsvError(e) => format!("Could not write the CSV report: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Enter a positive number and try again",
            ErrorCategory::Persistence => {
                "Check that the database file is writable and the URL is correct"
            }
            ErrorCategory::Configuration => "Review the command line flags or the TOML file",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

impl From<sqlx::Error> for HydroError {
    fn from(e: sqlx::Error) -> Self {
        HydroError::PersistenceError {
            message: e.to_string(),
        }
    }
}

impl From<toml::de::Error> for HydroError {
    fn from(e: toml::de::Error) -> Self {
        HydroError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, HydroError>;

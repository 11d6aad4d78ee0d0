use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrmError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data access failed during {operation}: {message}")]
    DataAccessError { operation: String, message: String },

    #[error("{entity} {id} not found")]
    NotFoundError { entity: String, id: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("The form has already left the edit screen")]
    FormClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    DataAccess,
    Input,
    State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CrmError {
    pub fn data_access(operation: &str, message: impl Into<String>) -> Self {
        CrmError::DataAccessError {
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        CrmError::NotFoundError {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CrmError::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CrmError::ConfigError { .. }
            | CrmError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            CrmError::IoError(_)
            | CrmError::CsvError(_)
            | CrmError::SerializationError(_)
            | CrmError::DataAccessError { .. }
            | CrmError::NotFoundError { .. } => ErrorCategory::DataAccess,
            CrmError::ValidationError { .. } => ErrorCategory::Input,
            CrmError::FormClosed => ErrorCategory::State,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CrmError::ValidationError { .. } | CrmError::FormClosed => ErrorSeverity::Low,
            CrmError::IoError(_) | CrmError::DataAccessError { .. } => ErrorSeverity::Medium,
            CrmError::CsvError(_)
            | CrmError::SerializationError(_)
            | CrmError::NotFoundError { .. } => ErrorSeverity::High,
            CrmError::ConfigError { .. }
            | CrmError::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Whether repeating the same request may succeed without changing the input.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CrmError::IoError(_) | CrmError::DataAccessError { .. }
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CrmError::IoError(_) | CrmError::DataAccessError { .. } => {
                "The customer store could not be reached. Your changes were not saved.".to_string()
            }
            CrmError::CsvError(e) => format!("The customer store contains unreadable data: {}", e),
            CrmError::SerializationError(e) => format!("Could not encode the record: {}", e),
            CrmError::NotFoundError { entity, id } => format!("{} {} does not exist", entity, id),
            CrmError::ValidationError { message } => message.clone(),
            CrmError::FormClosed => "This form is already closed".to_string(),
            CrmError::ConfigError { .. }
            | CrmError::InvalidConfigValueError { .. } => format!("Configuration problem: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => "Check the configuration file and command line flags",
            ErrorCategory::DataAccess if self.is_retryable() => {
                "Check the data directory is reachable and try saving again"
            }
            ErrorCategory::DataAccess => "Check the CSV files in the data directory",
            ErrorCategory::Input => "Correct the highlighted fields and submit again",
            ErrorCategory::State => "Open the customer again to make further edits",
        }
    }
}

pub type Result<T> = std::result::Result<T, CrmError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Source file not found: {path}")]
    MissingSource { path: String },

    #[error("Leg {start} → {end} references unknown mark '{missing}'")]
    DanglingMark {
        start: String,
        end: String,
        missing: String,
    },

    #[error("Duplicate mark name: {name}")]
    DuplicateMark { name: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Data,
    Integrity,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ViewerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ViewerError::IoError(_) | ViewerError::MissingSource { .. } => ErrorCategory::Io,
            ViewerError::CsvError(_)
            | ViewerError::SerializationError(_)
            | ViewerError::ProcessingError { .. }
            | ViewerError::ValidationError { .. } => ErrorCategory::Data,
            ViewerError::DanglingMark { .. } | ViewerError::DuplicateMark { .. } => {
                ErrorCategory::Integrity
            }
            ViewerError::TomlError(_)
            | ViewerError::ConfigError { .. }
            | ViewerError::InvalidConfigValueError { .. }
            | ViewerError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Integrity => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ViewerError::MissingSource { path } => {
                format!("Check that '{}' exists in the data directory", path)
            }
            ViewerError::DanglingMark { missing, .. } => format!(
                "Add '{}' to the marks file or remove the leg from the legs file",
                missing
            ),
            ViewerError::DuplicateMark { name } => {
                format!("Rename or remove one of the '{}' rows in the marks file", name)
            }
            ViewerError::CsvError(_) => {
                "Check the CSV headers and that Lat/Long/DistanceNM are numeric".to_string()
            }
            ViewerError::TomlError(_) | ViewerError::ConfigError { .. } => {
                "Check the configuration file syntax".to_string()
            }
            ViewerError::InvalidConfigValueError { field, .. }
            | ViewerError::MissingConfigError { field } => {
                format!("Fix the '{}' setting", field)
            }
            ViewerError::IoError(_) => "Check file permissions and disk space".to_string(),
            _ => "Inspect the input data and try again".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("Could not access course files: {}", self),
            ErrorCategory::Data => format!("Course data could not be processed: {}", self),
            ErrorCategory::Integrity => format!("Course data is inconsistent: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
        }
    }

    /// 依嚴重程度決定退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ColumnError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid input: {message}")]
    InvalidInputError { message: String },
}

impl ColumnError {
    /// Short message suitable for printing to a terminal.
    pub fn user_friendly_message(&self) -> String {
        match self {
            ColumnError::IoError(e) => format!("Could not read or write a file: {}", e),
            ColumnError::SerializationError(e) => format!("Input is not valid JSON: {}", e),
            ColumnError::CsvError(e) => format!("Failed to write the CSV table: {}", e),
            ColumnError::ConfigError { message } => format!("Configuration problem: {}", message),
            ColumnError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            ColumnError::InvalidInputError { message } => format!("Unusable input: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ColumnError::IoError(_) => "Check that the input file exists and the output directory is writable",
            ColumnError::SerializationError(_) => {
                "Provide a JSON array, a single JSON object or one JSON object per line"
            }
            ColumnError::CsvError(_) => "Check free disk space and permissions on the output directory",
            ColumnError::ConfigError { .. } => "Fix the TOML syntax in the configuration file",
            ColumnError::InvalidConfigValueError { .. } => "Run with --help to see accepted values",
            ColumnError::InvalidInputError { .. } => "Make sure the input contains JSON records",
        }
    }

    /// Process exit code used by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            ColumnError::ConfigError { .. } | ColumnError::InvalidConfigValueError { .. } => 2,
            ColumnError::IoError(_) | ColumnError::CsvError(_) => 3,
            ColumnError::SerializationError(_) | ColumnError::InvalidInputError { .. } => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ColumnError>;

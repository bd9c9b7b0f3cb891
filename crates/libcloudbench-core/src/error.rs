use thiserror::Error;

/// Main error type for cloudbench core operations
#[derive(Debug, Error)]
pub enum CloudBenchError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("schema mismatch: {0}")]
    Schema(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CloudBenchError {
    /// Short machine-readable code for log fields
    pub fn error_code(&self) -> &'static str {
        match self {
            CloudBenchError::InvalidArgs(_) => "invalid_args",
            CloudBenchError::Schema(_) => "schema_mismatch",
            CloudBenchError::Io(_) => "io_error",
            CloudBenchError::TomlParse(_) => "invalid_args",
            CloudBenchError::TomlSerialize(_) => "internal_error",
            CloudBenchError::Internal(_) => "internal_error",
        }
    }

    /// Get the exit code for the CLI
    pub fn exit_code(&self) -> u8 {
        match self {
            CloudBenchError::InvalidArgs(_) => 2,
            CloudBenchError::TomlParse(_) => 2,
            _ => 1,
        }
    }

    /// Actionable hints printed under startup errors
    pub fn suggestions(&self) -> Vec<&'static str> {
        match self {
            CloudBenchError::TomlParse(_) => vec![
                "Check the settings file passed with --config",
                "Unknown keys are rejected; remove or rename them",
            ],
            CloudBenchError::Io(_) => vec![
                "Check that the directory of --out exists and is writable",
            ],
            _ => vec![],
        }
    }
}

pub type Result<T> = std::result::Result<T, CloudBenchError>;

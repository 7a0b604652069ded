// CLI error types

use thiserror::Error;

/// Exit code when every envelope succeeded
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code when at least one envelope failed
pub const EXIT_FAILURE: i32 = 1;
/// Exit code when settings could not be loaded
pub const EXIT_CONFIG: i32 = 2;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => EXIT_CONFIG,
            _ => EXIT_FAILURE,
        }
    }
}

impl From<imagelens_config::ConfigError> for CliError {
    fn from(err: imagelens_config::ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}

impl From<imagelens_pipeline::PipelineError> for CliError {
    fn from(err: imagelens_pipeline::PipelineError) -> Self {
        CliError::Config(err.to_string())
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

//! Error types for RakshaNav

use thiserror::Error;

/// RakshaNav error type
#[derive(Error, Debug)]
pub enum RakshaError {
    /// Obstacle geometry rejected at registry construction time.
    #[error("Invalid obstacle: {0}")]
    InvalidObstacle(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The distance field could not be built. The previous field, if any,
    /// stays installed and the ready flag stays false.
    #[error("Field build failed: {0}")]
    FieldBuild(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for RakshaError {
    fn from(e: toml::de::Error) -> Self {
        RakshaError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RakshaError>;

//! Crate-level error type.
//!
//! Per-action failures inside a tick are not errors at this level; they are
//! reported as rejections in the tick result.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    /// Construction-time parameters that cannot produce a valid world.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("file system error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to write config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    #[must_use]
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_display() {
        let err = SimError::invalid_config("width must be positive");
        assert_eq!(
            err.to_string(),
            "invalid configuration: width must be positive"
        );
    }

    #[test]
    fn from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: SimError = io_err.into();
        assert!(matches!(err, SimError::Io(_)));
    }
}

use thiserror::Error;

/// Errors raised by this crate. Each subsystem crate carries its own error
/// enum; this one only covers configuration loading.
#[derive(Debug, Error)]
pub enum OasisError {
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, OasisError>;

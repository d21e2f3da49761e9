use thiserror::Error;

/// Unified error type for anim-loop
#[derive(Error, Debug)]
pub enum LoopError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type LoopResult<T> = Result<T, LoopError>;

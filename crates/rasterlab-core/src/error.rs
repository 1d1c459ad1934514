use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("buffer is empty")]
    EmptyBuffer,

    #[error("coordinate ({x}, {y}) is outside the {width}x{height} buffer")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("sample data length {actual} doesn't match expected {expected}")]
    DataLength { expected: usize, actual: usize },

    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        CoreError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

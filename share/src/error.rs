use thiserror::Error;

/// Error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("length not enough: expected {expected} bytes, got {actual}")]
    LengthNotEnough { expected: usize, actual: usize },
    #[error("invalid hex string: {0}")]
    Encoding(String),
    #[error("wrong data length or format")]
    WrongDataLengthOrFormat,
    #[error("unknown order setup {0}")]
    UnknownOrderSetup(u8),
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::Encoding(err.to_string())
    }
}

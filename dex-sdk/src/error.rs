use thiserror::Error;

/// Error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("The address has no empty cells")]
    NoFreeCells,
    #[error("{0}")]
    NoAssetCells(String),
    #[error("{0}")]
    InsufficientCapacity(String),
    #[error("{0}")]
    InsufficientTokenBalance(String),
    #[error("The asset cell does not belong to the seller address")]
    OwnershipMismatch,
    #[error("malformed order args: {0}")]
    MalformedArgs(String),
    #[error("{0}")]
    MissingTypeOrData(String),
    #[error("Cota cell doesn't exist")]
    NoUnlockProofCell,
    #[error("co-build inputs ({inputs}) and outputs ({outputs}) differ in length")]
    CoBuildLengthMismatch { inputs: usize, outputs: usize },
    #[error("cell source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("{0}")]
    LiveCellNotFound(String),
    #[error("not an order cell: {0}")]
    NotOrderCell(String),
    #[error("{0}")]
    UnsupportedAsset(String),
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Codec(#[from] share::error::Error),
}

impl From<molecule::error::VerificationError> for Error {
    fn from(err: molecule::error::VerificationError) -> Self {
        Error::MalformedArgs(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}

pub type Result<T> = core::result::Result<T, Error>;

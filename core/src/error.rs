use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration, grid size must be at least 1")]
    InvalidConfig,
    #[error("Cell index out of range")]
    IndexOutOfRange,
    #[error("Item placed twice on the same cell")]
    DuplicateItem,
    #[error("Corrupt save data: {0}")]
    CorruptSaveData(&'static str),
}

pub type Result<T> = core::result::Result<T, GameError>;

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ResmapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Root directory not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

pub type Result<T> = std::result::Result<T, ResmapError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TypesetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Font '{0}' is not registered")]
    FontNotRegistered(String),
    #[error("Font error: {0}")]
    Font(String),
    #[error("Layout error: {0}")]
    Layout(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, TypesetError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum XtError {
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("Invalid solver config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, XtError>;

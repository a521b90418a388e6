use thiserror::Error;

#[derive(Debug, Error)]
pub enum NmtError {
    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Arrangement has {invalid} point(s) out of order")]
    WrongOrder { invalid: usize },
}

pub type Result<T> = std::result::Result<T, NmtError>;

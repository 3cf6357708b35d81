use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Invalid time range: {0}")]
    InvalidRange(String),

    #[error("Invalid slot template: {0}")]
    InvalidTemplate(String),

    #[error("Insufficient coverage: {0}")]
    InsufficientCoverage(String),

    #[error("A checkout is already in progress")]
    AlreadyInProgress,

    #[error("Invalid checkout state: {0}")]
    InvalidState(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Service temporarily unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type BookingResult<T> = Result<T, BookingError>;

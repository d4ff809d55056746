use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Phone number must be 10 digits long")]
    InvalidPhoneFormat,
    #[error("Invalid date format. Use DD.MM.YYYY")]
    InvalidDateFormat
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BookError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0} not found")]
    NotFound(String)
}

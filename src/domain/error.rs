use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Unauthorized(String),
    #[error("user not found, upstream status {0}")]
    NotFound(u16),
    #[error("{0}")]
    Unexpected(String),
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Self::Unexpected(value.to_string())
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("http transport error: {0}")]
    Http(String),
    #[error("http status {0}")]
    Status(u16),
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("request timeout")]
    Timeout,
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;

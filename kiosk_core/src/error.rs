use thiserror::Error;

/// Which detection deadline expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutKind {
    /// No successful detection shortly after the screen opened.
    Short,
    /// No weight change for the full idle window.
    Long,
}

impl std::fmt::Display for TimeoutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeoutKind::Short => f.write_str("short"),
            TimeoutKind::Long => f.write_str("long"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum KioskError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("timeout waiting for service")]
    Timeout,
    #[error("classifier reported no box")]
    ClassificationNegative,
    #[error("{0} detection timeout expired")]
    TimeoutExpired(TimeoutKind),
    #[error("session cancelled")]
    Cancelled,
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("no parcel size range fits {weight_kg} kg")]
    UnsizedParcel { weight_kg: f64 },
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing parcel size ranges")]
    MissingRanges,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("task '{name}' interval must be at least one second")]
    IntervalTooShort { name: String },
}

impl Error {
    #[must_use]
    pub fn interval_too_short(name: impl Into<String>) -> Self {
        Self::IntervalTooShort { name: name.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

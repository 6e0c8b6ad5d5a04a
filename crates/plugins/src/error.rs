use {thiserror::Error, warren_common::FromMessage};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error("invalid manifest: {message}")]
    InvalidManifest { message: String },

    #[error("unsafe archive entry: {path}")]
    UnsafeArchivePath { path: String },

    #[error("init command failed: {message}")]
    InitFailed { message: String },

    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid_manifest(message: impl Into<String>) -> Self {
        Self::InvalidManifest {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn unsafe_archive_path(path: impl Into<String>) -> Self {
        Self::UnsafeArchivePath { path: path.into() }
    }

    #[must_use]
    pub fn init_failed(message: impl Into<String>) -> Self {
        Self::InitFailed {
            message: message.into(),
        }
    }
}

impl FromMessage for Error {
    fn from_message(message: String) -> Self {
        Self::Message { message }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

warren_common::impl_context!();

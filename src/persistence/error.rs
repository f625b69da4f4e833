use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("storage I/O failed for `{key}`: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt `{key}` record: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not encode `{key}` record: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl PersistenceError {
    pub(crate) fn io(key: &str, source: std::io::Error) -> Self {
        Self::Io {
            key: key.to_owned(),
            source,
        }
    }

    /// The storage key the failure relates to.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Io { key, .. } | Self::Corrupt { key, .. } | Self::Encode { key, .. } => key,
        }
    }
}

pub type Result<T> = std::result::Result<T, PersistenceError>;

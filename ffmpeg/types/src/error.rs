/*!
    Error taxonomy for media input sessions.
*/

use thiserror::Error;

/**
    Errors produced while setting up the runtime or opening and using a session.

    `InvalidDescriptor`, `OpenFailed` and `Closed` are recoverable and always
    returned to the caller. `Interrupted` means the session's interrupt flag
    was raised while a read was blocked. `InitializationFailed` is only ever produced during
    startup and callers are expected to treat it as fatal.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid input descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("unable to open input '{url}': {reason}")]
    OpenFailed { url: String, reason: String },

    #[error("media runtime initialization failed: {0}")]
    InitializationFailed(String),

    #[error("media runtime used before initialization")]
    NotInitialized,

    #[error("session is closed")]
    Closed,

    #[error("unable to read packet: {0}")]
    Read(String),

    #[error("blocking operation was interrupted")]
    Interrupted,
}

impl Error {
    /**
        Create an invalid descriptor error.
    */
    pub fn invalid_descriptor(msg: impl Into<String>) -> Self {
        Self::InvalidDescriptor(msg.into())
    }

    /**
        Create an open failure for the given source.
    */
    pub fn open_failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::OpenFailed {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /**
        Returns the source URL this error refers to, if any.
    */
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::OpenFailed { url, .. } => Some(url),
            _ => None,
        }
    }
}

/// Type alias for results that may return an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

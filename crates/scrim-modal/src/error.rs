#![forbid(unsafe_code)]

//! Error types for modal construction and transitions.

use thiserror::Error;

/// Failure while fetching remote panel content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("request to {url} returned HTTP {status}")]
    Http { url: String, status: u16 },

    #[error("response from {url} could not be read: {message}")]
    Body { url: String, message: String },
}

impl LoadError {
    /// URL the failed request was issued to.
    pub fn url(&self) -> &str {
        match self {
            Self::Network { url, .. } | Self::Http { url, .. } | Self::Body { url, .. } => url,
        }
    }
}

/// Errors surfaced by a modal instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModalError {
    /// The instance cannot be built from this configuration.
    #[error("invalid modal configuration: {0}")]
    InvalidConfig(String),

    /// Content could not be loaded; visible state was left untouched.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The instance was unmounted and can no longer transition.
    #[error("modal instance has been unmounted")]
    Unmounted,
}

pub type Result<T> = std::result::Result<T, ModalError>;

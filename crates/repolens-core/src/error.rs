//! Error taxonomy for repository operations.
//!
//! Every failure carries enough context (HTTP status, originating URL,
//! prelude message) to diagnose without re-deriving state. No operation
//! retries; all errors propagate to the caller.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A repository reference could not be reduced to an `owner/name` pair.
    /// Raised before any network call is made.
    #[error("unrecognized repository reference: {reference}")]
    Resolution { reference: String },

    /// A URL reference pointed at a host that is none of the recognized
    /// Git sources. Terminal; no operation may proceed.
    #[error("unsupported git host in URL: {url}")]
    UnknownSource { url: String },

    /// A non-2xx HTTP response. For 403 responses the message states
    /// whether a token was present, to separate anonymous rate limiting
    /// from authenticated rate limiting.
    #[error("[{status}, {url}]: {message}")]
    Transport {
        status: u16,
        url: String,
        message: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Connection-level failure from the HTTP client.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// An operation was invoked on a provider that has not implemented it.
    #[error("{operation} is not implemented for the {provider} provider")]
    NotImplemented {
        provider: &'static str,
        operation: &'static str,
    },

    /// Commits were not preloaded at session construction, so there is no
    /// embedded page to advance from.
    #[error("commits were not preloaded for this session; use get_commits instead")]
    CommitsNotPreloaded,

    /// The on-disk configuration file exists but could not be read or parsed.
    #[error("failed to load config file {path}: {message}")]
    Config { path: String, message: String },
}

//! Skjold error types

/// Skjold error types
#[derive(Debug, thiserror::Error)]
pub enum SkjoldError {
    // Transport errors
    /// The network could not complete a fetch. Recoverable by the router
    /// whenever a cached copy can satisfy the request.
    #[error("network error: {0}")]
    Network(String),

    // Lifecycle errors
    /// A precache manifest entry could not be fetched during install.
    /// Fatal to the install step so the new generation is never activated.
    #[error("precache failed for '{path}': {reason}")]
    Precache { path: String, reason: String },

    #[error("cache storage error: {0}")]
    Storage(String),

    #[error("host runtime error: {0}")]
    Host(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl From<reqwest::Error> for SkjoldError {
    fn from(err: reqwest::Error) -> Self {
        // Timeouts and connection resets all surface as generic network failure
        SkjoldError::Network(err.to_string())
    }
}

/// Result type alias for Skjold operations
pub type Result<T> = std::result::Result<T, SkjoldError>;

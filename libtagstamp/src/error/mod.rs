//! Error types for tagstamp
//!
//! Every step of the pipeline returns a [`Result`] carrying a
//! [`TagstampError`]. The only failures recovered locally are unparseable
//! creation timestamps; everything else is handed back to the caller, which
//! decides whether to abort the run or skip the affected tag.

use thiserror::Error;


/// Main error type for tagstamp operations
#[derive(Error, Debug)]
pub enum TagstampError {
    /// Network-related errors (connection, timeout, DNS, unexpected status)
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Authentication errors (401, 403, challenge or token issues)
    #[error("Authentication error (status: {status_code:?}): {message}")]
    Authentication {
        message: String,
        status_code: Option<u16>,
    },

    /// Resource not found errors (404)
    #[error("{resource_type} not found: {name}")]
    NotFound { resource_type: String, name: String },

    /// Server errors (5xx)
    #[error("Server error (status: {status_code}): {message}")]
    Server { message: String, status_code: u16 },

    /// Validation errors (malformed JSON, missing fields, bad URLs)
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The registry answered with a manifest that carries no schema 1 history
    #[error(
        "Unsupported manifest: registry served {served} instead of a schema 1 manifest with history"
    )]
    UnsupportedSchema { served: String },

    /// Configuration errors (invalid config file, missing settings)
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for tagstamp operations
pub type Result<T> = std::result::Result<T, TagstampError>;

impl TagstampError {
    /// Creates a new network error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libtagstamp::error::TagstampError;
    ///
    /// let err = TagstampError::network("connection refused");
    /// assert!(matches!(err, TagstampError::Network { .. }));
    /// ```
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new network error with a source error.
    pub fn network_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new authentication error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libtagstamp::error::TagstampError;
    ///
    /// let err = TagstampError::authentication("invalid credentials", Some(401));
    /// assert!(matches!(err, TagstampError::Authentication { .. }));
    /// ```
    pub fn authentication<S: Into<String>>(message: S, status_code: Option<u16>) -> Self {
        Self::Authentication {
            message: message.into(),
            status_code,
        }
    }

    /// Creates a new not found error.
    pub fn not_found<S: Into<String>>(resource_type: S, name: S) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }

    /// Creates a new server error.
    pub fn server<S: Into<String>>(message: S, status_code: u16) -> Self {
        Self::Server {
            message: message.into(),
            status_code,
        }
    }

    /// Creates a new validation error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libtagstamp::error::TagstampError;
    ///
    /// let err = TagstampError::validation("missing 'tags' field");
    /// assert!(matches!(err, TagstampError::Validation { .. }));
    /// ```
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new validation error with a source error.
    pub fn validation_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Validation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates an unsupported schema error describing what the registry served.
    pub fn unsupported_schema<S: Into<String>>(served: S) -> Self {
        Self::UnsupportedSchema {
            served: served.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S, path: Option<S>) -> Self {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: None,
        }
    }

    /// Creates a new configuration error with a source error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libtagstamp::error::TagstampError;
    /// use std::io;
    ///
    /// let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    /// let err = TagstampError::config_with_source(
    ///     "failed to read config",
    ///     Some("/etc/tagstamp.yaml"),
    ///     io_err,
    /// );
    /// assert!(matches!(err, TagstampError::Config { .. }));
    /// ```
    pub fn config_with_source<S, E>(message: S, path: Option<S>, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: Some(Box::new(source)),
        }
    }
}

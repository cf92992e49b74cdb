//! Error types for ImageKit API operations.
//!
//! Every operation returns its failures as a value of [`ImageKitError`].
//! The variants separate caller mistakes, transport failures, service
//! errors and decoding failures so callers can decide what to retry.

use crate::response::Response;
use std::fmt;
use thiserror::Error;


/// Classification of a transport-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// The transport's own timeout elapsed
    Timeout,
    /// Connection could not be established (DNS, refused, TLS)
    Connect,
    /// The request could not be sent
    Request,
    /// The response body could not be read
    Body,
    /// The caller canceled the request context
    Canceled,
    /// The request context's deadline passed
    DeadlineExceeded,
    /// Anything else reported by the transport
    Other,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Request => "request",
            Self::Body => "body",
            Self::Canceled => "canceled",
            Self::DeadlineExceeded => "deadline exceeded",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Main error type for ImageKit operations
#[derive(Error, Debug)]
pub enum ImageKitError {
    /// A required caller-supplied argument was empty; nothing was sent
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The base endpoint and path did not form a valid URL
    #[error("Malformed URL: {message}")]
    MalformedUrl {
        message: String,
        #[source]
        source: Option<url::ParseError>,
    },

    /// The transport failed before a complete response was received
    #[error("Transport error ({kind}): {message}")]
    Transport {
        kind: TransportKind,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Non-success response carrying a structured service error
    #[error("Service error (status: {status_code}): {message}")]
    Service {
        status_code: u16,
        message: String,
        help: Option<String>,
        response: Response,
    },

    /// Non-success response whose body is not a structured service error
    #[error("Unexpected response (status: {status_code}): {}", excerpt(.response))]
    UnexpectedResponse { status_code: u16, response: Response },

    /// Success response whose body does not match the expected shape
    #[error("Decode error{}: {message}", at_path(.path))]
    Decode {
        path: Option<String>,
        message: String,
        response: Response,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration errors (invalid config file, missing settings)
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

fn at_path(path: &Option<String>) -> String {
    path.as_ref()
        .map(|p| format!(" at '{}'", p))
        .unwrap_or_default()
}

/// Longest body prefix, in characters, shown in error messages.
const BODY_EXCERPT_LEN: usize = 256;

fn excerpt(response: &Response) -> String {
    let body = response.body_lossy();
    match body.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((end, _)) => format!("{}... ({} bytes)", &body[..end], response.body().len()),
        None => body.into_owned(),
    }
}

/// Result type alias for ImageKit operations
pub type Result<T> = std::result::Result<T, ImageKitError>;

impl ImageKitError {
    /// Creates a new invalid argument error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libimagekit::error::ImageKitError;
    ///
    /// let err = ImageKitError::invalid_argument("fileId can not be blank");
    /// assert!(matches!(err, ImageKitError::InvalidArgument { .. }));
    /// ```
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a new malformed URL error.
    pub fn malformed_url<S: Into<String>>(message: S, source: Option<url::ParseError>) -> Self {
        Self::MalformedUrl {
            message: message.into(),
            source,
        }
    }

    /// Creates a new transport error without a source.
    ///
    /// # Examples
    ///
    /// ```
    /// use libimagekit::error::{ImageKitError, TransportKind};
    ///
    /// let err = ImageKitError::transport(TransportKind::Canceled, "context canceled");
    /// assert!(err.is_canceled());
    /// ```
    pub fn transport<S: Into<String>>(kind: TransportKind, message: S) -> Self {
        Self::Transport {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new transport error with a source error.
    pub fn transport_with_source<S, E>(kind: TransportKind, message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libimagekit::error::ImageKitError;
    ///
    /// let err = ImageKitError::config("missing private key", None);
    /// assert!(matches!(err, ImageKitError::Config { .. }));
    /// ```
    pub fn config<S: Into<String>>(message: S, path: Option<S>) -> Self {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: None,
        }
    }

    /// Creates a new configuration error with a source error.
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

    /// Returns true when the request was aborted by its context, either by
    /// explicit cancellation or by an expired deadline.
    pub fn is_canceled(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                kind: TransportKind::Canceled | TransportKind::DeadlineExceeded,
                ..
            }
        )
    }

    /// Returns the HTTP status code if a response was received.
    pub fn status_code(&self) -> Option<u16> {
        self.response().map(Response::status_code)
    }

    /// Returns the response envelope for errors that carry one.
    ///
    /// The raw body is always preserved, so callers can inspect what the
    /// service actually sent even when it could not be decoded.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Service { response, .. }
            | Self::UnexpectedResponse { response, .. }
            | Self::Decode { response, .. } => Some(response),
            _ => None,
        }
    }
}

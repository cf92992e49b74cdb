//! Response envelope.
//!
//! A [`Response`] holds the status code and the raw body bytes of one HTTP
//! exchange. The body is read completely before the envelope is built, so
//! the underlying connection is released as soon as the envelope exists.
//! Typed decoding and error parsing are pure functions of the stored data.

use crate::decode;
use crate::error::{ImageKitError, Result};
use bytes::Bytes;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;

#[cfg(test)]
mod tests;

/// Structured error body returned by the service for non-success statuses.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    message: String,
    #[serde(default)]
    help: Option<String>,
}

/// Status code and raw body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status_code: u16,
    body: Bytes,
}

impl Response {
    /// Creates an envelope from a status code and body.
    ///
    /// # Examples
    ///
    /// ```
    /// use libimagekit::response::Response;
    ///
    /// let response = Response::new(204, "");
    /// assert_eq!(response.status_code(), 204);
    /// assert!(response.body().is_empty());
    /// ```
    pub fn new(status_code: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }

    /// Returns the HTTP status code.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Returns the raw body bytes, exactly as received.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the body as text, replacing invalid UTF-8 sequences.
    pub fn body_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Returns true for statuses in the 200-299 range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Decodes the body into `T`.
    ///
    /// On failure the returned [`ImageKitError::Decode`] carries a copy of
    /// this envelope and, when it can be located, the JSON path of the
    /// offending field.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        decode::from_slice(&self.body).map_err(|e| {
            tracing::warn!(
                status = self.status_code,
                path = e.path.as_deref().unwrap_or(""),
                "Failed to decode response body: {}",
                e.source
            );
            ImageKitError::Decode {
                message: e.source.to_string(),
                path: e.path,
                response: self.clone(),
                source: e.source,
            }
        })
    }

    /// Interprets the body as a service error.
    ///
    /// Returns [`ImageKitError::Service`] when the body is a structured
    /// error with a `message`, and [`ImageKitError::UnexpectedResponse`]
    /// carrying the raw body otherwise.
    pub fn parse_error(&self) -> ImageKitError {
        match serde_json::from_slice::<ServiceErrorBody>(&self.body) {
            Ok(parsed) => ImageKitError::Service {
                status_code: self.status_code,
                message: parsed.message,
                help: parsed.help,
                response: self.clone(),
            },
            Err(_) => ImageKitError::UnexpectedResponse {
                status_code: self.status_code,
                response: self.clone(),
            },
        }
    }

    /// Returns `Ok(self)` when the status equals `expected`, otherwise the
    /// parsed service error.
    pub(crate) fn expect_status(self, expected: u16) -> Result<Self> {
        if self.status_code == expected {
            Ok(self)
        } else {
            Err(self.parse_error())
        }
    }
}

/// Typed payload together with the envelope it was decoded from.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    /// Decoded payload
    pub data: T,
    /// Raw status and body
    pub response: Response,
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Decodes `response` into a typed payload, keeping the envelope.
    pub(crate) fn decode(response: Response) -> Result<Self> {
        let data = response.decode()?;
        Ok(Self { data, response })
    }
}

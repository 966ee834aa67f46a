//! Error types for WebMerge API calls.
//!
//! Every failure is reported to the caller as-is. Nothing here is retried
//! or recovered; the variants only tell apart where the failure came from.

use http::{HeaderMap, StatusCode};
use serde_json::Value;

/// The main error type for WebMerge API calls.
///
/// # Examples
///
/// ```no_run
/// use webmerge::{AsyncClient, Client, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = AsyncClient::new(Client::new("key", "secret")?);
///
/// match client.get_document(42).await {
///     Ok(document) => println!("Document: {}", document),
///     Err(Error::HttpError { status, raw_response, .. }) => {
///         eprintln!("HTTP error {}: {}", status, raw_response);
///     }
///     Err(Error::Application { message, .. }) => {
///         eprintln!("WebMerge rejected the request: {}", message);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A network-level error occurred (connection failed, DNS lookup failed, TLS, etc.).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request timed out.
    ///
    /// Only happens when a timeout was configured on the client.
    #[error("Request timed out")]
    Timeout,

    /// The server returned a non-2xx HTTP status code.
    #[error("HTTP error {status}: {raw_response}")]
    HttpError {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        raw_response: String,
        /// The response headers
        headers: HeaderMap,
    },

    /// The server answered with a 2xx status, but the body reports an error.
    ///
    /// WebMerge reports some failures this way, as an `error` field inside an
    /// otherwise successful JSON response.
    #[error("WebMerge error: {message}")]
    Application {
        /// The value of the `error` field
        message: String,
        /// The full decoded response body
        body: Value,
    },

    /// A 2xx response body could not be decoded as JSON.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// Failed to serialize the request body.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// Invalid configuration was provided, such as a bad header value or
    /// missing credentials.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An invalid URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The completion of a callback-style call was dropped without being invoked.
    #[error("Request was canceled before completing")]
    Canceled,
}

impl Error {
    /// Returns the HTTP status code if this error has one.
    ///
    /// # Examples
    ///
    /// ```
    /// use webmerge::Error;
    /// use http::StatusCode;
    ///
    /// let err = Error::HttpError {
    ///     status: StatusCode::NOT_FOUND,
    ///     raw_response: "Not found".to_string(),
    ///     headers: http::HeaderMap::new(),
    /// };
    ///
    /// assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    /// assert_eq!(Error::Timeout.status(), None);
    /// ```
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::HttpError { status, .. } => Some(*status),
            Error::DeserializationFailed { status, .. } => Some(*status),
            Error::Network(e) => e.status(),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::HttpError { raw_response, .. } => Some(raw_response),
            Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout
        } else {
            Error::Network(e)
        }
    }
}

/// A specialized `Result` type for WebMerge API calls.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn application_error_has_no_status() {
        let err = Error::Application {
            message: "Invalid key".to_string(),
            body: json!({ "error": "Invalid key" }),
        };
        assert_eq!(err.status(), None);
        assert_eq!(err.raw_response(), None);
        assert_eq!(err.to_string(), "WebMerge error: Invalid key");
    }

    #[test]
    fn deserialization_error_keeps_raw_body() {
        let err = Error::DeserializationFailed {
            raw_response: "<html>".to_string(),
            serde_error: "expected value".to_string(),
            status: StatusCode::OK,
        };
        assert_eq!(err.status(), Some(StatusCode::OK));
        assert_eq!(err.raw_response(), Some("<html>"));
    }
}

//! Response wrapper that keeps the decoded body next to the raw response details.

use http::{HeaderMap, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// A successful (2xx) HTTP response from the service.
///
/// Transports return this; the client then reduces it to the decoded body
/// with [`Response::into_outcome`].
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The decoded response body.
    pub data: T,

    /// The raw response body as a string.
    pub raw_body: String,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// Time from sending the request until the response was read.
    pub latency: Duration,
}

impl<T> Response<T> {
    /// Assembles a response from its parts.
    pub fn new(
        data: T,
        raw_body: String,
        status: StatusCode,
        headers: HeaderMap,
        latency: Duration,
    ) -> Self {
        Self {
            data,
            raw_body,
            status,
            headers,
            latency,
        }
    }
}

impl Response<Value> {
    /// Reduces the response to the caller-facing outcome.
    ///
    /// A body carrying an `error` field that is neither `null` nor `false`
    /// becomes [`crate::Error::Application`]; anything else is returned as-is.
    ///
    /// # Examples
    ///
    /// ```
    /// # use webmerge::{Error, Response};
    /// # use http::{HeaderMap, StatusCode};
    /// # use serde_json::json;
    /// # use std::time::Duration;
    /// let response = Response::new(
    ///     json!({ "error": "Missing merge data" }),
    ///     String::new(),
    ///     StatusCode::OK,
    ///     HeaderMap::new(),
    ///     Duration::ZERO,
    /// );
    ///
    /// assert!(matches!(response.into_outcome(), Err(Error::Application { .. })));
    /// ```
    pub fn into_outcome(self) -> crate::Result<Value> {
        match application_error(&self.data) {
            Some(message) => {
                tracing::warn!(
                    status = self.status.as_u16(),
                    error = %message,
                    "Service reported an error in a successful response"
                );
                Err(crate::Error::Application {
                    message,
                    body: self.data,
                })
            }
            None => Ok(self.data),
        }
    }
}

fn application_error(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::json;

    fn ok(body: Value) -> Response<Value> {
        Response::new(
            body,
            String::new(),
            StatusCode::OK,
            HeaderMap::new(),
            Duration::ZERO,
        )
    }

    #[test]
    fn plain_body_is_success() {
        let outcome = ok(json!({ "id": 1, "name": "Invoice" })).into_outcome();
        assert_eq!(outcome.unwrap(), json!({ "id": 1, "name": "Invoice" }));
    }

    #[test]
    fn error_field_is_failure() {
        match ok(json!({ "error": "Invalid document" })).into_outcome() {
            Err(Error::Application { message, body }) => {
                assert_eq!(message, "Invalid document");
                assert_eq!(body, json!({ "error": "Invalid document" }));
            }
            other => panic!("Expected Application error, got {:?}", other),
        }
    }

    #[test]
    fn structured_error_field_is_stringified() {
        match ok(json!({ "error": { "code": 7 } })).into_outcome() {
            Err(Error::Application { message, .. }) => assert_eq!(message, r#"{"code":7}"#),
            other => panic!("Expected Application error, got {:?}", other),
        }
    }

    #[test]
    fn null_or_false_error_field_is_success() {
        assert!(ok(json!({ "error": null, "success": 1 })).into_outcome().is_ok());
        assert!(ok(json!({ "error": false })).into_outcome().is_ok());
    }

    #[test]
    fn non_object_bodies_are_success() {
        assert!(ok(json!([{ "id": 1 }])).into_outcome().is_ok());
        assert!(ok(Value::Null).into_outcome().is_ok());
        assert!(ok(json!("error")).into_outcome().is_ok());
    }
}

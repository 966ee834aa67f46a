//! Request descriptors: the method, path, query and body of one outbound call.

use http::Method;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Describes a single HTTP request to the WebMerge API.
///
/// Descriptors are plain data. They are built fresh for every call by the
/// functions in [`crate::endpoint`] and handed to a [`crate::Transport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// The HTTP method (GET, POST, etc.).
    pub method: Method,

    /// The request path, relative to the base URL.
    pub path: String,

    /// Query parameters.
    ///
    /// `None` means no query was given at all, which is not the same as
    /// `Some` of an empty map.
    pub query: Option<BTreeMap<String, String>>,

    /// JSON request body.
    pub body: Option<Value>,
}

impl RequestDescriptor {
    /// Creates a descriptor with no query and no body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            body: None,
        }
    }

    /// Marks the request as carrying a query, even if it stays empty.
    pub fn with_query(mut self) -> Self {
        self.query.get_or_insert_with(BTreeMap::new);
        self
    }

    /// Adds a query parameter to the request.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Adds a query parameter only when `value` is present.
    pub fn with_optional_query_param(self, key: impl Into<String>, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.with_query_param(key, value),
            None => self,
        }
    }

    /// Sets the body to a JSON value, passed through verbatim.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serializes `body` to JSON and sets it as the request body.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::SerializationFailed`] if `body` cannot be
    /// represented as JSON.
    pub fn with_json_body<T: Serialize>(self, body: &T) -> crate::Result<Self> {
        let body = serde_json::to_value(body)
            .map_err(|e| crate::Error::SerializationFailed(e.to_string()))?;
        Ok(self.with_body(body))
    }
}

/// Encodes a boolean flag the way the service expects it in a query string.
pub(crate) fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_descriptor_has_no_query_or_body() {
        let request = RequestDescriptor::new(Method::GET, "/api/documents");
        assert_eq!(request.query, None);
        assert_eq!(request.body, None);
    }

    #[test]
    fn empty_query_is_distinct_from_absent_query() {
        let request = RequestDescriptor::new(Method::GET, "/api/documents").with_query();
        assert_eq!(request.query, Some(BTreeMap::new()));
    }

    #[test]
    fn optional_query_param_is_skipped_when_absent() {
        let request = RequestDescriptor::new(Method::GET, "/api/documents")
            .with_query()
            .with_optional_query_param("search", None)
            .with_optional_query_param("folder", Some("invoices"));

        let query = request.query.unwrap();
        assert_eq!(query.len(), 1);
        assert_eq!(query["folder"], "invoices");
    }

    #[test]
    fn json_body_is_serialized() {
        #[derive(Serialize)]
        struct CopyRequest {
            name: &'static str,
        }

        let request = RequestDescriptor::new(Method::POST, "/api/documents/1/copy")
            .with_json_body(&CopyRequest { name: "new copy" })
            .unwrap();
        assert_eq!(request.body, Some(json!({ "name": "new copy" })));
    }

    #[test]
    fn flags_are_ones_and_zeros() {
        assert_eq!(flag(true), "1");
        assert_eq!(flag(false), "0");
    }
}

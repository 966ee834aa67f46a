//! Mapping from WebMerge operations to request descriptors.
//!
//! Each function here is pure: it only looks at its arguments and returns
//! the [`RequestDescriptor`] for one operation. Identifiers are interpolated
//! into paths exactly as they display, and nothing is validated locally;
//! the service rejects malformed input.
//!
//! Merging goes through `/merge` and `/route` at the root of the host rather
//! than under `/api`. That is how the service lays out its merge URLs.

use crate::request::{flag, RequestDescriptor};
use crate::types::{CombineFiles, ConvertToPdf, ListOptions, MergeOptions};
use crate::Result;
use http::Method;
use serde_json::Value;
use std::fmt::Display;

const DOCUMENTS: &str = "/api/documents";
const ROUTES: &str = "/api/routes";

/// `GET /api/documents`, with a `search`/`folder` query when options are given.
pub fn list_documents(options: Option<&ListOptions>) -> RequestDescriptor {
    let request = RequestDescriptor::new(Method::GET, DOCUMENTS);
    match options {
        Some(options) => request
            .with_query()
            .with_optional_query_param("search", options.search.as_deref())
            .with_optional_query_param("folder", options.folder.as_deref()),
        None => request,
    }
}

/// `GET /api/documents/{id}`.
pub fn get_document(id: impl Display) -> RequestDescriptor {
    RequestDescriptor::new(Method::GET, format!("{DOCUMENTS}/{id}"))
}

/// `GET /api/documents/{id}/fields`.
pub fn get_document_fields(id: impl Display) -> RequestDescriptor {
    RequestDescriptor::new(Method::GET, format!("{DOCUMENTS}/{id}/fields"))
}

/// `GET /api/documents/{id}/file`.
pub fn get_document_file(id: impl Display) -> RequestDescriptor {
    RequestDescriptor::new(Method::GET, format!("{DOCUMENTS}/{id}/file"))
}

/// `POST /api/documents` with `data` as the body.
pub fn create_document(data: Value) -> RequestDescriptor {
    RequestDescriptor::new(Method::POST, DOCUMENTS).with_body(data)
}

/// `PUT /api/documents/{id}` with `data` as the body.
pub fn update_document(id: impl Display, data: Value) -> RequestDescriptor {
    RequestDescriptor::new(Method::PUT, format!("{DOCUMENTS}/{id}")).with_body(data)
}

/// `POST /merge/{id}/{key}` with the merge flags encoded as `1`/`0`.
pub fn merge_document(
    id: impl Display,
    key: &str,
    data: Value,
    options: MergeOptions,
) -> RequestDescriptor {
    merge(format!("/merge/{id}/{key}"), data, options)
}

/// `POST /api/documents/{id}/copy`. `data` usually carries the new name.
pub fn copy_document(id: impl Display, data: Value) -> RequestDescriptor {
    RequestDescriptor::new(Method::POST, format!("{DOCUMENTS}/{id}/copy")).with_body(data)
}

/// `DELETE /api/documents/{id}`.
pub fn delete_document(id: impl Display) -> RequestDescriptor {
    RequestDescriptor::new(Method::DELETE, format!("{DOCUMENTS}/{id}"))
}

/// `GET /api/routes`.
pub fn list_data_routes() -> RequestDescriptor {
    RequestDescriptor::new(Method::GET, ROUTES)
}

/// `GET /api/routes/{id}`.
pub fn get_data_route(id: impl Display) -> RequestDescriptor {
    RequestDescriptor::new(Method::GET, format!("{ROUTES}/{id}"))
}

/// `GET /api/routes/{id}/fields`.
pub fn get_data_route_fields(id: impl Display) -> RequestDescriptor {
    RequestDescriptor::new(Method::GET, format!("{ROUTES}/{id}/fields"))
}

/// `GET /api/routes/{id}/rules`.
pub fn get_data_route_rules(id: impl Display) -> RequestDescriptor {
    RequestDescriptor::new(Method::GET, format!("{ROUTES}/{id}/rules"))
}

/// `POST /api/routes` with `data` as the body.
pub fn create_data_route(data: Value) -> RequestDescriptor {
    RequestDescriptor::new(Method::POST, ROUTES).with_body(data)
}

/// `PUT /api/routes/{id}` with `data` as the body.
pub fn update_data_route(id: impl Display, data: Value) -> RequestDescriptor {
    RequestDescriptor::new(Method::PUT, format!("{ROUTES}/{id}")).with_body(data)
}

/// `POST /route/{id}/{key}`; same flags as [`merge_document`].
pub fn merge_data_route(
    id: impl Display,
    key: &str,
    data: Value,
    options: MergeOptions,
) -> RequestDescriptor {
    merge(format!("/route/{id}/{key}"), data, options)
}

/// `DELETE /api/routes/{id}`.
pub fn delete_data_route(id: impl Display) -> RequestDescriptor {
    RequestDescriptor::new(Method::DELETE, format!("{ROUTES}/{id}"))
}

/// `POST /tools/combine`.
///
/// # Errors
///
/// Fails only if the payload cannot be serialized to JSON.
pub fn combine_files(request: &CombineFiles) -> Result<RequestDescriptor> {
    RequestDescriptor::new(Method::POST, "/tools/combine").with_json_body(request)
}

/// `POST /tools/convert_to_pdf`.
///
/// # Errors
///
/// Fails only if the payload cannot be serialized to JSON.
pub fn convert_to_pdf(request: &ConvertToPdf) -> Result<RequestDescriptor> {
    RequestDescriptor::new(Method::POST, "/tools/convert_to_pdf").with_json_body(request)
}

fn merge(path: String, data: Value, options: MergeOptions) -> RequestDescriptor {
    RequestDescriptor::new(Method::POST, path)
        .with_query_param("test", flag(options.test))
        .with_query_param("download", flag(options.download))
        .with_body(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileSpec;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn query(pairs: &[(&str, &str)]) -> Option<BTreeMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn list_documents_without_options_has_no_query() {
        let request = list_documents(None);
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.path, "/api/documents");
        assert_eq!(request.query, None);
        assert_eq!(request.body, None);
    }

    #[test]
    fn list_documents_with_empty_options_has_empty_query() {
        let request = list_documents(Some(&ListOptions::default()));
        assert_eq!(request.query, query(&[]));
    }

    #[test]
    fn list_documents_passes_search_and_folder() {
        let options = ListOptions::new().search("invoice").folder("billing");
        let request = list_documents(Some(&options));
        assert_eq!(
            request.query,
            query(&[("search", "invoice"), ("folder", "billing")])
        );
    }

    #[test]
    fn document_reads_interpolate_the_id() {
        assert_eq!(get_document(1).path, "/api/documents/1");
        assert_eq!(get_document_fields(1).path, "/api/documents/1/fields");
        assert_eq!(get_document_file(1).path, "/api/documents/1/file");
        assert_eq!(get_document("abc").path, "/api/documents/abc");

        for request in [get_document(1), get_document_fields(1), get_document_file(1)] {
            assert_eq!(request.method, Method::GET);
            assert_eq!(request.query, None);
            assert_eq!(request.body, None);
        }
    }

    #[test]
    fn document_writes_pass_the_body_verbatim() {
        let body = json!({ "name": "dummy", "type": "pdf" });

        let created = create_document(body.clone());
        assert_eq!(created.method, Method::POST);
        assert_eq!(created.path, "/api/documents");
        assert_eq!(created.body, Some(body.clone()));

        let updated = update_document(1, json!({}));
        assert_eq!(updated.method, Method::PUT);
        assert_eq!(updated.path, "/api/documents/1");
        assert_eq!(updated.body, Some(json!({})));

        let copied = copy_document(1, json!({ "name": "new copy" }));
        assert_eq!(copied.method, Method::POST);
        assert_eq!(copied.path, "/api/documents/1/copy");
        assert_eq!(copied.body, Some(json!({ "name": "new copy" })));
    }

    #[test]
    fn delete_document_has_no_body() {
        let request = delete_document(1);
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.path, "/api/documents/1");
        assert_eq!(request.body, None);
    }

    #[test]
    fn merge_document_coerces_flags_to_ones() {
        let options = MergeOptions::new().test(true).download(true);
        let request = merge_document(1, "key", json!({ "name": "Ada" }), options);
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/merge/1/key");
        assert_eq!(request.query, query(&[("test", "1"), ("download", "1")]));
        assert_eq!(request.body, Some(json!({ "name": "Ada" })));
    }

    #[test]
    fn merge_document_coerces_absent_flags_to_zeros() {
        let request = merge_document(1, "key", json!({}), MergeOptions::default());
        assert_eq!(request.query, query(&[("test", "0"), ("download", "0")]));
    }

    #[test]
    fn data_route_reads_use_the_api_prefix() {
        assert_eq!(list_data_routes().path, "/api/routes");
        assert_eq!(list_data_routes().query, None);
        assert_eq!(get_data_route(1).path, "/api/routes/1");
        assert_eq!(get_data_route_fields(1).path, "/api/routes/1/fields");
        assert_eq!(get_data_route_rules(1).path, "/api/routes/1/rules");
    }

    #[test]
    fn data_route_writes() {
        let body = json!({ "name": "dummy route", "rules": [{ "document_id": 123456 }] });

        let created = create_data_route(body.clone());
        assert_eq!(created.method, Method::POST);
        assert_eq!(created.path, "/api/routes");
        assert_eq!(created.body, Some(body));

        let updated = update_data_route(1, json!({}));
        assert_eq!(updated.method, Method::PUT);
        assert_eq!(updated.path, "/api/routes/1");

        let deleted = delete_data_route(1);
        assert_eq!(deleted.method, Method::DELETE);
        assert_eq!(deleted.path, "/api/routes/1");
        assert_eq!(deleted.body, None);
    }

    #[test]
    fn merge_data_route_uses_the_route_prefix() {
        let request = merge_data_route(1, "key", json!({}), MergeOptions::default());
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/route/1/key");
        assert_eq!(request.query, query(&[("test", "0"), ("download", "0")]));
        assert_eq!(request.body, Some(json!({})));
    }

    #[test]
    fn combine_files_body() {
        let request = combine_files(&CombineFiles {
            output: "pdf".to_string(),
            files: vec![FileSpec::from_url("hello.pdf", "https://example.com/hello.pdf")],
        })
        .unwrap();

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/tools/combine");
        assert_eq!(
            request.body,
            Some(json!({
                "output": "pdf",
                "files": [{ "name": "hello.pdf", "url": "https://example.com/hello.pdf" }],
            }))
        );
    }

    #[test]
    fn convert_to_pdf_body() {
        let request = convert_to_pdf(&ConvertToPdf {
            file: FileSpec::from_url("hello.pdf", "https://example.com/hello.pdf"),
        })
        .unwrap();

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/tools/convert_to_pdf");
        assert_eq!(
            request.body,
            Some(json!({ "file": { "name": "hello.pdf", "url": "https://example.com/hello.pdf" } }))
        );
    }
}

//! # webmerge - a client for the WebMerge document merge API
//!
//! Every WebMerge endpoint is exposed as one operation: documents, data
//! routes, and the file tools. Operations come in two calling conventions:
//!
//! - [`Client`] implements [`WebMergeApi`]: each method returns right away
//!   and reports its outcome through a completion callback.
//! - [`AsyncClient`] wraps any [`WebMergeApi`] and exposes the same methods
//!   as `async fn`s.
//!
//! ## Quick Start
//!
//! ```no_run
//! use webmerge::{AsyncClient, Client, ListOptions, MergeOptions};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), webmerge::Error> {
//!     let client = AsyncClient::new(Client::new("key", "secret")?);
//!
//!     let documents = client
//!         .list_documents(Some(ListOptions::new().folder("invoices")))
//!         .await?;
//!     println!("Documents: {}", documents);
//!
//!     let merged = client
//!         .merge_document(
//!             42,
//!             "abc123",
//!             json!({ "customer": "Ada Lovelace", "total": "12.00" }),
//!             MergeOptions::new().test(true).download(true),
//!         )
//!         .await?;
//!     println!("Merged: {}", merged);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//!
//! Nothing is retried. Network failures, non-2xx responses, and 2xx bodies
//! carrying an `error` field are all reported as an [`Error`]:
//!
//! ```no_run
//! use webmerge::{AsyncClient, Client, Error};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = AsyncClient::new(Client::new("key", "secret")?);
//! match client.delete_document(42).await {
//!     Ok(body) => println!("Deleted: {}", body),
//!     Err(Error::HttpError { status, raw_response, .. }) => {
//!         eprintln!("HTTP error {}: {}", status, raw_response);
//!     }
//!     Err(Error::Application { message, .. }) => eprintln!("Rejected: {}", message),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
pub mod endpoint;
mod error;
mod request;
mod response;
pub mod transport;
mod types;

pub use client::{AsyncClient, Client, ClientBuilder, Completion, WebMergeApi};
pub use error::{Error, Result};
pub use request::RequestDescriptor;
pub use response::Response;
pub use transport::{BasicAuth, HttpTransport, Transport, TransportConfig};
pub use types::{CombineFiles, ConvertToPdf, FileSource, FileSpec, ListOptions, MergeOptions};

//! WebMerge clients in both calling conventions.
//!
//! [`Client`] implements [`WebMergeApi`], where every operation reports its
//! outcome through a completion callback. [`AsyncClient`] wraps any
//! [`WebMergeApi`] and exposes the same operations as `async fn`s.

use crate::{
    endpoint,
    request::RequestDescriptor,
    transport::{BasicAuth, HttpTransport, Transport, TransportConfig, DEFAULT_BASE_URL},
    types::{CombineFiles, ConvertToPdf, ListOptions, MergeOptions},
    Error, Result,
};
use http::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use url::Url;

/// Completion invoked exactly once with the outcome of an operation.
pub trait Completion: FnOnce(Result<Value>) + Send + 'static {}

impl<F> Completion for F where F: FnOnce(Result<Value>) + Send + 'static {}

/// The WebMerge operation set, callback style.
///
/// Every method issues exactly one request and returns without waiting for
/// it. The completion receives the decoded response body, or the error.
pub trait WebMergeApi {
    fn list_documents(&self, options: Option<ListOptions>, callback: impl Completion);
    fn get_document(&self, id: impl Display, callback: impl Completion);
    fn get_document_fields(&self, id: impl Display, callback: impl Completion);
    fn get_document_file(&self, id: impl Display, callback: impl Completion);
    fn create_document(&self, data: Value, callback: impl Completion);
    fn update_document(&self, id: impl Display, data: Value, callback: impl Completion);
    fn merge_document(
        &self,
        id: impl Display,
        key: &str,
        data: Value,
        options: MergeOptions,
        callback: impl Completion,
    );
    fn copy_document(&self, id: impl Display, data: Value, callback: impl Completion);
    fn delete_document(&self, id: impl Display, callback: impl Completion);

    fn list_data_routes(&self, callback: impl Completion);
    fn get_data_route(&self, id: impl Display, callback: impl Completion);
    fn get_data_route_fields(&self, id: impl Display, callback: impl Completion);
    fn get_data_route_rules(&self, id: impl Display, callback: impl Completion);
    fn create_data_route(&self, data: Value, callback: impl Completion);
    fn update_data_route(&self, id: impl Display, data: Value, callback: impl Completion);
    fn merge_data_route(
        &self,
        id: impl Display,
        key: &str,
        data: Value,
        options: MergeOptions,
        callback: impl Completion,
    );
    fn delete_data_route(&self, id: impl Display, callback: impl Completion);

    fn combine_files(&self, request: &CombineFiles, callback: impl Completion);
    fn convert_to_pdf(&self, request: &ConvertToPdf, callback: impl Completion);
}

/// A WebMerge client bound to one set of credentials.
///
/// Cheap to clone; clones share the same transport. Requests run as tasks
/// on the ambient tokio runtime. Called outside one, an operation sends
/// nothing and completes with [`Error::ConfigurationError`].
///
/// # Examples
///
/// ```no_run
/// use webmerge::{Client, WebMergeApi};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), webmerge::Error> {
/// let client = Client::new("key", "secret")?;
///
/// client.get_document(42, |outcome| match outcome {
///     Ok(document) => println!("Document: {}", document),
///     Err(e) => eprintln!("Lookup failed: {}", e),
/// });
/// # Ok(())
/// # }
/// ```
pub struct Client<T = HttpTransport> {
    transport: Arc<T>,
}

impl<T> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl Client {
    /// Creates a client for the WebMerge host with the given API key and secret.
    ///
    /// Credentials are sent preemptively as HTTP Basic auth and bodies are
    /// exchanged as JSON. No request is made here.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        Self::builder().credentials(key, secret).build()
    }

    /// Starts a [`ClientBuilder`] for non-default settings.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The configuration the underlying HTTP client was built with.
    pub fn config(&self) -> &TransportConfig {
        self.transport.config()
    }
}

impl<T: Transport> Client<T> {
    /// Wraps an already-built transport.
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// The transport every request goes through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Turns this client into its `async fn` counterpart.
    pub fn into_async(self) -> AsyncClient<Self> {
        AsyncClient::new(self)
    }

    fn dispatch(&self, request: Result<RequestDescriptor>, callback: impl Completion) {
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Could not build request");
                return callback(Err(e));
            }
        };

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::warn!(error = %e, "No tokio runtime to run the request on");
                return callback(Err(Error::ConfigurationError(format!(
                    "No tokio runtime available: {}",
                    e
                ))));
            }
        };

        let transport = Arc::clone(&self.transport);
        runtime.spawn(async move {
            let method = request.method.clone();
            let path = request.path.clone();

            let outcome = match transport.send(request).await {
                Ok(response) => response.into_outcome(),
                Err(e) => Err(e),
            };

            if let Err(e) = &outcome {
                tracing::warn!(
                    error = %e,
                    method = %method,
                    path = %path,
                    "Request failed"
                );
            }

            callback(outcome);
        });
    }
}

impl<T: Transport> WebMergeApi for Client<T> {
    fn list_documents(&self, options: Option<ListOptions>, callback: impl Completion) {
        self.dispatch(Ok(endpoint::list_documents(options.as_ref())), callback);
    }

    fn get_document(&self, id: impl Display, callback: impl Completion) {
        self.dispatch(Ok(endpoint::get_document(id)), callback);
    }

    fn get_document_fields(&self, id: impl Display, callback: impl Completion) {
        self.dispatch(Ok(endpoint::get_document_fields(id)), callback);
    }

    fn get_document_file(&self, id: impl Display, callback: impl Completion) {
        self.dispatch(Ok(endpoint::get_document_file(id)), callback);
    }

    fn create_document(&self, data: Value, callback: impl Completion) {
        self.dispatch(Ok(endpoint::create_document(data)), callback);
    }

    fn update_document(&self, id: impl Display, data: Value, callback: impl Completion) {
        self.dispatch(Ok(endpoint::update_document(id, data)), callback);
    }

    fn merge_document(
        &self,
        id: impl Display,
        key: &str,
        data: Value,
        options: MergeOptions,
        callback: impl Completion,
    ) {
        self.dispatch(Ok(endpoint::merge_document(id, key, data, options)), callback);
    }

    fn copy_document(&self, id: impl Display, data: Value, callback: impl Completion) {
        self.dispatch(Ok(endpoint::copy_document(id, data)), callback);
    }

    fn delete_document(&self, id: impl Display, callback: impl Completion) {
        self.dispatch(Ok(endpoint::delete_document(id)), callback);
    }

    fn list_data_routes(&self, callback: impl Completion) {
        self.dispatch(Ok(endpoint::list_data_routes()), callback);
    }

    fn get_data_route(&self, id: impl Display, callback: impl Completion) {
        self.dispatch(Ok(endpoint::get_data_route(id)), callback);
    }

    fn get_data_route_fields(&self, id: impl Display, callback: impl Completion) {
        self.dispatch(Ok(endpoint::get_data_route_fields(id)), callback);
    }

    fn get_data_route_rules(&self, id: impl Display, callback: impl Completion) {
        self.dispatch(Ok(endpoint::get_data_route_rules(id)), callback);
    }

    fn create_data_route(&self, data: Value, callback: impl Completion) {
        self.dispatch(Ok(endpoint::create_data_route(data)), callback);
    }

    fn update_data_route(&self, id: impl Display, data: Value, callback: impl Completion) {
        self.dispatch(Ok(endpoint::update_data_route(id, data)), callback);
    }

    fn merge_data_route(
        &self,
        id: impl Display,
        key: &str,
        data: Value,
        options: MergeOptions,
        callback: impl Completion,
    ) {
        self.dispatch(Ok(endpoint::merge_data_route(id, key, data, options)), callback);
    }

    fn delete_data_route(&self, id: impl Display, callback: impl Completion) {
        self.dispatch(Ok(endpoint::delete_data_route(id)), callback);
    }

    fn combine_files(&self, request: &CombineFiles, callback: impl Completion) {
        self.dispatch(endpoint::combine_files(request), callback);
    }

    fn convert_to_pdf(&self, request: &ConvertToPdf, callback: impl Completion) {
        self.dispatch(endpoint::convert_to_pdf(request), callback);
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use webmerge::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), webmerge::Error> {
/// let client = ClientBuilder::new()
///     .credentials("key", "secret")
///     .timeout(Duration::from_secs(30))
///     .default_header("X-Request-Source", "billing")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_url: Option<Url>,
    credentials: Option<(String, String)>,
    send_immediately: bool,
    json: bool,
    default_headers: HeaderMap,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Defaults: production host, preemptive auth, JSON on, no timeout.
    pub fn new() -> Self {
        Self {
            base_url: None,
            credentials: None,
            send_immediately: true,
            json: true,
            default_headers: HeaderMap::new(),
            timeout: None,
        }
    }

    /// Sets the API key and secret used for HTTP Basic auth.
    pub fn credentials(mut self, key: impl Into<String>, secret: impl Into<String>) -> Self {
        self.credentials = Some((key.into(), secret.into()));
        self
    }

    /// Overrides the WebMerge host.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.base_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Whether to send credentials before the server asks for them. Defaults to `true`.
    pub fn send_immediately(mut self, send_immediately: bool) -> Self {
        self.send_immediately = send_immediately;
        self
    }

    /// Whether to decode response bodies as JSON. Defaults to `true`.
    pub fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Adds a header sent with every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the request timeout. Without one, requests wait as long as the
    /// connection stays open.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The transport configuration this builder would produce.
    ///
    /// # Errors
    ///
    /// Returns an error if no credentials were provided.
    pub fn config(&self) -> Result<TransportConfig> {
        let (username, password) = self
            .credentials
            .clone()
            .ok_or_else(|| Error::ConfigurationError("Credentials are required".to_string()))?;

        let base_url = match &self.base_url {
            Some(url) => url.clone(),
            None => Url::parse(DEFAULT_BASE_URL)?,
        };

        Ok(TransportConfig {
            base_url,
            auth: BasicAuth {
                username,
                password,
                send_immediately: self.send_immediately,
            },
            json: self.json,
            timeout: self.timeout,
            default_headers: self.default_headers.clone(),
        })
    }

    /// Builds the configured `Client`. Performs no network I/O.
    ///
    /// # Errors
    ///
    /// Returns an error if no credentials were provided or the HTTP client
    /// cannot be built.
    pub fn build(self) -> Result<Client> {
        let transport = HttpTransport::new(self.config()?)?;
        Ok(Client::with_transport(transport))
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `async fn` adapter over any callback-style [`WebMergeApi`].
///
/// Each method forwards to the wrapped implementation and waits for its
/// completion, so both conventions always send the same request.
///
/// # Examples
///
/// ```no_run
/// use webmerge::{AsyncClient, Client, MergeOptions};
/// use serde_json::json;
///
/// # async fn example() -> Result<(), webmerge::Error> {
/// let client = AsyncClient::new(Client::new("key", "secret")?);
///
/// let merged = client
///     .merge_document(42, "abc123", json!({ "name": "Ada" }), MergeOptions::new().test(true))
///     .await?;
/// println!("Merged: {}", merged);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AsyncClient<A = Client> {
    api: A,
}

impl<A: WebMergeApi> AsyncClient<A> {
    /// Wraps any callback-style implementation.
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// The wrapped callback-style client.
    pub fn inner(&self) -> &A {
        &self.api
    }

    /// Unwraps back to the callback-style client.
    pub fn into_inner(self) -> A {
        self.api
    }

    pub async fn list_documents(&self, options: Option<ListOptions>) -> Result<Value> {
        settle(|done| self.api.list_documents(options, done)).await
    }

    pub async fn get_document(&self, id: impl Display) -> Result<Value> {
        settle(|done| self.api.get_document(id, done)).await
    }

    pub async fn get_document_fields(&self, id: impl Display) -> Result<Value> {
        settle(|done| self.api.get_document_fields(id, done)).await
    }

    pub async fn get_document_file(&self, id: impl Display) -> Result<Value> {
        settle(|done| self.api.get_document_file(id, done)).await
    }

    pub async fn create_document(&self, data: Value) -> Result<Value> {
        settle(|done| self.api.create_document(data, done)).await
    }

    pub async fn update_document(&self, id: impl Display, data: Value) -> Result<Value> {
        settle(|done| self.api.update_document(id, data, done)).await
    }

    pub async fn merge_document(
        &self,
        id: impl Display,
        key: &str,
        data: Value,
        options: MergeOptions,
    ) -> Result<Value> {
        settle(|done| self.api.merge_document(id, key, data, options, done)).await
    }

    pub async fn copy_document(&self, id: impl Display, data: Value) -> Result<Value> {
        settle(|done| self.api.copy_document(id, data, done)).await
    }

    pub async fn delete_document(&self, id: impl Display) -> Result<Value> {
        settle(|done| self.api.delete_document(id, done)).await
    }

    pub async fn list_data_routes(&self) -> Result<Value> {
        settle(|done| self.api.list_data_routes(done)).await
    }

    pub async fn get_data_route(&self, id: impl Display) -> Result<Value> {
        settle(|done| self.api.get_data_route(id, done)).await
    }

    pub async fn get_data_route_fields(&self, id: impl Display) -> Result<Value> {
        settle(|done| self.api.get_data_route_fields(id, done)).await
    }

    pub async fn get_data_route_rules(&self, id: impl Display) -> Result<Value> {
        settle(|done| self.api.get_data_route_rules(id, done)).await
    }

    pub async fn create_data_route(&self, data: Value) -> Result<Value> {
        settle(|done| self.api.create_data_route(data, done)).await
    }

    pub async fn update_data_route(&self, id: impl Display, data: Value) -> Result<Value> {
        settle(|done| self.api.update_data_route(id, data, done)).await
    }

    pub async fn merge_data_route(
        &self,
        id: impl Display,
        key: &str,
        data: Value,
        options: MergeOptions,
    ) -> Result<Value> {
        settle(|done| self.api.merge_data_route(id, key, data, options, done)).await
    }

    pub async fn delete_data_route(&self, id: impl Display) -> Result<Value> {
        settle(|done| self.api.delete_data_route(id, done)).await
    }

    pub async fn combine_files(&self, request: &CombineFiles) -> Result<Value> {
        settle(|done| self.api.combine_files(request, done)).await
    }

    pub async fn convert_to_pdf(&self, request: &ConvertToPdf) -> Result<Value> {
        settle(|done| self.api.convert_to_pdf(request, done)).await
    }
}

type Settle = Box<dyn FnOnce(Result<Value>) + Send>;

/// Starts a callback-style call and waits for its completion.
async fn settle(start: impl FnOnce(Settle)) -> Result<Value> {
    let (tx, rx) = oneshot::channel();
    start(Box::new(move |outcome: Result<Value>| {
        // The receiver is gone only if the caller stopped waiting.
        let _ = tx.send(outcome);
    }));
    rx.await.map_err(|_| Error::Canceled)?
}

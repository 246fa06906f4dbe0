//! Mock rules: a URL/method/header pattern bound to a response producer.

use crate::method::Method;
use crate::request::{Headers, RequestDescriptor};
use crate::response::ResponseSpec;
use futures::future::{self, BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Future returned by a response producer.
pub type ProducerFuture = BoxFuture<'static, anyhow::Result<ResponseSpec>>;

type Producer = Arc<dyn Fn(&RequestDescriptor) -> ProducerFuture + Send + Sync>;

/// A registered mock rule.
///
/// The producer sees the request by reference and must not rely on anything
/// but its fields. Asynchronous producers clone what they need before
/// returning their future.
#[derive(Clone)]
pub struct MockRule {
    url: String,
    method: Option<Method>,
    headers: Option<Headers>,
    producer: Producer,
}

impl MockRule {
    /// Rule answering with a synchronously built response.
    pub fn new<F>(url: impl Into<String>, response: F) -> Self
    where
        F: Fn(&RequestDescriptor) -> ResponseSpec + Send + Sync + 'static,
    {
        Self::from_producer(url, move |request| {
            future::ready(Ok(response(request))).boxed()
        })
    }

    /// Rule whose producer may fail. The error reaches the caller unchanged.
    pub fn try_new<F>(url: impl Into<String>, response: F) -> Self
    where
        F: Fn(&RequestDescriptor) -> anyhow::Result<ResponseSpec> + Send + Sync + 'static,
    {
        Self::from_producer(url, move |request| future::ready(response(request)).boxed())
    }

    /// Rule with an asynchronous producer.
    pub fn new_async<F, Fut>(url: impl Into<String>, response: F) -> Self
    where
        F: Fn(&RequestDescriptor) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<ResponseSpec>> + Send + 'static,
    {
        Self::from_producer(url, move |request| response(request).boxed())
    }

    /// Rule that always answers with a clone of `response`.
    pub fn fixed(url: impl Into<String>, response: ResponseSpec) -> Self {
        Self::new(url, move |_| response.clone())
    }

    fn from_producer<F>(url: impl Into<String>, producer: F) -> Self
    where
        F: Fn(&RequestDescriptor) -> ProducerFuture + Send + Sync + 'static,
    {
        Self {
            url: url.into(),
            method: None,
            headers: None,
            producer: Arc::new(producer),
        }
    }

    /// Restrict the rule to one method. Unrestricted rules match any method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Require a request header. All required headers must be present with
    /// equal values; other request headers are ignored.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(Headers::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .get_or_insert_with(Headers::new)
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method_filter(&self) -> Option<Method> {
        self.method
    }

    pub fn header_filter(&self) -> Option<&Headers> {
        self.headers.as_ref()
    }

    pub(crate) fn set_url(&mut self, url: String) {
        self.url = url;
    }

    pub(crate) fn produce(&self, request: &RequestDescriptor) -> ProducerFuture {
        (self.producer)(request)
    }
}

impl fmt::Debug for MockRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockRule")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

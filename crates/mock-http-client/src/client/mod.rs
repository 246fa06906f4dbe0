//! The client surface tests hand to application code.
//!
//! This module provides:
//! - `MockClient`: the callable client with per-verb shortcuts
//! - `PendingRequest`: the future returned by every dispatch
//!
//! Each `MockClient::create` call yields an isolated instance with its own
//! rules, pending counter, request journal and creation site. Clones of a
//! client share that state.

mod dispatch;


pub use dispatch::PendingRequest;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::method::Method;
use crate::registry::MockRegistry;
use crate::request::{RequestDescriptor, RequestOptions};
use crate::rule::MockRule;
use crate::tracker::PendingRequestTracker;
use parking_lot::RwLock;
use serde::Serialize;
use std::fmt;
use std::panic::Location;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, warn};

/// State owned by one client instance.
struct ClientInner {
    config: ClientConfig,
    registry: MockRegistry,
    tracker: Arc<PendingRequestTracker>,
    journal: RwLock<Vec<RequestDescriptor>>,
    created_at: &'static Location<'static>,
    /// Set once the multi-threaded runtime warning has been logged.
    flavor_warned: AtomicBool,
}

/// In-process stand-in for an async HTTP client.
#[derive(Clone)]
pub struct MockClient {
    inner: Arc<ClientInner>,
}

impl MockClient {
    /// Create a client with default configuration.
    #[track_caller]
    pub fn new() -> Self {
        Self::create(ClientConfig::default())
    }

    /// Create a client. The caller's source location is recorded and shown
    /// in every unmocked-request error this client produces.
    #[track_caller]
    pub fn create(config: ClientConfig) -> Self {
        let created_at = Location::caller();
        debug!(
            has_base_url = config.base_url.is_some(),
            "Created mock client at {}", created_at
        );
        Self {
            inner: Arc::new(ClientInner {
                config,
                registry: MockRegistry::new(),
                tracker: Arc::new(PendingRequestTracker::new()),
                journal: RwLock::new(Vec::new()),
                created_at,
                flavor_warned: AtomicBool::new(false),
            }),
        }
    }

    /// Register a rule and return the client for chaining.
    ///
    /// The rule URL goes through the same base-URL stripping as requests,
    /// so rules may be written with or without the base.
    pub fn mock(&self, mut rule: MockRule) -> Self {
        let url = self.inner.config.strip_base(rule.url().trim()).to_string();
        if url.is_empty() {
            warn!("Registered a mock rule with an empty url; it can never match");
        }
        rule.set_url(url);

        let index = self.inner.registry.add(rule);
        debug!("Registered mock rule #{}", index);
        self.clone()
    }

    /// Register several rules in order.
    pub fn mock_all(&self, rules: impl IntoIterator<Item = MockRule>) -> Self {
        for rule in rules {
            self.mock(rule);
        }
        self.clone()
    }

    /// Generic invocation. Every verb shortcut is a thin wrapper over this.
    pub fn request(&self, options: RequestOptions) -> PendingRequest {
        match options.into_descriptor(&self.inner.config) {
            Ok(request) => dispatch::dispatch(&self.inner, request),
            Err(err) => PendingRequest::failed(err),
        }
    }

    pub fn get(&self, url: impl Into<String>) -> PendingRequest {
        self.get_with(url, RequestOptions::new())
    }

    pub fn head(&self, url: impl Into<String>) -> PendingRequest {
        self.head_with(url, RequestOptions::new())
    }

    pub fn delete(&self, url: impl Into<String>) -> PendingRequest {
        self.delete_with(url, RequestOptions::new())
    }

    /// `POST` with `data` as the JSON body. Pass `&()` for no body.
    pub fn post<T: Serialize + ?Sized>(&self, url: impl Into<String>, data: &T) -> PendingRequest {
        self.post_with(url, data, RequestOptions::new())
    }

    pub fn put<T: Serialize + ?Sized>(&self, url: impl Into<String>, data: &T) -> PendingRequest {
        self.put_with(url, data, RequestOptions::new())
    }

    pub fn patch<T: Serialize + ?Sized>(&self, url: impl Into<String>, data: &T) -> PendingRequest {
        self.patch_with(url, data, RequestOptions::new())
    }

    /// `GET` with extra options such as headers. `url` and the method
    /// override whatever `options` carries.
    pub fn get_with(&self, url: impl Into<String>, options: RequestOptions) -> PendingRequest {
        self.request(options.url(url).method(Method::Get))
    }

    pub fn head_with(&self, url: impl Into<String>, options: RequestOptions) -> PendingRequest {
        self.request(options.url(url).method(Method::Head))
    }

    pub fn delete_with(&self, url: impl Into<String>, options: RequestOptions) -> PendingRequest {
        self.request(options.url(url).method(Method::Delete))
    }

    /// `POST` with extra options. `data` replaces any body in `options`.
    pub fn post_with<T: Serialize + ?Sized>(
        &self,
        url: impl Into<String>,
        data: &T,
        options: RequestOptions,
    ) -> PendingRequest {
        self.with_body(Method::Post, url, data, options)
    }

    pub fn put_with<T: Serialize + ?Sized>(
        &self,
        url: impl Into<String>,
        data: &T,
        options: RequestOptions,
    ) -> PendingRequest {
        self.with_body(Method::Put, url, data, options)
    }

    pub fn patch_with<T: Serialize + ?Sized>(
        &self,
        url: impl Into<String>,
        data: &T,
        options: RequestOptions,
    ) -> PendingRequest {
        self.with_body(Method::Patch, url, data, options)
    }

    fn with_body<T: Serialize + ?Sized>(
        &self,
        method: Method,
        url: impl Into<String>,
        data: &T,
        options: RequestOptions,
    ) -> PendingRequest {
        match options.url(url).method(method).json(data) {
            Ok(options) => self.request(options),
            Err(err) => PendingRequest::failed(ClientError::Body(err)),
        }
    }

    /// Resolve once every dispatch, including ones started from the
    /// continuations of earlier dispatches, has settled.
    ///
    /// Continuation draining is exact on a `current_thread` runtime, which
    /// is what `#[tokio::test]` uses by default. On a multi-threaded runtime
    /// a continuation may still be queued on another worker when the count
    /// reaches zero; directly issued requests are always drained.
    pub async fn wait_for_pending_requests(&self) {
        self.inner.tracker.wait_for_idle().await;
    }

    /// Number of dispatches started but not yet settled.
    pub fn pending_requests(&self) -> usize {
        self.inner.tracker.in_flight()
    }

    /// Snapshot of every dispatched request, in dispatch order.
    pub fn received_requests(&self) -> Vec<RequestDescriptor> {
        self.inner.journal.read().clone()
    }

    pub fn rule_count(&self) -> usize {
        self.inner.registry.len()
    }

    /// Drop all rules and the request journal. In-flight dispatches keep
    /// the rule they already matched.
    pub fn reset(&self) {
        self.inner.registry.clear();
        self.inner.journal.write().clear();
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn created_at(&self) -> &'static Location<'static> {
        self.inner.created_at
    }
}

impl Default for MockClient {
    #[track_caller]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MockClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockClient")
            .field("created_at", &self.inner.created_at)
            .field("rules", &self.inner.registry.len())
            .field("pending", &self.inner.tracker.in_flight())
            .finish()
    }
}

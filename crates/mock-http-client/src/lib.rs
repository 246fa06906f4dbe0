//! Deterministic, in-process stand-in for an async HTTP client.
//!
//! Tests register mock rules (URL, optional method, optional request
//! headers, and a response producer), hand the client to application code,
//! and then drain all HTTP activity with
//! [`MockClient::wait_for_pending_requests`]. No network I/O happens.
//!
//! ```ignore
//! use mock_http_client::{MockClient, MockRule, ResponseSpec};
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn loads_data() {
//!     let client = MockClient::new().mock(MockRule::new("/api/data", |_| {
//!         ResponseSpec::ok(json!({"example": true}))
//!     }));
//!
//!     let response = client.get("/api/data").await.unwrap();
//!     assert_eq!(response.data, json!({"example": true}));
//! }
//! ```
//!
//! # Module Structure
//!
//! - `client` - `MockClient` surface and per-request dispatch
//! - `matcher` - Rule matching (URL, method, header subset)
//! - `registry` - Ordered rule storage, first match wins
//! - `resolver` - Producer invocation and status normalization
//! - `tracker` - Pending dispatch counter and the quiescence wait
//! - `fixtures` - Static rules from JSON/YAML files

pub mod client;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod matcher;
pub mod method;
pub mod registry;
pub mod request;
pub mod resolver;
pub mod response;
pub mod rule;
pub mod tracker;

pub use client::{MockClient, PendingRequest};
pub use config::ClientConfig;
pub use error::{ClientError, HttpStatusError, LoadError, UnmockedRequestError};
pub use fixtures::{load_fixtures_file, load_fixtures_json, load_fixtures_yaml, RuleFixture};
pub use method::Method;
pub use request::{Headers, RequestDescriptor, RequestOptions};
pub use response::{Response, ResponseSpec};
pub use rule::MockRule;

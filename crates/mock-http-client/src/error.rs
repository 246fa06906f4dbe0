//! Error types surfaced by the mock client.

use crate::method::Method;
use crate::response::Response;
use std::panic::Location;
use std::path::PathBuf;

/// Error returned by a dispatch.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request options carried no URL (or an empty one).
    #[error("Url is required for request")]
    UrlRequired,

    /// No registered rule matched the request.
    #[error(transparent)]
    Unmocked(#[from] UnmockedRequestError),

    /// The matched rule produced a status of 400 or above.
    #[error(transparent)]
    Status(#[from] HttpStatusError),

    /// The rule's response producer failed. The producer's error is kept as-is.
    #[error(transparent)]
    Producer(anyhow::Error),

    /// The request data could not be converted to JSON.
    #[error("Failed to encode request data: {0}")]
    Body(#[source] serde_json::Error),

    /// The client was called outside of a tokio runtime.
    #[error("Mock requests must be dispatched from within a tokio runtime")]
    RuntimeUnavailable,

    /// The settle task ended without delivering an outcome.
    #[error("Mock dispatch ended before settling (response producer panicked or runtime shut down)")]
    Dropped,
}

impl ClientError {
    /// HTTP status of a [`ClientError::Status`] rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status(err) => Some(err.status()),
            _ => None,
        }
    }

    /// Response attached to a [`ClientError::Status`] rejection.
    pub fn response(&self) -> Option<&Response> {
        match self {
            ClientError::Status(err) => Some(err.response()),
            _ => None,
        }
    }

    pub fn is_unmocked(&self) -> bool {
        matches!(self, ClientError::Unmocked(_))
    }
}

/// Rejection for a request no rule matched.
///
/// The display form is the unmocked message followed by the place where the
/// owning client was created, so a failing test points back at its own setup.
#[derive(Debug, Clone, thiserror::Error)]
#[error(
    "Call to {url} is unmocked. Mock it with client.mock('{url}', ...)\n    mock client created at {created_at}"
)]
pub struct UnmockedRequestError {
    url: String,
    method: Method,
    created_at: &'static Location<'static>,
}

impl UnmockedRequestError {
    pub(crate) fn new(url: &str, method: Method, created_at: &'static Location<'static>) -> Self {
        Self {
            url: url.to_string(),
            method,
            created_at,
        }
    }

    /// The requested path, with the client's base URL already stripped.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Source location of the `MockClient::create` call.
    pub fn created_at(&self) -> &'static Location<'static> {
        self.created_at
    }

    /// The message without the creation site.
    pub fn message(&self) -> String {
        format!(
            "Call to {url} is unmocked. Mock it with client.mock('{url}', ...)",
            url = self.url
        )
    }
}

/// Rejection for a produced response with a status of 400 or above.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Request failed with status code {}", .response.status)]
pub struct HttpStatusError {
    response: Response,
}

impl HttpStatusError {
    pub(crate) fn new(response: Response) -> Self {
        Self { response }
    }

    pub fn status(&self) -> u16 {
        self.response.status
    }

    /// The full response, so tests can inspect the error body and headers.
    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn into_response(self) -> Response {
        self.response
    }
}

/// Errors from loading client configuration or rule fixtures.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported fixture file extension: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Invalid rule at index {index}: {reason}")]
    InvalidRule { index: usize, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_unmocked_message_format() {
        let err = UnmockedRequestError::new("/api/not-found", Method::Get, Location::caller());
        assert_eq!(
            err.message(),
            "Call to /api/not-found is unmocked. Mock it with client.mock('/api/not-found', ...)"
        );
        let text = err.to_string();
        assert!(text.starts_with(&err.message()));
        assert!(text.contains(file!()));
    }

    #[test]
    fn test_status_error_keeps_response() {
        let err = ClientError::from(HttpStatusError::new(Response {
            status: 404,
            data: serde_json::json!({"error": "missing"}),
            headers: HashMap::new(),
        }));
        assert_eq!(err.to_string(), "Request failed with status code 404");
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.response().unwrap().data["error"], "missing");
        assert!(!err.is_unmocked());
    }

    #[test]
    fn test_producer_error_is_transparent() {
        let err = ClientError::Producer(anyhow::anyhow!("database offline"));
        assert_eq!(err.to_string(), "database offline");
        assert_eq!(err.status(), None);
    }
}

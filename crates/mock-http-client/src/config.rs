//! Client-level configuration.
//!
//! Only `baseURL` is meaningful to the mock. Other keys a real client config
//! would carry (timeouts, auth) are accepted and ignored, so the same config
//! file can feed both the real client and its test double.

use crate::error::LoadError;
use serde::{Deserialize, Serialize};

/// Configuration accepted by [`MockClient::create`](crate::MockClient::create).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Prefix stripped from request URLs before rule matching.
    /// Never surfaced in error messages or log lines.
    #[serde(
        rename = "baseURL",
        alias = "baseUrl",
        alias = "base_url",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub base_url: Option<String>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn from_json_str(raw: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, LoadError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Base URL without trailing slashes; `None` when unset or empty.
    fn normalized_base(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .map(|base| base.trim_end_matches('/'))
            .filter(|base| !base.is_empty())
    }

    /// Strip the base URL from `url` when it is a prefix on a path boundary.
    ///
    /// URLs that do not carry the base are returned unchanged, which is the
    /// common case: callers pass paths relative to the base.
    pub(crate) fn strip_base<'a>(&self, url: &'a str) -> &'a str {
        let Some(base) = self.normalized_base() else {
            return url;
        };

        match url.strip_prefix(base) {
            Some("") => "/",
            Some(rest) if rest.starts_with('/') => rest,
            _ => url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_base() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, None);
        assert_eq!(config.strip_base("/api/data"), "/api/data");
    }

    #[test]
    fn test_strip_base_prefix() {
        let config = ClientConfig::new().base_url("/base-url");
        assert_eq!(config.strip_base("/base-url/api/data"), "/api/data");
        assert_eq!(config.strip_base("/base-url"), "/");
        assert_eq!(config.strip_base("/api/data"), "/api/data");
    }

    #[test]
    fn test_strip_base_respects_path_boundary() {
        let config = ClientConfig::new().base_url("/base");
        assert_eq!(config.strip_base("/baseline/items"), "/baseline/items");
    }

    #[test]
    fn test_trailing_slash_on_base_is_ignored() {
        let config = ClientConfig::new().base_url("https://api.example.com/v1/");
        assert_eq!(
            config.strip_base("https://api.example.com/v1/users"),
            "/users"
        );
        assert_eq!(ClientConfig::new().base_url("/").strip_base("/x"), "/x");
    }

    #[test]
    fn test_deserialize_base_url_spellings() {
        let json = ClientConfig::from_json_str(r#"{"baseURL": "/a", "timeout": 1000}"#).unwrap();
        assert_eq!(json.base_url.as_deref(), Some("/a"));

        let yaml = ClientConfig::from_yaml_str("baseUrl: /b\n").unwrap();
        assert_eq!(yaml.base_url.as_deref(), Some("/b"));

        let snake = ClientConfig::from_json_str(r#"{"base_url": "/c"}"#).unwrap();
        assert_eq!(snake.base_url.as_deref(), Some("/c"));
    }

    #[test]
    fn test_invalid_config_reports_format() {
        let err = ClientConfig::from_json_str("{").unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }
}

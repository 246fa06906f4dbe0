//! Static mock rules loaded from JSON or YAML.
//!
//! A fixture file is a list of rules, each with a fixed response:
//!
//! ```yaml
//! - url: /api/users
//!   method: get
//!   headers:
//!     authorization: Bearer test
//!   response:
//!     status: 200
//!     data: [{ id: 1 }]
//!     headers:
//!       content-type: application/json
//! ```
//!
//! Rules keep file order, so the first matching entry wins.

use crate::error::LoadError;
use crate::method::Method;
use crate::request::Headers;
use crate::response::ResponseSpec;
use crate::rule::MockRule;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// One rule entry of a fixture file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RuleFixture {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<Method>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Headers>,
    #[serde(default)]
    pub response: ResponseSpec,
}

impl RuleFixture {
    /// Check the entry at `index` of its file.
    pub fn validate(&self, index: usize) -> Result<(), LoadError> {
        let invalid = |reason: String| LoadError::InvalidRule { index, reason };

        let url = self.url.trim();
        if url.is_empty() {
            return Err(invalid("url must not be empty".to_string()));
        }
        if !url.starts_with('/') && !url.contains("://") {
            return Err(invalid(format!(
                "url '{url}' must start with '/' or be absolute"
            )));
        }
        Ok(())
    }

    pub fn into_rule(self) -> MockRule {
        let mut rule = MockRule::fixed(self.url, self.response);
        if let Some(method) = self.method {
            rule = rule.method(method);
        }
        if let Some(headers) = self.headers {
            rule = rule.headers(headers);
        }
        rule
    }
}

fn into_rules(fixtures: Vec<RuleFixture>) -> Result<Vec<MockRule>, LoadError> {
    for (index, fixture) in fixtures.iter().enumerate() {
        fixture.validate(index)?;
    }
    Ok(fixtures.into_iter().map(RuleFixture::into_rule).collect())
}

pub fn load_fixtures_json(raw: &str) -> Result<Vec<MockRule>, LoadError> {
    into_rules(serde_json::from_str(raw)?)
}

pub fn load_fixtures_yaml(raw: &str) -> Result<Vec<MockRule>, LoadError> {
    into_rules(serde_yaml::from_str(raw)?)
}

/// Load a fixture file; `.json`, `.yaml` and `.yml` are recognized.
pub fn load_fixtures_file(path: impl AsRef<Path>) -> Result<Vec<MockRule>, LoadError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let rules = match extension.as_deref() {
        Some("json") => load_fixtures_json(&raw)?,
        Some("yaml" | "yml") => load_fixtures_yaml(&raw)?,
        _ => return Err(LoadError::UnsupportedFormat(path.to_path_buf())),
    };

    info!("Loaded {} mock rules from {}", rules.len(), path.display());
    Ok(rules)
}

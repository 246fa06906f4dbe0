//! Response types: what a rule produces and what a caller receives.

use crate::request::Headers;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response produced by a mock rule.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSpec {
    #[serde(
        alias = "statusCode",
        default = "default_status",
        deserialize_with = "deserialize_status"
    )]
    pub status: u16,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Headers>,
}

impl ResponseSpec {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            data: Value::Null,
            headers: None,
        }
    }

    /// `200 OK` carrying `data`.
    pub fn ok(data: impl Into<Value>) -> Self {
        Self::new(200).with_data(data)
    }

    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = data.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(Headers::new)
            .insert(name.into(), value.into());
        self
    }
}

impl Default for ResponseSpec {
    fn default() -> Self {
        Self::new(default_status())
    }
}

fn default_status() -> u16 {
    200
}

/// Status as written in a fixture: `404` or `"404"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum StatusRepr {
    Code(u64),
    Text(String),
}

/// Accept a number or numeric string, limited to the HTTP status range.
fn deserialize_status<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let code = match StatusRepr::deserialize(deserializer)
        .map_err(|_| D::Error::custom("status must be a number or string"))?
    {
        StatusRepr::Code(code) => code,
        StatusRepr::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("status '{text}' is not a number")))?,
    };
    u16::try_from(code)
        .ok()
        .filter(|status| (100..=599).contains(status))
        .ok_or_else(|| D::Error::custom(format!("status {code} is outside 100..=599")))
}

/// Settled response delivered to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub status: u16,
    pub data: Value,
    /// Empty when the producer set no headers.
    pub headers: Headers,
}

impl Response {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Deserialize `data` into `T`.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data)
    }

    pub fn is_success(&self) -> bool {
        self.status < 400
    }
}

impl From<ResponseSpec> for Response {
    fn from(spec: ResponseSpec) -> Self {
        Self {
            status: spec.status,
            data: spec.data,
            headers: spec.headers.unwrap_or_default(),
        }
    }
}

//! Request options (what the caller passes) and request descriptors (what
//! rules are matched against and producers receive).

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::method::Method;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Header mapping used on both request and response side.
///
/// Header names are compared case-sensitively.
pub type Headers = HashMap<String, String>;

/// Options for the generic [`MockClient::request`](crate::MockClient::request) form.
///
/// Every verb shortcut fills one of these and hands it to `request`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub url: Option<String>,
    /// Defaults to `GET` when unset.
    pub method: Option<Method>,
    pub headers: Headers,
    pub data: Option<Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Set the request body. JSON `null` means "no body".
    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data).filter(|value| !value.is_null());
        self
    }

    /// Serialize `data` to JSON and use it as the request body.
    pub fn json<T: Serialize + ?Sized>(self, data: &T) -> Result<Self, serde_json::Error> {
        let value = serde_json::to_value(data)?;
        Ok(self.data(value))
    }

    /// Build the immutable descriptor for a dispatch.
    ///
    /// Fails with [`ClientError::UrlRequired`] when no usable URL was given.
    pub(crate) fn into_descriptor(
        self,
        config: &ClientConfig,
    ) -> Result<RequestDescriptor, ClientError> {
        let url = match self.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => config.strip_base(url).to_string(),
            _ => return Err(ClientError::UrlRequired),
        };

        Ok(RequestDescriptor {
            url,
            method: self.method.unwrap_or_default(),
            headers: self.headers,
            data: self.data,
        })
    }
}

/// A dispatched request as seen by rule matching and response producers.
///
/// `url` already has the client's base URL stripped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestDescriptor {
    pub url: String,
    pub method: Method,
    pub headers: Headers,
    pub data: Option<Value>,
}

impl RequestDescriptor {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Deserialize the request body into `T`. A missing body reads as `null`.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.clone().unwrap_or(Value::Null))
    }
}

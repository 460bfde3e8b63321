use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{PdnsError, Result};

/// Request surface the object graph talks to.
///
/// `Ok(None)` stands for an empty (204) answer. Implementations map HTTP
/// failures to [`PdnsError::NotFound`] and [`PdnsError::Api`].
pub trait Transport: Send + Sync {
    fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Option<Value>>;

    /// API root the relative paths are resolved against.
    fn base_url(&self) -> &str;

    fn get(&self, path: &str) -> Result<Option<Value>> {
        self.request(Method::GET, path, None)
    }

    fn post(&self, path: &str, body: &Value) -> Result<Option<Value>> {
        self.request(Method::POST, path, Some(body))
    }

    fn put(&self, path: &str, body: Option<&Value>) -> Result<Option<Value>> {
        self.request(Method::PUT, path, body)
    }

    fn patch(&self, path: &str, body: &Value) -> Result<Option<Value>> {
        self.request(Method::PATCH, path, Some(body))
    }

    fn delete(&self, path: &str) -> Result<Option<Value>> {
        self.request(Method::DELETE, path, None)
    }
}

/// GET `path` and decode the body into `T`.
pub fn fetch<T: DeserializeOwned>(transport: &dyn Transport, path: &str) -> Result<T> {
    match transport.get(path)? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Err(PdnsError::EmptyResponse {
            url: path.to_string(),
        }),
    }
}

/// Whether a mutation answer confirms anything (non-empty body).
pub fn is_truthy(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
    }
}

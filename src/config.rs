use std::time::Duration;

/// Connection settings for [`crate::powerdns::client::ApiClient`].
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_endpoint: String, // e.g. "http://127.0.0.1:8081/api/v1"
    pub api_key: Option<String>,
    pub verify: bool,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(api_endpoint: impl Into<String>) -> Self {
        Self {
            api_endpoint: api_endpoint.into(),
            api_key: None,
            verify: true,
            timeout: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Disabling verification accepts invalid TLS certificates.
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Endpoint without trailing slashes.
    pub fn api_root(&self) -> &str {
        self.api_endpoint.trim_end_matches('/')
    }
}

use std::fmt;

use reqwest::blocking::Client;
use reqwest::{Method, StatusCode, header};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::ClientConfig;
use crate::error::{PdnsError, Result};
use crate::powerdns::transport::Transport;

/// Blocking PowerDNS API client.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder().timeout(config.timeout);
        if !config.verify {
            builder = accept_invalid_certs(builder);
        }
        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn auth_header(&self, req: reqwest::blocking::RequestBuilder) -> reqwest::blocking::RequestBuilder {
        match &self.config.api_key {
            Some(key) => req.header("X-API-Key", key),
            None => req,
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.config.api_root(),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(feature = "https-client")]
fn accept_invalid_certs(
    builder: reqwest::blocking::ClientBuilder,
) -> reqwest::blocking::ClientBuilder {
    debug!("disabling TLS certificate verification");
    builder.danger_accept_invalid_certs(true)
}

#[cfg(not(feature = "https-client"))]
fn accept_invalid_certs(
    builder: reqwest::blocking::ClientBuilder,
) -> reqwest::blocking::ClientBuilder {
    tracing::warn!("built without https-client, certificate verification setting ignored");
    builder
}

impl Transport for ApiClient {
    fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Option<Value>> {
        debug!("request: original path is {}", path);
        let url = self.url(path);
        info!("request: {} {}", method, url);

        let mut req = self
            .auth_header(self.http.request(method, &url))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json");
        if let Some(body) = body {
            debug!("data: {}", body);
            req = req.json(body);
        }

        let res = req.send()?;
        let status = res.status();
        let final_url = res.url().to_string();
        info!("request response code: {}", status.as_u16());
        let text = res.text()?;
        debug!("response: {}", text);

        interpret_response(&final_url, status, &text)
    }

    fn base_url(&self) -> &str {
        self.config.api_root()
    }
}

impl fmt::Display for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config.api_root())
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // never print the key
        f.debug_struct("ApiClient")
            .field("api_endpoint", &self.config.api_endpoint)
            .field("verify", &self.config.verify)
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

/// Maps an HTTP answer onto the transport contract.
pub fn interpret_response(url: &str, status: StatusCode, text: &str) -> Result<Option<Value>> {
    match status {
        StatusCode::OK | StatusCode::CREATED => {
            if text.trim().is_empty() {
                Ok(None)
            } else {
                Ok(Some(serde_json::from_str(text)?))
            }
        }
        StatusCode::NO_CONTENT => Ok(None),
        StatusCode::NOT_FOUND => {
            error!("raising error code {}", status.as_u16());
            Err(PdnsError::NotFound {
                url: url.to_string(),
            })
        }
        _ => {
            error!("raising error code {}", status.as_u16());
            let message = match serde_json::from_str::<Value>(text) {
                Ok(body) => error_message(&body),
                Err(_) => text.to_string(),
            };
            debug!("error response: {}", message);
            Err(PdnsError::Api {
                url: url.to_string(),
                status_code: status.as_u16(),
                message,
            })
        }
    }
}

fn error_message(body: &Value) -> String {
    let field = body.get("error").or_else(|| body.get("errors"));
    match field {
        Some(Value::String(message)) => message.clone(),
        Some(other) => other.to_string(),
        None if body.is_object() => "No error message found".to_string(),
        None => body.to_string(),
    }
}

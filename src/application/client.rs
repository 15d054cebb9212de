//! Authenticated Zephyr Scale API client
//!
//! Adds basic authentication and JSON headers to every request, sends it
//! through an `HttpTransport` and maps the outcome onto `ApplicationError`.
//! The client returns untyped JSON and knows nothing about resource shapes.

use std::error::Error as StdError;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Credentials;
use crate::infrastructure::traits::{HttpRequest, HttpTransport};

/// Content path of the Zephyr Scale REST API below the Jira base URL.
pub const API_PREFIX: &str = "rest/atm/1.0";

const JSON: &str = "application/json";

/// HTTP client bound to one Jira instance and one user.
pub struct AuthenticatedClient {
    base_url: String,
    authorization: String,
    transport: Arc<dyn HttpTransport>,
}

impl AuthenticatedClient {
    pub fn new(credentials: &Credentials, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: credentials.url.trim_end_matches('/').to_string(),
            authorization: basic_auth(&credentials.username, &credentials.password),
            transport,
        }
    }

    /// Absolute URL for an API path such as `testplan/PZ-P1`.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            API_PREFIX,
            path.trim_start_matches('/')
        )
    }

    /// Perform one request and return the parsed JSON body.
    ///
    /// An empty success body (e.g. `204 No Content`) yields `Value::Null`.
    #[instrument(level = "debug", skip(self, method, body), fields(method = %method))]
    pub fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ApplicationResult<Value> {
        let mut headers = vec![
            ("Authorization".to_string(), self.authorization.clone()),
            ("Accept".to_string(), JSON.to_string()),
        ];
        if body.is_some() {
            headers.push(("Content-Type".to_string(), JSON.to_string()));
        }

        let request = HttpRequest {
            method,
            url: self.endpoint(path),
            headers,
            body: body.map(Value::to_string),
        };

        let response = self
            .transport
            .send(&request)
            .map_err(|e| ApplicationError::Network {
                message: format!("{} {}: {}", request.method, request.url, error_chain(&e)),
            })?;

        if !(200..300).contains(&response.status) {
            debug!("server rejected request: {}", response.body);
            return Err(ApplicationError::Api {
                status: response.status,
                message: server_message(response.status, &response.body),
            });
        }

        parse_body(&response.body)
    }
}

/// `Authorization` header value for HTTP basic authentication.
pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

fn parse_body(body: &str) -> ApplicationResult<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| ApplicationError::Decode {
        message: e.to_string(),
    })
}

/// Human readable message from an error response.
///
/// Zephyr reports failures as `{"errorMessages": [...]}`; other servers
/// (proxies, Jira itself) may send `message` or plain text.
fn server_message(status: u16, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        if let Some(Value::Array(messages)) = map.get("errorMessages") {
            let joined = messages
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            if !joined.is_empty() {
                return joined;
            }
        }
        if let Some(message) = map.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
    }

    let text = body.trim();
    if !text.is_empty() {
        return text.to_string();
    }
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("unknown error")
        .to_string()
}

fn error_chain(e: &dyn StdError) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

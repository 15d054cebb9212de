//! I/O boundary traits for testability
//!
//! The HTTP transport is abstracted so that the authenticated client and the
//! resource services can be tested against a mock implementation.

use std::io;

use reqwest::blocking::Client;
use reqwest::Method;
use tracing::debug;

/// A fully built HTTP request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Value of header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw HTTP response: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// HTTP transport abstraction.
///
/// One call to `send` is exactly one network round trip. Implementations
/// must not retry.
pub trait HttpTransport: Send + Sync {
    /// Send `request` and return the response, whatever its status.
    ///
    /// Errors are reserved for transport failures (DNS, refused connection,
    /// timeout, broken body stream).
    fn send(&self, request: &HttpRequest) -> io::Result<HttpResponse>;
}

/// Real transport backed by a blocking reqwest client.
///
/// Timeouts are reqwest's defaults.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> io::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("zfr/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(to_io_error)?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: &HttpRequest) -> io::Result<HttpResponse> {
        debug!("{} {}", request.method, request.url);

        let mut builder = self.client.request(request.method.clone(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().map_err(to_io_error)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(to_io_error)?;
        debug!("{} {} -> {}", request.method, request.url, status);

        Ok(HttpResponse { status, body })
    }
}

fn to_io_error(e: reqwest::Error) -> io::Error {
    let kind = if e.is_timeout() {
        io::ErrorKind::TimedOut
    } else if e.is_connect() {
        io::ErrorKind::ConnectionRefused
    } else {
        io::ErrorKind::Other
    };
    io::Error::new(kind, e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_mixed_case_header_when_looked_up_then_found() {
        let request = HttpRequest {
            method: Method::GET,
            url: "http://localhost/x".into(),
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: None,
        };
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("authorization"), None);
    }
}

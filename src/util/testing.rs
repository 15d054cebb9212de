//! Test support: logging setup and a scripted HTTP transport.

use std::collections::VecDeque;
use std::env;
use std::io;
use std::sync::{Mutex, Once};

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::config::Credentials;
use crate::infrastructure::traits::{HttpRequest, HttpResponse, HttpTransport};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "debug");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Credentials pointing at `url` with a fixed test user.
pub fn test_credentials(url: &str) -> Credentials {
    Credentials {
        url: url.to_string(),
        username: "tester".to_string(),
        password: "secret".to_string(),
    }
}

enum Reply {
    Response(HttpResponse),
    Failure(io::ErrorKind, String),
}

/// Transport that replays queued replies and records every request.
///
/// Sending with an empty queue fails like a refused connection.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with `status` and `body`.
    pub fn with_response(self, status: u16, body: impl Into<String>) -> Self {
        self.lock_replies().push_back(Reply::Response(HttpResponse {
            status,
            body: body.into(),
        }));
        self
    }

    /// Queue a transport failure.
    pub fn with_failure(self, kind: io::ErrorKind, message: impl Into<String>) -> Self {
        self.lock_replies()
            .push_back(Reply::Failure(kind, message.into()));
        self
    }

    /// All requests sent so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of requests sent so far.
    pub fn call_count(&self) -> usize {
        self.requests().len()
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, VecDeque<Reply>> {
        self.replies.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl HttpTransport for MockTransport {
    fn send(&self, request: &HttpRequest) -> io::Result<HttpResponse> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        match self.lock_replies().pop_front() {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::Failure(kind, message)) => Err(io::Error::new(kind, message)),
            None => Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "no mock response queued",
            )),
        }
    }
}

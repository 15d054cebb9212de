//! Test plan service

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, instrument};

use super::to_body;
use crate::application::{ApplicationResult, AuthenticatedClient};
use crate::domain::{PlanCreate, PlanQuery, PlanUpdate};

/// Service for creating, reading, updating and deleting test plans.
pub struct PlanService {
    client: Arc<AuthenticatedClient>,
}

impl PlanService {
    pub fn new(client: Arc<AuthenticatedClient>) -> Self {
        Self { client }
    }

    /// Create a test plan: `POST testplan`.
    #[instrument(level = "debug", skip(self))]
    pub fn create(&self, plan: &PlanCreate) -> ApplicationResult<Value> {
        let body = to_body(plan)?;
        debug!("create plan body: {}", body);
        self.client.request(Method::POST, "testplan", Some(&body))
    }

    /// Update a test plan: `PUT testplan/{key}`.
    ///
    /// Only the attributes present in `plan` are sent.
    #[instrument(level = "debug", skip(self))]
    pub fn update(&self, plan: &PlanUpdate) -> ApplicationResult<Value> {
        let body = to_body(plan)?;
        debug!("update plan body: {}", body);
        self.client
            .request(Method::PUT, &plan_path(&plan.key), Some(&body))
    }

    /// Fetch a test plan: `GET testplan/{key}[?fields=a,b]`.
    #[instrument(level = "debug", skip(self))]
    pub fn get(&self, query: &PlanQuery) -> ApplicationResult<Value> {
        let mut path = plan_path(&query.key);
        if !query.fields.is_empty() {
            let fields = query
                .fields
                .iter()
                .map(|f| urlencoding::encode(f).into_owned())
                .collect::<Vec<_>>()
                .join(",");
            path.push_str("?fields=");
            path.push_str(&fields);
        }
        self.client.request(Method::GET, &path, None)
    }

    /// Delete a test plan: `DELETE testplan/{key}`.
    ///
    /// Returns whatever the server sends back for the deleted plan.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&self, key: &str) -> ApplicationResult<Value> {
        self.client.request(Method::DELETE, &plan_path(key), None)
    }
}

fn plan_path(key: &str) -> String {
    format!("testplan/{}", urlencoding::encode(key.trim()))
}

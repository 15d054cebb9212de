//! Zephyr Scale entities and the request payloads sent for them.
//!
//! Field names match the wire representation, so the structs serialize
//! directly into request bodies.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::error::{DomainError, DomainResult};

/// Kind of entity a folder groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FolderType {
    TestPlan,
    TestCase,
    /// Zephyr calls cycles "test runs" on the wire.
    TestRun,
}

impl FromStr for FolderType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "plan" | "test_plan" => Ok(Self::TestPlan),
            "case" | "test_case" => Ok(Self::TestCase),
            "cycle" | "run" | "test_run" => Ok(Self::TestRun),
            other => Err(DomainError::invalid(
                "type",
                format!("'{other}' (expected plan, case or cycle)"),
            )),
        }
    }
}

/// Test plan workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanStatus {
    Draft,
    Deprecated,
    Approved,
    /// Any status configured on the server that this client does not know.
    #[serde(other)]
    Unknown,
}

impl FromStr for PlanStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "deprecated" => Ok(Self::Deprecated),
            "approved" => Ok(Self::Approved),
            other => Err(DomainError::invalid(
                "status",
                format!("'{other}' (expected Draft, Deprecated or Approved)"),
            )),
        }
    }
}

/// Split a comma separated CLI list, keeping input order.
///
/// Items are trimmed and empty items dropped, so `"a, b,,c"` yields `["a", "b", "c"]`.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parse the `--fields` custom field argument, which must be a JSON object.
pub fn parse_custom_fields(raw: &str) -> DomainResult<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(DomainError::invalid(
            "fields",
            format!("expected a JSON object, got {}", json_kind(&other)),
        )),
        Err(e) => Err(DomainError::invalid("fields", e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn required(argument: &'static str, value: Option<String>) -> DomainResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(DomainError::MissingArgument(argument)),
    }
}

// ============================================================
// Folder payloads
// ============================================================

/// Body of `POST folder`. The server assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_key: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub folder_type: Option<FolderType>,
}

impl FolderCreate {
    pub fn new(
        name: Option<String>,
        project_key: Option<String>,
        folder_type: Option<FolderType>,
    ) -> DomainResult<Self> {
        Ok(Self {
            name: required("name", name)?,
            project_key: project_key.filter(|p| !p.trim().is_empty()),
            folder_type,
        })
    }
}

/// Body of `PUT folder/{id}`.
///
/// The rename endpoint expects the bare name, so leading slashes are removed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderUpdate {
    #[serde(skip)]
    pub id: u64,
    pub name: String,
}

impl FolderUpdate {
    pub fn new(id: Option<String>, name: Option<String>) -> DomainResult<Self> {
        let raw_id = required("id", id)?;
        let id = raw_id
            .trim()
            .parse::<u64>()
            .map_err(|_| DomainError::invalid("id", format!("'{raw_id}' is not a numeric folder id")))?;
        let name = required("name", name)?;
        let name = name.trim_start_matches('/');
        if name.trim().is_empty() {
            return Err(DomainError::invalid("name", "folder name is empty"));
        }
        Ok(Self {
            id,
            name: name.to_string(),
        })
    }
}

// ============================================================
// Test plan payloads
// ============================================================

/// Optional test plan attributes shared by create and update.
///
/// Unset attributes are left out of the body so an update never clears
/// data the user did not mention.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlanFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PlanStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_links: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_runs: Option<Vec<String>>,
}

/// Raw, unvalidated plan attributes as typed on the command line.
#[derive(Debug, Clone, Default)]
pub struct PlanFieldsInput {
    pub objective: Option<String>,
    pub folder: Option<String>,
    pub status: Option<PlanStatus>,
    pub owner: Option<String>,
    pub labels: Option<String>,
    pub issues: Option<String>,
    pub cycles: Option<String>,
    pub fields: Option<String>,
}

impl PlanFields {
    pub fn from_input(input: PlanFieldsInput) -> DomainResult<Self> {
        let custom_fields = input
            .fields
            .as_deref()
            .map(parse_custom_fields)
            .transpose()?;

        Ok(Self {
            objective: input.objective,
            folder: input.folder.map(folder_path),
            status: input.status,
            owner: input.owner,
            labels: input.labels.as_deref().map(split_list),
            issue_links: input.issues.as_deref().map(split_list),
            custom_fields,
            test_runs: input.cycles.as_deref().map(split_list),
        })
    }
}

/// Test plan folders are addressed by absolute path: `Releases` becomes `/Releases`.
fn folder_path(folder: String) -> String {
    if folder.is_empty() || folder.starts_with('/') {
        folder
    } else {
        format!("/{folder}")
    }
}

/// Body of `POST testplan`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanCreate {
    pub project_key: String,
    pub name: String,
    #[serde(flatten)]
    pub fields: PlanFields,
}

impl PlanCreate {
    pub fn new(
        project_key: Option<String>,
        name: Option<String>,
        fields: PlanFieldsInput,
    ) -> DomainResult<Self> {
        Ok(Self {
            project_key: required("project", project_key)?,
            name: required("name", name)?,
            fields: PlanFields::from_input(fields)?,
        })
    }
}

/// Body of `PUT testplan/{key}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanUpdate {
    #[serde(skip)]
    pub key: String,
    pub project_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub fields: PlanFields,
}

impl PlanUpdate {
    pub fn new(
        project_key: Option<String>,
        key: Option<String>,
        name: Option<String>,
        fields: PlanFieldsInput,
    ) -> DomainResult<Self> {
        Ok(Self {
            key: required("key", key)?,
            project_key: required("project", project_key)?,
            name,
            fields: PlanFields::from_input(fields)?,
        })
    }
}

/// Lookup of a single plan, optionally limited to some fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanQuery {
    pub key: String,
    pub fields: Vec<String>,
}

impl PlanQuery {
    pub fn new(key: Option<String>, fields: Option<String>) -> DomainResult<Self> {
        Ok(Self {
            key: required("key", key)?,
            fields: fields.as_deref().map(split_list).unwrap_or_default(),
        })
    }
}

/// Validated key of a plan to delete.
pub fn plan_key(key: Option<String>) -> DomainResult<String> {
    required("key", key)
}

// ============================================================
// Server representations
// ============================================================

/// Folder as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub folder_type: Option<FolderType>,
}

/// File attached to a test plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attachment {
    pub id: u64,
    pub url: String,
    pub filename: String,
    pub filesize: u64,
}

/// User comment on a test plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    pub created_by: String,
    pub created_on: Option<String>,
    pub body: String,
}

/// Test plan as returned by the server.
///
/// Optional attributes are kept as the server sent them: an empty string
/// and `null` stay distinguishable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestPlan {
    pub key: String,
    pub project_key: String,
    pub name: String,
    pub objective: Option<String>,
    pub labels: Vec<String>,
    pub folder: Option<String>,
    pub status: Option<PlanStatus>,
    pub owner: Option<String>,
    pub created_by: Option<String>,
    pub created_on: Option<String>,
    pub updated_by: Option<String>,
    pub updated_on: Option<String>,
    pub custom_fields: Map<String, Value>,
    pub attachments: Vec<Attachment>,
    pub comments: Vec<Comment>,
    pub issue_links: Vec<String>,
    pub test_runs: Vec<Value>,
}

//! Task model shared by the reminder engine, the deadline sweep and stats.
//!
//! Records arrive in the document-store JSON shape (camelCase keys, `_id`,
//! populated `assignedTo`). Every field is normalized on the way in: a
//! malformed field falls back to its default instead of rejecting the task.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::time::parse_due_date;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Blocked,
}

impl TaskStatus {
    /// Case-insensitive; anything unrecognized is treated as `Pending`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "in-progress" | "in_progress" | "inprogress" => TaskStatus::InProgress,
            "completed" => TaskStatus::Completed,
            "blocked" => TaskStatus::Blocked,
            _ => TaskStatus::Pending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
        }
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(d)?;
        Ok(raw.as_str().map(TaskStatus::parse).unwrap_or_default())
    }
}

/// Ordered most urgent first, so `min()` over a set yields its strongest priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High = 0,
    #[default]
    Medium = 1,
    Low = 2,
}

impl Priority {
    /// Case-insensitive; anything unrecognized is treated as `Medium`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "high" => Priority::High,
            "low" => Priority::Low,
            _ => Priority::Medium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }

    /// Score contribution of the priority alone.
    pub fn weight(self) -> i64 {
        match self {
            Priority::High => 200,
            Priority::Medium => 100,
            Priority::Low => 50,
        }
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(d)?;
        Ok(raw.as_str().map(Priority::parse).unwrap_or_default())
    }
}

/// `assignedTo` is either a bare user id or a populated user document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Assignee {
    Id(String),
    User {
        #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        username: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        email: Option<String>,
    },
}

impl Assignee {
    fn from_value(v: &Value) -> Option<Self> {
        match v {
            Value::Object(map) => Some(Assignee::User {
                id: value_id(v),
                username: map.get("username").and_then(value_text),
                email: map.get("email").and_then(value_text),
            }),
            other => value_text(other).map(Assignee::Id),
        }
    }

    /// Human-facing label: username, then email, then the raw id.
    pub fn label(&self) -> Option<&str> {
        match self {
            Assignee::Id(id) => Some(id.as_str()),
            Assignee::User {
                id,
                username,
                email,
            } => username
                .as_deref()
                .or(email.as_deref())
                .or(id.as_deref())
                .filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawTask")]
pub struct Task {
    pub id: String,

    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub status: TaskStatus,

    pub priority: Priority,

    /// Absent (or unparseable) means no deadline.
    pub due_date: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Assignee>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

/// Wire shape before normalization. Every field is an untyped JSON value so a
/// wrongly-typed field degrades to its default instead of failing the record.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTask {
    #[serde(rename = "_id", default)]
    store_id: Value,
    #[serde(default)]
    id: Value,
    #[serde(default)]
    name: Value,
    #[serde(default)]
    description: Value,
    #[serde(default)]
    status: Value,
    #[serde(default)]
    priority: Value,
    #[serde(default)]
    due_date: Value,
    #[serde(default)]
    assigned_to: Value,
    #[serde(default)]
    project: Value,
}

impl From<RawTask> for Task {
    fn from(raw: RawTask) -> Self {
        Self {
            id: value_id(&raw.store_id)
                .or_else(|| value_id(&raw.id))
                .unwrap_or_default(),
            name: value_text(&raw.name).unwrap_or_default(),
            description: value_text(&raw.description),
            status: raw.status.as_str().map(TaskStatus::parse).unwrap_or_default(),
            priority: raw.priority.as_str().map(Priority::parse).unwrap_or_default(),
            due_date: value_due_date(&raw.due_date),
            assigned_to: Assignee::from_value(&raw.assigned_to),
            project: value_id(&raw.project),
        }
    }
}

impl Task {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            status: TaskStatus::Pending,
            priority: Priority::Medium,
            due_date: None,
            assigned_to: None,
            project: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_due(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_assignee(mut self, assignee: Assignee) -> Self {
        self.assigned_to = Some(assignee);
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn assignee_label(&self) -> &str {
        self.assigned_to
            .as_ref()
            .and_then(Assignee::label)
            .unwrap_or("Unassigned")
    }
}

fn value_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Plain ids, numeric ids, `{"$oid": ..}` and populated documents with `_id`.
fn value_id(v: &Value) -> Option<String> {
    match v {
        Value::Object(map) => ["$oid", "_id", "id"]
            .iter()
            .find_map(|k| map.get(*k).and_then(value_id)),
        other => value_text(other),
    }
    .filter(|s| !s.is_empty())
}

fn value_due_date(v: &Value) -> Option<DateTime<Utc>> {
    match v {
        Value::String(s) => parse_due_date(s).ok(),
        Value::Number(n) => {
            let ms = n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            })?;
            DateTime::from_timestamp_millis(ms)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_store_document_shape() {
        let json = r#"{
            "_id": "64f0c0ffee",
            "project": "p1",
            "name": "Write report",
            "description": "Chapter 3",
            "status": "in-progress",
            "priority": "high",
            "dueDate": "2025-10-10T17:00:00.000Z",
            "assignedTo": { "_id": "u1", "username": "asha", "email": "asha@uni.edu" }
        }"#;
        let t: Task = serde_json::from_str(json).unwrap();
        assert_eq!(t.id, "64f0c0ffee");
        assert_eq!(t.status, TaskStatus::InProgress);
        assert_eq!(t.priority, Priority::High);
        assert_eq!(
            t.due_date,
            Some(Utc.with_ymd_and_hms(2025, 10, 10, 17, 0, 0).unwrap())
        );
        assert_eq!(t.assignee_label(), "asha");
    }

    #[test]
    fn malformed_fields_fall_back_to_defaults() {
        let json = r#"{
            "id": "t9",
            "status": "Archived",
            "priority": "URGENT",
            "dueDate": "next tuesday",
            "assignedTo": null
        }"#;
        let t: Task = serde_json::from_str(json).unwrap();
        assert_eq!(t.name, "");
        assert_eq!(t.status, TaskStatus::Pending);
        assert_eq!(t.priority, Priority::Medium);
        assert_eq!(t.due_date, None);
        assert_eq!(t.assignee_label(), "Unassigned");
    }

    #[test]
    fn status_and_priority_are_case_insensitive() {
        assert_eq!(TaskStatus::parse("COMPLETED"), TaskStatus::Completed);
        assert_eq!(TaskStatus::parse(" Blocked "), TaskStatus::Blocked);
        assert_eq!(Priority::parse("Low"), Priority::Low);
        assert_eq!(Priority::parse(""), Priority::Medium);
    }

    #[test]
    fn null_priority_defaults_to_medium() {
        let t: Task = serde_json::from_str(r#"{"id":"a","name":"x","priority":null}"#).unwrap();
        assert_eq!(t.priority, Priority::Medium);
    }

    #[test]
    fn date_only_and_epoch_due_dates() {
        let t: Task = serde_json::from_str(r#"{"id":"a","name":"x","dueDate":"2025-10-01"}"#).unwrap();
        assert_eq!(
            t.due_date,
            Some(Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap())
        );

        let t: Task =
            serde_json::from_str(r#"{"id":"a","name":"x","dueDate":1759276800000}"#).unwrap();
        assert_eq!(
            t.due_date,
            Some(Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn wrongly_typed_fields_do_not_reject_the_record() {
        let json = r#"[
            {"_id":"a","id":"b","name":"Both ids"},
            {"_id":"c","name":"Numeric description","description":42},
            {"_id":"d","name":"Numeric enums","priority":3,"status":1},
            {"_id":"e","name":"Float due","dueDate":1.7592768e12},
            {"_id":{"$oid":"f"},"name":7,"assignedTo":["u1"],"project":{"_id":"p1"}}
        ]"#;
        let ts: Vec<Task> = serde_json::from_str(json).unwrap();
        assert_eq!(ts.len(), 5);

        assert_eq!(ts[0].id, "a");
        assert_eq!(ts[1].description.as_deref(), Some("42"));
        assert_eq!(ts[2].priority, Priority::Medium);
        assert_eq!(ts[2].status, TaskStatus::Pending);
        assert_eq!(
            ts[3].due_date,
            Some(Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(ts[4].id, "f");
        assert_eq!(ts[4].name, "7");
        assert_eq!(ts[4].assignee_label(), "Unassigned");
        assert_eq!(ts[4].project.as_deref(), Some("p1"));
    }

    #[test]
    fn id_falls_back_when_store_id_is_blank() {
        let t: Task = serde_json::from_str(r#"{"_id":"","id":"t2","name":"x"}"#).unwrap();
        assert_eq!(t.id, "t2");
    }

    #[test]
    fn bare_assignee_id_is_its_own_label() {
        let t = Task::new("a", "x").with_assignee(Assignee::Id("u42".into()));
        assert_eq!(t.assignee_label(), "u42");
    }

    #[test]
    fn priority_orders_high_first() {
        assert!(Priority::High < Priority::Medium);
        assert!(Priority::Medium < Priority::Low);
    }
}

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use tracing::warn;

/// Workflow stage of a task. Also identifies the board column it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    TodayAssigned,
    InProgress,
    InTest,
    Completed,
}

impl TaskStatus {
    /// Board order, left to right.
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::TodayAssigned,
        TaskStatus::InProgress,
        TaskStatus::InTest,
        TaskStatus::Completed,
    ];

    /// Matches a backend label, ignoring case, spaces, `-` and `_`.
    pub fn parse(raw: &str) -> Option<Self> {
        let key: String = raw
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "todayassigned" | "assigned" | "todo" => Some(Self::TodayAssigned),
            "inprogress" | "doing" => Some(Self::InProgress),
            "intest" | "testing" => Some(Self::InTest),
            "completed" | "done" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TodayAssigned => "Today Assigned",
            Self::InProgress => "In Progress",
            Self::InTest => "In Test",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Severity levels offered by the details view's "Change Status" panel.
/// Nothing writes these back to the backend yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Low,
    Normal,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Normal, Priority::Urgent];

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::Urgent => "Urgent",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Person {
    pub name: String,
    pub image: String,
}

/// `assignedTo` is a list of people in the task payload, but board cards
/// sometimes receive a ready-made display value instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignees {
    People(Vec<Person>),
    Display(String),
}

impl Default for Assignees {
    fn default() -> Self {
        Assignees::People(Vec::new())
    }
}

impl Assignees {
    pub fn people(&self) -> &[Person] {
        match self {
            Assignees::People(people) => people,
            Assignees::Display(_) => &[],
        }
    }

    pub fn display(&self) -> String {
        match self {
            Assignees::People(people) => people
                .iter()
                .map(|p| p.name.as_str())
                .filter(|name| !name.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            Assignees::Display(value) => value.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    pub user: String,
    pub user_image: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Task {
    pub id: Option<String>,
    pub name: String,
    pub status: Option<TaskStatus>,
    pub deadline: String,
    pub description: String,
    pub assigned_to: Assignees,
    pub assigned_by: Person,
    pub attachments: Vec<Attachment>,
    pub comments: Vec<Comment>,
    pub comments_count: Option<u64>,
}

// Every field is kept as a raw value so a wrong-typed field degrades to its
// default instead of failing the whole task.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawTask {
    #[serde(rename = "_id")]
    document_id: Value,
    id: Value,
    task_name: Value,
    task_status: Value,
    status: Value,
    deadline: Value,
    description: Value,
    assigned_to: Value,
    assigned_by: Value,
    attachments: Value,
    comments: Value,
    comments_count: Value,
}

impl Task {
    /// Decodes one task from the dashboard payload. Returns `None` only when
    /// the value is not a JSON object.
    pub fn from_value(value: &Value) -> Option<Task> {
        if !value.is_object() {
            return None;
        }
        let raw: RawTask = serde_json::from_value(value.clone()).ok()?;
        Some(Task::from(raw))
    }

    /// Stable identity used for card tinting.
    pub fn key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }

    pub fn comment_count(&self) -> u64 {
        self.comments_count.unwrap_or(self.comments.len() as u64)
    }

    pub fn status_label(&self) -> &'static str {
        self.status.map_or("-", TaskStatus::label)
    }

    pub fn is_completed(&self) -> bool {
        self.status == Some(TaskStatus::Completed)
    }

    pub fn deadline_date(&self) -> Option<NaiveDate> {
        let raw = self.deadline.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.date_naive()))
    }

    /// Deadline as a calendar date when it parses, otherwise the raw value.
    pub fn deadline_label(&self) -> String {
        match self.deadline_date() {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => self.deadline.clone(),
        }
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_completed() && self.deadline_date().is_some_and(|d| d < today)
    }
}

impl From<RawTask> for Task {
    fn from(raw: RawTask) -> Self {
        let name = text(&raw.task_name);
        let primary = opt_text(&raw.task_status).and_then(|s| TaskStatus::parse(&s));
        let secondary = opt_text(&raw.status).and_then(|s| TaskStatus::parse(&s));
        if let (Some(a), Some(b)) = (primary, secondary) {
            if a != b {
                warn!(
                    task = %name,
                    task_status = %a,
                    status = %b,
                    "conflicting status fields, using taskStatus"
                );
            }
        }

        Task {
            id: opt_text(&raw.document_id).or_else(|| opt_text(&raw.id)),
            status: primary.or(secondary),
            deadline: text(&raw.deadline),
            description: text(&raw.description),
            assigned_to: assignees(&raw.assigned_to),
            assigned_by: person(&raw.assigned_by).unwrap_or_default(),
            attachments: attachments(&raw.attachments),
            comments: comments(&raw.comments),
            comments_count: count(&raw.comments_count),
            name,
        }
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn opt_text(value: &Value) -> Option<String> {
    Some(text(value)).filter(|s| !s.is_empty())
}

fn count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn person(value: &Value) -> Option<Person> {
    match value {
        Value::Object(_) => Some(Person {
            name: text(&value["name"]),
            image: text(&value["image"]),
        }),
        Value::String(name) => Some(Person {
            name: name.clone(),
            image: String::new(),
        }),
        _ => None,
    }
}

fn assignees(value: &Value) -> Assignees {
    match value {
        Value::Array(items) => Assignees::People(items.iter().filter_map(person).collect()),
        Value::String(_) | Value::Number(_) => Assignees::Display(text(value)),
        Value::Object(_) => Assignees::People(person(value).into_iter().collect()),
        _ => Assignees::default(),
    }
}

fn file_name(url: &str) -> String {
    url.rsplit('/').next().unwrap_or(url).to_string()
}

// One attachment per array element. Entries without a usable name get a
// numbered placeholder.
fn attachments(value: &Value) -> Vec<Attachment> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let placeholder = || format!("attachment {}", i + 1);
            match item {
                Value::String(url) if !url.is_empty() => Attachment {
                    name: file_name(url),
                    url: Some(url.clone()),
                },
                Value::Object(_) => {
                    let url = ["url", "fileUrl", "path"]
                        .iter()
                        .find_map(|key| opt_text(&item[*key]));
                    let name = ["name", "fileName", "originalName", "filename"]
                        .iter()
                        .find_map(|key| opt_text(&item[*key]))
                        .or_else(|| url.as_deref().map(file_name))
                        .unwrap_or_else(placeholder);
                    Attachment { name, url }
                }
                other => {
                    warn!(index = i, value = %other, "attachment entry has no file reference");
                    Attachment {
                        name: placeholder(),
                        url: None,
                    }
                }
            }
        })
        .collect()
}

fn comments(value: &Value) -> Vec<Comment> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter(|item| {
            if !item.is_object() {
                warn!(value = %item, "dropping comment entry that is not an object");
            }
            item.is_object()
        })
        .map(|item| Comment {
            user: text(&item["user"]),
            user_image: text(&item["userImage"]),
            text: text(&item["text"]),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_full_task() {
        let task = Task::from_value(&json!({
            "_id": "t-1",
            "taskName": "Landing page",
            "taskStatus": "In Progress",
            "deadline": "2024-01-01",
            "description": "Hero section",
            "assignedTo": [{"name": "Ana", "image": "ana.png"}, {"name": "Bo", "image": "bo.png"}],
            "assignedBy": {"name": "Lead", "image": "lead.png"},
            "attachments": ["https://files.test/spec.pdf", {"fileName": "mock.fig"}],
            "comments": [{"user": "Ana", "userImage": "ana.png", "text": "on it"}],
            "commentsCount": 3
        }))
        .unwrap();

        assert_eq!(task.id.as_deref(), Some("t-1"));
        assert_eq!(task.name, "Landing page");
        assert_eq!(task.status, Some(TaskStatus::InProgress));
        assert_eq!(task.assigned_to.display(), "Ana, Bo");
        assert_eq!(task.assigned_by.name, "Lead");
        assert_eq!(task.attachments[0].name, "spec.pdf");
        assert_eq!(task.attachments[1].name, "mock.fig");
        assert_eq!(task.attachments[1].url, None);
        assert_eq!(task.comments[0].text, "on it");
        assert_eq!(task.comment_count(), 3);
    }

    #[test]
    fn missing_and_wrong_typed_fields_degrade_to_defaults() {
        let task = Task::from_value(&json!({
            "taskName": 42,
            "assignedBy": null,
            "attachments": "nope",
            "comments": [1, {"text": "hi"}],
            "commentsCount": "x"
        }))
        .unwrap();

        assert_eq!(task.name, "42");
        assert_eq!(task.status, None);
        assert_eq!(task.assigned_by, Person::default());
        assert!(task.attachments.is_empty());
        assert_eq!(task.comments.len(), 1);
        assert_eq!(task.comment_count(), 1);
        assert_eq!(task.assigned_to, Assignees::People(vec![]));
    }

    #[test]
    fn every_attachment_entry_is_counted() {
        let task = Task::from_value(&json!({"attachments": [{"_id": "f1"}]})).unwrap();
        assert_eq!(task.attachments.len(), 1);
        assert_eq!(task.attachments[0].name, "attachment 1");

        let task = Task::from_value(&json!({
            "attachments": [{"_id": "f1", "size": 10}, "", 5, {"url": "https://files.test/a/b.png"}]
        }))
        .unwrap();
        let names: Vec<&str> = task.attachments.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["attachment 1", "attachment 2", "attachment 3", "b.png"]);
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(Task::from_value(&json!("task")).is_none());
        assert!(Task::from_value(&json!(null)).is_none());
    }

    #[test]
    fn plain_assigned_to_is_kept_for_display() {
        let task = Task::from_value(&json!({"assignedTo": "Design crew"})).unwrap();
        assert_eq!(task.assigned_to.display(), "Design crew");
        assert!(task.assigned_to.people().is_empty());
    }

    #[test]
    fn task_status_wins_over_status() {
        let task =
            Task::from_value(&json!({"taskStatus": "Completed", "status": "In Test"})).unwrap();
        assert_eq!(task.status, Some(TaskStatus::Completed));

        let task = Task::from_value(&json!({"status": "in_test"})).unwrap();
        assert_eq!(task.status, Some(TaskStatus::InTest));

        let task = Task::from_value(&json!({"taskStatus": "Urgent", "status": "done"})).unwrap();
        assert_eq!(task.status, Some(TaskStatus::Completed));
    }

    #[test]
    fn status_labels_parse_loosely() {
        assert_eq!(TaskStatus::parse("IN-PROGRESS"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("Today Assigned"), Some(TaskStatus::TodayAssigned));
        assert_eq!(TaskStatus::parse("intest"), Some(TaskStatus::InTest));
        assert_eq!(TaskStatus::parse("Normal"), None);
    }

    #[test]
    fn deadline_parsing_and_overdue() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut task = Task {
            deadline: "2024-05-31T10:00:00Z".into(),
            ..Task::default()
        };
        assert_eq!(task.deadline_label(), "2024-05-31");
        assert!(task.is_overdue(today));

        task.status = Some(TaskStatus::Completed);
        assert!(!task.is_overdue(today));

        task.deadline = "next week".into();
        assert_eq!(task.deadline_label(), "next week");
        assert!(task.deadline_date().is_none());
    }

    #[test]
    fn key_prefers_id() {
        let mut task = Task {
            name: "X".into(),
            ..Task::default()
        };
        assert_eq!(task.key(), "X");
        task.id = Some("7".into());
        assert_eq!(task.key(), "7");
    }
}

use crate::task::{Task, TaskStatus};
use ratatui::style::Color;
use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;

/// Snapshot of one team lead's tasks, one list per workflow stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardPayload {
    pub today_assigned: Vec<Task>,
    pub in_progress: Vec<Task>,
    pub in_test: Vec<Task>,
    pub completed: Vec<Task>,
}

impl DashboardPayload {
    /// Decodes a `{ "message": { ... } }` response body. Only malformed JSON
    /// is an error; missing or mistyped parts decode as empty lists.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(body)?;
        Ok(Self::from_response(&value))
    }

    pub fn from_response(value: &Value) -> Self {
        match value.get("message") {
            Some(message) if message.is_object() => Self::from_message(message),
            Some(other) => {
                warn!(kind = kind_of(other), "dashboard message is not an object");
                Self::default()
            }
            None => Self::default(),
        }
    }

    fn from_message(message: &Value) -> Self {
        Self {
            today_assigned: tasks(message, "todayAssignedTasks", TaskStatus::TodayAssigned),
            in_progress: tasks(message, "inProgressTasks", TaskStatus::InProgress),
            in_test: tasks(message, "inTestTasks", TaskStatus::InTest),
            completed: tasks(message, "completedTasks", TaskStatus::Completed),
        }
    }

    pub fn tasks(&self, status: TaskStatus) -> &[Task] {
        match status {
            TaskStatus::TodayAssigned => &self.today_assigned,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::InTest => &self.in_test,
            TaskStatus::Completed => &self.completed,
        }
    }

    pub fn len(&self) -> usize {
        TaskStatus::ALL.iter().map(|s| self.tasks(*s).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn tasks(message: &Value, key: &str, column: TaskStatus) -> Vec<Task> {
    let items = match message.get(key) {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => return Vec::new(),
        Some(other) => {
            warn!(list = key, kind = kind_of(other), "task list is not an array");
            return Vec::new();
        }
    };

    items
        .iter()
        .filter_map(|item| {
            let Some(mut task) = Task::from_value(item) else {
                warn!(
                    list = key,
                    kind = kind_of(item),
                    "dropping task entry that is not an object"
                );
                return None;
            };
            task.status.get_or_insert(column);
            Some(task)
        })
        .collect()
}

/// Static description of one board column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub status: TaskStatus,
    pub title: &'static str,
    pub color: Color,
    pub path: &'static str,
}

pub static COLUMNS: [ColumnSpec; 4] = [
    ColumnSpec {
        status: TaskStatus::TodayAssigned,
        title: "TODAY ASSIGNED",
        color: Color::Green,
        path: "today-assigned",
    },
    ColumnSpec {
        status: TaskStatus::InProgress,
        title: "IN PROGRESS",
        color: Color::Yellow,
        path: "in-progress",
    },
    ColumnSpec {
        status: TaskStatus::InTest,
        title: "IN TEST",
        color: Color::Red,
        path: "in-test",
    },
    ColumnSpec {
        status: TaskStatus::Completed,
        title: "COMPLETED",
        color: Color::Rgb(0, 128, 128),
        path: "completed",
    },
];

/// A column as rendered: its spec plus the tasks that pass the filter.
#[derive(Debug, Clone)]
pub struct Column<'a> {
    pub spec: &'static ColumnSpec,
    pub tasks: Vec<&'a Task>,
}

/// Partitions the payload into the four board columns. `filter` keeps only
/// tasks whose name equals it; `None` or an empty label keeps everything.
pub fn columns<'a>(payload: &'a DashboardPayload, filter: Option<&str>) -> Vec<Column<'a>> {
    let filter = filter.filter(|label| !label.is_empty());
    COLUMNS
        .iter()
        .map(|spec| Column {
            spec,
            tasks: payload
                .tasks(spec.status)
                .iter()
                .filter(|task| filter.map_or(true, |label| task.name == label))
                .collect(),
        })
        .collect()
}

/// Distinct task names for the filter menu, first-seen order.
pub fn labels(payload: &DashboardPayload) -> Vec<String> {
    let mut seen = HashSet::new();
    [
        &payload.in_test,
        &payload.in_progress,
        &payload.completed,
        &payload.today_assigned,
    ]
    .into_iter()
    .flatten()
    .map(|task| task.name.as_str())
    .filter(|name| !name.is_empty() && seen.insert(*name))
    .map(str::to_string)
    .collect()
}

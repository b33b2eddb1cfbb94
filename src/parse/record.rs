use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::epic::{Epic, EpicPool};
use crate::model::task::{Task, TaskComment, TaskStatus, normalize_labels};

/// Format used for every timestamp written to disk (ISO-8601, no offset).
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Format used for deadlines.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Error type for converting stored records into tasks
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("task {task} refers to unknown epic {epic}")]
    UnknownEpic { task: String, epic: String },
}

/// Plain stored form of a task, as found under its id in tasks.yaml.
///
/// Field order is the order keys are written. Optional fields are left out
/// when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    /// Space-separated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epic: Option<String>,
    #[serde(default)]
    pub desc: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<CommentRecord>,
}

/// Stored form of a comment. Entries missing either key are skipped on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Stored form of an epic, as found under its id in epics.yaml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpicRecord {
    #[serde(default)]
    pub name: String,
}

/// Whole tasks.yaml document
pub type TaskFile = IndexMap<String, TaskRecord>;

/// Whole epics.yaml document
pub type EpicFile = IndexMap<String, EpicRecord>;

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

pub fn format_date(d: &NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

/// Parse an ISO-8601 timestamp, accepting a space instead of `T` and a bare
/// date (midnight). Returns `None` for anything else.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

// ---------------------------------------------------------------------------
// Task <-> record
// ---------------------------------------------------------------------------

impl TaskRecord {
    /// Build the stored form of `task`.
    pub fn from_task(task: &Task) -> Self {
        TaskRecord {
            status: task.status,
            created: Some(format_datetime(&task.created)),
            closed: task.closed.as_ref().map(format_datetime),
            deadline: task.deadline.as_ref().map(format_date),
            labels: if task.labels.is_empty() {
                None
            } else {
                Some(task.labels.join(" "))
            },
            epic: task.epic.clone(),
            desc: task.full_desc(),
            comments: task
                .comments
                .iter()
                .map(|c| CommentRecord {
                    date: Some(format_datetime(&c.date)),
                    text: Some(c.text.clone()),
                })
                .collect(),
        }
    }

    /// Build a task from its stored form.
    ///
    /// Missing keys keep the defaults of a fresh task; unreadable dates are
    /// ignored. An epic id absent from `epics` is an error: the caller decides
    /// whether to drop the reference or give up.
    pub fn to_task(&self, id: &str, epics: &EpicPool) -> Result<Task, RecordError> {
        let mut task = Task::with_id(id);
        task.status = self.status;
        task.set_full_desc(&self.desc);

        if let Some(epic) = &self.epic {
            if !epics.contains(epic) {
                return Err(RecordError::UnknownEpic {
                    task: id.to_string(),
                    epic: epic.clone(),
                });
            }
            task.epic = Some(epic.clone());
        }

        for c in &self.comments {
            if let (Some(text), Some(date)) = (&c.text, c.date.as_deref().and_then(parse_datetime))
            {
                task.comments.push(TaskComment {
                    date,
                    text: text.clone(),
                });
            }
        }

        if let Some(labels) = &self.labels {
            task.labels = normalize_labels(labels.split_whitespace());
        }
        if let Some(created) = self.created.as_deref().and_then(parse_datetime) {
            task.created = created;
        }
        task.closed = self.closed.as_deref().and_then(parse_datetime);
        task.deadline = self.deadline.as_deref().and_then(parse_date);

        Ok(task)
    }
}

impl EpicRecord {
    pub fn to_epic(&self, id: &str) -> Epic {
        Epic::new(id, self.name.clone())
    }
}

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task identifiers are short base-36 strings derived from creation time.
pub type TaskId = String;

/// Seconds from the Unix epoch to 2022-01-01T00:00:00Z, the id clock origin.
const ID_EPOCH_SECS: i64 = 1_640_995_200;

/// Maximum length of a generated id. Ids wrap roughly every 24 years.
pub const ID_WIDTH: usize = 7;

const ID_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Lifecycle status of a task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Active,
    Done,
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Active => "active",
            TaskStatus::Done => "done",
            TaskStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A timestamped comment on a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskComment {
    pub date: NaiveDateTime,
    pub text: String,
}

impl TaskComment {
    pub fn new(text: impl Into<String>) -> Self {
        TaskComment {
            date: now(),
            text: text.into(),
        }
    }
}

/// A single task on the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub status: TaskStatus,
    /// First line of the description, shown in the list
    pub summary: String,
    /// Everything after the first line break, if there was one
    pub desc: Option<String>,
    pub comments: Vec<TaskComment>,
    pub deadline: Option<NaiveDate>,
    /// Id of the epic this task belongs to (resolved through the epic pool)
    pub epic: Option<String>,
    /// Sorted, without duplicates
    pub labels: Vec<String>,
    pub created: NaiveDateTime,
    pub closed: Option<NaiveDateTime>,
}

impl Task {
    /// Create an active task with an id generated from the current time.
    pub fn new(summary: &str, desc: &str) -> Self {
        let mut task = Task::with_id(generate_id(Utc::now()));
        task.summary = summary.to_string();
        task.desc = if desc.is_empty() {
            None
        } else {
            Some(desc.to_string())
        };
        task
    }

    /// Create an empty active task with the given id.
    pub fn with_id(id: impl Into<TaskId>) -> Self {
        Task {
            id: id.into(),
            status: TaskStatus::Active,
            summary: String::new(),
            desc: None,
            comments: Vec::new(),
            deadline: None,
            epic: None,
            labels: Vec::new(),
            created: now(),
            closed: None,
        }
    }

    /// Override the id with the encoding of `num`. Meant for tests and
    /// debugging; regular tasks keep their generated id.
    pub fn set_numeric_id(&mut self, num: i64) -> &str {
        self.id = encode_id(num);
        &self.id
    }

    /// Summary and body joined by a line break.
    pub fn full_desc(&self) -> String {
        match &self.desc {
            Some(desc) => format!("{}\n{}", self.summary, desc),
            None => self.summary.clone(),
        }
    }

    /// Split `text` at its first line break into summary and body.
    pub fn set_full_desc(&mut self, text: &str) {
        match text.split_once('\n') {
            Some((summary, desc)) => {
                self.summary = summary.to_string();
                self.desc = Some(desc.to_string());
            }
            None => {
                self.summary = text.to_string();
                self.desc = None;
            }
        }
    }

    /// Text searched by filters: summary and body, comments excluded.
    pub fn search_text(&self) -> String {
        format!("{}\n{}", self.summary, self.desc.as_deref().unwrap_or(""))
    }

    /// Change status, maintaining the close date. No-op if unchanged.
    pub fn set_status(&mut self, status: TaskStatus) {
        if self.status == status {
            return;
        }
        if status == TaskStatus::Active {
            self.closed = None;
        } else {
            self.closed = Some(now());
        }
        self.status = status;
    }

    /// Replace labels, normalizing to a sorted unique list.
    pub fn set_labels<I, S>(&mut self, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = normalize_labels(labels);
    }

    pub fn add_comment(&mut self, text: impl Into<String>) {
        self.comments.push(TaskComment::new(text));
    }

    pub fn is_active(&self) -> bool {
        self.status == TaskStatus::Active
    }
}

/// Sort and dedup a label list, dropping blanks.
pub fn normalize_labels<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = labels
        .into_iter()
        .map(Into::into)
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}

/// Local wall-clock time without offset, the form stored on disk.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Centiseconds elapsed since the id epoch.
pub fn id_number(at: DateTime<Utc>) -> i64 {
    (at.timestamp_millis() - ID_EPOCH_SECS * 1000).div_euclid(10)
}

/// Generate an id from centiseconds elapsed since the id epoch.
pub fn generate_id(at: DateTime<Utc>) -> TaskId {
    encode_id(id_number(at))
}

/// Base-36 encode `num`, keeping at most the lowest `ID_WIDTH` digits.
/// Negative values come out in 36's complement, always `ID_WIDTH` wide.
pub fn encode_id(mut num: i64) -> TaskId {
    let mut digits: Vec<char> = Vec::with_capacity(ID_WIDTH);
    while (num != 0 || digits.is_empty()) && digits.len() < ID_WIDTH {
        digits.push(ID_DIGITS[num.rem_euclid(36) as usize] as char);
        num = num.div_euclid(36);
    }
    digits.iter().rev().collect()
}

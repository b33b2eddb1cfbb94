use chrono::{DateTime, NaiveDate, Utc};

use crate::model::epic::EpicPool;
use crate::model::pool::TaskPool;
use crate::model::task::{Task, TaskId, encode_id, id_number};
use crate::parse::record::parse_date;

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("task id prefix {prefix} matches {count} tasks")]
    Ambiguous { prefix: String, count: usize },
    #[error("unknown epic: {0}")]
    UnknownEpic(String),
    #[error("invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("task summary is empty")]
    EmptySummary,
    #[error("row {row} is outside the {list} list ({rows} rows)")]
    InvalidRow {
        list: &'static str,
        row: usize,
        rows: usize,
    },
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Resolve a task id typed by a user: an exact id, or a prefix matching
/// exactly one task.
pub fn resolve_id(pool: &TaskPool, query: &str) -> Result<TaskId, TaskError> {
    if pool.contains(query) {
        return Ok(query.to_string());
    }
    let matches: Vec<&TaskId> = pool.ids().filter(|id| id.starts_with(query)).collect();
    match matches.as_slice() {
        [id] => Ok((*id).clone()),
        [] => Err(TaskError::NotFound(query.to_string())),
        _ => Err(TaskError::Ambiguous {
            prefix: query.to_string(),
            count: matches.len(),
        }),
    }
}

pub fn find_task<'a>(pool: &'a TaskPool, id: &str) -> Result<&'a Task, TaskError> {
    pool.get(id).ok_or_else(|| TaskError::NotFound(id.to_string()))
}

pub fn find_task_mut<'a>(pool: &'a mut TaskPool, id: &str) -> Result<&'a mut Task, TaskError> {
    pool.get_mut(id)
        .ok_or_else(|| TaskError::NotFound(id.to_string()))
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// First id at or after `at` that no task in `pool` uses yet.
pub fn next_free_id(pool: &TaskPool, at: DateTime<Utc>) -> TaskId {
    let mut num = id_number(at);
    loop {
        let id = encode_id(num);
        if !pool.contains(&id) {
            return id;
        }
        num += 1;
    }
}

/// Create an active task from its full description and add it to the pool.
pub fn create_task(pool: &mut TaskPool, text: &str) -> Result<TaskId, TaskError> {
    if text.trim().is_empty() {
        return Err(TaskError::EmptySummary);
    }
    let mut task = Task::with_id(next_free_id(pool, Utc::now()));
    task.set_full_desc(text);
    let id = task.id.clone();
    pool.insert(task);
    Ok(id)
}

// ---------------------------------------------------------------------------
// Edits
// ---------------------------------------------------------------------------

/// Point the task at `epic`, or clear it with `None`. The epic must exist.
pub fn set_epic(task: &mut Task, epic: Option<&str>, epics: &EpicPool) -> Result<(), TaskError> {
    match epic {
        Some(id) if !epics.contains(id) => Err(TaskError::UnknownEpic(id.to_string())),
        Some(id) => {
            task.epic = Some(id.to_string());
            Ok(())
        }
        None => {
            task.epic = None;
            Ok(())
        }
    }
}

pub fn parse_deadline(s: &str) -> Result<NaiveDate, TaskError> {
    parse_date(s.trim()).ok_or_else(|| TaskError::InvalidDate(s.to_string()))
}

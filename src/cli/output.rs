use serde::Serialize;

use crate::model::epic::{EpicChoice, EpicPool};
use crate::model::task::{Task, TaskStatus};
use crate::parse::record::{format_date, format_datetime};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub status: TaskStatus,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    pub created: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<CommentJson>,
}

#[derive(Serialize)]
pub struct CommentJson {
    pub date: String,
    pub text: String,
}

#[derive(Serialize)]
pub struct TaskListJson {
    pub board: String,
    pub list: String,
    pub tasks: Vec<RowJson>,
}

#[derive(Serialize)]
pub struct RowJson {
    pub row: usize,
    #[serde(flatten)]
    pub task: TaskJson,
}

#[derive(Serialize)]
pub struct EpicJson {
    pub id: String,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id.clone(),
        status: task.status,
        summary: task.summary.clone(),
        desc: task.desc.clone(),
        labels: task.labels.clone(),
        epic: task.epic.clone(),
        deadline: task.deadline.as_ref().map(format_date),
        created: format_datetime(&task.created),
        closed: task.closed.as_ref().map(format_datetime),
        comments: task
            .comments
            .iter()
            .map(|c| CommentJson {
                date: format_datetime(&c.date),
                text: c.text.clone(),
            })
            .collect(),
    }
}

/// Epics in chooser order, without the "no epic" entry.
pub fn epics_to_json(epics: &EpicPool) -> Vec<EpicJson> {
    epics
        .choices()
        .into_iter()
        .filter_map(|EpicChoice { id, name }| id.map(|id| EpicJson { id, name }))
        .collect()
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn status_char(status: TaskStatus) -> char {
    match status {
        TaskStatus::Active => ' ',
        TaskStatus::Done => 'x',
        TaskStatus::Cancelled => '-',
    }
}

/// One-line summary: `  3 [x] k2f9a0c Paint the fence #home (garden) due 2024-05-01`
pub fn format_task_line(row: usize, task: &Task) -> String {
    let mut line = format!(
        "{:>3} [{}] {} {}",
        row,
        status_char(task.status),
        task.id,
        task.summary
    );
    for label in &task.labels {
        line.push_str(&format!(" #{}", label));
    }
    if let Some(epic) = &task.epic {
        line.push_str(&format!(" ({})", epic));
    }
    if let Some(deadline) = &task.deadline {
        line.push_str(&format!(" due {}", format_date(deadline)));
    }
    line
}

/// Detailed task view
pub fn format_task_detail(task: &Task, epics: &EpicPool) -> Vec<String> {
    let mut lines = vec![
        format!("[{}] {} {}", status_char(task.status), task.id, task.summary),
        format!("  status: {}", task.status),
        format!("  created: {}", format_datetime(&task.created)),
    ];

    if let Some(closed) = &task.closed {
        lines.push(format!("  closed: {}", format_datetime(closed)));
    }
    if let Some(deadline) = &task.deadline {
        lines.push(format!("  deadline: {}", format_date(deadline)));
    }
    if let Some(epic) = &task.epic {
        let name = epics.get(epic).map(|e| e.name.as_str()).unwrap_or("?");
        lines.push(format!("  epic: {} ({})", name, epic));
    }
    if !task.labels.is_empty() {
        lines.push(format!("  labels: {}", task.labels.join(" ")));
    }
    if let Some(desc) = &task.desc {
        lines.push(String::new());
        lines.extend(desc.lines().map(|l| format!("  {}", l)));
    }
    if !task.comments.is_empty() {
        lines.push(String::new());
        for c in &task.comments {
            lines.push(format!("  {} {}", format_datetime(&c.date), c.text));
        }
    }
    lines
}

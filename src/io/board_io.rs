use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::io::recovery::{
    RecoveryCategory, RecoveryEntry, log_recovery, log_write_failure, replace_file,
};
use crate::model::config::{BoardConfig, OrphanPolicy, UnknownEpicPolicy};
use crate::model::epic::{Epic, EpicPool};
use crate::model::pool::{Board, TaskPool};
use crate::model::task::TaskId;
use crate::parse::record::{EpicFile, EpicRecord, RecordError, TaskFile, TaskRecord};

pub const TASKS_FILE: &str = "tasks.yaml";
pub const ACTIVE_FILE: &str = "active.txt";
pub const EPICS_FILE: &str = "epics.yaml";
pub const CONFIG_FILE: &str = "board.toml";

/// Error type for board I/O operations
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("not a board: no tasks.yaml in {} or its subdirectories", .0.display())]
    NotABoard(PathBuf),
    #[error("could not read {}: {source}", path.display())]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {}: {source}", path.display())]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not parse {}: {source}", path.display())]
    YamlError {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("could not serialize {file}: {source}")]
    SerializeError {
        file: &'static str,
        source: serde_yaml::Error,
    },
    #[error("could not parse board.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("could not serialize board.toml: {0}")]
    ConfigSerializeError(#[from] toml::ser::Error),
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error("io error: {0}")]
    IoError(#[from] io::Error),
}

/// A board as read from disk, with the initial order of both lists.
#[derive(Debug, Default)]
pub struct LoadedBoard {
    pub board: Board,
    pub active: Vec<TaskId>,
    pub done: Vec<TaskId>,
}

fn is_board(dir: &Path) -> bool {
    dir.join(TASKS_FILE).is_file()
}

/// Find the board for `start`: the directory itself if it holds a task file,
/// else the first subdirectory (by name) that does.
pub fn discover_board(start: &Path) -> Result<PathBuf, BoardError> {
    if is_board(start) {
        return Ok(start.to_path_buf());
    }

    let entries = fs::read_dir(start).map_err(|e| BoardError::ReadError {
        path: start.to_path_buf(),
        source: e,
    })?;
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();

    dirs.into_iter()
        .find(|d| is_board(d))
        .ok_or_else(|| BoardError::NotABoard(start.to_path_buf()))
}

fn read_optional(path: &Path) -> Result<Option<String>, BoardError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(BoardError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn parse_yaml<T>(path: &Path, text: &str) -> Result<T, BoardError>
where
    T: serde::de::DeserializeOwned + Default,
{
    if text.trim().is_empty() {
        return Ok(T::default());
    }
    serde_yaml::from_str(text).map_err(|e| BoardError::YamlError {
        path: path.to_path_buf(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

pub fn load_epics(dir: &Path) -> Result<EpicPool, BoardError> {
    let path = dir.join(EPICS_FILE);
    let Some(text) = read_optional(&path)? else {
        return Ok(EpicPool::new());
    };
    let file: EpicFile = parse_yaml(&path, &text)?;
    let mut pool = EpicPool::new();
    for (id, record) in &file {
        pool.insert(record.to_epic(id));
    }
    Ok(pool)
}

fn load_tasks(
    dir: &Path,
    epics: &EpicPool,
    config: &BoardConfig,
) -> Result<TaskPool, BoardError> {
    let path = dir.join(TASKS_FILE);
    let text = fs::read_to_string(&path).map_err(|e| BoardError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    let file: TaskFile = parse_yaml(&path, &text)?;

    let mut pool = TaskPool::new();
    for (id, record) in &file {
        let task = match record.to_task(id, epics) {
            Ok(task) => task,
            Err(RecordError::UnknownEpic { task, epic })
                if config.load.unknown_epic == UnknownEpicPolicy::Clear =>
            {
                warn!(task = %task, epic = %epic, "unknown epic, cleared");
                log_recovery(
                    dir,
                    RecoveryEntry::new(RecoveryCategory::Load, "unknown epic cleared")
                        .field("Task", &task)
                        .field("Epic", &epic),
                );
                let cleared = TaskRecord {
                    epic: None,
                    ..record.clone()
                };
                cleared.to_task(id, epics)?
            }
            Err(e) => return Err(e.into()),
        };
        pool.insert(task);
    }
    Ok(pool)
}

fn load_active_ids(dir: &Path) -> Result<Vec<String>, BoardError> {
    let path = dir.join(ACTIVE_FILE);
    let Some(text) = read_optional(&path)? else {
        debug!(path = %path.display(), "no active list file");
        return Ok(Vec::new());
    };
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Load the board in `dir`.
///
/// The active list follows `active.txt`; ids without a task are skipped.
/// Active tasks missing from `active.txt` are handled per
/// `config.load.orphaned_active`. Every other task goes to the done list.
pub fn load_board(dir: &Path, config: &BoardConfig) -> Result<LoadedBoard, BoardError> {
    let epics = load_epics(dir)?;
    let tasks = load_tasks(dir, &epics, config)?;

    let mut placed: HashSet<TaskId> = HashSet::new();
    let mut active = Vec::new();
    for id in load_active_ids(dir)? {
        let Some(task) = tasks.get(&id) else {
            warn!(id = %id, "active list names a missing task, skipped");
            continue;
        };
        if !placed.insert(id.clone()) {
            warn!(id = %id, "task listed twice in active list, skipped");
            continue;
        }
        if !task.is_active() {
            warn!(id = %id, status = %task.status, "closed task in active list");
        }
        active.push(id);
    }

    let orphans: Vec<TaskId> = tasks
        .iter()
        .filter(|t| t.is_active() && !placed.contains(&t.id))
        .map(|t| t.id.clone())
        .collect();
    for id in orphans {
        match config.load.orphaned_active {
            OrphanPolicy::Append => {
                warn!(id = %id, "active task missing from active list, appended");
                placed.insert(id.clone());
                active.push(id);
            }
            OrphanPolicy::Drop => {
                warn!(id = %id, "active task missing from active list, not shown");
            }
        }
    }

    let mut done: Vec<&crate::model::task::Task> = tasks
        .iter()
        .filter(|t| !t.is_active() && !placed.contains(&t.id))
        .collect();
    if config.done.newest_first {
        // stable: equal close dates keep pool order
        done.sort_by(|a, b| b.closed.cmp(&a.closed));
    }
    let done = done.into_iter().map(|t| t.id.clone()).collect();

    let name = config.board.name.clone().unwrap_or_else(|| board_name(dir));

    Ok(LoadedBoard {
        board: Board { name, tasks, epics },
        active,
        done,
    })
}

/// Display name for the board in `dir`: its directory name.
pub fn board_name(dir: &Path) -> String {
    dir.canonicalize()
        .ok()
        .as_deref()
        .unwrap_or(dir)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "board".to_string())
}

// ---------------------------------------------------------------------------
// Save
// ---------------------------------------------------------------------------

fn write_file(dir: &Path, name: &str, content: &[u8]) -> Result<(), BoardError> {
    let path = dir.join(name);
    replace_file(&path, content).map_err(|e| {
        warn!(path = %path.display(), error = %e, "save failed");
        log_write_failure(dir, &path, &e, content);
        BoardError::WriteError { path, source: e }
    })
}

/// Save the whole task pool, then the active order.
///
/// Each file is replaced atomically. The pair is not: if the second write
/// fails, the pool is already updated and the old order file stays.
pub fn save_board<'a, I>(dir: &Path, tasks: &TaskPool, active: I) -> Result<(), BoardError>
where
    I: IntoIterator<Item = &'a TaskId>,
{
    fs::create_dir_all(dir).map_err(|e| BoardError::WriteError {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let file: TaskFile = tasks
        .iter()
        .map(|t| (t.id.clone(), TaskRecord::from_task(t)))
        .collect();
    let yaml = serde_yaml::to_string(&file).map_err(|e| BoardError::SerializeError {
        file: TASKS_FILE,
        source: e,
    })?;
    write_file(dir, TASKS_FILE, yaml.as_bytes())?;

    let mut index = String::new();
    for id in active {
        index.push_str(id);
        index.push('\n');
    }
    write_file(dir, ACTIVE_FILE, index.as_bytes())?;

    debug!(dir = %dir.display(), tasks = tasks.len(), "board saved");
    Ok(())
}

pub fn save_epics(dir: &Path, epics: &EpicPool) -> Result<(), BoardError> {
    let file: EpicFile = epics
        .iter()
        .map(|e: &Epic| {
            (
                e.id.clone(),
                EpicRecord {
                    name: e.name.clone(),
                },
            )
        })
        .collect();
    let yaml = serde_yaml::to_string(&file).map_err(|e| BoardError::SerializeError {
        file: EPICS_FILE,
        source: e,
    })?;
    write_file(dir, EPICS_FILE, yaml.as_bytes())
}

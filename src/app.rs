use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::grid::{
    Close, DragError, DragOutcome, DragSession, ListKind, Reopen, TableError, TaskGrid,
};
use crate::io::board_io::{
    self, BoardError, LoadedBoard, TASKS_FILE, load_board, save_board, save_epics,
};
use crate::io::config_io::{read_config, write_config};
use crate::model::config::BoardConfig;
use crate::model::epic::EpicPool;
use crate::model::pool::{Board, TaskPool};
use crate::model::task::{Task, TaskId, TaskStatus};
use crate::ops::filter::TaskFilter;
use crate::ops::task_ops::{self, TaskError};

/// Error type for board-level operations
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error(transparent)]
    Drag(#[from] DragError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("a board already exists in {}", .0.display())]
    AlreadyABoard(PathBuf),
}

/// One open board: the task pool plus the active and completed lists.
#[derive(Debug)]
pub struct App {
    dir: PathBuf,
    config: BoardConfig,
    board: Board,
    active: TaskGrid,
    done: TaskGrid,
}

impl App {
    /// Open the board in `dir` (or the first board under it).
    pub fn open(dir: &Path) -> Result<App, AppError> {
        let dir = board_io::discover_board(dir)?;
        let config = read_config(&dir)?;
        let loaded = load_board(&dir, &config)?;
        Ok(App::from_loaded(dir, config, loaded))
    }

    /// Create an empty board in `dir`.
    pub fn init(dir: &Path, name: Option<String>) -> Result<App, AppError> {
        if dir.join(TASKS_FILE).exists() {
            return Err(AppError::AlreadyABoard(dir.to_path_buf()));
        }
        fs::create_dir_all(dir).map_err(|e| BoardError::WriteError {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let mut config = read_config(dir)?;
        if name.is_some() {
            config.board.name = name;
        }
        write_config(dir, &config)?;
        save_board(dir, &TaskPool::new(), std::iter::empty())?;
        info!(dir = %dir.display(), "board created");

        let loaded = load_board(dir, &config)?;
        Ok(App::from_loaded(dir.to_path_buf(), config, loaded))
    }

    fn from_loaded(dir: PathBuf, config: BoardConfig, loaded: LoadedBoard) -> App {
        let LoadedBoard {
            board,
            active,
            done,
        } = loaded;
        let mut app = App {
            dir,
            config,
            board,
            active: TaskGrid::new(ListKind::Active, Reopen),
            done: TaskGrid::new(ListKind::Done, Close),
        };
        app.active.load(active, &app.board.tasks);
        app.done.load(done, &app.board.tasks);
        debug!(
            board = %app.board.name,
            active = app.active.rows(),
            done = app.done.rows(),
            "board opened"
        );
        app
    }

    /// Write the task pool and the active order.
    pub fn save(&self) -> Result<(), AppError> {
        save_board(&self.dir, &self.board.tasks, self.active.table().backing_ids())?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.board.name
    }

    pub fn tasks(&self) -> &TaskPool {
        &self.board.tasks
    }

    pub fn epics(&self) -> &EpicPool {
        &self.board.epics
    }

    pub fn grid(&self, kind: ListKind) -> &TaskGrid {
        match kind {
            ListKind::Active => &self.active,
            ListKind::Done => &self.done,
        }
    }

    /// A list together with the pool, for driving drags from outside.
    pub fn grid_mut(&mut self, kind: ListKind) -> (&mut TaskGrid, &mut TaskPool) {
        let grid = match kind {
            ListKind::Active => &mut self.active,
            ListKind::Done => &mut self.done,
        };
        (grid, &mut self.board.tasks)
    }

    /// Resolve a typed id (or unique prefix) to a task id.
    pub fn resolve(&self, query: &str) -> Result<TaskId, AppError> {
        Ok(task_ops::resolve_id(&self.board.tasks, query)?)
    }

    pub fn task(&self, id: &str) -> Result<&Task, AppError> {
        Ok(task_ops::find_task(&self.board.tasks, id)?)
    }

    fn task_mut(&mut self, id: &str) -> Result<&mut Task, AppError> {
        Ok(task_ops::find_task_mut(&mut self.board.tasks, id)?)
    }

    /// Which list holds `id`.
    pub fn list_of(&self, id: &str) -> Option<ListKind> {
        if self.active.contains(id) {
            Some(ListKind::Active)
        } else if self.done.contains(id) {
            Some(ListKind::Done)
        } else {
            None
        }
    }

    // -----------------------------------------------------------------------
    // Board operations
    // -----------------------------------------------------------------------

    /// Create a task from `text` and show it at `row` of the active list.
    pub fn new_task(&mut self, row: usize, text: &str) -> Result<TaskId, AppError> {
        let rows = self.active.task_rows();
        if row > rows {
            return Err(TaskError::InvalidRow {
                list: "active",
                row,
                rows,
            }
            .into());
        }
        let id = task_ops::create_task(&mut self.board.tasks, text)?;
        self.active
            .insert_dropped(row, std::slice::from_ref(&id), &mut self.board.tasks)?;
        debug!(id = %id, row, "task created");
        Ok(id)
    }

    /// Close a task as done or cancelled. An active task moves to the top of
    /// the completed list; a closed one only changes status.
    pub fn complete(&mut self, id: &str, status: TaskStatus) -> Result<(), AppError> {
        if status == TaskStatus::Active {
            return self.reopen(id);
        }
        self.task_mut(id)?.set_status(status);
        if self.active.remove_task(id) || !self.done.contains(id) {
            self.done
                .insert_dropped(0, &[id.to_string()], &mut self.board.tasks)?;
        }
        Ok(())
    }

    /// Make a task active again, at the top of the active list.
    pub fn reopen(&mut self, id: &str) -> Result<(), AppError> {
        self.task_mut(id)?.set_status(TaskStatus::Active);
        if self.done.remove_task(id) || !self.active.contains(id) {
            self.active
                .insert_dropped(0, &[id.to_string()], &mut self.board.tasks)?;
        }
        Ok(())
    }

    /// Move a task to row `to` of its own list, by dragging it there.
    pub fn move_task(&mut self, id: &str, to: usize) -> Result<(), AppError> {
        let kind = self
            .list_of(id)
            .ok_or_else(|| TaskError::NotFound(id.to_string()))?;
        let (grid, pool) = self.grid_mut(kind);
        let rows = grid.task_rows();
        let from = grid
            .row_of(id)
            .ok_or_else(|| TaskError::NotFound(id.to_string()))?;
        if to >= rows {
            return Err(TaskError::InvalidRow {
                list: match kind {
                    ListKind::Active => "active",
                    ListKind::Done => "done",
                },
                row: to,
                rows,
            }
            .into());
        }
        if to == from {
            return Ok(());
        }

        // Dropping before row r of the unchanged list lands the task at r,
        // or at r - 1 when it came from above.
        let drop_row = if to > from { to + 1 } else { to };
        grid.select(vec![from..from + 1]);
        let mut drag = DragSession::begin(grid)?;
        let payload = drag.payload().to_vec();
        drag.drop(grid, drop_row, &payload, pool)?;
        drag.end(grid, DragOutcome::Move)?;
        grid.clear_selection();
        Ok(())
    }

    /// Apply one filter query to both lists.
    pub fn set_filter(&mut self, query: &str) {
        let filter = TaskFilter::new(query);
        self.active.filter(filter.clone(), &self.board.tasks);
        self.done.filter(filter, &self.board.tasks);
    }

    // -----------------------------------------------------------------------
    // Task edits
    // -----------------------------------------------------------------------

    pub fn set_full_desc(&mut self, id: &str, text: &str) -> Result<(), AppError> {
        if text.trim().is_empty() {
            return Err(TaskError::EmptySummary.into());
        }
        self.task_mut(id)?.set_full_desc(text);
        Ok(())
    }

    pub fn add_comment(&mut self, id: &str, text: &str) -> Result<(), AppError> {
        self.task_mut(id)?.add_comment(text);
        Ok(())
    }

    pub fn set_labels<I, S>(&mut self, id: &str, labels: I) -> Result<(), AppError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.task_mut(id)?.set_labels(labels);
        Ok(())
    }

    pub fn set_deadline(&mut self, id: &str, deadline: Option<NaiveDate>) -> Result<(), AppError> {
        self.task_mut(id)?.deadline = deadline;
        Ok(())
    }

    pub fn set_epic(&mut self, id: &str, epic: Option<&str>) -> Result<(), AppError> {
        let task = task_ops::find_task_mut(&mut self.board.tasks, id)?;
        task_ops::set_epic(task, epic, &self.board.epics)?;
        Ok(())
    }

    /// Add an epic named `name` and save the epic file. Returns its id.
    pub fn add_epic(&mut self, name: &str) -> Result<String, AppError> {
        let id = self.board.epics.add_named(name);
        save_epics(&self.dir, &self.board.epics)?;
        Ok(id)
    }
}

use indexmap::IndexMap;

use super::epic::EpicPool;
use super::task::{Task, TaskId};

/// Board-wide task store, keyed by task id in insertion (file) order.
///
/// Task lists never own tasks: they hold ids and resolve them here.
#[derive(Debug, Clone, Default)]
pub struct TaskPool {
    tasks: IndexMap<TaskId, Task>,
}

impl TaskPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tasks.contains_key(id)
    }

    /// Insert a task, replacing any task with the same id.
    pub fn insert(&mut self, task: Task) -> Option<Task> {
        self.tasks.insert(task.id.clone(), task)
    }

    pub fn remove(&mut self, id: &str) -> Option<Task> {
        self.tasks.shift_remove(id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &TaskId> {
        self.tasks.keys()
    }
}

impl FromIterator<Task> for TaskPool {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        let mut pool = TaskPool::new();
        for task in iter {
            pool.insert(task);
        }
        pool
    }
}

/// Everything one board holds in memory
#[derive(Debug, Clone, Default)]
pub struct Board {
    /// Display name (from board.toml or the directory name)
    pub name: String,
    pub tasks: TaskPool,
    pub epics: EpicPool,
}

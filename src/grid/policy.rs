use crate::model::task::{Task, TaskStatus};

/// Adjusts tasks as they are dropped into a particular list.
pub trait DropPolicy {
    fn prepare(&self, task: &mut Task);
}

impl<F> DropPolicy for F
where
    F: Fn(&mut Task),
{
    fn prepare(&self, task: &mut Task) {
        self(task)
    }
}

/// Leaves dropped tasks untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepStatus;

impl DropPolicy for KeepStatus {
    fn prepare(&self, _task: &mut Task) {}
}

/// Active list: everything dropped here becomes active again.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reopen;

impl DropPolicy for Reopen {
    fn prepare(&self, task: &mut Task) {
        task.set_status(TaskStatus::Active);
    }
}

/// Completed list: active tasks become done; cancelled ones stay cancelled.
#[derive(Debug, Clone, Copy, Default)]
pub struct Close;

impl DropPolicy for Close {
    fn prepare(&self, task: &mut Task) {
        if task.status == TaskStatus::Active {
            task.set_status(TaskStatus::Done);
        }
    }
}

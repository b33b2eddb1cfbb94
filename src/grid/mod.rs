pub mod drag;
pub mod hit_test;
pub mod policy;
pub mod table;
pub mod transfer;
pub mod view;

pub use drag::{DragError, DragOutcome, DragSession, DragState};
pub use hit_test::{Point, RowHitTest, RowRect, UniformRows};
pub use policy::{Close, DropPolicy, KeepStatus, Reopen};
pub use table::{Slot, TableError, TaskTable};
pub use transfer::{JsonCodec, TransferCodec, TransferError};
pub use view::TaskGrid;

/// Which of the two board lists a grid shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Active,
    Done,
}

impl std::fmt::Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListKind::Active => write!(f, "active"),
            ListKind::Done => write!(f, "done"),
        }
    }
}

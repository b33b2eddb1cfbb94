use std::ops::Range;

use tracing::{debug, warn};

use super::ListKind;
use super::hit_test::{Point, RowHitTest};
use super::table::TableError;
use super::transfer::{JsonCodec, TransferCodec, TransferError};
use super::view::TaskGrid;
use crate::model::pool::TaskPool;
use crate::model::task::TaskId;

/// Error type for drag gestures
#[derive(Debug, thiserror::Error)]
pub enum DragError {
    #[error("nothing to drag")]
    NothingToDrag,
    #[error(transparent)]
    Transfer(#[from] TransferError),
    #[error(transparent)]
    Table(#[from] TableError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Dragging,
    Completed,
    Cancelled,
}

/// How the drop side finished the gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Items landed somewhere; remove them from the source.
    Move,
    /// Items were copied; the source must drop its rows as well, since one
    /// task may only live in one list.
    Copy,
    /// Nothing was dropped.
    Cancel,
}

/// One drag gesture from a [`TaskGrid`].
///
/// `begin` snapshots the selected rows and encodes their ids. The target list
/// gets `hover`/`leave` while the pointer moves and `drop` (or `drop_at`) on
/// release. `end` then removes the dragged rows from the source. When source
/// and target are the same list, the rows inserted by the drop are accounted
/// for so the right rows are removed.
#[derive(Debug)]
pub struct DragSession<C: TransferCodec = JsonCodec> {
    codec: C,
    source: ListKind,
    blocks: Vec<Range<usize>>,
    ids: Vec<TaskId>,
    origin_row: usize,
    payload: Vec<u8>,
    drop_pos: Option<usize>,
    dropped: usize,
    landed: usize,
    state: DragState,
}

impl DragSession<JsonCodec> {
    pub fn begin(source: &mut TaskGrid) -> Result<Self, DragError> {
        Self::begin_with_codec(source, JsonCodec)
    }
}

impl<C: TransferCodec> DragSession<C> {
    pub fn begin_with_codec(source: &mut TaskGrid, codec: C) -> Result<Self, DragError> {
        source.delete_placeholder();
        let blocks = source.selected_blocks();
        let ids = source.ids_in(&blocks);
        if ids.is_empty() {
            return Err(DragError::NothingToDrag);
        }
        let payload = codec.encode(&ids)?;
        let origin_row = blocks.first().map(|b| b.start).unwrap_or(0);
        debug!(list = %source.kind(), count = ids.len(), origin_row, "drag started");

        Ok(DragSession {
            codec,
            source: source.kind(),
            blocks,
            ids,
            origin_row,
            payload,
            drop_pos: None,
            dropped: 0,
            landed: 0,
            state: DragState::Dragging,
        })
    }

    /// Encoded ids, as handed to the drop target.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn ids(&self) -> &[TaskId] {
        &self.ids
    }

    pub fn source(&self) -> ListKind {
        self.source
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Pointer moved over `target`: show the placeholder where a drop would
    /// land.
    pub fn hover(&self, target: &mut TaskGrid, p: Point, hit: &dyn RowHitTest) {
        let row = target.drop_row(p, hit);
        let origin = (target.kind() == self.source).then_some(self.origin_row);
        target.move_placeholder(row, origin);
    }

    /// Pointer left `target` without dropping.
    pub fn leave(&self, target: &mut TaskGrid) {
        target.delete_placeholder();
    }

    /// Drop `payload` into `target` at `row`. A payload that does not decode
    /// drops nothing. Returns the number of tasks inserted.
    pub fn drop(
        &mut self,
        target: &mut TaskGrid,
        row: usize,
        payload: &[u8],
        pool: &mut TaskPool,
    ) -> Result<usize, DragError> {
        let ids = match self.codec.decode(payload) {
            Ok(ids) => ids,
            Err(e) => {
                warn!(list = %target.kind(), error = %e, "ignoring drop");
                target.delete_placeholder();
                return Ok(0);
            }
        };

        let row = row.min(target.task_rows());
        let count = target.insert_dropped(row, &ids, pool)?;
        if target.kind() == self.source {
            self.drop_pos = Some(row);
            self.dropped = count;
        }
        self.landed += count;
        debug!(list = %target.kind(), row, count, "dropped");
        Ok(count)
    }

    /// Drop at a pointer position, picking the row the way `hover` does.
    pub fn drop_at(
        &mut self,
        target: &mut TaskGrid,
        p: Point,
        hit: &dyn RowHitTest,
        payload: &[u8],
        pool: &mut TaskPool,
    ) -> Result<usize, DragError> {
        let row = target.drop_row(p, hit);
        self.drop(target, row, payload, pool)
    }

    /// Finish the gesture on the source side. A move or copy whose drops
    /// inserted nothing leaves the source alone and ends cancelled.
    pub fn end(mut self, source: &mut TaskGrid, outcome: DragOutcome) -> Result<DragState, DragError> {
        source.delete_placeholder();
        match outcome {
            DragOutcome::Cancel => {
                self.state = DragState::Cancelled;
            }
            DragOutcome::Move | DragOutcome::Copy if self.landed == 0 => {
                debug!(list = %source.kind(), "nothing landed, source kept");
                self.state = DragState::Cancelled;
            }
            DragOutcome::Move | DragOutcome::Copy => {
                let ins_pos = self.drop_pos.unwrap_or(source.rows());
                source.delete_dragged(&self.blocks, ins_pos, self.dropped)?;
                self.state = DragState::Completed;
            }
        }
        debug!(list = %source.kind(), state = ?self.state, "drag ended");
        Ok(self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::hit_test::UniformRows;
    use crate::grid::policy::KeepStatus;
    use crate::grid::table::Slot;
    use crate::model::task::Task;
    use pretty_assertions::assert_eq;

    fn setup(ids: &[&str]) -> (TaskPool, TaskGrid) {
        let pool: TaskPool = ids.iter().map(|id| Task::with_id(*id)).collect();
        let mut grid = TaskGrid::new(ListKind::Active, KeepStatus);
        grid.load(ids.iter().map(|s| s.to_string()).collect(), &pool);
        (pool, grid)
    }

    fn shown(grid: &TaskGrid) -> Vec<&str> {
        grid.table()
            .display()
            .iter()
            .filter_map(Slot::task_id)
            .map(String::as_str)
            .collect()
    }

    #[test]
    fn test_empty_list_has_nothing_to_drag() {
        let (_, mut grid) = setup(&[]);
        assert!(matches!(DragSession::begin(&mut grid), Err(DragError::NothingToDrag)));
    }

    #[test]
    fn test_move_within_list_by_pointer() {
        let (mut pool, mut grid) = setup(&["a", "b", "c", "d"]);
        let hit = UniformRows::new(10);
        grid.set_cursor(1);

        let mut drag = DragSession::begin(&mut grid).unwrap();
        drag.hover(&mut grid, Point::new(0, 38), &hit);
        assert_eq!(grid.placeholder(), Some(4));

        let payload = drag.payload().to_vec();
        drag.drop_at(&mut grid, Point::new(0, 48), &hit, &payload, &mut pool)
            .unwrap();
        assert_eq!(drag.end(&mut grid, DragOutcome::Move).unwrap(), DragState::Completed);
        assert_eq!(shown(&grid), vec!["a", "c", "d", "b"]);
        assert_eq!(grid.placeholder(), None);
    }

    #[test]
    fn test_cancel_leaves_source_alone() {
        let (_, mut grid) = setup(&["a", "b", "c"]);
        let hit = UniformRows::new(10);
        let drag = DragSession::begin(&mut grid).unwrap();
        drag.hover(&mut grid, Point::new(0, 25), &hit);
        drag.leave(&mut grid);
        assert_eq!(drag.end(&mut grid, DragOutcome::Cancel).unwrap(), DragState::Cancelled);
        assert_eq!(shown(&grid), vec!["a", "b", "c"]);
        assert_eq!(grid.rows(), 3);
    }

    #[test]
    fn test_bad_payload_drops_nothing() {
        let (mut pool, mut grid) = setup(&["a", "b"]);
        let mut drag = DragSession::begin(&mut grid).unwrap();
        let n = drag.drop(&mut grid, 2, b"not json", &mut pool).unwrap();
        assert_eq!(n, 0);
        assert_eq!(drag.end(&mut grid, DragOutcome::Cancel).unwrap(), DragState::Cancelled);
        assert_eq!(shown(&grid), vec!["a", "b"]);
    }

    #[test]
    fn test_move_after_bad_payload_keeps_source() {
        let (mut pool, mut grid) = setup(&["a", "b", "c"]);
        grid.set_cursor(1);
        let mut drag = DragSession::begin(&mut grid).unwrap();
        assert_eq!(drag.drop(&mut grid, 3, b"garbage", &mut pool).unwrap(), 0);
        assert_eq!(drag.end(&mut grid, DragOutcome::Move).unwrap(), DragState::Cancelled);
        assert_eq!(shown(&grid), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_move_of_unknown_ids_keeps_source() {
        let (mut pool, mut grid) = setup(&["a", "b"]);
        let mut drag = DragSession::begin(&mut grid).unwrap();
        let n = drag
            .drop(&mut grid, 2, br#"{"items": ["zz"]}"#, &mut pool)
            .unwrap();
        assert_eq!(n, 0);
        assert_eq!(drag.end(&mut grid, DragOutcome::Copy).unwrap(), DragState::Cancelled);
        assert_eq!(shown(&grid), vec!["a", "b"]);
    }

    #[test]
    fn test_no_placeholder_next_to_origin_of_split_selection() {
        let (_, mut grid) = setup(&["a", "b", "c", "d", "e"]);
        let hit = UniformRows::new(10);
        grid.select(vec![1..2, 3..4]);
        let drag = DragSession::begin(&mut grid).unwrap();

        drag.hover(&mut grid, Point::new(0, 12), &hit);
        assert_eq!(grid.placeholder(), None);
        drag.hover(&mut grid, Point::new(0, 22), &hit);
        assert_eq!(grid.placeholder(), None);
        assert_eq!(shown(&grid), vec!["a", "b", "c", "d", "e"]);

        drag.hover(&mut grid, Point::new(0, 32), &hit);
        assert_eq!(grid.placeholder(), Some(3));
    }

    #[test]
    fn test_overlapping_selection_moves_each_task_once() {
        let (mut pool, mut grid) = setup(&["a", "b", "c", "d"]);
        grid.select(vec![0..2, 1..3]);
        let mut drag = DragSession::begin(&mut grid).unwrap();
        assert_eq!(drag.ids(), &["a".to_string(), "b".to_string(), "c".to_string()]);

        let payload = drag.payload().to_vec();
        drag.drop(&mut grid, 4, &payload, &mut pool).unwrap();
        drag.end(&mut grid, DragOutcome::Move).unwrap();
        assert_eq!(shown(&grid), vec!["d", "a", "b", "c"]);
    }
}

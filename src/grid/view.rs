use std::ops::Range;

use tracing::{debug, warn};

use super::ListKind;
use super::hit_test::{Point, RowHitTest};
use super::policy::DropPolicy;
use super::table::{Slot, TableError, TaskTable};
use crate::model::pool::TaskPool;
use crate::model::task::TaskId;
use crate::ops::filter::TaskFilter;

/// One on-screen task list: a [`TaskTable`] plus the interaction state around
/// it (cursor row, selected row blocks, drop placeholder) and the policy
/// applied to tasks dropped into it.
pub struct TaskGrid {
    kind: ListKind,
    table: TaskTable,
    cursor: usize,
    selection: Vec<Range<usize>>,
    placeholder: Option<usize>,
    policy: Box<dyn DropPolicy>,
}

impl std::fmt::Debug for TaskGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskGrid")
            .field("kind", &self.kind)
            .field("table", &self.table)
            .field("cursor", &self.cursor)
            .field("selection", &self.selection)
            .field("placeholder", &self.placeholder)
            .finish_non_exhaustive()
    }
}

impl TaskGrid {
    pub fn new(kind: ListKind, policy: impl DropPolicy + 'static) -> Self {
        TaskGrid {
            kind,
            table: TaskTable::new(),
            cursor: 0,
            selection: Vec::new(),
            placeholder: None,
            policy: Box::new(policy),
        }
    }

    pub fn kind(&self) -> ListKind {
        self.kind
    }

    pub fn table(&self) -> &TaskTable {
        &self.table
    }

    /// Number of rows shown, placeholder included.
    pub fn rows(&self) -> usize {
        self.table.len()
    }

    /// Number of rows shown, not counting the placeholder.
    pub fn task_rows(&self) -> usize {
        self.rows() - usize::from(self.placeholder.is_some())
    }

    pub fn load(&mut self, ids: Vec<TaskId>, pool: &TaskPool) {
        self.placeholder = None;
        self.selection.clear();
        self.table.load(ids, pool);
        self.clamp_cursor();
    }

    pub fn filter(&mut self, filter: TaskFilter, pool: &TaskPool) {
        self.delete_placeholder();
        self.selection.clear();
        self.table.filter(filter, pool);
        self.clamp_cursor();
    }

    pub fn task_at(&self, row: usize) -> Option<&TaskId> {
        self.table.get(row).ok().and_then(Slot::task_id)
    }

    pub fn row_of(&self, id: &str) -> Option<usize> {
        self.table.row_of(id)
    }

    /// True if `id` is in this list, shown or hidden by the filter.
    pub fn contains(&self, id: &str) -> bool {
        self.table.contains(id)
    }

    /// Take task `id` out of this list, shown or hidden. Returns false if it
    /// is not here.
    pub fn remove_task(&mut self, id: &str) -> bool {
        self.delete_placeholder();
        let row = self.row_of(id);
        if !self.table.remove_id(id) {
            return false;
        }
        if row.is_some_and(|r| r < self.cursor) {
            self.cursor -= 1;
        }
        self.selection.clear();
        self.clamp_cursor();
        true
    }

    // -----------------------------------------------------------------------
    // Cursor and selection
    // -----------------------------------------------------------------------

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, row: usize) {
        self.cursor = row;
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.rows().saturating_sub(1));
    }

    /// Select row blocks. Blocks are clipped to the table, kept in order, and
    /// overlapping or touching blocks are merged so each row is selected once.
    pub fn select(&mut self, blocks: Vec<Range<usize>>) {
        let rows = self.rows();
        let mut blocks: Vec<Range<usize>> = blocks
            .into_iter()
            .map(|b| b.start.min(rows)..b.end.min(rows))
            .filter(|b| !b.is_empty())
            .collect();
        blocks.sort_by_key(|b| b.start);

        let mut merged: Vec<Range<usize>> = Vec::with_capacity(blocks.len());
        for block in blocks {
            match merged.last_mut() {
                Some(last) if block.start <= last.end => last.end = last.end.max(block.end),
                _ => merged.push(block),
            }
        }
        self.selection = merged;
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected row blocks, or the cursor row when nothing is selected.
    pub fn selected_blocks(&self) -> Vec<Range<usize>> {
        if !self.selection.is_empty() {
            return self.selection.clone();
        }
        if self.cursor < self.rows() {
            vec![self.cursor..self.cursor + 1]
        } else {
            Vec::new()
        }
    }

    /// Ids of the tasks in `blocks`, in row order.
    pub fn ids_in(&self, blocks: &[Range<usize>]) -> Vec<TaskId> {
        blocks
            .iter()
            .flat_map(|b| self.table.get_items(b.clone()))
            .filter_map(Slot::task_id)
            .cloned()
            .collect()
    }

    // -----------------------------------------------------------------------
    // Drop placeholder
    // -----------------------------------------------------------------------

    pub fn placeholder(&self) -> Option<usize> {
        self.placeholder
    }

    /// Show the placeholder at `row` (a row index without the placeholder).
    /// `origin` is the row a drag from this list started at: dropping on it
    /// or right below it would not move anything, so no placeholder is shown
    /// there.
    pub fn move_placeholder(&mut self, row: usize, origin: Option<usize>) {
        if self.placeholder == Some(row) {
            return;
        }
        self.delete_placeholder();
        let no_op = origin.is_some_and(|o| row == o || row == o + 1);
        if !no_op {
            self.insert_placeholder(row);
        }
    }

    fn insert_placeholder(&mut self, row: usize) {
        let row = row.min(self.rows());
        if let Err(e) = self.table.insert_rows(row, 1) {
            warn!(list = %self.kind, error = %e, "could not insert drop placeholder");
            return;
        }
        if self.cursor >= row && self.rows() > 1 {
            self.cursor += 1;
        }
        self.placeholder = Some(row);
    }

    /// Remove the placeholder row, if there is one. Returns whether a row was
    /// removed.
    pub fn delete_placeholder(&mut self) -> bool {
        let Some(row) = self.placeholder.take() else {
            return false;
        };
        match self.table.get(row) {
            Ok(Slot::Empty) => {}
            _ => {
                debug!(list = %self.kind, row, "stale drop placeholder ignored");
                return false;
            }
        }
        if self.table.delete_rows(row, 1).is_err() {
            return false;
        }
        if self.cursor > row {
            self.cursor -= 1;
        }
        self.clamp_cursor();
        true
    }

    /// Row where dragged items would land if dropped at window point `p`.
    ///
    /// The result is a row index in the table without the placeholder, so it
    /// can be used directly after the placeholder is removed. Clipped to
    /// `0..=task_rows()`.
    pub fn drop_row(&self, p: Point, hit: &dyn RowHitTest) -> usize {
        let pt = hit.to_logical(p);
        let limit = self.task_rows();

        let Some(index) = hit.row_at(pt.y, self.rows()) else {
            return 0;
        };
        if Some(index) == self.placeholder {
            return index.min(limit);
        }

        // Rows below the placeholder shift up once it is gone.
        let mut row = match self.placeholder {
            Some(ph) if index > ph => index - 1,
            _ => index,
        };
        if hit.row_rect(index).is_some_and(|r| r.is_lower_half(pt.y)) {
            row += 1;
        }
        row.min(limit)
    }

    // -----------------------------------------------------------------------
    // Dropping and removing dragged rows
    // -----------------------------------------------------------------------

    /// Resolve dropped ids through the pool and apply this list's policy.
    /// Ids missing from the pool are skipped.
    fn prepare_dropped(&self, ids: &[TaskId], pool: &mut TaskPool) -> Vec<TaskId> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            match pool.get_mut(id) {
                Some(task) => {
                    self.policy.prepare(task);
                    out.push(id.clone());
                }
                None => warn!(list = %self.kind, id = %id, "dropped task not in pool, skipped"),
            }
        }
        out
    }

    /// Insert dropped tasks at `row`, removing the placeholder first. Returns
    /// the number of rows inserted.
    pub fn insert_dropped(
        &mut self,
        row: usize,
        ids: &[TaskId],
        pool: &mut TaskPool,
    ) -> Result<usize, TableError> {
        self.delete_placeholder();
        let prepared = self.prepare_dropped(ids, pool);
        let count = prepared.len();
        let row = row.min(self.rows());
        self.table.insert_items(row, prepared)?;

        if count == 1 {
            self.cursor = row;
        } else if count > 1 && self.cursor >= row && self.rows() > count {
            self.cursor += count;
        }
        self.clamp_cursor();
        Ok(count)
    }

    /// Delete the rows in `blocks` after a drag. If `ins_len` rows were
    /// inserted at `ins_pos` in this same list during the drag, rows at or
    /// below `ins_pos` have moved down by `ins_len`; pass `ins_pos >= rows()`
    /// when nothing was inserted here.
    pub fn delete_dragged(
        &mut self,
        blocks: &[Range<usize>],
        ins_pos: usize,
        ins_len: usize,
    ) -> Result<(), TableError> {
        let mut rows: Vec<usize> = blocks
            .iter()
            .flat_map(|b| b.clone())
            .map(|r| if r >= ins_pos { r + ins_len } else { r })
            .collect();
        rows.sort_unstable_by(|a, b| b.cmp(a));
        rows.dedup();

        for row in rows {
            self.table.delete_rows(row, 1)?;
            if row < self.cursor {
                self.cursor -= 1;
            }
        }
        self.selection.clear();
        self.clamp_cursor();
        Ok(())
    }

    /// Move the selected rows (or the cursor row) by `offset` rows, keeping
    /// them inside the list. Returns false if nothing moved.
    pub fn move_selected(&mut self, offset: isize, pool: &mut TaskPool) -> Result<bool, TableError> {
        self.delete_placeholder();
        let blocks = self.selected_blocks();
        let ids = self.ids_in(&blocks);
        let Some(first) = blocks.first() else {
            return Ok(false);
        };
        if ids.is_empty() {
            return Ok(false);
        }

        let orig = first.start;
        let max = self.rows().saturating_sub(ids.len());
        let new_pos = orig.saturating_add_signed(offset).min(max);
        if new_pos == orig {
            return Ok(false);
        }

        let rows = self.rows();
        self.delete_dragged(&blocks, rows, 0)?;
        let count = self.insert_dropped(new_pos, &ids, pool)?;
        self.select(vec![new_pos..new_pos + count]);
        self.cursor = new_pos;
        Ok(true)
    }
}

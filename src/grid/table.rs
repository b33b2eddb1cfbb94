use std::ops::Range;

use crate::model::pool::TaskPool;
use crate::model::task::TaskId;
use crate::ops::filter::TaskFilter;

/// Error type for row access on a task table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("row {row} out of range (table has {rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },
}

/// One row of a task list: a task, or an empty placeholder row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Task(TaskId),
    Empty,
}

impl Slot {
    pub fn task_id(&self) -> Option<&TaskId> {
        match self {
            Slot::Task(id) => Some(id),
            Slot::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }
}

/// An ordered task list with a filtered view.
///
/// `backing` is the full, canonical order (what gets persisted). `display` is
/// the subsequence currently shown, and `display_index[i]` is the backing
/// position of `display[i]`. All row arguments are display rows.
///
/// Invariants: `display[i] == backing[display_index[i]]` for every `i`, and
/// `display_index` is strictly increasing. Filtering never reorders `backing`.
#[derive(Debug, Clone, Default)]
pub struct TaskTable {
    backing: Vec<Slot>,
    display: Vec<Slot>,
    display_index: Vec<usize>,
    last_filter: TaskFilter,
}

impl TaskTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with `ids`, re-applying the last filter.
    pub fn load<I>(&mut self, ids: I, pool: &TaskPool)
    where
        I: IntoIterator<Item = TaskId>,
    {
        self.backing = ids.into_iter().map(Slot::Task).collect();
        self.refilter(pool);
    }

    /// Rebuild the display rows from the backing order, keeping tasks that
    /// match `filter`. Placeholders and ids unknown to `pool` never match.
    pub fn filter(&mut self, filter: TaskFilter, pool: &TaskPool) {
        self.display.clear();
        self.display_index.clear();
        for (pos, slot) in self.backing.iter().enumerate() {
            let visible = match slot {
                Slot::Task(id) => pool.get(id).is_some_and(|t| filter.matches(t)),
                Slot::Empty => false,
            };
            if visible {
                self.display.push(slot.clone());
                self.display_index.push(pos);
            }
        }
        self.last_filter = filter;
        self.debug_check();
    }

    /// Re-apply the last filter.
    pub fn refilter(&mut self, pool: &TaskPool) {
        let filter = std::mem::take(&mut self.last_filter);
        self.filter(filter, pool);
    }

    pub fn last_filter(&self) -> &TaskFilter {
        &self.last_filter
    }

    /// Number of display rows.
    pub fn len(&self) -> usize {
        self.display.len()
    }

    pub fn is_empty(&self) -> bool {
        self.display.is_empty()
    }

    pub fn backing_len(&self) -> usize {
        self.backing.len()
    }

    /// Backing position for display row `row`; rows at or past the end map
    /// to the end of the backing order.
    pub fn to_backing(&self, row: usize) -> usize {
        if row >= self.display.len() {
            self.backing.len()
        } else {
            self.display_index[row]
        }
    }

    /// Insert `count` placeholder rows before display row `row`
    /// (`row == len()` appends).
    pub fn insert_rows(&mut self, row: usize, count: usize) -> Result<(), TableError> {
        self.insert_slots(row, std::iter::repeat_n(Slot::Empty, count).collect())
    }

    /// Insert tasks before display row `row` (`row == len()` appends). The new
    /// rows are shown immediately, whether or not they match the last filter.
    pub fn insert_items(&mut self, row: usize, ids: Vec<TaskId>) -> Result<(), TableError> {
        self.insert_slots(row, ids.into_iter().map(Slot::Task).collect())
    }

    fn insert_slots(&mut self, row: usize, slots: Vec<Slot>) -> Result<(), TableError> {
        if row > self.display.len() {
            return Err(TableError::RowOutOfRange {
                row,
                rows: self.display.len(),
            });
        }
        let count = slots.len();
        if count == 0 {
            return Ok(());
        }
        let orig = self.to_backing(row);

        self.backing.splice(orig..orig, slots.iter().cloned());
        self.display.splice(row..row, slots);
        self.display_index.splice(row..row, orig..orig + count);
        for idx in &mut self.display_index[row + count..] {
            *idx += count;
        }

        self.debug_check();
        Ok(())
    }

    /// Remove display rows `row..row + count` together with their backing
    /// entries. Hidden tasks between them are untouched.
    pub fn delete_rows(&mut self, row: usize, count: usize) -> Result<(), TableError> {
        let end = row.checked_add(count).unwrap_or(usize::MAX);
        if end > self.display.len() {
            return Err(TableError::RowOutOfRange {
                row: end.saturating_sub(1),
                rows: self.display.len(),
            });
        }
        if count == 0 {
            return Ok(());
        }

        // Highest backing position first, so the rest stay valid.
        for i in (row..end).rev() {
            self.backing.remove(self.display_index[i]);
        }
        self.display.drain(row..end);
        self.display_index.drain(row..end);
        for idx in &mut self.display_index[row..] {
            *idx -= count;
        }

        self.debug_check();
        Ok(())
    }

    /// Remove the task `id` from the backing order, shown or not. Returns
    /// false if it is not in this table.
    pub fn remove_id(&mut self, id: &str) -> bool {
        let Some(pos) = self
            .backing
            .iter()
            .position(|s| s.task_id().is_some_and(|t| t == id))
        else {
            return false;
        };

        if let Ok(row) = self.display_index.binary_search(&pos) {
            self.display.remove(row);
            self.display_index.remove(row);
        }
        self.backing.remove(pos);
        for idx in self.display_index.iter_mut().filter(|i| **i > pos) {
            *idx -= 1;
        }

        self.debug_check();
        true
    }

    /// True if `id` is anywhere in the backing order.
    pub fn contains(&self, id: &str) -> bool {
        self.backing_ids().any(|t| t == id)
    }

    pub fn get(&self, row: usize) -> Result<&Slot, TableError> {
        self.display.get(row).ok_or(TableError::RowOutOfRange {
            row,
            rows: self.display.len(),
        })
    }

    /// Display rows in `range`, clipped to the table.
    pub fn get_items(&self, range: Range<usize>) -> &[Slot] {
        let end = range.end.min(self.display.len());
        let start = range.start.min(end);
        &self.display[start..end]
    }

    /// Display rows holding `id`.
    pub fn row_of(&self, id: &str) -> Option<usize> {
        self.display
            .iter()
            .position(|s| s.task_id().is_some_and(|t| t == id))
    }

    /// Canonical order, placeholders included. Read-only: all changes go
    /// through the row operations.
    pub fn backing(&self) -> &[Slot] {
        &self.backing
    }

    /// Task ids in canonical order, placeholders skipped.
    pub fn backing_ids(&self) -> impl Iterator<Item = &TaskId> {
        self.backing.iter().filter_map(Slot::task_id)
    }

    pub fn display(&self) -> &[Slot] {
        &self.display
    }

    pub fn display_index(&self) -> &[usize] {
        &self.display_index
    }

    fn debug_check(&self) {
        debug_assert!(self.check_invariants(), "task table index out of sync");
    }

    /// True if the display rows and index agree with the backing order.
    pub fn check_invariants(&self) -> bool {
        self.display.len() == self.display_index.len()
            && self.display_index.windows(2).all(|w| w[0] < w[1])
            && self
                .display_index
                .iter()
                .zip(&self.display)
                .all(|(&b, slot)| self.backing.get(b) == Some(slot))
    }
}

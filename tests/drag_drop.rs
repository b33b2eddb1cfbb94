//! Drag and drop between the active and completed lists of one board.

use pretty_assertions::assert_eq;
use taskgrid::grid::{
    Close, DragOutcome, DragSession, DragState, ListKind, Point, Reopen, Slot, TaskGrid,
    UniformRows,
};
use taskgrid::model::pool::TaskPool;
use taskgrid::model::task::{Task, TaskStatus};
use taskgrid::ops::filter::TaskFilter;

const ROW_HEIGHT: i32 = 10;

struct Board {
    pool: TaskPool,
    active: TaskGrid,
    done: TaskGrid,
}

/// Helper: `active` tasks in the active list, `done` tasks (status done) in
/// the completed list. Each task's summary is its id.
fn board(active: &[&str], done: &[&str]) -> Board {
    let mut pool = TaskPool::new();
    for id in active {
        let mut task = Task::with_id(*id);
        task.summary = id.to_string();
        pool.insert(task);
    }
    for id in done {
        let mut task = Task::with_id(*id);
        task.summary = id.to_string();
        task.set_status(TaskStatus::Done);
        pool.insert(task);
    }

    let mut active_grid = TaskGrid::new(ListKind::Active, Reopen);
    active_grid.load(active.iter().map(|s| s.to_string()).collect(), &pool);
    let mut done_grid = TaskGrid::new(ListKind::Done, Close);
    done_grid.load(done.iter().map(|s| s.to_string()).collect(), &pool);

    Board {
        pool,
        active: active_grid,
        done: done_grid,
    }
}

fn shown(grid: &TaskGrid) -> Vec<&str> {
    grid.table()
        .display()
        .iter()
        .map(|slot| match slot {
            Slot::Task(id) => id.as_str(),
            Slot::Empty => "_",
        })
        .collect()
}

/// Pointer y in the upper half of `row`
fn above(row: i32) -> Point {
    Point::new(0, row * ROW_HEIGHT + 2)
}

// ---------------------------------------------------------------------------
// Within one list
// ---------------------------------------------------------------------------

#[test]
fn test_move_one_task_to_the_end() {
    let mut b = board(&["a", "b", "c", "d"], &[]);
    b.active.set_cursor(1);

    let mut drag = DragSession::begin(&mut b.active).unwrap();
    let payload = drag.payload().to_vec();
    let n = drag.drop(&mut b.active, 4, &payload, &mut b.pool).unwrap();
    assert_eq!(n, 1);
    assert_eq!(shown(&b.active), vec!["a", "b", "c", "d", "b"]);

    assert_eq!(drag.end(&mut b.active, DragOutcome::Move).unwrap(), DragState::Completed);
    assert_eq!(shown(&b.active), vec!["a", "c", "d", "b"]);
    assert!(b.active.table().check_invariants());
}

#[test]
fn test_move_one_task_up() {
    let mut b = board(&["a", "b", "c", "d"], &[]);
    b.active.set_cursor(3);

    let mut drag = DragSession::begin(&mut b.active).unwrap();
    let payload = drag.payload().to_vec();
    drag.drop(&mut b.active, 1, &payload, &mut b.pool).unwrap();
    drag.end(&mut b.active, DragOutcome::Move).unwrap();

    assert_eq!(shown(&b.active), vec!["a", "d", "b", "c"]);
    assert_eq!(b.active.cursor(), 1);
}

#[test]
fn test_dropping_next_to_the_origin_changes_nothing() {
    let hit = UniformRows::new(ROW_HEIGHT);
    let mut b = board(&["a", "b", "c", "d"], &[]);
    b.active.set_cursor(1);
    let mut drag = DragSession::begin(&mut b.active).unwrap();

    // above and below the dragged row: no placeholder
    drag.hover(&mut b.active, above(1), &hit);
    assert_eq!(b.active.placeholder(), None);
    drag.hover(&mut b.active, above(2), &hit);
    assert_eq!(b.active.placeholder(), None);

    // anywhere else gets one
    drag.hover(&mut b.active, above(0), &hit);
    assert_eq!(b.active.placeholder(), Some(0));
    assert_eq!(shown(&b.active), vec!["_", "a", "b", "c", "d"]);

    let payload = drag.payload().to_vec();
    drag.drop(&mut b.active, 2, &payload, &mut b.pool).unwrap();
    drag.end(&mut b.active, DragOutcome::Move).unwrap();
    assert_eq!(shown(&b.active), vec!["a", "b", "c", "d"]);
}

#[test]
fn test_move_two_separate_blocks() {
    let mut b = board(&["a", "b", "c", "d", "e"], &[]);
    b.active.select(vec![0..1, 3..4]);

    let mut drag = DragSession::begin(&mut b.active).unwrap();
    assert_eq!(drag.ids(), &["a".to_string(), "d".to_string()]);
    let payload = drag.payload().to_vec();
    let n = drag.drop(&mut b.active, 2, &payload, &mut b.pool).unwrap();
    assert_eq!(n, 2);
    drag.end(&mut b.active, DragOutcome::Move).unwrap();

    assert_eq!(shown(&b.active), vec!["b", "a", "d", "c", "e"]);
    assert!(b.active.table().check_invariants());
}

#[test]
fn test_keyboard_moves_stay_inside_the_list() {
    let mut b = board(&["a", "b", "c", "d"], &[]);

    assert!(b.active.move_selected(2, &mut b.pool).unwrap());
    assert_eq!(shown(&b.active), vec!["b", "c", "a", "d"]);
    assert_eq!(b.active.cursor(), 2);

    assert!(b.active.move_selected(10, &mut b.pool).unwrap());
    assert_eq!(shown(&b.active), vec!["b", "c", "d", "a"]);

    assert!(b.active.move_selected(-10, &mut b.pool).unwrap());
    assert_eq!(shown(&b.active), vec!["a", "b", "c", "d"]);

    assert!(!b.active.move_selected(-1, &mut b.pool).unwrap());
}

#[test]
fn test_keyboard_moves_a_block() {
    let mut b = board(&["a", "b", "c", "d"], &[]);
    b.active.select(vec![1..3]);
    assert!(b.active.move_selected(1, &mut b.pool).unwrap());
    assert_eq!(shown(&b.active), vec!["a", "d", "b", "c"]);
    assert_eq!(b.active.selected_blocks(), vec![2..4]);
}

// ---------------------------------------------------------------------------
// Between lists
// ---------------------------------------------------------------------------

#[test]
fn test_completing_by_drag() {
    let hit = UniformRows::new(ROW_HEIGHT);
    let mut b = board(&["a"], &[]);

    let mut drag = DragSession::begin(&mut b.active).unwrap();
    drag.hover(&mut b.done, Point::new(0, 0), &hit);
    assert_eq!(b.done.placeholder(), Some(0));

    let payload = drag.payload().to_vec();
    drag.drop_at(&mut b.done, Point::new(0, 5), &hit, &payload, &mut b.pool)
        .unwrap();
    assert_eq!(drag.end(&mut b.active, DragOutcome::Move).unwrap(), DragState::Completed);

    assert_eq!(b.active.rows(), 0);
    assert_eq!(shown(&b.done), vec!["a"]);
    let task = b.pool.get("a").unwrap();
    assert_eq!(task.status, TaskStatus::Done);
    assert!(task.closed.is_some());
}

#[test]
fn test_reopening_by_drag() {
    let mut b = board(&["a", "b"], &["x", "y"]);
    b.done.set_cursor(1);

    let mut drag = DragSession::begin(&mut b.done).unwrap();
    let payload = drag.payload().to_vec();
    drag.drop(&mut b.active, 1, &payload, &mut b.pool).unwrap();
    drag.end(&mut b.done, DragOutcome::Move).unwrap();

    assert_eq!(shown(&b.active), vec!["a", "y", "b"]);
    assert_eq!(shown(&b.done), vec!["x"]);
    assert_eq!(b.active.cursor(), 1);
    let task = b.pool.get("y").unwrap();
    assert_eq!(task.status, TaskStatus::Active);
    assert!(task.closed.is_none());
}

#[test]
fn test_cancelled_tasks_stay_cancelled_in_the_done_list() {
    let mut b = board(&["a", "b", "c", "d"], &["x"]);
    b.pool.get_mut("c").unwrap().set_status(TaskStatus::Cancelled);
    b.active.select(vec![0..1, 2..3]);

    let mut drag = DragSession::begin(&mut b.active).unwrap();
    let payload = drag.payload().to_vec();
    drag.drop(&mut b.done, 0, &payload, &mut b.pool).unwrap();
    drag.end(&mut b.active, DragOutcome::Move).unwrap();

    assert_eq!(shown(&b.active), vec!["b", "d"]);
    assert_eq!(shown(&b.done), vec!["a", "c", "x"]);
    assert_eq!(b.pool.get("a").unwrap().status, TaskStatus::Done);
    assert_eq!(b.pool.get("c").unwrap().status, TaskStatus::Cancelled);
}

#[test]
fn test_leaving_without_a_drop_keeps_both_lists() {
    let hit = UniformRows::new(ROW_HEIGHT);
    let mut b = board(&["a", "b"], &["x"]);

    let drag = DragSession::begin(&mut b.active).unwrap();
    drag.hover(&mut b.done, above(0), &hit);
    assert_eq!(shown(&b.done), vec!["_", "x"]);
    drag.leave(&mut b.done);
    assert_eq!(drag.end(&mut b.active, DragOutcome::Cancel).unwrap(), DragState::Cancelled);

    assert_eq!(shown(&b.active), vec!["a", "b"]);
    assert_eq!(shown(&b.done), vec!["x"]);
    assert_eq!(b.pool.get("a").unwrap().status, TaskStatus::Active);
}

#[test]
fn test_foreign_payload_is_ignored() {
    let hit = UniformRows::new(ROW_HEIGHT);
    let mut b = board(&["a"], &["x"]);

    let mut drag = DragSession::begin(&mut b.active).unwrap();
    drag.hover(&mut b.done, above(0), &hit);
    let n = drag.drop(&mut b.done, 0, b"{\"not\": \"ids\"}", &mut b.pool).unwrap();
    assert_eq!(n, 0);
    assert_eq!(b.done.placeholder(), None);
    assert_eq!(drag.end(&mut b.active, DragOutcome::Move).unwrap(), DragState::Cancelled);

    assert_eq!(shown(&b.active), vec!["a"]);
    assert_eq!(shown(&b.done), vec!["x"]);
}

// ---------------------------------------------------------------------------
// Filtered lists
// ---------------------------------------------------------------------------

#[test]
fn test_drag_out_of_a_filtered_list() {
    let mut b = board(&["paint fence", "call", "paint shed", "mow"], &[]);
    b.active.filter(TaskFilter::new("paint"), &b.pool);
    assert_eq!(shown(&b.active), vec!["paint fence", "paint shed"]);

    b.active.set_cursor(1);
    let mut drag = DragSession::begin(&mut b.active).unwrap();
    let payload = drag.payload().to_vec();
    drag.drop(&mut b.done, 0, &payload, &mut b.pool).unwrap();
    drag.end(&mut b.active, DragOutcome::Move).unwrap();

    assert_eq!(shown(&b.active), vec!["paint fence"]);
    b.active.filter(TaskFilter::pass_all(), &b.pool);
    assert_eq!(shown(&b.active), vec!["paint fence", "call", "mow"]);
    assert_eq!(shown(&b.done), vec!["paint shed"]);
}

#[test]
fn test_reorder_inside_a_filtered_list() {
    let mut b = board(&["paint fence", "call", "paint shed", "mow"], &[]);
    b.active.filter(TaskFilter::new("paint"), &b.pool);

    b.active.set_cursor(1);
    let mut drag = DragSession::begin(&mut b.active).unwrap();
    let payload = drag.payload().to_vec();
    drag.drop(&mut b.active, 0, &payload, &mut b.pool).unwrap();
    drag.end(&mut b.active, DragOutcome::Move).unwrap();
    assert_eq!(shown(&b.active), vec!["paint shed", "paint fence"]);

    b.active.filter(TaskFilter::pass_all(), &b.pool);
    assert_eq!(
        shown(&b.active),
        vec!["paint shed", "paint fence", "call", "mow"]
    );
}

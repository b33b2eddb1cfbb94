/// A pointer position in the list surface's pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// Vertical extent of one row, in logical (unscrolled) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRect {
    pub top: i32,
    pub height: i32,
}

impl RowRect {
    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }

    /// True if `y` falls in the lower half of the row.
    pub fn is_lower_half(&self, y: i32) -> bool {
        // Compare doubled values to stay in integers.
        2 * y >= self.top + self.bottom()
    }
}

/// Row geometry supplied by whatever draws the list.
pub trait RowHitTest {
    /// Convert a window position to logical coordinates (undo scrolling).
    fn to_logical(&self, p: Point) -> Point {
        p
    }

    /// Row under logical `y` among `rows` rows, clipped to the first/last
    /// row. `None` only when there are no rows.
    fn row_at(&self, y: i32, rows: usize) -> Option<usize>;

    /// Logical extent of `row`.
    fn row_rect(&self, row: usize) -> Option<RowRect>;
}

/// Rows of equal height stacked from `top`, scrolled down by `scroll` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformRows {
    pub top: i32,
    pub row_height: i32,
    pub scroll: i32,
}

impl UniformRows {
    pub fn new(row_height: i32) -> Self {
        UniformRows {
            top: 0,
            row_height: row_height.max(1),
            scroll: 0,
        }
    }
}

impl RowHitTest for UniformRows {
    fn to_logical(&self, p: Point) -> Point {
        Point::new(p.x, p.y + self.scroll)
    }

    fn row_at(&self, y: i32, rows: usize) -> Option<usize> {
        if rows == 0 {
            return None;
        }
        let offset = (y - self.top).max(0);
        let row = (offset / self.row_height) as usize;
        Some(row.min(rows - 1))
    }

    fn row_rect(&self, row: usize) -> Option<RowRect> {
        let row = i32::try_from(row).ok()?;
        Some(RowRect {
            top: self.top + row * self.row_height,
            height: self.row_height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_at_clips() {
        let rows = UniformRows::new(10);
        assert_eq!(rows.row_at(-5, 3), Some(0));
        assert_eq!(rows.row_at(0, 3), Some(0));
        assert_eq!(rows.row_at(19, 3), Some(1));
        assert_eq!(rows.row_at(500, 3), Some(2));
        assert_eq!(rows.row_at(5, 0), None);
    }

    #[test]
    fn test_lower_half() {
        let rect = RowRect { top: 10, height: 10 };
        assert!(!rect.is_lower_half(14));
        assert!(rect.is_lower_half(15));
        assert!(rect.is_lower_half(19));
    }

    #[test]
    fn test_scroll_shifts_to_logical() {
        let rows = UniformRows {
            top: 0,
            row_height: 10,
            scroll: 30,
        };
        assert_eq!(rows.to_logical(Point::new(3, 5)), Point::new(3, 35));
    }
}

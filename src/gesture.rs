//! Swipe detection from mouse drags.

use crate::router::Direction;

/// Default horizontal travel, in columns, before a drag counts as a swipe.
pub const DEFAULT_SWIPE_THRESHOLD: u16 = 8;

/// Tracks one drag from press to release.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: u16,
    start: Option<(u16, u16)>,
}

impl SwipeTracker {
    pub fn new(threshold: u16) -> Self {
        Self {
            threshold: threshold.max(1),
            start: None,
        }
    }

    pub fn press(&mut self, column: u16, row: u16) {
        self.start = Some((column, row));
    }

    /// Finish the drag at `(column, row)`.
    ///
    /// A right-to-left drag means "next page", left-to-right means "previous".
    /// Horizontal travel must reach the threshold and exceed vertical travel.
    pub fn release(&mut self, column: u16, row: u16) -> Option<Direction> {
        let (start_col, start_row) = self.start.take()?;
        let dx = i32::from(column) - i32::from(start_col);
        let dy = i32::from(row) - i32::from(start_row);

        if dx.unsigned_abs() < u32::from(self.threshold) || dx.abs() <= dy.abs() {
            return None;
        }
        Some(if dx < 0 {
            Direction::Next
        } else {
            Direction::Previous
        })
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }

    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_swipe_is_next() {
        let mut t = SwipeTracker::default();
        t.press(40, 10);
        assert_eq!(t.release(20, 11), Some(Direction::Next));
        assert!(!t.is_tracking());
    }

    #[test]
    fn test_right_swipe_is_previous() {
        let mut t = SwipeTracker::default();
        t.press(10, 10);
        assert_eq!(t.release(18, 10), Some(Direction::Previous));
    }

    #[test]
    fn test_short_drag_ignored() {
        let mut t = SwipeTracker::default();
        t.press(10, 10);
        assert_eq!(t.release(17, 10), None);
    }

    #[test]
    fn test_vertical_drag_ignored() {
        let mut t = SwipeTracker::new(4);
        t.press(10, 0);
        assert_eq!(t.release(20, 12), None);
    }

    #[test]
    fn test_release_without_press() {
        let mut t = SwipeTracker::default();
        assert_eq!(t.release(0, 0), None);
        t.press(30, 5);
        t.cancel();
        assert_eq!(t.release(0, 5), None);
    }
}

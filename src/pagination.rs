use leptos::logging::log;
use std::ops::Range;

/// Number of reviews shown at once.
pub const WINDOW_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Direction of a signed delta; zero and non-finite values have none.
    pub fn from_delta(delta: f64) -> Option<Self> {
        if !delta.is_finite() || delta == 0.0 {
            None
        } else if delta > 0.0 {
            Some(Direction::Forward)
        } else {
            Some(Direction::Backward)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved { from: usize, to: usize },
    AtBoundary,
}

/// Paging cursor over a list of known length.
///
/// Invariant: `cursor <= max_cursor()` after every public call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    cursor: usize,
    len: usize,
}

impl Pagination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn max_cursor(&self) -> usize {
        self.len.saturating_sub(WINDOW_SIZE)
    }

    pub fn visible_range(&self) -> Range<usize> {
        let start = self.cursor.min(self.len);
        start..(start + WINDOW_SIZE).min(self.len)
    }

    /// The current window of `items`. Shorter than the window at the tail.
    pub fn visible_slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.cursor.min(items.len());
        let end = (start + WINDOW_SIZE).min(items.len());
        &items[start..end]
    }

    pub fn total_groups(&self) -> usize {
        self.len.div_ceil(WINDOW_SIZE)
    }

    /// Zero-based; add one for display.
    pub fn current_group(&self) -> usize {
        self.cursor / WINDOW_SIZE
    }

    /// Everything fits in one window, so paging controls are not needed.
    pub fn controls_hidden(&self) -> bool {
        self.len <= WINDOW_SIZE
    }

    pub fn can_advance(&self, direction: Direction) -> bool {
        match direction {
            Direction::Forward => self.cursor < self.max_cursor(),
            Direction::Backward => self.cursor > 0,
        }
    }

    pub fn advance(&mut self, direction: Direction) -> Advance {
        if !self.can_advance(direction) {
            return Advance::AtBoundary;
        }
        let from = self.cursor;
        let to = match direction {
            Direction::Forward => from.saturating_add(WINDOW_SIZE),
            Direction::Backward => from.saturating_sub(WINDOW_SIZE),
        }
        .min(self.max_cursor());
        self.cursor = to;
        log!("[PAGER] Cursor {} -> {}", from, to);
        Advance::Moved { from, to }
    }

    /// Records a new list length and pulls the cursor back into range.
    pub fn on_list_changed(&mut self, len: usize) {
        self.len = len;
        let clamped = self.cursor.min(self.max_cursor());
        if clamped != self.cursor {
            log!("[PAGER] Re-clamped cursor {} -> {} for {} reviews", self.cursor, clamped, len);
            self.cursor = clamped;
        }
    }
}

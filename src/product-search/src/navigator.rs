//! Highlight tracking over the open result list.
//!
//! Unlike a dropdown, the highlight clamps at both ends instead of wrapping,
//! and "nothing highlighted" is a real state that `ArrowUp` can return to.

/// Highlighted row over a result list of known length.
///
/// `None` is the "no highlight" state. After every transition the invariant
/// `highlighted < len` holds for the `len` passed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Navigator {
    highlighted: Option<usize>,
}

impl Navigator {
    /// Create a navigator with nothing highlighted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently highlighted row.
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Highlight as a signed index, `-1` meaning none.
    pub fn highlighted_index(&self) -> isize {
        self.highlighted.map_or(-1, |i| i as isize)
    }

    /// Move down one row, stopping at the last. No-op on an empty list.
    pub fn move_down(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            None => 0,
            Some(i) => (i + 1).min(len - 1),
        });
    }

    /// Move up one row; moving up from the first row clears the highlight.
    pub fn move_up(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.highlighted = match self.highlighted {
            None | Some(0) => None,
            Some(i) => Some((i - 1).min(len - 1)),
        };
    }

    /// Highlight `index` if it is a valid row.
    pub fn hover(&mut self, index: usize, len: usize) -> bool {
        if index < len {
            self.highlighted = Some(index);
            true
        } else {
            false
        }
    }

    /// Clear the highlight.
    pub fn reset(&mut self) {
        self.highlighted = None;
    }

    /// Row that `Enter` should commit, if any.
    ///
    /// A valid highlight wins; otherwise a single result is committed
    /// regardless of highlight.
    pub fn enter_target(&self, len: usize) -> Option<usize> {
        match self.highlighted {
            Some(i) if i < len => Some(i),
            _ if len == 1 => Some(0),
            _ => None,
        }
    }
}

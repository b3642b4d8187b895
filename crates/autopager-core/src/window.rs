//! Viewport vocabulary shared by the engine and its hosts.
//!
//! `ViewportMetrics` is what a rendering layer reports after layout. Hosts
//! without a layout engine of their own can derive it from a `ScrollWindow`.

use serde::{Deserialize, Serialize};

/// Layout information about the rendered list, as reported by a scroll source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportMetrics {
    /// Number of rows currently laid out on screen. Zero means not laid out yet.
    pub visible_item_count: usize,
    /// Number of rows in the rendered sequence, markers included.
    pub total_item_count: usize,
    /// Position of the first row on screen.
    pub first_visible_position: usize,
}

impl ViewportMetrics {
    pub fn new(
        visible_item_count: usize,
        total_item_count: usize,
        first_visible_position: usize,
    ) -> Self {
        Self {
            visible_item_count,
            total_item_count,
            first_visible_position,
        }
    }
}

/// Scroll position over a list of fixed-height rows.
///
/// Pure data: it knows the total row count and the scroll offset, and turns
/// them into metrics for a viewport of a given height.
#[derive(Debug, Clone, Default)]
pub struct ScrollWindow {
    /// Total number of rows in the list.
    pub total_items: usize,
    /// Index of the first visible row.
    pub scroll_offset: usize,
}

impl ScrollWindow {
    pub fn new(total_items: usize) -> Self {
        Self {
            total_items,
            scroll_offset: 0,
        }
    }

    /// Update the total row count, clamping scroll offset if necessary.
    pub fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
        if self.scroll_offset >= total_items && total_items > 0 {
            self.scroll_offset = total_items.saturating_sub(1);
        }
    }

    /// Metrics for a viewport `viewport_height` rows tall.
    pub fn metrics(&self, viewport_height: usize) -> ViewportMetrics {
        let visible = viewport_height.min(self.total_items.saturating_sub(self.scroll_offset));
        ViewportMetrics {
            visible_item_count: visible,
            total_item_count: self.total_items,
            first_visible_position: self.scroll_offset,
        }
    }

    /// Largest offset that still fills the viewport.
    pub fn max_offset(&self, viewport_height: usize) -> usize {
        self.total_items.saturating_sub(viewport_height)
    }

    /// Scroll by `delta` rows, clamped to the scrollable range. Returns true if the offset moved.
    pub fn scroll_by(&mut self, delta: isize, viewport_height: usize) -> bool {
        let before = self.scroll_offset;
        let target = if delta.is_negative() {
            self.scroll_offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.scroll_offset.saturating_add(delta.unsigned_abs())
        };
        self.scroll_offset = target.min(self.max_offset(viewport_height));
        self.scroll_offset != before
    }
}

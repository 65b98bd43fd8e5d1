//! Virtualized list geometry.
//!
//! The dropdown can hold tens of thousands of rows, so only the rows that
//! intersect the viewport (plus an overscan margin) are rendered. The first
//! `sticky` rows (e.g. the dropdown search input and select-all) are pinned
//! above the scrolling area and never scroll.
//!
//! Rows start at an estimated height and are corrected as the host reports
//! measured heights; top offsets are prefix sums recomputed lazily when a
//! measurement or the item count changes.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::ops::Range;

use tracing::trace;

/// Estimated row height in pixels before measurement.
pub const DEFAULT_ROW_HEIGHT: f32 = 24.0;

/// Pixels rendered above/below the viewport for smooth scrolling.
pub const DEFAULT_OVERSCAN: f32 = 100.0;

/// Height changes smaller than this are measurement noise.
const HEIGHT_EPSILON: f32 = 0.5;

pub struct VirtualList {
    item_count: usize,
    estimated_height: f32,
    sticky: usize,
    overscan: f32,
    scroll_offset: f32,
    viewport_height: f32,
    measured: HashMap<usize, f32>,
    /// Top of each scrolling row inside the scroll content, plus the end.
    offsets: RefCell<Vec<f32>>,
    dirty: Cell<bool>,
    /// Item count at which the last-row hook already fired.
    last_reported: Option<usize>,
}

impl VirtualList {
    pub fn new(estimated_height: f32, overscan: f32) -> Self {
        Self {
            item_count: 0,
            estimated_height: estimated_height.max(1.0),
            sticky: 0,
            overscan: overscan.max(0.0),
            scroll_offset: 0.0,
            viewport_height: 0.0,
            measured: HashMap::new(),
            offsets: RefCell::new(vec![0.0]),
            dirty: Cell::new(true),
            last_reported: None,
        }
    }

    // ===== Configuration =====

    /// Sets the row count. Measurements beyond the new count are dropped.
    pub fn set_item_count(&mut self, count: usize) {
        if count == self.item_count {
            return;
        }
        self.item_count = count;
        self.measured.retain(|&i, _| i < count);
        self.dirty.set(true);
        self.clamp_scroll();
    }

    /// Number of leading rows pinned above the scrolling area.
    pub fn set_sticky_count(&mut self, sticky: usize) {
        if sticky != self.sticky {
            self.sticky = sticky;
            self.dirty.set(true);
            self.clamp_scroll();
        }
    }

    pub fn set_estimated_height(&mut self, height: f32) {
        let height = height.max(1.0);
        if (height - self.estimated_height).abs() > f32::EPSILON {
            self.estimated_height = height;
            self.dirty.set(true);
        }
    }

    pub fn set_overscan(&mut self, overscan: f32) {
        self.overscan = overscan.max(0.0);
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height.max(0.0);
        self.clamp_scroll();
    }

    pub fn set_scroll_offset(&mut self, offset: f32) {
        self.scroll_offset = offset;
        self.clamp_scroll();
    }

    // ===== Queries =====

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn sticky_count(&self) -> usize {
        self.sticky.min(self.item_count)
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    /// Measured height if reported, else the estimate.
    pub fn row_height(&self, index: usize) -> f32 {
        self.measured
            .get(&index)
            .copied()
            .unwrap_or(self.estimated_height)
    }

    /// Combined height of the pinned rows.
    pub fn sticky_height(&self) -> f32 {
        (0..self.sticky_count()).map(|i| self.row_height(i)).sum()
    }

    /// Height of the scrolling content (excluding pinned rows).
    pub fn content_height(&self) -> f32 {
        self.ensure_offsets();
        self.offsets.borrow().last().copied().unwrap_or(0.0)
    }

    pub fn total_height(&self) -> f32 {
        self.sticky_height() + self.content_height()
    }

    /// Height available to scrolling rows.
    pub fn scroll_viewport_height(&self) -> f32 {
        (self.viewport_height - self.sticky_height()).max(0.0)
    }

    /// Top of a row: within the pinned area for sticky rows, within the
    /// scroll content otherwise.
    pub fn row_top(&self, index: usize) -> f32 {
        let sticky = self.sticky_count();
        if index < sticky {
            return (0..index).map(|i| self.row_height(i)).sum();
        }
        self.ensure_offsets();
        let offsets = self.offsets.borrow();
        let k = (index - sticky).min(offsets.len().saturating_sub(1));
        offsets[k]
    }

    /// Always-rendered pinned rows.
    pub fn sticky_range(&self) -> Range<usize> {
        0..self.sticky_count()
    }

    /// Scrolling rows intersecting
    /// `[scroll - overscan, scroll + viewport - sticky + overscan]`.
    pub fn visible_range(&self) -> Range<usize> {
        let sticky = self.sticky_count();
        self.ensure_offsets();
        let offsets = self.offsets.borrow();
        let rows = offsets.len() - 1;

        let lo = self.scroll_offset - self.overscan;
        let hi = self.scroll_offset + self.scroll_viewport_height() + self.overscan;

        // First row whose bottom is below `lo`, first row whose top is at or
        // past `hi`.
        let start = offsets[1..].partition_point(|&bottom| bottom <= lo);
        let end = offsets[..rows].partition_point(|&top| top < hi);
        let start = start.min(end);

        trace!(start = sticky + start, end = sticky + end, "visible range");
        (sticky + start)..(sticky + end)
    }

    // ===== Updates =====

    /// Records a measured height. Returns true if layout changed.
    pub fn report_row_height(&mut self, index: usize, height: f32) -> bool {
        if index >= self.item_count || height <= 0.0 {
            return false;
        }
        if (self.row_height(index) - height).abs() < HEIGHT_EPSILON {
            return false;
        }
        self.measured.insert(index, height);
        self.dirty.set(true);
        true
    }

    /// Scrolls the minimal amount that brings `index` fully into view.
    ///
    /// Pinned rows are always in view and never move the scroll offset.
    pub fn scroll_to_index(&mut self, index: usize) {
        if index >= self.item_count || index < self.sticky_count() {
            return;
        }
        let top = self.row_top(index);
        let bottom = top + self.row_height(index);
        let viewport = self.scroll_viewport_height();

        if top < self.scroll_offset {
            self.scroll_offset = top;
        } else if bottom > self.scroll_offset + viewport {
            self.scroll_offset = bottom - viewport;
        }
        self.clamp_scroll();
    }

    /// Spacer height above the rendered scrolling rows.
    pub fn top_padding(&self, range: &Range<usize>) -> f32 {
        let sticky = self.sticky_count();
        if range.start <= sticky {
            return 0.0;
        }
        self.row_top(range.start)
    }

    /// Spacer height below the rendered scrolling rows.
    pub fn bottom_padding(&self, range: &Range<usize>) -> f32 {
        if range.end >= self.item_count {
            return 0.0;
        }
        let end = range.end.max(self.sticky_count());
        (self.content_height() - self.row_top(end)).max(0.0)
    }

    /// True once per item count when the final row is inside `rendered`.
    pub fn take_last_item_reached(&mut self, rendered: &Range<usize>) -> bool {
        if self.item_count == 0 || rendered.end < self.item_count {
            return false;
        }
        if self.last_reported == Some(self.item_count) {
            return false;
        }
        self.last_reported = Some(self.item_count);
        true
    }

    fn ensure_offsets(&self) {
        if !self.dirty.get() {
            return;
        }
        let sticky = self.sticky_count();
        let mut offsets = self.offsets.borrow_mut();
        offsets.clear();
        offsets.reserve(self.item_count - sticky + 1);
        let mut top = 0.0;
        offsets.push(top);
        for i in sticky..self.item_count {
            top += self.row_height(i);
            offsets.push(top);
        }
        self.dirty.set(false);
    }

    fn clamp_scroll(&mut self) {
        let max = (self.content_height() - self.scroll_viewport_height()).max(0.0);
        self.scroll_offset = self.scroll_offset.clamp(0.0, max);
    }
}

impl Default for VirtualList {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_HEIGHT, DEFAULT_OVERSCAN)
    }
}

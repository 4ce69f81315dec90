//! Viewport management for document scrolling
//!
//! Tracks the visible region of the materialized layout. Offsets are
//! `usize` because a fully materialized multi-megabyte bill can easily
//! exceed `u16` rows.

use std::ops::Range;

/// Maximum padding as a divisor of viewport height (25% = 4)
const MAX_PADDING_DIVISOR: usize = 4;

/// Smart padding thresholds and values
const SMALL_VIEWPORT_THRESHOLD: usize = 10;
const MEDIUM_VIEWPORT_THRESHOLD: usize = 20;
const LARGE_VIEWPORT_THRESHOLD: usize = 40;

const SMALL_VIEWPORT_PADDING: usize = 1;
const MEDIUM_VIEWPORT_PADDING: usize = 2;
const LARGE_VIEWPORT_PADDING: usize = 3;
const VERY_LARGE_VIEWPORT_PADDING: usize = 5;

/// Viewport that manages scrolling through the materialized layout
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    /// Current scroll offset from the top, in layout rows
    offset: usize,
    /// Height of the visible area, in rows
    height: usize,
    /// Total height of the materialized content, in rows
    content_height: usize,
}

impl Viewport {
    pub fn new(offset: usize, height: usize, content_height: usize) -> Self {
        Self {
            offset: offset.min(content_height.saturating_sub(height)),
            height,
            content_height,
        }
    }

    /// Get the range of visible layout rows
    pub fn visible_range(&self) -> Range<usize> {
        self.offset..self.offset.saturating_add(self.height).min(self.content_height)
    }

    /// Ensure a row span is visible with smart positioning
    ///
    /// Uses padding to avoid putting the target at the very edge of the
    /// viewport, keeping context visible around it.
    pub fn ensure_visible_with_padding(&mut self, row: usize, span: usize, padding: usize) {
        let target_top = row;
        let target_bottom = row + span.max(1);
        let viewport_top = self.offset;
        let viewport_bottom = self.offset + self.height;

        let max_padding = self.height / MAX_PADDING_DIVISOR;
        let actual_padding = padding.min(max_padding);

        if target_top < viewport_top + actual_padding {
            self.offset = target_top.saturating_sub(actual_padding);
        } else if target_bottom > viewport_bottom.saturating_sub(actual_padding) {
            let desired_offset = target_bottom + actual_padding;
            let max_offset = self.content_height.saturating_sub(self.height);
            // Never push the span's start off the top; aligning the start
            // visible takes priority over bottom padding for tall spans
            self.offset = desired_offset
                .saturating_sub(self.height)
                .min(max_offset)
                .min(target_top.saturating_sub(actual_padding));
        }
    }

    /// Scroll up by a number of rows
    pub fn scroll_up(&mut self, rows: usize) {
        self.offset = self.offset.saturating_sub(rows);
    }

    /// Scroll down by a number of rows
    pub fn scroll_down(&mut self, rows: usize) {
        let max_offset = self.content_height.saturating_sub(self.height);
        self.offset = self.offset.saturating_add(rows).min(max_offset);
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.content_height.saturating_sub(self.height);
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn content_height(&self) -> usize {
        self.content_height
    }

    /// Set the viewport height (e.g., on terminal resize)
    pub fn set_height(&mut self, height: usize) {
        self.height = height;
        let max_offset = self.content_height.saturating_sub(height);
        self.offset = self.offset.min(max_offset);
    }

    /// Set the content height (when more chunks materialize)
    ///
    /// Growth never moves the offset; shrinking (document switch) clamps it.
    pub fn set_content_height(&mut self, height: usize) {
        self.content_height = height;
        let max_offset = height.saturating_sub(self.height);
        self.offset = self.offset.min(max_offset);
    }

    pub fn is_at_bottom(&self) -> bool {
        self.offset >= self.content_height.saturating_sub(self.height)
    }

    /// Number of rows between the viewport's bottom edge and the end of the
    /// materialized content
    pub fn rows_below(&self) -> usize {
        self.content_height
            .saturating_sub(self.offset.saturating_add(self.height))
    }

    /// Calculate padding for autoscrolling based on viewport height
    pub fn smart_padding(&self) -> usize {
        match self.height {
            h if h <= SMALL_VIEWPORT_THRESHOLD => SMALL_VIEWPORT_PADDING,
            h if h <= MEDIUM_VIEWPORT_THRESHOLD => MEDIUM_VIEWPORT_PADDING,
            h if h <= LARGE_VIEWPORT_THRESHOLD => LARGE_VIEWPORT_PADDING,
            _ => VERY_LARGE_VIEWPORT_PADDING,
        }
    }
}

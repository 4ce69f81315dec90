//! Visibility sentinel: tail marker that requests window growth
//!
//! A single logical sentinel sits just past the last materialized row while
//! unmaterialized chunks remain. When the viewport's bottom edge comes
//! within the proximity margin of the materialized tail, the sentinel fires
//! exactly once and disarms; it re-arms only after the next materialization
//! commits, so one proximity event never advances the window by more than
//! one step and no event is double-counted.

use tracing::trace;

use super::viewport::Viewport;

/// Default proximity margin, in layout rows
pub const DEFAULT_PROXIMITY_MARGIN: usize = 8;

#[derive(Debug, Clone, Default)]
pub struct Sentinel {
    /// The window count this sentinel is armed for; None while disarmed
    armed_for: Option<usize>,
}

impl Sentinel {
    /// Arm the sentinel at the current tail position
    ///
    /// Called after each materialization commit (and on reset). Passing
    /// `has_more = false` removes the sentinel entirely.
    pub fn arm(&mut self, window_count: usize, has_more: bool) {
        self.armed_for = has_more.then_some(window_count);
    }

    pub fn is_armed(&self) -> bool {
        self.armed_for.is_some()
    }

    /// Check viewport proximity, firing at most once per armed position
    ///
    /// Returns true when the viewport's bottom edge is within `margin` rows
    /// of the end of materialized content. The sentinel disarms on firing
    /// and stays silent until re-armed at the new tail.
    pub fn poll(&mut self, viewport: &Viewport, margin: usize) -> bool {
        let Some(armed_for) = self.armed_for else {
            return false;
        };
        if viewport.rows_below() > margin {
            return false;
        }
        trace!(window_count = armed_for, "sentinel proximity trigger");
        self.armed_for = None;
        true
    }
}

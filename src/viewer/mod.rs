//! Progressive document viewer core
//!
//! State machine for rendering very large markup documents incrementally:
//!
//! - **Render window**: only the leading chunks are materialized
//! - **Sentinel**: scrolling near the materialized tail grows the window
//! - **Anchor navigation**: a request for an element id forces the window
//!   to the owning chunk, then scrolls to and highlights the element once
//!   the grown layout has committed
//!
//! All state changes go through [`handle_message`], which returns an
//! [`Effect`] for the runtime to execute (window growth, timers). This keeps
//! the anchor state machine fully unit-testable without a live terminal.

pub mod anchor;
pub mod layout;
pub mod sentinel;
pub mod viewport;
pub mod widget;
pub mod window;

use std::ops::Range;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::chunker::{chunk_markup, Chunk, DEFAULT_SECTION_MARKER};

pub use anchor::{AnchorError, AnchorRequest, ElementHit, PendingAnchor};
pub use layout::MaterializedLayout;
pub use sentinel::{Sentinel, DEFAULT_PROXIMITY_MARGIN};
pub use viewport::Viewport;
pub use widget::{DocumentWidget, StatusLine};
pub use window::RenderWindow;

/// Default target chunk size, in characters
pub const DEFAULT_CHUNK_SIZE: usize = 100_000;

/// Default upper bound on waiting for a grown layout to commit
pub const DEFAULT_COMMIT_WAIT: Duration = Duration::from_millis(150);

/// Tunables consumed from configuration
#[derive(Debug, Clone)]
pub struct ViewerOptions {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Structural marker recognized as a safe chunk boundary
    pub marker: String,
    /// Sentinel proximity margin in layout rows
    pub proximity_margin: usize,
    /// Fallback upper bound on the commit wait for anchor resolution
    pub commit_wait: Duration,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            marker: DEFAULT_SECTION_MARKER.to_string(),
            proximity_margin: DEFAULT_PROXIMITY_MARGIN,
            commit_wait: DEFAULT_COMMIT_WAIT,
        }
    }
}

/// Messages driving the viewer state machine
#[derive(Debug)]
pub enum ViewerMsg {
    ScrollUp(usize),
    ScrollDown(usize),
    PageUp,
    PageDown,
    ScrollToTop,
    ScrollToBottom,
    SetViewportHeight(usize),

    /// Materialize chunks so that at least `target` are live. Emitted as an
    /// effect by both the sentinel and anchor navigation; reconciled by max.
    GrowWindowTo { target: usize, epoch: u64 },

    /// Navigate to an element id, forcing materialization if needed
    ScrollToAnchor(AnchorRequest),

    /// The draw loop rendered a frame that includes the current window
    RenderCommitted { epoch: u64 },

    /// Fallback timer: the commit wait elapsed without resolution
    CommitWaitElapsed { epoch: u64, seq: u64 },

    /// A highlight decoration's display time is over
    HighlightExpired { seq: u64 },

    /// Replace the document; resets the window, sentinel and any in-flight
    /// anchor or highlight
    SetDocument(String),

    /// Change the target chunk size; re-chunks and resets like a new document
    SetChunkSize(usize),
}

/// Side effects for the runtime to execute
#[derive(Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    Batch(Vec<Effect>),
    /// Dispatch `ViewerMsg::GrowWindowTo` back into the reducer
    GrowWindowTo { target: usize, epoch: u64 },
    /// Start the commit-wait fallback timer for a pending anchor
    ScheduleCommitWait { epoch: u64, seq: u64 },
    /// Remove a highlight decoration after `after`
    ScheduleHighlightExpiry { seq: u64, after: Duration },
}

/// An active highlight decoration over a row span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub rows: Range<usize>,
    pub seq: u64,
}

/// All viewer state; fully reconstructable from the raw document and options
pub struct ViewerState {
    options: ViewerOptions,
    /// Raw markup, kept for re-chunking on chunk-size changes
    raw: String,
    chunks: Vec<Chunk>,
    /// Chunk-list identity; bumped on every document or chunk-size change.
    /// In-flight operations carry the epoch they were issued against and
    /// are dropped silently when it no longer matches.
    epoch: u64,
    window: RenderWindow,
    viewport: Viewport,
    sentinel: Sentinel,
    layout: MaterializedLayout,
    pending_anchor: Option<PendingAnchor>,
    highlight: Option<Highlight>,
    /// Monotonic sequence for anchor requests and highlights, so stale
    /// timers cannot act on superseding requests
    next_seq: u64,
    /// Most recent abandonment, surfaced on the status line
    last_abandoned: Option<AnchorError>,
}

impl ViewerState {
    pub fn new(options: ViewerOptions, viewport_height: usize) -> Self {
        let mut state = Self {
            options,
            raw: String::new(),
            chunks: Vec::new(),
            epoch: 0,
            window: RenderWindow::default(),
            viewport: Viewport::new(0, viewport_height, 0),
            sentinel: Sentinel::default(),
            layout: MaterializedLayout::default(),
            pending_anchor: None,
            highlight: None,
            next_seq: 0,
            last_abandoned: None,
        };
        state.rebuild_layout();
        state
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn window(&self) -> &RenderWindow {
        &self.window
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn layout(&self) -> &MaterializedLayout {
        &self.layout
    }

    pub fn highlight(&self) -> Option<&Highlight> {
        self.highlight.as_ref()
    }

    pub fn last_abandoned(&self) -> Option<&AnchorError> {
        self.last_abandoned.as_ref()
    }

    /// Whether a pending anchor is waiting for a render commit
    ///
    /// The draw loop checks this after each frame and sends
    /// `RenderCommitted` when true.
    pub fn awaiting_commit(&self) -> bool {
        self.pending_anchor.is_some()
    }

    fn bump_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Replace the document and reset all derived state
    fn set_document(&mut self, raw: String) {
        self.raw = raw;
        self.rechunk();
    }

    /// Re-split the current document and reset the window to one chunk
    ///
    /// Bumping the epoch here is what cancels outstanding highlight timers
    /// and invalidates any anchor resolution in flight.
    fn rechunk(&mut self) {
        self.epoch += 1;
        self.chunks = chunk_markup(&self.raw, self.options.chunk_size, &self.options.marker);
        self.window.reset(self.chunks.len());
        self.pending_anchor = None;
        self.highlight = None;
        self.last_abandoned = None;
        self.viewport.scroll_to_top();
        self.rebuild_layout();
        debug!(
            epoch = self.epoch,
            chunks = self.chunks.len(),
            chunk_size = self.options.chunk_size,
            "document re-chunked, render window reset"
        );
    }

    /// Rebuild the live layout after the window or chunk list changed
    fn rebuild_layout(&mut self) {
        self.layout =
            MaterializedLayout::build(&self.chunks, self.window.count(), &self.options.marker);
        self.viewport.set_content_height(self.layout.height());
        self.sentinel.arm(self.window.count(), self.window.has_more());
    }

    /// Check sentinel proximity after any viewport movement
    fn poll_sentinel(&mut self) -> Effect {
        if self.sentinel.poll(&self.viewport, self.options.proximity_margin) {
            Effect::GrowWindowTo {
                target: self.window.count() + 1,
                epoch: self.epoch,
            }
        } else {
            Effect::None
        }
    }

    /// Begin an anchor request: locate the owning chunk and force growth
    fn start_anchor(&mut self, request: AnchorRequest) -> Effect {
        if let Some(superseded) = self.pending_anchor.take() {
            debug!(
                element_id = %superseded.request.element_id,
                "anchor request superseded by newer request"
            );
        }

        let Some(chunk_index) = anchor::locate_chunk(&self.chunks, &request.element_id) else {
            let error = AnchorError::NotFound(request.element_id);
            warn!(%error, "anchor request abandoned");
            self.last_abandoned = Some(error);
            return Effect::None;
        };

        let epoch = self.epoch;
        let seq = self.bump_seq();
        debug!(
            element_id = %request.element_id,
            chunk_index,
            window = self.window.count(),
            "anchor located, awaiting materialization commit"
        );

        let mut effects = Vec::new();
        if chunk_index >= self.window.count() {
            // Forced jump past the sentinel's one-chunk pace
            effects.push(Effect::GrowWindowTo {
                target: chunk_index + 1,
                epoch,
            });
        }
        effects.push(Effect::ScheduleCommitWait { epoch, seq });

        self.pending_anchor = Some(PendingAnchor {
            request,
            chunk_index,
            epoch,
            seq,
        });
        Effect::Batch(effects)
    }

    /// Try to resolve the pending anchor against the committed layout
    fn resolve_anchor(&mut self, epoch: u64) -> Effect {
        if epoch != self.epoch {
            trace!(epoch, current = self.epoch, "stale render commit ignored");
            return Effect::None;
        }
        let Some(mut pending) = self.pending_anchor.take() else {
            return Effect::None;
        };
        if pending.epoch != self.epoch {
            return Effect::None;
        }

        let Some(span) = self.layout.find_element(&pending.request.element_id) else {
            // Not committed yet: keep waiting for the next frame or the
            // fallback timer, whichever comes first
            self.pending_anchor = Some(pending);
            return Effect::None;
        };

        self.viewport.ensure_visible_with_padding(
            span.start,
            span.len(),
            self.viewport.smart_padding(),
        );

        let mut effect = Effect::None;
        if pending.request.highlight_on_scroll {
            self.highlight = Some(Highlight {
                rows: span.clone(),
                seq: pending.seq,
            });
            if let Some(after) = pending.request.highlight_duration {
                effect = Effect::ScheduleHighlightExpiry {
                    seq: pending.seq,
                    after,
                };
            }
        }

        let hit = ElementHit {
            element_id: pending.request.element_id.clone(),
            chunk_index: pending.chunk_index,
            row: span.start,
        };
        debug!(element_id = %hit.element_id, row = hit.row, "anchor resolved");
        if let Some(on_found) = pending.request.on_found.take() {
            on_found(&hit);
        }
        effect
    }

    /// The commit-wait fallback fired; abandon the request if still pending
    fn commit_wait_elapsed(&mut self, epoch: u64, seq: u64) {
        let Some(pending) = self
            .pending_anchor
            .take_if(|pending| pending.epoch == epoch && pending.seq == seq)
        else {
            return;
        };
        let error = AnchorError::NotCommitted(pending.request.element_id);
        warn!(%error, "anchor request abandoned");
        self.last_abandoned = Some(error);
    }
}

/// Handle a viewer message, mutating state and returning follow-up effects
pub fn handle_message(state: &mut ViewerState, msg: ViewerMsg) -> Effect {
    match msg {
        ViewerMsg::ScrollUp(rows) => {
            state.viewport.scroll_up(rows);
            state.poll_sentinel()
        }
        ViewerMsg::ScrollDown(rows) => {
            state.viewport.scroll_down(rows);
            state.poll_sentinel()
        }
        ViewerMsg::PageUp => {
            let page = state.viewport.height().saturating_sub(2).max(1);
            state.viewport.scroll_up(page);
            state.poll_sentinel()
        }
        ViewerMsg::PageDown => {
            let page = state.viewport.height().saturating_sub(2).max(1);
            state.viewport.scroll_down(page);
            state.poll_sentinel()
        }
        ViewerMsg::ScrollToTop => {
            state.viewport.scroll_to_top();
            state.poll_sentinel()
        }
        ViewerMsg::ScrollToBottom => {
            state.viewport.scroll_to_bottom();
            state.poll_sentinel()
        }
        ViewerMsg::SetViewportHeight(height) => {
            state.viewport.set_height(height);
            state.poll_sentinel()
        }
        ViewerMsg::GrowWindowTo { target, epoch } => {
            if epoch != state.epoch {
                trace!(epoch, current = state.epoch, "stale growth request ignored");
                return Effect::None;
            }
            if state.window.grow_to(target) {
                state.rebuild_layout();
            }
            Effect::None
        }
        ViewerMsg::ScrollToAnchor(request) => state.start_anchor(request),
        ViewerMsg::RenderCommitted { epoch } => state.resolve_anchor(epoch),
        ViewerMsg::CommitWaitElapsed { epoch, seq } => {
            state.commit_wait_elapsed(epoch, seq);
            Effect::None
        }
        ViewerMsg::HighlightExpired { seq } => {
            if state.highlight.as_ref().is_some_and(|h| h.seq == seq) {
                state.highlight = None;
            }
            Effect::None
        }
        ViewerMsg::SetDocument(raw) => {
            state.set_document(raw);
            Effect::None
        }
        ViewerMsg::SetChunkSize(chunk_size) => {
            let chunk_size = chunk_size.max(1);
            if chunk_size != state.options.chunk_size {
                state.options.chunk_size = chunk_size;
                state.rechunk();
            }
            Effect::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// A bill with `sections` sections, each `lines_per_section` body lines,
    /// sized so one section fills one chunk at the given target
    fn sectioned_bill(sections: usize) -> String {
        (0..sections)
            .map(|i| {
                let body: String = (0..20).map(|l| format!("line {} of sec-{}\n", l, i)).collect();
                format!("<section id=\"sec-{}\">\n{}</section>\n", i, body)
            })
            .collect()
    }

    /// State with one chunk per section and a 10-row viewport
    fn state_with_sections(sections: usize) -> ViewerState {
        let options = ViewerOptions {
            chunk_size: 100, // smaller than one section, so one section per chunk
            ..ViewerOptions::default()
        };
        let mut state = ViewerState::new(options, 10);
        handle_message(&mut state, ViewerMsg::SetDocument(sectioned_bill(sections)));
        assert_eq!(state.chunks().len(), sections);
        state
    }

    /// Apply an effect the way the runtime would, synchronously; timer
    /// effects are returned to the caller instead of being scheduled
    fn run_effect(state: &mut ViewerState, effect: Effect, timers: &mut Vec<Effect>) {
        match effect {
            Effect::None => {}
            Effect::Batch(effects) => {
                for effect in effects {
                    run_effect(state, effect, timers);
                }
            }
            Effect::GrowWindowTo { target, epoch } => {
                let follow_up =
                    handle_message(state, ViewerMsg::GrowWindowTo { target, epoch });
                run_effect(state, follow_up, timers);
            }
            timer => timers.push(timer),
        }
    }

    fn dispatch(state: &mut ViewerState, msg: ViewerMsg) -> Vec<Effect> {
        let mut timers = Vec::new();
        let effect = handle_message(state, msg);
        run_effect(state, effect, &mut timers);
        timers
    }

    /// Simulate the draw loop: one frame rendered, commit acknowledged
    fn commit_frame(state: &mut ViewerState) -> Vec<Effect> {
        let epoch = state.epoch();
        dispatch(state, ViewerMsg::RenderCommitted { epoch })
    }

    #[test]
    fn test_empty_document_renders_nothing() {
        let mut state = ViewerState::new(ViewerOptions::default(), 10);
        dispatch(&mut state, ViewerMsg::SetDocument(String::new()));

        assert!(state.chunks().is_empty());
        assert_eq!(state.layout().height(), 0);
        assert!(!state.window().has_more());
        // Sentinel is never shown for an empty document
        assert!(!state.sentinel.is_armed());
    }

    #[test]
    fn test_initial_window_is_one_chunk() {
        let state = state_with_sections(5);
        assert_eq!(state.window().count(), 1);
        assert!(state.window().has_more());
        assert_eq!(state.layout().chunk_count(), 1);
        assert!(state.sentinel.is_armed());
    }

    #[test]
    fn test_scroll_near_tail_grows_by_exactly_one() {
        let mut state = state_with_sections(5);
        let height_before = state.layout().height();

        // Scroll to the bottom of the materialized content
        dispatch(&mut state, ViewerMsg::ScrollToBottom);

        assert_eq!(state.window().count(), 2);
        assert!(state.layout().height() > height_before);
        // Sentinel re-armed at the new tail, not fired again by the same event
        assert!(state.sentinel.is_armed());
    }

    #[test]
    fn test_sentinel_trigger_is_single_shot_per_position() {
        let mut state = state_with_sections(5);
        dispatch(&mut state, ViewerMsg::ScrollToBottom);
        assert_eq!(state.window().count(), 2);

        // Scrolling within the already-materialized region does not trigger
        dispatch(&mut state, ViewerMsg::ScrollUp(1000));
        dispatch(&mut state, ViewerMsg::ScrollDown(3));
        assert_eq!(state.window().count(), 2);
    }

    #[test]
    fn test_repeated_bottom_scrolls_materialize_everything() {
        let mut state = state_with_sections(4);
        for _ in 0..4 {
            dispatch(&mut state, ViewerMsg::ScrollToBottom);
        }
        assert_eq!(state.window().count(), 4);
        assert!(!state.window().has_more());
        // Fully materialized: sentinel omitted entirely
        assert!(!state.sentinel.is_armed());
    }

    #[test]
    fn test_anchor_resolution_grows_scrolls_and_fires_callback() {
        let mut state = state_with_sections(5);
        let found = Arc::new(AtomicUsize::new(0));
        let found_in_callback = Arc::clone(&found);

        let request = AnchorRequest::new("sec-3")
            .with_highlight(Some(Duration::from_millis(1500)))
            .with_on_found(Box::new(move |hit| {
                assert_eq!(hit.element_id, "sec-3");
                assert_eq!(hit.chunk_index, 3);
                found_in_callback.fetch_add(1, Ordering::SeqCst);
            }));

        let timers = dispatch(&mut state, ViewerMsg::ScrollToAnchor(request));
        // Forced jump: count >= k + 1
        assert_eq!(state.window().count(), 4);
        assert!(state.awaiting_commit());
        assert!(matches!(
            timers.as_slice(),
            [Effect::ScheduleCommitWait { .. }]
        ));

        // Next frame commits the grown layout
        let timers = commit_frame(&mut state);
        assert_eq!(found.load(Ordering::SeqCst), 1);
        assert!(!state.awaiting_commit());

        // Element scrolled into view
        let span = state.layout().find_element("sec-3").unwrap();
        assert!(state.viewport().visible_range().contains(&span.start));

        // Highlight applied, expiry scheduled
        let highlight = state.highlight().expect("highlight should be set");
        assert_eq!(highlight.rows, span);
        assert!(matches!(
            timers.as_slice(),
            [Effect::ScheduleHighlightExpiry { .. }]
        ));

        // A later commit must not fire the callback again
        commit_frame(&mut state);
        assert_eq!(found.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_anchor_to_already_materialized_chunk_skips_growth() {
        let mut state = state_with_sections(5);
        let timers = dispatch(
            &mut state,
            ViewerMsg::ScrollToAnchor(AnchorRequest::new("sec-0").with_highlight(None)),
        );
        assert_eq!(state.window().count(), 1);
        assert!(matches!(
            timers.as_slice(),
            [Effect::ScheduleCommitWait { .. }]
        ));

        commit_frame(&mut state);
        assert!(state.highlight().is_some());
        // No duration given: highlight persists, no expiry scheduled
    }

    #[test]
    fn test_anchor_miss_leaves_window_untouched() {
        let mut state = state_with_sections(5);
        let found = Arc::new(AtomicUsize::new(0));
        let found_in_callback = Arc::clone(&found);

        let request = AnchorRequest::new("sec-99").with_on_found(Box::new(move |_| {
            found_in_callback.fetch_add(1, Ordering::SeqCst);
        }));
        let timers = dispatch(&mut state, ViewerMsg::ScrollToAnchor(request));

        assert!(timers.is_empty());
        assert_eq!(state.window().count(), 1);
        assert!(!state.awaiting_commit());
        assert_eq!(found.load(Ordering::SeqCst), 0);
        assert_eq!(
            state.last_abandoned(),
            Some(&AnchorError::NotFound("sec-99".to_string()))
        );
    }

    #[test]
    fn test_commit_wait_fallback_abandons_request() {
        let mut state = state_with_sections(5);
        let timers = dispatch(
            &mut state,
            ViewerMsg::ScrollToAnchor(AnchorRequest::new("sec-2")),
        );
        let [Effect::ScheduleCommitWait { epoch, seq }] = timers.as_slice() else {
            panic!("expected one commit-wait timer, got {:?}", timers);
        };

        // No frame ever commits; the fallback timer fires
        dispatch(
            &mut state,
            ViewerMsg::CommitWaitElapsed {
                epoch: *epoch,
                seq: *seq,
            },
        );
        assert!(!state.awaiting_commit());
        assert_eq!(
            state.last_abandoned(),
            Some(&AnchorError::NotCommitted("sec-2".to_string()))
        );

        // A later commit is a no-op for the abandoned request
        commit_frame(&mut state);
        assert!(state.highlight().is_none());
    }

    #[test]
    fn test_newer_request_supersedes_and_survives_stale_timer() {
        let mut state = state_with_sections(5);
        let first = dispatch(
            &mut state,
            ViewerMsg::ScrollToAnchor(AnchorRequest::new("sec-1")),
        );
        let [Effect::ScheduleCommitWait { epoch, seq }] = first.as_slice() else {
            panic!("expected one commit-wait timer");
        };
        let (first_epoch, first_seq) = (*epoch, *seq);

        // Second request supersedes the first before it resolves
        dispatch(
            &mut state,
            ViewerMsg::ScrollToAnchor(AnchorRequest::new("sec-4").with_highlight(None)),
        );
        assert_eq!(state.window().count(), 5);

        // The first request's timer fires late; it must not abandon the
        // superseding request
        dispatch(
            &mut state,
            ViewerMsg::CommitWaitElapsed {
                epoch: first_epoch,
                seq: first_seq,
            },
        );
        assert!(state.awaiting_commit());

        commit_frame(&mut state);
        assert!(state.highlight().is_some());
    }

    #[test]
    fn test_document_switch_invalidates_inflight_anchor() {
        let mut state = state_with_sections(5);
        let timers = dispatch(
            &mut state,
            ViewerMsg::ScrollToAnchor(AnchorRequest::new("sec-3").with_highlight(None)),
        );
        let [Effect::ScheduleCommitWait { epoch, seq }] = timers.as_slice() else {
            panic!("expected one commit-wait timer");
        };
        let (old_epoch, old_seq) = (*epoch, *seq);

        // Document changes before the commit lands
        dispatch(&mut state, ViewerMsg::SetDocument(sectioned_bill(2)));
        assert_eq!(state.window().count(), 1);
        assert!(!state.awaiting_commit());

        // Stale commit ack and stale timer are both dropped silently
        dispatch(&mut state, ViewerMsg::RenderCommitted { epoch: old_epoch });
        dispatch(
            &mut state,
            ViewerMsg::CommitWaitElapsed {
                epoch: old_epoch,
                seq: old_seq,
            },
        );
        assert!(state.highlight().is_none());
        assert!(state.last_abandoned().is_none());
    }

    #[test]
    fn test_document_switch_cancels_highlight_timer() {
        let mut state = state_with_sections(3);
        dispatch(
            &mut state,
            ViewerMsg::ScrollToAnchor(
                AnchorRequest::new("sec-1").with_highlight(Some(Duration::from_millis(100))),
            ),
        );
        let timers = commit_frame(&mut state);
        let [Effect::ScheduleHighlightExpiry { seq, .. }] = timers.as_slice() else {
            panic!("expected one highlight expiry timer");
        };
        let highlight_seq = *seq;
        assert!(state.highlight().is_some());

        dispatch(&mut state, ViewerMsg::SetDocument(sectioned_bill(3)));
        assert!(state.highlight().is_none());

        // The old expiry firing later must not clear a future highlight
        dispatch(&mut state, ViewerMsg::HighlightExpired { seq: highlight_seq });
        assert!(state.highlight().is_none());
    }

    #[test]
    fn test_highlight_expiry_removes_decoration() {
        let mut state = state_with_sections(3);
        dispatch(
            &mut state,
            ViewerMsg::ScrollToAnchor(
                AnchorRequest::new("sec-2").with_highlight(Some(Duration::from_millis(100))),
            ),
        );
        let timers = commit_frame(&mut state);
        let [Effect::ScheduleHighlightExpiry { seq, .. }] = timers.as_slice() else {
            panic!("expected one highlight expiry timer");
        };

        dispatch(&mut state, ViewerMsg::HighlightExpired { seq: *seq });
        assert!(state.highlight().is_none());
    }

    #[test]
    fn test_concurrent_growth_reconciles_by_max() {
        let mut state = state_with_sections(8);
        let epoch = state.epoch();

        // Anchor-forced jump and a sentinel step arriving close together
        dispatch(&mut state, ViewerMsg::GrowWindowTo { target: 6, epoch });
        dispatch(&mut state, ViewerMsg::GrowWindowTo { target: 2, epoch });
        assert_eq!(state.window().count(), 6);
    }

    #[test]
    fn test_stale_growth_request_is_dropped() {
        let mut state = state_with_sections(5);
        let old_epoch = state.epoch();
        dispatch(&mut state, ViewerMsg::SetDocument(sectioned_bill(5)));

        dispatch(
            &mut state,
            ViewerMsg::GrowWindowTo {
                target: 4,
                epoch: old_epoch,
            },
        );
        assert_eq!(state.window().count(), 1);
    }

    #[test]
    fn test_chunk_size_change_resets_window() {
        let mut state = state_with_sections(5);
        dispatch(&mut state, ViewerMsg::ScrollToBottom);
        assert!(state.window().count() > 1);

        let epoch_before = state.epoch();
        dispatch(&mut state, ViewerMsg::SetChunkSize(10_000));
        assert!(state.epoch() > epoch_before);
        assert_eq!(state.window().count(), 1);
        assert_eq!(state.viewport().offset(), 0);
    }

    #[test]
    fn test_viewport_resize_can_trigger_sentinel() {
        let mut state = state_with_sections(5);
        // A much taller terminal brings the tail into proximity
        dispatch(&mut state, ViewerMsg::SetViewportHeight(500));
        assert_eq!(state.window().count(), 2);
    }
}

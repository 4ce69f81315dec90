//! Anchor requests: navigate to an element that may not be materialized
//!
//! A caller (e.g. a citation-click handler in the hosting screen) asks the
//! viewer to bring a specific element id into view. The id is located by
//! scanning chunk text for its `id` attribute, accepting both single- and
//! double-quoted syntax; the owning chunk index then drives a forced window
//! jump. Resolution and highlighting happen in the reducer once the grown
//! layout has committed.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::chunker::Chunk;

/// Why an anchor request was abandoned
///
/// Nothing here is fatal: every abandonment degrades to "no navigation
/// effect occurs" and the document stays manually scrollable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnchorError {
    #[error("element id '{0}' not present in any chunk")]
    NotFound(String),

    #[error("element id '{0}' not committed to the live view in time")]
    NotCommitted(String),
}

/// Callback invoked with the resolved element on success
pub type OnFound = Box<dyn FnOnce(&ElementHit) + Send>;

/// A caller-issued instruction to navigate to and highlight an element
///
/// Ephemeral: consumed at most once (resolved or abandoned) and superseded,
/// never queued, by a newer request. Does not survive a document switch.
pub struct AnchorRequest {
    pub element_id: String,
    pub highlight_on_scroll: bool,
    pub highlight_duration: Option<Duration>,
    pub on_found: Option<OnFound>,
}

impl AnchorRequest {
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
            highlight_on_scroll: false,
            highlight_duration: None,
            on_found: None,
        }
    }

    /// Request a highlight decoration, removed after `duration` if given
    pub fn with_highlight(mut self, duration: Option<Duration>) -> Self {
        self.highlight_on_scroll = true;
        self.highlight_duration = duration;
        self
    }

    pub fn with_on_found(mut self, on_found: OnFound) -> Self {
        self.on_found = Some(on_found);
        self
    }
}

impl fmt::Debug for AnchorRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnchorRequest")
            .field("element_id", &self.element_id)
            .field("highlight_on_scroll", &self.highlight_on_scroll)
            .field("highlight_duration", &self.highlight_duration)
            .field("on_found", &self.on_found.as_ref().map(|_| "..."))
            .finish()
    }
}

/// The resolved element, handed to `on_found`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHit {
    pub element_id: String,
    /// Index of the chunk that owns the element
    pub chunk_index: usize,
    /// First layout row of the element within the materialized layout
    pub row: usize,
}

/// An anchor request parked while its target chunk materializes
///
/// Stamped with the chunk-list epoch it targets and a per-request sequence
/// number so stale commit-wait timers cannot abandon a superseding request.
pub struct PendingAnchor {
    pub request: AnchorRequest,
    pub chunk_index: usize,
    pub epoch: u64,
    pub seq: u64,
}

/// Check whether `text` declares the element id, in either quote style
pub fn contains_element_id(text: &str, element_id: &str) -> bool {
    let double_quoted = format!("id=\"{}\"", element_id);
    let single_quoted = format!("id='{}'", element_id);
    text.contains(&double_quoted) || text.contains(&single_quoted)
}

/// Find the first chunk whose raw text declares the element id
pub fn locate_chunk(chunks: &[Chunk], element_id: &str) -> Option<usize> {
    chunks
        .iter()
        .position(|chunk| contains_element_id(&chunk.text, element_id))
}

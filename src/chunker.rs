//! Chunk splitting for large markup documents
//!
//! Splits raw bill markup into an ordered list of size-bounded chunks so the
//! viewer can materialize the document progressively. Splitting only happens
//! at occurrences of a repeating structural marker (by default the opening
//! of a `<section` element), so a marker's span is never cut in half. When
//! the input contains no marker at all, the chunker falls back to fixed-size
//! slicing snapped to `char` boundaries.

use tracing::debug;

/// Default structural marker recognized as a safe chunk boundary
pub const DEFAULT_SECTION_MARKER: &str = "<section";

/// A contiguous slice of the source document
///
/// Chunks are ordered and non-overlapping; concatenating `text` over all
/// chunks in order reproduces the source exactly (minus any slice that
/// trimmed to nothing and was dropped).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Byte offset of this chunk within the source document
    pub offset: usize,
    /// The chunk's text, owned so the document itself can be released
    pub text: String,
}

impl Chunk {
    fn new(offset: usize, text: &str) -> Self {
        Self {
            offset,
            text: text.to_string(),
        }
    }
}

/// Split raw markup into chunks of roughly `target_size` characters
///
/// Consecutive structural sections are merged into a running chunk until
/// adding the next section would exceed the target size, at which point a
/// new chunk starts. Sections larger than the target size become a chunk of
/// their own rather than being split. Chunks that are empty or whitespace
/// after trimming are dropped.
///
/// For non-empty input the result is never empty: worst case the whole
/// document comes back as a single chunk.
pub fn chunk_markup(raw: &str, target_size: usize, marker: &str) -> Vec<Chunk> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    let target_size = target_size.max(1);

    let marker_offsets: Vec<usize> = if marker.is_empty() {
        Vec::new()
    } else {
        raw.match_indices(marker).map(|(i, _)| i).collect()
    };

    if marker_offsets.is_empty() {
        debug!(
            len = raw.len(),
            target_size, "no structural marker found, falling back to fixed-size slicing"
        );
        return slice_fixed(raw, target_size);
    }

    // Section boundaries: everything before the first marker is a section of
    // its own, then one section per marker up to the next marker.
    let mut starts = Vec::with_capacity(marker_offsets.len() + 1);
    if marker_offsets[0] > 0 {
        starts.push(0);
    }
    starts.extend_from_slice(&marker_offsets);

    let mut chunks = Vec::new();
    let mut chunk_start = starts[0];
    let mut chunk_chars = 0usize;

    for (i, &section_start) in starts.iter().enumerate() {
        let section_end = starts.get(i + 1).copied().unwrap_or(raw.len());
        let section_chars = raw[section_start..section_end].chars().count();

        if chunk_chars > 0 && chunk_chars + section_chars > target_size {
            push_chunk(&mut chunks, raw, chunk_start, section_start);
            chunk_start = section_start;
            chunk_chars = 0;
        }
        chunk_chars += section_chars;
    }
    push_chunk(&mut chunks, raw, chunk_start, raw.len());

    chunks
}

/// Fixed-size fallback slicing for marker-free input
///
/// Slices at `target_size` characters, which may cut across element
/// boundaries. Slice edges always land on `char` boundaries so the output
/// stays valid UTF-8.
fn slice_fixed(raw: &str, target_size: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut slice_start = 0;
    let mut chars_in_slice = 0;

    for (byte_idx, _) in raw.char_indices() {
        if chars_in_slice == target_size {
            push_chunk(&mut chunks, raw, slice_start, byte_idx);
            slice_start = byte_idx;
            chars_in_slice = 0;
        }
        chars_in_slice += 1;
    }
    push_chunk(&mut chunks, raw, slice_start, raw.len());

    chunks
}

fn push_chunk(chunks: &mut Vec<Chunk>, raw: &str, start: usize, end: usize) {
    let text = &raw[start..end];
    if text.trim().is_empty() {
        return;
    }
    chunks.push(Chunk::new(start, text));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reassemble(chunks: &[Chunk]) -> String {
        chunks.iter().map(|c| c.text.as_str()).collect()
    }

    fn sample_bill(sections: usize, section_body: &str) -> String {
        (0..sections)
            .map(|i| format!("<section id=\"sec-{}\">{}</section>\n", i, section_body))
            .collect()
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        assert!(chunk_markup("", 100, DEFAULT_SECTION_MARKER).is_empty());
        assert!(chunk_markup("   \n\t  ", 100, DEFAULT_SECTION_MARKER).is_empty());
    }

    #[test]
    fn test_reconstruction_with_markers() {
        let raw = sample_bill(20, "Be it enacted by the Senate and House of Representatives");
        let chunks = chunk_markup(&raw, 200, DEFAULT_SECTION_MARKER);
        assert_eq!(reassemble(&chunks), raw);
    }

    #[test]
    fn test_reconstruction_without_markers() {
        let raw = "plain text with no structure at all, repeated. ".repeat(50);
        let chunks = chunk_markup(&raw, 100, DEFAULT_SECTION_MARKER);
        assert_eq!(reassemble(&chunks), raw);
        // Fallback totality: no gaps, no overlaps
        let mut expected_offset = 0;
        for chunk in &chunks {
            assert_eq!(chunk.offset, expected_offset);
            expected_offset += chunk.text.len();
        }
        assert_eq!(expected_offset, raw.len());
    }

    #[test]
    fn test_no_boundary_inside_marker_span() {
        let raw = sample_bill(50, "short");
        let chunks = chunk_markup(&raw, 60, DEFAULT_SECTION_MARKER);
        assert!(chunks.len() > 1);
        for chunk in &chunks[1..] {
            // Every chunk after the first starts exactly at a marker
            assert!(chunk.text.starts_with(DEFAULT_SECTION_MARKER));
        }
    }

    #[test]
    fn test_sections_merge_up_to_target_size() {
        // Each section is 34 chars; three fit in 110, the fourth starts a new chunk
        let raw = sample_bill(4, "x");
        let section_len = raw.len() / 4;
        let chunks = chunk_markup(&raw, section_len * 3 + 5, DEFAULT_SECTION_MARKER);
        assert_eq!(chunks.len(), 2);
        assert_eq!(
            chunks[0].text.matches(DEFAULT_SECTION_MARKER).count(),
            3
        );
    }

    #[test]
    fn test_oversized_section_becomes_own_chunk() {
        let big = "word ".repeat(100);
        let raw = sample_bill(3, &big);
        let chunks = chunk_markup(&raw, 50, DEFAULT_SECTION_MARKER);
        assert_eq!(chunks.len(), 3);
        assert_eq!(reassemble(&chunks), raw);
    }

    #[test]
    fn test_prefix_before_first_marker_is_kept() {
        let raw = format!("<preamble>To amend title 5</preamble>{}", sample_bill(2, "x"));
        let chunks = chunk_markup(&raw, 30, DEFAULT_SECTION_MARKER);
        assert!(chunks[0].text.starts_with("<preamble>"));
        assert_eq!(reassemble(&chunks), raw);
    }

    #[test]
    fn test_whitespace_only_prefix_is_dropped() {
        let raw = format!("\n\n   {}", sample_bill(2, "x"));
        let chunks = chunk_markup(&raw, 10_000, DEFAULT_SECTION_MARKER);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].text.starts_with(DEFAULT_SECTION_MARKER));
    }

    #[test]
    fn test_single_chunk_when_everything_fits() {
        let raw = sample_bill(5, "body");
        let chunks = chunk_markup(&raw, 1_000_000, DEFAULT_SECTION_MARKER);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, raw);
    }

    #[test]
    fn test_fallback_respects_char_boundaries() {
        // Multi-byte characters must not be cut mid-codepoint
        let raw = "§".repeat(100);
        let chunks = chunk_markup(&raw, 7, DEFAULT_SECTION_MARKER);
        assert_eq!(reassemble(&chunks), raw);
        for chunk in &chunks[..chunks.len() - 1] {
            assert_eq!(chunk.text.chars().count(), 7);
        }
    }

    #[test]
    fn test_evenly_spaced_markers_near_target_size() {
        // Five sections of ~100k chars with a 100k target should give ~5 chunks
        let body = "a".repeat(100_000 - 34);
        let raw = sample_bill(5, &body);
        let chunks = chunk_markup(&raw, 100_000, DEFAULT_SECTION_MARKER);
        assert_eq!(chunks.len(), 5);
        assert_eq!(reassemble(&chunks), raw);
    }
}

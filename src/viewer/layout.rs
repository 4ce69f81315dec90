//! Materialized layout: the live view of the leading chunks
//!
//! The layout is the line-level form of `chunks[0..count]`, rebuilt whenever
//! the render window or the chunk list changes. It is what the widget draws
//! and what anchor resolution queries: an element "exists in the live view"
//! exactly when its id attribute appears on one of these lines.

use std::ops::Range;

use super::anchor::contains_element_id;
use crate::chunker::Chunk;

#[derive(Debug, Clone, Default)]
pub struct MaterializedLayout {
    /// All rows of the materialized chunks, in document order
    lines: Vec<String>,
    /// Row range owned by each materialized chunk
    chunk_rows: Vec<Range<usize>>,
    /// Structural marker used to delimit element spans
    marker: String,
}

impl MaterializedLayout {
    /// Build the layout for the first `count` chunks
    pub fn build(chunks: &[Chunk], count: usize, marker: &str) -> Self {
        let count = count.min(chunks.len());
        let mut lines = Vec::new();
        let mut chunk_rows = Vec::with_capacity(count);

        for chunk in &chunks[..count] {
            let start = lines.len();
            lines.extend(chunk.text.lines().map(str::to_string));
            chunk_rows.push(start..lines.len());
        }

        Self {
            lines,
            chunk_rows,
            marker: marker.to_string(),
        }
    }

    /// Total height of the materialized content, in rows
    pub fn height(&self) -> usize {
        self.lines.len()
    }

    /// Number of chunks this layout materializes
    pub fn chunk_count(&self) -> usize {
        self.chunk_rows.len()
    }

    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(String::as_str)
    }

    pub fn lines(&self, rows: Range<usize>) -> impl Iterator<Item = &str> {
        let end = rows.end.min(self.lines.len());
        let start = rows.start.min(end);
        self.lines[start..end].iter().map(String::as_str)
    }

    /// Locate an element by id in the live view
    ///
    /// Returns the element's row span: from the line bearing the id
    /// attribute to the line before the next structural marker within the
    /// same chunk (or the chunk's end).
    pub fn find_element(&self, element_id: &str) -> Option<Range<usize>> {
        let (chunk_index, row) = self
            .chunk_rows
            .iter()
            .enumerate()
            .find_map(|(chunk_index, rows)| {
                self.lines[rows.clone()]
                    .iter()
                    .position(|line| contains_element_id(line, element_id))
                    .map(|offset| (chunk_index, rows.start + offset))
            })?;

        let chunk_end = self.chunk_rows[chunk_index].end;
        let span_end = self.lines[row + 1..chunk_end]
            .iter()
            .position(|line| line.trim_start().starts_with(&self.marker))
            .map(|offset| row + 1 + offset)
            .unwrap_or(chunk_end);

        Some(row..span_end)
    }
}

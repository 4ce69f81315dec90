//! Buffer inspection helpers for widget tests

use ratatui::buffer::Buffer;

/// Collect the rendered buffer as one string per row, right-trimmed.
pub fn buffer_lines(buf: &Buffer) -> Vec<String> {
    let area = buf.area();
    (area.top()..area.bottom())
        .map(|y| {
            let mut line = String::new();
            for x in area.left()..area.right() {
                line.push_str(buf[(x, y)].symbol());
            }
            line.trim_end().to_string()
        })
        .collect()
}

/// Assert the whole buffer matches the expected rows (right-trimmed).
pub fn assert_buffer(buf: &Buffer, expected: &[&str]) {
    let lines = buffer_lines(buf);
    assert_eq!(
        lines.len(),
        expected.len(),
        "row count mismatch: {lines:#?}"
    );
    for (i, (got, want)) in lines.iter().zip(expected.iter()).enumerate() {
        assert_eq!(got, want, "row {i} mismatch in {lines:#?}");
    }
}

/// Assert one buffer row matches (right-trimmed).
pub fn assert_buffer_row(buf: &Buffer, row: u16, expected: &str) {
    let lines = buffer_lines(buf);
    let got = lines
        .get(row as usize)
        .unwrap_or_else(|| panic!("row {row} out of range: {lines:#?}"));
    assert_eq!(got, expected, "row {row} mismatch in {lines:#?}");
}

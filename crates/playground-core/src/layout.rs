//! Display-row estimates for result heights.
//!
//! Computes how many visual rows a piece of source occupies when soft-wrapped at a fixed cell
//! width. Character widths follow UAX #11; tabs advance to the next tab stop.

use unicode_width::UnicodeWidthChar;

/// Default tab width (in cells) used when a caller does not specify a tab width.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Visual width of a character (0, 1 or 2 cells).
pub fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(1)
}

/// Visual width of `ch` when it starts at `cell_offset_in_line`.
pub fn cell_width_at(ch: char, cell_offset_in_line: usize, tab_width: usize) -> usize {
    if ch == '\t' {
        let tab_width = tab_width.max(1);
        tab_width - cell_offset_in_line % tab_width
    } else {
        char_width(ch)
    }
}

/// Number of visual rows `line` occupies when wrapped at `wrap_width` cells.
///
/// A trailing terminator is ignored. Without a wrap width (or with a zero width) every line is a
/// single row. A wide character that does not fit the rest of a row moves to the next row intact.
pub fn visual_rows(line: &str, wrap_width: Option<usize>, tab_width: usize) -> usize {
    let Some(width) = wrap_width.filter(|&w| w > 0) else {
        return 1;
    };
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);

    let mut rows = 1usize;
    let mut x_in_row = 0usize;
    let mut x_in_line = 0usize;
    for ch in line.chars() {
        let ch_width = cell_width_at(ch, x_in_line, tab_width);
        if x_in_row > 0 && x_in_row + ch_width > width {
            rows += 1;
            x_in_row = 0;
        }
        x_in_row += ch_width;
        x_in_line += ch_width;
    }
    rows
}

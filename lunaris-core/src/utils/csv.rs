//! CSV quoting.
//!
//! Every cell is quoted unconditionally and inner quotes are doubled, which
//! is RFC 4180 compatible for any content.

/// Quote a single cell.
pub fn escape_cell(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

/// Quote and join one row.
pub fn encode_row<I, S>(cells: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    cells
        .into_iter()
        .map(|cell| escape_cell(cell.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Inverse of [`escape_cell`]. Unquoted input is returned unchanged.
pub fn unescape_cell(cell: &str) -> String {
    cell.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .map_or_else(|| cell.to_string(), |inner| inner.replace("\"\"", "\""))
}

/// Split one encoded row back into cells.
pub fn decode_row(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            ('"', _) => in_quotes = !in_quotes,
            (',', false) => cells.push(std::mem::take(&mut current)),
            (other, _) => current.push(other),
        }
    }
    cells.push(current);
    cells
}

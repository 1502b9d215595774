//! Find the real column header in exports that put report metadata in front of it.

/// The amount of expected column names a row needs to contain to be considered the header.
pub const MIN_MATCHES: usize = 2;

/// Return a reader over all records of `content`, without treating any of them as header.
///
/// Rows may have varying amounts of fields, as metadata rows rarely have the shape of the table below them.
pub fn records(content: &[u8]) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content)
}

/// Decode a single field leniently and strip surrounding whitespace as well as a byte order mark.
pub fn cell(field: &[u8]) -> String {
    let value = String::from_utf8_lossy(field);
    value.trim().trim_start_matches('\u{feff}').trim().to_owned()
}

/// Where the header row was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// The zero-based line of the header, blank lines included.
    pub line: usize,
    /// The byte offset at which the header line starts.
    pub offset: usize,
}

/// Return the position of the first line in `content` which contains at least [`MIN_MATCHES`] of `tokens`
/// as entire cells, or `None` if there is no such line.
///
/// Each line is read as a comma separated row of its own, so quoted cells spanning lines count as
/// multiple lines.
pub fn find(content: &[u8], tokens: &[&str]) -> Option<Position> {
    let mut offset = 0;
    for (line, text) in content.split_inclusive(|b| *b == b'\n').enumerate() {
        if is_header(text, tokens) {
            return Some(Position { line, offset });
        }
        offset += text.len();
    }
    None
}

/// Return the zero-based line index of the header row, see [`find()`].
pub fn locate(content: &[u8], tokens: &[&str]) -> Option<usize> {
    find(content, tokens).map(|position| position.line)
}

fn is_header(line: &[u8], tokens: &[&str]) -> bool {
    let mut record = csv::ByteRecord::new();
    match records(line).read_byte_record(&mut record) {
        Ok(true) => {}
        Ok(false) | Err(_) => return false,
    }
    let cells: Vec<_> = record.iter().map(cell).collect();
    let matches = tokens
        .iter()
        .filter(|token| cells.iter().any(|cell| cell.as_str() == **token))
        .count();
    matches >= MIN_MATCHES
}

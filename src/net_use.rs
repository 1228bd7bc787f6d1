//! Parsing and querying of the table printed by `NET USE`.
//!
//! The output is a fixed-width table whose column boundaries are only known
//! from the header row:
//!
//! ```text
//! New connections will be remembered.
//!
//!
//! Status       Local     Remote                    Network
//!
//! -------------------------------------------------------------------------------
//! OK           Z:        \\fileserver\share        Microsoft Windows Network
//! OK                     \\some.remote.path\with-a-long-path
//!                                                  Microsoft Windows Network
//! The command completed successfully.
//! ```
//!
//! A value too long for its column pushes the rest of the row onto an indented
//! continuation line.
use tracing::trace;

use crate::columns;
use crate::directory::normalize_unc_path;
use crate::sanitize::clean_drive_letter;

const EMPTY_TABLE_INDICATOR: &str = "There are no entries in the list.";
const LAST_TABLE_LINE: &str = "The command completed successfully.";

/// One header column: its name and the character range it covers. The last
/// column has no end and runs to the end of the line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Column {
    name: String,
    start: usize,
    end: Option<usize>,
}

impl Column {
    fn extract(&self, line: &[char]) -> String {
        let end = self.end.map_or(line.len(), |end| end.min(line.len()));
        if self.start >= end {
            return String::new();
        }
        line[self.start..end]
            .iter()
            .collect::<String>()
            .trim()
            .to_string()
    }
}

/// A single connection reported by `NET USE`, keyed by header column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTableRow {
    fields: Vec<(String, String)>,
}

impl ConnectionTableRow {
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }

    /// The value under `column`, matched case-sensitively against the header.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// `(column, value)` pairs in header order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    fn matches(&self, column: &str, expected: &str) -> bool {
        self.get(column)
            .is_some_and(|actual| field_matches(column, actual, expected))
    }
}

/// Drive columns ignore case and a missing `:`, remote columns ignore case,
/// trailing backslashes and a trailing `\IPC$`, status ignores case. Anything
/// else must match exactly.
fn field_matches(column: &str, actual: &str, expected: &str) -> bool {
    if column.eq_ignore_ascii_case(columns::LOCAL) {
        clean_drive_letter(actual) == clean_drive_letter(expected)
    } else if column.eq_ignore_ascii_case(columns::REMOTE) {
        normalize_unc_path(actual) == normalize_unc_path(expected)
    } else if column.eq_ignore_ascii_case(columns::STATUS) {
        actual.to_lowercase() == expected.to_lowercase()
    } else {
        actual == expected
    }
}

/// The rows of one `NET USE` listing, in the order they were printed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionTable {
    rows: Vec<ConnectionTableRow>,
}

impl ConnectionTable {
    /// Same as [`parse_net_use_table`].
    pub fn parse(text: &str) -> Self {
        parse_net_use_table(text)
    }

    pub fn rows(&self) -> &[ConnectionTableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every row's value in `column`, in row order.
    pub fn get_column(&self, column: &str) -> Vec<&str> {
        self.rows.iter().filter_map(|row| row.get(column)).collect()
    }

    /// Rows satisfying every `(column, value)` criterion.
    ///
    /// A criterion naming a column the table does not have matches nothing.
    /// With no criteria every row is returned.
    pub fn get_matching_rows(&self, criteria: &[(&str, &str)]) -> Vec<&ConnectionTableRow> {
        self.rows
            .iter()
            .filter(|row| {
                criteria
                    .iter()
                    .all(|(column, expected)| row.matches(column, expected))
            })
            .collect()
    }

    /// All remote paths, including connections without a drive.
    pub fn connected_paths(&self) -> Vec<&str> {
        self.get_column(columns::REMOTE)
    }

    /// All local devices that are set.
    pub fn connected_devices(&self) -> Vec<&str> {
        self.get_column(columns::LOCAL)
            .into_iter()
            .filter(|local| !local.is_empty())
            .collect()
    }
}

impl FromIterator<ConnectionTableRow> for ConnectionTable {
    fn from_iter<I: IntoIterator<Item = ConnectionTableRow>>(rows: I) -> Self {
        Self {
            rows: rows.into_iter().collect(),
        }
    }
}

/// Parses the standard output of `NET USE`.
///
/// Column names come from the header, so rows are keyed by whatever the
/// header says. The parser trusts its input: text without a header and a
/// dashed separator line yields an empty table.
pub fn parse_net_use_table(text: &str) -> ConnectionTable {
    if text.contains(EMPTY_TABLE_INDICATOR) {
        return ConnectionTable::default();
    }

    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let Some(separator) = lines.iter().position(|line| is_separator(line)) else {
        trace!("no separator line in NET USE output");
        return ConnectionTable::default();
    };
    let Some(columns) = header_columns(&lines[..separator]) else {
        trace!("no header row in NET USE output");
        return ConnectionTable::default();
    };

    let body: Vec<Vec<char>> = lines[separator + 1..]
        .iter()
        .take_while(|line| !line.is_empty() && **line != LAST_TABLE_LINE)
        .map(|line| line.chars().collect())
        .collect();

    let mut rows = Vec::with_capacity(body.len());
    for (index, line) in body.iter().enumerate() {
        if starts_with_space(line) {
            continue;
        }
        let row = match body.get(index + 1) {
            Some(next) if starts_with_space(next) => parse_wrapped_row(line, next, &columns),
            _ => parse_row(line, &columns),
        };
        rows.push(row);
    }

    trace!(rows = rows.len(), "parsed NET USE table");
    ConnectionTable { rows }
}

fn is_separator(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| c == '-')
}

fn starts_with_space(line: &[char]) -> bool {
    line.first() == Some(&' ')
}

/// Columns from the last header line starting with a letter, which skips the
/// "New connections will be remembered." banner and blank lines.
fn header_columns(header: &[&str]) -> Option<Vec<Column>> {
    let headings = header
        .iter()
        .rev()
        .find(|line| line.chars().next().is_some_and(char::is_alphabetic))?;

    let names: Vec<&str> = headings.split_whitespace().collect();
    let starts: Vec<usize> = names
        .iter()
        .map(|name| char_offset(headings, name))
        .collect();

    let columns = names
        .iter()
        .zip(&starts)
        .enumerate()
        .map(|(index, (name, &start))| Column {
            name: name.to_string(),
            start,
            end: starts.get(index + 1).map(|next| next.saturating_sub(1)),
        })
        .collect();
    Some(columns)
}

fn char_offset(line: &str, needle: &str) -> usize {
    line.find(needle)
        .map_or(0, |byte| line[..byte].chars().count())
}

fn wrapped_column(header: &[Column]) -> usize {
    header
        .iter()
        .position(|column| column.name == columns::REMOTE)
        .unwrap_or_else(|| header.len().saturating_sub(2))
}

fn parse_row(line: &[char], columns: &[Column]) -> ConnectionTableRow {
    ConnectionTableRow::from_fields(
        columns
            .iter()
            .map(|column| (column.name.clone(), column.extract(line))),
    )
}

/// Merges `line` with its continuation.
///
/// The wrapped column is the `Remote` column, or the second-to-last column
/// when the header has no `Remote`. It is stretched to the end of `line`, so a
/// path keeps any spaces it has near a column boundary, and the continuation
/// text becomes the next column. If the wrapped column is the last one, the
/// continuation is appended to it after one space.
fn parse_wrapped_row(line: &[char], next: &[char], columns: &[Column]) -> ConnectionTableRow {
    let width = line.len();
    let continuation = next.iter().collect::<String>().trim().to_string();
    let wrapped = wrapped_column(columns);

    if wrapped + 1 >= columns.len() {
        let mut row = parse_row(line, columns);
        if let Some((_, value)) = row.fields.last_mut() {
            value.push(' ');
            value.push_str(&continuation);
        }
        return row;
    }

    let merged: Vec<char> = line
        .iter()
        .copied()
        .chain(std::iter::once(' '))
        .chain(continuation.chars())
        .collect();
    let adjusted: Vec<Column> = columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            if index == wrapped {
                Column {
                    end: Some(width),
                    ..column.clone()
                }
            } else if index == wrapped + 1 {
                Column {
                    start: width + 1,
                    end: None,
                    ..column.clone()
                }
            } else if index > wrapped + 1 {
                Column {
                    start: merged.len(),
                    end: None,
                    ..column.clone()
                }
            } else {
                column.clone()
            }
        })
        .collect();

    parse_row(&merged, &adjusted)
}

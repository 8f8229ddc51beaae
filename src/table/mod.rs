// src/table/mod.rs

pub mod load;

use std::fmt;

use chrono::NaiveDate;
use tracing::warn;

/// A single scalar cell of an uploaded spreadsheet.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Empty,
}

impl Cell {
    /// Parse a raw string field into the narrowest cell type.
    /// Whitespace is trimmed first; blank fields become [`Cell::Empty`].
    pub fn parse(raw: &str) -> Cell {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        if let Ok(n) = trimmed.parse::<f64>() {
            if n.is_finite() {
                return Cell::Number(n);
            }
        }
        for format in ["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y"] {
            if let Ok(d) = NaiveDate::parse_from_str(trimmed, format) {
                return Cell::Date(d);
            }
        }
        Cell::Text(trimmed.to_string())
    }

    /// Numeric view of the cell. Text and dates contribute nothing to sums.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => f.write_str(&format_number(*n)),
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Cell::Empty => Ok(()),
        }
    }
}

/// Render a number without a trailing `.0` for integral values, so cell text
/// stays stable regardless of how the value was parsed.
pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// The in-memory representation of one uploaded spreadsheet: ordered column
/// names plus row-major cells. Immutable for the life of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table, normalizing every row to the header width. Short rows
    /// are padded with empty cells; surplus cells are dropped with a warning,
    /// matching how ragged exports are usually tolerated.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Table {
        let width = headers.len();
        let mut ragged = 0usize;
        let rows = rows
            .into_iter()
            .map(|mut row| {
                if row.len() > width {
                    ragged += 1;
                    row.truncate(width);
                } else {
                    while row.len() < width {
                        row.push(Cell::Empty);
                    }
                }
                row
            })
            .collect();
        if ragged > 0 {
            warn!(rows = ragged, "rows had more cells than headers; extra cells dropped");
        }
        Table { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.headers.len()
    }

    /// Index of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// The first `n` rows, as a new table over the same columns.
    pub fn head(&self, n: usize) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Project onto the named columns, in the given order.
    /// Returns `None` if any column is absent.
    pub fn select(&self, names: &[&str]) -> Option<Table> {
        let indices: Vec<usize> = names
            .iter()
            .map(|name| self.column_index(name))
            .collect::<Option<_>>()?;
        let headers = names.iter().map(|n| n.to_string()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Some(Table { headers, rows })
    }

    /// Cap the table at the first `max_rows` rows and `max_columns` columns.
    pub fn truncated(&self, max_rows: usize, max_columns: usize) -> Table {
        let headers: Vec<String> = self.headers.iter().take(max_columns).cloned().collect();
        let width = headers.len();
        let rows = self
            .rows
            .iter()
            .take(max_rows)
            .map(|row| row.iter().take(width).cloned().collect())
            .collect();
        Table { headers, rows }
    }
}

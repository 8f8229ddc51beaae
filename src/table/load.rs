// src/table/load.rs

use std::{fs, path::Path};

use calamine::{open_workbook_auto, Data, Range, Reader};
use csv::ReaderBuilder;
use encoding_rs::WINDOWS_1252;
use tracing::info;

use super::{Cell, Table};
use crate::error::LoadError;

/// Load an uploaded file, dispatching on its extension.
pub fn load_path(path: impl AsRef<Path>) -> Result<Table, LoadError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let table = match ext.as_str() {
        "csv" => load_csv_bytes(&fs::read(path)?)?,
        "xlsx" | "xls" => load_excel_path(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };
    info!(
        file = %path.display(),
        rows = table.n_rows(),
        columns = table.n_columns(),
        "loaded table"
    );
    Ok(table)
}

/// Parse CSV bytes assumed to be in the legacy windows-1252 encoding the
/// upstream exports use. Malformed byte sequences reject the whole file.
pub fn load_csv_bytes(bytes: &[u8]) -> Result<Table, LoadError> {
    if bytes.is_empty() {
        return Err(LoadError::Empty);
    }
    let (text, _, had_errors) = WINDOWS_1252.decode(bytes);
    if had_errors {
        return Err(LoadError::Decode {
            encoding: "windows-1252",
        });
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::Empty);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::parse).collect());
    }
    Ok(Table::new(headers, rows))
}

/// Load the first worksheet of an Excel workbook.
pub fn load_excel_path(path: impl AsRef<Path>) -> Result<Table, LoadError> {
    let mut workbook = open_workbook_auto(path.as_ref())?;
    let range = workbook.worksheet_range_at(0).ok_or(LoadError::Empty)??;
    table_from_range(&range)
}

fn table_from_range(range: &Range<Data>) -> Result<Table, LoadError> {
    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or(LoadError::Empty)?
        .iter()
        .map(|d| d.to_string().trim().to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::Empty);
    }
    let rows = rows
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();
    Ok(Table::new(headers, rows))
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::String(s) => Cell::parse(s),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(d) => Cell::Date(d.date()),
            None => Cell::Empty,
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::parse(s),
        Data::Error(e) => Cell::Text(format!("{:?}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn csv_bytes_become_typed_cells() -> Result<()> {
        let table = load_csv_bytes(b"Name,Gross Earnings,Date of Birth\nAlice,1500,14/03/1991\nBob,,\n")?;
        assert_eq!(
            table.headers(),
            &["Name", "Gross Earnings", "Date of Birth"]
        );
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.rows()[0][1], Cell::Number(1500.0));
        assert!(table.rows()[1][1].is_empty());
        Ok(())
    }

    #[test]
    fn windows_1252_bytes_decode() -> Result<()> {
        // 0xE9 is e-acute in windows-1252; invalid as UTF-8.
        let table = load_csv_bytes(b"Name\nRen\xe9\n")?;
        assert_eq!(table.rows()[0][0], Cell::Text("Ren\u{e9}".to_string()));
        Ok(())
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(load_csv_bytes(b""), Err(LoadError::Empty)));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_path("data.parquet").unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "parquet"));
    }

    #[test]
    fn excel_cells_map_to_table_cells() {
        assert_eq!(cell_from_data(&Data::Int(7)), Cell::Number(7.0));
        assert_eq!(cell_from_data(&Data::Float(1.5)), Cell::Number(1.5));
        assert_eq!(
            cell_from_data(&Data::String("yes".into())),
            Cell::Text("yes".into())
        );
        assert_eq!(cell_from_data(&Data::Empty), Cell::Empty);
    }
}

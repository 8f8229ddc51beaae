// src/history/export.rs

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use super::SessionHistory;
use crate::error::ExportError;

/// Write the session history as `question,response` CSV rows in ask order.
pub fn write_csv<W: io::Write>(history: &SessionHistory, writer: W) -> Result<(), ExportError> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(["question", "response"])?;
    for entry in history.chronological() {
        w.write_record([&entry.question, &entry.answer])?;
    }
    w.flush()?;
    Ok(())
}

/// Reload `(question, response)` pairs from a CSV export, in file order.
pub fn read_csv<R: io::Read>(reader: R) -> Result<Vec<(String, String)>, ExportError> {
    let mut r = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    let mut pairs = Vec::new();
    for record in r.records() {
        let record = record?;
        pairs.push((
            record.get(0).unwrap_or("").to_string(),
            record.get(1).unwrap_or("").to_string(),
        ));
    }
    Ok(pairs)
}

/// Write the history as a Markdown document: a title, then one heading per
/// question with its answer as a paragraph.
pub fn write_markdown<W: io::Write>(
    history: &SessionHistory,
    mut writer: W,
) -> Result<(), ExportError> {
    writeln!(writer, "# Chatbot Search History")?;
    for entry in history.chronological() {
        writeln!(writer)?;
        writeln!(writer, "## Q: {}", entry.question)?;
        writeln!(writer)?;
        writeln!(writer, "A: {}", entry.answer)?;
    }
    Ok(())
}

pub fn write_csv_path(history: &SessionHistory, path: &Path) -> Result<(), ExportError> {
    write_csv(history, File::create(path)?)?;
    info!(file = %path.display(), entries = history.len(), "exported history CSV");
    Ok(())
}

pub fn write_markdown_path(history: &SessionHistory, path: &Path) -> Result<(), ExportError> {
    write_markdown(history, File::create(path)?)?;
    info!(file = %path.display(), entries = history.len(), "exported history document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn history() -> SessionHistory {
        let mut h = SessionHistory::new();
        h.record("Overall Bonus Analysis", "Totals are up, led by BCB.");
        h.record("Gender Wise Analysis", "Earnings are evenly split.");
        h.record("Tricky, \"quoted\" question?", "Line one.\nLine two.");
        h
    }

    #[test]
    fn csv_round_trips_pairs_in_ask_order() -> Result<()> {
        let history = history();
        let mut buf = Vec::new();
        write_csv(&history, &mut buf)?;

        let pairs = read_csv(buf.as_slice())?;
        let expected: Vec<(String, String)> = history
            .chronological()
            .map(|e| (e.question.clone(), e.answer.clone()))
            .collect();
        assert_eq!(pairs, expected);
        Ok(())
    }

    #[test]
    fn csv_header_names_are_fixed() -> Result<()> {
        let mut buf = Vec::new();
        write_csv(&SessionHistory::new(), &mut buf)?;
        assert_eq!(String::from_utf8(buf)?, "question,response\n");
        Ok(())
    }

    #[test]
    fn markdown_has_one_heading_per_question() -> Result<()> {
        let mut buf = Vec::new();
        write_markdown(&history(), &mut buf)?;
        let text = String::from_utf8(buf)?;
        assert!(text.starts_with("# Chatbot Search History\n"));
        assert_eq!(text.matches("## Q: ").count(), 3);
        assert!(text.contains("## Q: Overall Bonus Analysis\n\nA: Totals are up, led by BCB.\n"));
        Ok(())
    }

    #[test]
    fn files_are_written_via_tempdir() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let csv_path = dir.path().join("search_history.csv");
        let doc_path = dir.path().join("search_history.md");
        let history = history();

        write_csv_path(&history, &csv_path)?;
        write_markdown_path(&history, &doc_path)?;

        let pairs = read_csv(File::open(&csv_path)?)?;
        assert_eq!(pairs.len(), 3);
        assert!(std::fs::read_to_string(&doc_path)?.contains("## Q: Gender Wise Analysis"));
        Ok(())
    }
}

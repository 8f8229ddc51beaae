// src/analyze/feature.rs
//
// Feature-matrix analysis: each non-metadata column is a country, cells say
// whether the row's feature is available there ("yes"). Per-country feature
// lists are summarized through the completion service.

use std::collections::HashSet;
use std::io;

use once_cell::sync::Lazy;
use tracing::{debug, info};

use crate::error::{CompletionError, ExportError};
use crate::llm::CompletionClient;
use crate::prompt::{self, PromptPolicy};
use crate::table::Table;

/// Columns that describe the feature itself rather than a country.
static META_COLUMNS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["S.No", "Feature", "Description", "Common", "Remarks"]
        .into_iter()
        .collect()
});

/// The summary produced for one country column.
#[derive(Debug, Clone, PartialEq)]
pub struct CountrySummary {
    pub country: String,
    pub summary: String,
}

/// Every column of the matrix that names a country.
pub fn country_columns(table: &Table) -> Vec<String> {
    table
        .headers()
        .iter()
        .filter(|h| !META_COLUMNS.contains(h.as_str()))
        .cloned()
        .collect()
}

/// The features available in `country`: the `[Feature, Description, country]`
/// projection, keeping rows where every cell is populated and the country
/// cell reads "yes" (case-insensitive). `None` when nothing survives.
pub fn features_for_country(table: &Table, country: &str) -> Option<Table> {
    let projected = table.select(&["Feature", "Description", country])?;
    let rows: Vec<_> = projected
        .rows()
        .iter()
        .filter(|row| {
            row.iter().all(|cell| !cell.is_empty())
                && row[2].to_string().eq_ignore_ascii_case("yes")
        })
        .cloned()
        .collect();
    if rows.is_empty() {
        return None;
    }
    Some(Table::new(projected.headers().to_vec(), rows))
}

/// Ask the completion service for a summary of each country's features.
/// Countries with no available features are skipped. The first service
/// fault aborts the sweep; no call is retried.
pub async fn summarize_countries(
    client: &CompletionClient,
    table: &Table,
    policy: &PromptPolicy,
) -> Result<Vec<CountrySummary>, CompletionError> {
    let mut results = Vec::new();
    for country in country_columns(table) {
        let Some(subset) = features_for_country(table, &country) else {
            debug!(country = %country, "no available features; skipped");
            continue;
        };
        let question = format!("Summarize features for {country}");
        let user_prompt = prompt::build_prompt(&subset, &question, policy);
        let summary = client.complete(prompt::SYSTEM_PROMPT, &user_prompt).await?;
        info!(country = %country, "summarized features");
        results.push(CountrySummary { country, summary });
    }
    Ok(results)
}

/// Write the per-country summaries as a `Country,Summary` CSV.
pub fn write_summaries_csv<W: io::Write>(
    summaries: &[CountrySummary],
    writer: W,
) -> Result<(), ExportError> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(["Country", "Summary"])?;
    for s in summaries {
        w.write_record([&s.country, &s.summary])?;
    }
    w.flush()?;
    Ok(())
}

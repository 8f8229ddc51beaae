// src/prompt/mod.rs

pub mod questions;

use serde::{Deserialize, Serialize};

use crate::table::Table;

/// System framing sent with every completion request.
pub const SYSTEM_PROMPT: &str = "You are a helpful data analyst AI assistant.";

const PREAMBLE: &str = "You are an AI analyst. Given the structured dataset below, \
answer the user's question as clearly and accurately as possible.";

/// Caps applied to a table before it is embedded in a prompt, bounding
/// prompt size. Applied uniformly before every build.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptPolicy {
    pub max_rows: usize,
    pub max_columns: usize,
}

impl Default for PromptPolicy {
    fn default() -> Self {
        Self {
            max_rows: 30,
            max_columns: 10,
        }
    }
}

/// Render a table as a fixed-width text grid: one header line, one line per
/// row, every column padded to its widest value. Pure formatting, so the
/// same table always yields the same text.
pub fn render_table(table: &Table) -> String {
    let mut widths: Vec<usize> = table.headers().iter().map(String::len).collect();
    let rendered_rows: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();
    for row in &rendered_rows {
        for (i, value) in row.iter().enumerate() {
            if value.len() > widths[i] {
                widths[i] = value.len();
            }
        }
    }

    let mut out = String::new();
    push_line(&mut out, table.headers(), &widths);
    for row in &rendered_rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line<S: AsRef<str>>(out: &mut String, values: &[S], widths: &[usize]) {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        let value = value.as_ref();
        for _ in value.len()..widths[i] {
            out.push(' ');
        }
        out.push_str(value);
    }
    out.push('\n');
}

/// Assemble the full prompt for one question: the analyst preamble, a
/// truncation note when the policy actually cut the table, the rendered
/// data snapshot, and the question. Byte-deterministic for equal inputs.
pub fn build_prompt(table: &Table, question: &str, policy: &PromptPolicy) -> String {
    let snapshot = table.truncated(policy.max_rows, policy.max_columns);
    let mut prompt = String::new();
    prompt.push_str(PREAMBLE);
    prompt.push_str("\n\n");
    if snapshot.n_rows() < table.n_rows() || snapshot.n_columns() < table.n_columns() {
        prompt.push_str(&format!(
            "NOTE: Original dataset had {} rows and {} columns. Only the first {} rows \
             and first {} columns are used to prevent token overflow.\n\n",
            table.n_rows(),
            table.n_columns(),
            snapshot.n_rows(),
            snapshot.n_columns(),
        ));
    }
    prompt.push_str("Data Snapshot:\n");
    prompt.push_str(&render_table(&snapshot));
    prompt.push_str("\nQuestion:\n");
    prompt.push_str(question);
    prompt
}

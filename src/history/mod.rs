// src/history/mod.rs

pub mod export;

use chrono::{DateTime, Utc};
use tracing::debug;

/// One recorded question/answer exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub question: String,
    pub answer: String,
    pub asked_at: DateTime<Utc>,
}

/// The per-session record of successful exchanges. Entries are stored in
/// ask order and only ever appended; a session starts empty and there is
/// no clear operation. Display reads newest-first, exports read ask order.
#[derive(Debug, Default)]
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one successful exchange. Callers must not record failed
    /// completion calls.
    pub fn record(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        let entry = HistoryEntry {
            question: question.into(),
            answer: answer.into(),
            asked_at: Utc::now(),
        };
        debug!(question = %entry.question, total = self.entries.len() + 1, "recorded exchange");
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ask order, for export.
    pub fn chronological(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Entries newest-first, for display.
    pub fn recent(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_is_monotonic_and_ordered() {
        let mut history = SessionHistory::new();
        assert!(history.is_empty());

        for i in 1..=5 {
            history.record(format!("q{i}"), format!("a{i}"));
            assert_eq!(history.len(), i);
        }

        let asked: Vec<&str> = history.chronological().map(|e| e.question.as_str()).collect();
        assert_eq!(asked, vec!["q1", "q2", "q3", "q4", "q5"]);

        let shown: Vec<&str> = history.recent().map(|e| e.question.as_str()).collect();
        assert_eq!(shown, vec!["q5", "q4", "q3", "q2", "q1"]);
    }

    #[test]
    fn entries_pair_question_with_answer() {
        let mut history = SessionHistory::new();
        history.record("Overall Bonus Analysis", "Totals are up.");
        let entry = history.chronological().next().unwrap();
        assert_eq!(entry.question, "Overall Bonus Analysis");
        assert_eq!(entry.answer, "Totals are up.");
    }
}

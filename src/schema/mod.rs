// src/schema/mod.rs

use std::collections::HashSet;
use std::str::FromStr;

use crate::error::SchemaError;
use crate::table::Table;

/// Columns a compensation report upload must carry before any analysis runs.
pub const REPORT_COLUMNS: &[&str] = &[
    "Partner Id",
    "Last Name",
    "Paid As Position",
    "Gender",
    "Date of Birth",
    "Manager Name",
    "Recruiter Name",
    "Paid As",
    "Personal Sales Unit(PSU)",
    "Team Units(TU)",
    "First Name",
    "Adhoc Payment(ADP)",
    "Recruitment Commission Bonus (RCB)",
    "Basic commission Bonus(BCB)",
    "Super Commission Bonus(SCB)",
    "Performance Bonus (PCB)",
    "Gross Earnings",
];

/// Columns a feature matrix upload must carry.
pub const FEATURE_COLUMNS: &[&str] = &["Feature", "Description"];

/// Which kind of upload the session analyzes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Compensation / bonus report (CSV).
    Report,
    /// Feature availability matrix (Excel).
    Feature,
}

impl Mode {
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            Mode::Report => REPORT_COLUMNS,
            Mode::Feature => FEATURE_COLUMNS,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Report => "report",
            Mode::Feature => "feature",
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "report" => Ok(Mode::Report),
            "feature" => Ok(Mode::Feature),
            other => Err(format!("unknown mode `{other}` (expected report or feature)")),
        }
    }
}

/// Check that the table's column set is a superset of `required`.
/// Called once per upload; on failure nothing downstream may run.
pub fn validate(table: &Table, required: &[&str]) -> Result<(), SchemaError> {
    let present: HashSet<&str> = table.headers().iter().map(String::as_str).collect();
    let missing: Vec<String> = required
        .iter()
        .filter(|col| !present.contains(**col))
        .map(|col| col.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::new(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn table_with(headers: &[&str]) -> Table {
        Table::new(
            headers.iter().map(|h| h.to_string()).collect(),
            vec![headers.iter().map(|_| Cell::Empty).collect()],
        )
    }

    #[test]
    fn superset_passes() {
        let table = table_with(&["Feature", "Description", "India", "Japan"]);
        assert!(validate(&table, FEATURE_COLUMNS).is_ok());
    }

    #[test]
    fn missing_columns_are_reported_sorted() {
        let table = table_with(&["Partner Id", "Gender"]);
        let err = validate(&table, &["Gross Earnings", "Gender", "Basic commission Bonus(BCB)"])
            .unwrap_err();
        assert_eq!(
            err.missing,
            vec![
                "Basic commission Bonus(BCB)".to_string(),
                "Gross Earnings".to_string()
            ]
        );
    }

    #[test]
    fn report_schema_rejects_feature_upload() {
        let table = table_with(&["Feature", "Description"]);
        assert!(validate(&table, Mode::Report.required_columns()).is_err());
    }

    #[test]
    fn mode_parses_from_cli_strings() {
        assert_eq!("report".parse::<Mode>().unwrap(), Mode::Report);
        assert_eq!("Feature".parse::<Mode>().unwrap(), Mode::Feature);
        assert!("chart".parse::<Mode>().is_err());
    }
}

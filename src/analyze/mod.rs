// src/analyze/mod.rs

pub mod aggregate;
pub mod feature;

pub use aggregate::group_sum;

/// One predefined bar-chart view: sum `value` per distinct `group_by`.
#[derive(Debug, Clone, Copy)]
pub struct ChartSpec {
    pub title: &'static str,
    pub group_by: &'static str,
    pub value: &'static str,
}

/// The fixed chart catalog for compensation report uploads.
pub const REPORT_CHARTS: &[ChartSpec] = &[
    ChartSpec {
        title: "Role-wise Gross Earnings",
        group_by: "Paid As Position",
        value: "Gross Earnings",
    },
    ChartSpec {
        title: "Total Bonus Distribution",
        group_by: "Paid As Position",
        value: "Basic commission Bonus(BCB)",
    },
    ChartSpec {
        title: "Performance Bonus by Position",
        group_by: "Paid As Position",
        value: "Performance Bonus (PCB)",
    },
    ChartSpec {
        title: "Recruitment Commission Analysis",
        group_by: "Recruiter Name",
        value: "Recruitment Commission Bonus (RCB)",
    },
    ChartSpec {
        title: "Manager-wise Bonus Distribution",
        group_by: "Manager Name",
        value: "Gross Earnings",
    },
    ChartSpec {
        title: "Personal Sales Contribution",
        group_by: "First Name",
        value: "Personal Sales Unit(PSU)",
    },
    ChartSpec {
        title: "Team Units Contribution",
        group_by: "First Name",
        value: "Team Units(TU)",
    },
    ChartSpec {
        title: "Adhoc Payments Analysis",
        group_by: "First Name",
        value: "Adhoc Payment(ADP)",
    },
    ChartSpec {
        title: "Gender-Based Earnings",
        group_by: "Gender",
        value: "Gross Earnings",
    },
    ChartSpec {
        title: "Bonus Comparison by Gender",
        group_by: "Gender",
        value: "Basic commission Bonus(BCB)",
    },
];

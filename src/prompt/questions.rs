// src/prompt/questions.rs
//
// The predefined question catalog offered alongside free-form input.

/// A named group of canned analyst questions.
#[derive(Debug, Clone, Copy)]
pub struct QuestionCategory {
    pub name: &'static str,
    pub questions: &'static [&'static str],
}

pub const CATEGORIES: &[QuestionCategory] = &[
    QuestionCategory {
        name: "Month-wise / Trend Analysis",
        questions: &[
            "Show month-wise total bonus distribution.",
            "Compare earnings Month-on-Month for all branches.",
            "What was the highest grossing month and why?",
            "Which months showed consistent increase in bonuses?",
        ],
    },
    QuestionCategory {
        name: "Consistent Performer (Participant)",
        questions: &[
            "Who are the consistent top earners across all months?",
            "List participants who received bonuses every month.",
            "Who had the highest average earnings over time?",
        ],
    },
    QuestionCategory {
        name: "Consistent Performer (Branch)",
        questions: &[
            "Which branches had top consistent performance month-over-month?",
            "Which branches saw a steady rise in bonuses?",
        ],
    },
    QuestionCategory {
        name: "Bonus Type Analysis",
        questions: &[
            "How many types of bonuses are distributed?",
            "Which bonus type contributes most to total earnings?",
            "Month-wise trend of each bonus type.",
            "Top 3 bonus types based on total distribution.",
        ],
    },
];

/// Look up a catalog question by its 1-based position across categories,
/// in listing order.
pub fn by_number(n: usize) -> Option<&'static str> {
    CATEGORIES
        .iter()
        .flat_map(|c| c.questions.iter())
        .nth(n.checked_sub(1)?)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_numbered_across_categories() {
        assert_eq!(by_number(1), Some("Show month-wise total bonus distribution."));
        assert_eq!(
            by_number(5),
            Some("Who are the consistent top earners across all months?")
        );
        assert_eq!(by_number(0), None);
        let total: usize = CATEGORIES.iter().map(|c| c.questions.len()).sum();
        assert_eq!(total, 13);
        assert!(by_number(total).is_some());
        assert!(by_number(total + 1).is_none());
    }
}

//! Read-only views over a ledger snapshot: filtering, totals, breakdowns and
//! budget tracking. Nothing here mutates or persists.

pub mod aggregate;
pub mod budget;
pub mod filter;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::ExpenseRecord;

pub use aggregate::{
    category_breakdown, chart_bars, filtered_view, month_to_date_spend, ranked_breakdown, totals,
    CategoryBreakdown, ChartBar,
};
pub use budget::{
    budget_status, budget_transition_alert, budget_transition_alert_in, AlertSeverity,
    BudgetAlert, BudgetState, BudgetStatus,
};
pub use filter::{CategoryFilter, FilterSpec};

/// Everything a render pass needs, computed from one snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerSummary {
    pub view: Vec<ExpenseRecord>,
    pub transaction_count: usize,
    pub total_cents: i64,
    pub breakdown: CategoryBreakdown,
    pub month_spend: i64,
    pub budget: BudgetStatus,
}

/// Builds the filtered view and its statistics. Budget figures always use the
/// month containing `reference`, regardless of the filter.
pub fn summarize(
    records: &[ExpenseRecord],
    filter: &FilterSpec,
    budget_cents: i64,
    reference: NaiveDate,
) -> LedgerSummary {
    let view = filtered_view(records, filter);
    let total_cents = totals(&view);
    let breakdown = category_breakdown(&view);
    let month_spend = month_to_date_spend(records, reference);
    LedgerSummary {
        transaction_count: view.len(),
        total_cents,
        breakdown,
        month_spend,
        budget: budget_status(month_spend, budget_cents),
        view,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, ExpenseId};

    #[test]
    fn summary_separates_view_totals_from_month_spend() {
        let records = vec![
            ExpenseRecord {
                id: ExpenseId::new("exp_1"),
                amount_cents: 3_000,
                category: Category::Bills,
                date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
                description: "Power".into(),
            },
            ExpenseRecord {
                id: ExpenseId::new("exp_2"),
                amount_cents: 1_500,
                category: Category::Food,
                date: NaiveDate::from_ymd_opt(2024, 5, 28).unwrap(),
                description: String::new(),
            },
        ];
        let reference = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let summary = summarize(
            &records,
            &FilterSpec::category(Category::Food),
            10_000,
            reference,
        );
        assert_eq!(summary.transaction_count, 1);
        assert_eq!(summary.total_cents, 1_500);
        assert_eq!(summary.month_spend, 3_000);
        assert_eq!(summary.budget.state, BudgetState::Ok);
        assert_eq!(summary.budget.remaining, 7_000);
    }
}

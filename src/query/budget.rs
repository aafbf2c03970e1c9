use serde::Serialize;

use crate::currency::{format_cents, CurrencyCode};

/// Share of the budget (as a fraction `NUM / DEN`) that triggers a warning.
const WARNING_NUM: i128 = 4;
const WARNING_DEN: i128 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetState {
    NoBudget,
    Ok,
    Warning,
    Exceeded,
}

/// Month-to-date spend measured against the monthly budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub budget_cents: i64,
    pub spent_cents: i64,
    /// `budget - spent`; negative once the budget is exceeded.
    pub remaining: i64,
    pub ratio: f64,
    pub state: BudgetState,
}

impl BudgetStatus {
    /// Ratio as a percentage capped at 100, suitable for a progress bar.
    pub fn percent_used(&self) -> f64 {
        (self.ratio * 100.0).min(100.0)
    }

    pub fn status_line(&self, code: &CurrencyCode) -> Option<String> {
        match self.state {
            BudgetState::NoBudget => None,
            BudgetState::Exceeded => Some(format!(
                "Over budget by {}",
                format_cents(self.spent_cents - self.budget_cents, code)
            )),
            BudgetState::Ok | BudgetState::Warning => {
                Some(format!("{:.1}% of budget used", self.percent_used()))
            }
        }
    }
}

pub fn budget_status(month_spend: i64, budget_cents: i64) -> BudgetStatus {
    let remaining = budget_cents - month_spend;
    if budget_cents <= 0 {
        return BudgetStatus {
            budget_cents: 0,
            spent_cents: month_spend,
            remaining,
            ratio: 0.0,
            state: BudgetState::NoBudget,
        };
    }
    let state = if month_spend > budget_cents {
        BudgetState::Exceeded
    } else if above_warning(month_spend, budget_cents) {
        BudgetState::Warning
    } else {
        BudgetState::Ok
    };
    BudgetStatus {
        budget_cents,
        spent_cents: month_spend,
        remaining,
        ratio: month_spend as f64 / budget_cents as f64,
        state,
    }
}

fn above_warning(spend: i64, budget_cents: i64) -> bool {
    spend as i128 * WARNING_DEN > budget_cents as i128 * WARNING_NUM
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Warning,
    Exceeded,
}

impl AlertSeverity {
    pub fn title(&self) -> &'static str {
        match self {
            AlertSeverity::Warning => "Budget Warning",
            AlertSeverity::Exceeded => "Budget Exceeded!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetAlert {
    pub severity: AlertSeverity,
    pub message: String,
}

/// Alert raised when a mutation moves spend across a budget threshold,
/// with amounts rendered in the default currency.
pub fn budget_transition_alert(
    previous_spend: i64,
    new_spend: i64,
    budget_cents: i64,
) -> Option<BudgetAlert> {
    budget_transition_alert_in(
        previous_spend,
        new_spend,
        budget_cents,
        &CurrencyCode::default(),
    )
}

/// Fires only on the crossing itself: spend at or below a threshold before,
/// strictly above it after. The 100% threshold wins over the 80% one.
pub fn budget_transition_alert_in(
    previous_spend: i64,
    new_spend: i64,
    budget_cents: i64,
    code: &CurrencyCode,
) -> Option<BudgetAlert> {
    if budget_cents <= 0 {
        return None;
    }
    if previous_spend <= budget_cents && new_spend > budget_cents {
        return Some(BudgetAlert {
            severity: AlertSeverity::Exceeded,
            message: format!(
                "You've exceeded your monthly budget by {}. Consider reviewing your spending.",
                format_cents(new_spend - budget_cents, code)
            ),
        });
    }
    if !above_warning(previous_spend, budget_cents) && above_warning(new_spend, budget_cents) {
        return Some(BudgetAlert {
            severity: AlertSeverity::Warning,
            message: format!(
                "You've used 80% of your monthly budget. You have {} remaining.",
                format_cents(budget_cents - new_spend, code)
            ),
        });
    }
    None
}

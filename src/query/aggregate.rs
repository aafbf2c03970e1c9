use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Category, ExpenseRecord};

use super::FilterSpec;

/// Spend per category; always carries every category, zero sums included.
pub type CategoryBreakdown = BTreeMap<Category, i64>;

/// Applies `filter` and orders the result newest first.
///
/// Records sharing a date are ordered by descending id, which is
/// reproducible but not insertion order.
pub fn filtered_view(records: &[ExpenseRecord], filter: &FilterSpec) -> Vec<ExpenseRecord> {
    let filter = filter.clone().normalized();
    let mut view: Vec<ExpenseRecord> = records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect();
    view.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
    view
}

pub fn totals(view: &[ExpenseRecord]) -> i64 {
    view.iter()
        .fold(0, |sum: i64, record| sum.saturating_add(record.amount_cents))
}

pub fn category_breakdown(view: &[ExpenseRecord]) -> CategoryBreakdown {
    let mut breakdown: CategoryBreakdown = Category::ALL.into_iter().map(|c| (c, 0)).collect();
    for record in view {
        let sum = breakdown.entry(record.category).or_insert(0);
        *sum = sum.saturating_add(record.amount_cents);
    }
    breakdown
}

/// Categories with spend, largest first; ties keep category order.
pub fn ranked_breakdown(breakdown: &CategoryBreakdown) -> Vec<(Category, i64)> {
    let mut ranked: Vec<(Category, i64)> = breakdown
        .iter()
        .filter(|(_, cents)| **cents > 0)
        .map(|(category, cents)| (*category, *cents))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// One bar of the category chart, scaled against the largest category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartBar {
    pub category: Category,
    pub cents: i64,
    pub percent: u8,
}

pub fn chart_bars(breakdown: &CategoryBreakdown) -> Vec<ChartBar> {
    let max_cents = breakdown.values().copied().max().unwrap_or(0).max(1) as i128;
    breakdown
        .iter()
        .map(|(category, cents)| {
            let scaled = (*cents as i128 * 200 + max_cents) / (2 * max_cents);
            ChartBar {
                category: *category,
                cents: *cents,
                percent: scaled.clamp(0, 100) as u8,
            }
        })
        .collect()
}

/// Spend recorded in the calendar month containing `reference`.
pub fn month_to_date_spend(records: &[ExpenseRecord], reference: NaiveDate) -> i64 {
    records
        .iter()
        .filter(|record| record.in_month_of(reference))
        .fold(0, |sum: i64, record| sum.saturating_add(record.amount_cents))
}

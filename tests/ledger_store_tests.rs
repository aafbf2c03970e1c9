mod common;

use common::{date, file_backend, memory_ledger, reopen};
use expense_ledger::{
    currency::MAX_AMOUNT_CENTS,
    query::AlertSeverity,
    storage::{KeyValueStore, EXPENSES_KEY},
    time::FixedClock,
    Category, ExpenseInput, FilterSpec, LedgerError, ValidationError,
};
use regex::Regex;

fn clock() -> FixedClock {
    FixedClock::on(date(2024, 6, 20))
}

#[test]
fn submitting_form_input_records_cents_and_trimmed_description() {
    let mut ledger = memory_ledger();
    let input = ExpenseInput::new("12.50", "Food", "2024-06-18", "  Coffee  ");

    let submission = ledger.submit_expense(&input, &clock()).unwrap();

    let record = &submission.record;
    assert_eq!(record.amount_cents, 1_250);
    assert_eq!(record.category, Category::Food);
    assert_eq!(record.date, date(2024, 6, 18));
    assert_eq!(record.description, "Coffee");
    assert!(submission.alert.is_none());
    assert_eq!(ledger.records(), std::slice::from_ref(record));
}

#[test]
fn generated_ids_have_the_expected_shape_and_are_unique() {
    let shape = Regex::new(r"^exp_[0-9a-z]+_[0-9a-z]+$").unwrap();
    let mut ledger = memory_ledger();
    for _ in 0..50 {
        let input = ExpenseInput::new("1", "Other", "2024-06-01", "");
        ledger.submit_expense(&input, &clock()).unwrap();
    }

    let mut ids: Vec<_> = ledger.records().iter().map(|r| r.id.clone()).collect();
    assert!(ids.iter().all(|id| shape.is_match(id.as_str())));
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 50);
}

#[test]
fn rejected_input_leaves_ledger_and_storage_untouched() {
    let cases = [
        (
            ExpenseInput::new("0", "Food", "2024-06-01", ""),
            ValidationError::InvalidAmount,
        ),
        (
            ExpenseInput::new("abc", "Food", "2024-06-01", ""),
            ValidationError::InvalidAmount,
        ),
        (
            ExpenseInput::new("5", "food", "2024-06-01", ""),
            ValidationError::UnknownCategory,
        ),
        (
            ExpenseInput::new("5", "Food", "06/01/2024", ""),
            ValidationError::InvalidDate,
        ),
        (
            ExpenseInput::new("5", "Food", "2024-06-21", ""),
            ValidationError::FutureDate,
        ),
    ];

    let mut ledger = memory_ledger();
    for (input, expected) in cases {
        match ledger.submit_expense(&input, &clock()) {
            Err(LedgerError::Validation(err)) => assert_eq!(err, expected),
            other => panic!("expected {expected:?}, got {other:?}"),
        }
    }
    assert!(ledger.records().is_empty());
    assert_eq!(ledger.storage().get(EXPENSES_KEY).unwrap(), None);
}

#[test]
fn validation_messages_match_form_copy() {
    assert_eq!(
        ValidationError::InvalidAmount.to_string(),
        "Please enter a valid positive amount."
    );
    assert_eq!(
        ValidationError::FutureDate.to_string(),
        "Date cannot be in the future."
    );
}

#[test]
fn today_is_an_accepted_date() {
    let mut ledger = memory_ledger();
    let input = ExpenseInput::new("3", "Bills", "2024-06-20", "");
    assert!(ledger.submit_expense(&input, &clock()).is_ok());
}

#[test]
fn delete_removes_only_the_matching_record() {
    let mut ledger = memory_ledger();
    let first = ledger
        .submit_expense(&ExpenseInput::new("4", "Food", "2024-06-01", "a"), &clock())
        .unwrap()
        .record;
    let second = ledger
        .submit_expense(&ExpenseInput::new("6", "Food", "2024-06-02", "b"), &clock())
        .unwrap()
        .record;

    let removed = ledger.delete_record(&first.id).unwrap();
    assert_eq!(removed, Some(first.clone()));
    assert_eq!(ledger.records(), std::slice::from_ref(&second));

    assert_eq!(ledger.delete_record(&first.id).unwrap(), None);
    assert_eq!(ledger.records().len(), 1);
}

#[test]
fn crossing_eighty_percent_warns_once() {
    let mut ledger = memory_ledger();
    ledger.set_budget("100").unwrap();

    let quiet = ledger
        .submit_expense(&ExpenseInput::new("79", "Food", "2024-06-05", ""), &clock())
        .unwrap();
    assert!(quiet.alert.is_none());

    let alert = ledger
        .submit_expense(&ExpenseInput::new("2", "Food", "2024-06-06", ""), &clock())
        .unwrap()
        .alert
        .expect("warning alert");
    assert_eq!(alert.severity, AlertSeverity::Warning);
    assert!(alert.message.contains("You have $19.00 remaining."));

    let still_warning = ledger
        .submit_expense(&ExpenseInput::new("1", "Food", "2024-06-07", ""), &clock())
        .unwrap();
    assert!(still_warning.alert.is_none());
}

#[test]
fn jumping_past_the_budget_reports_exceeded_only() {
    let mut ledger = memory_ledger();
    ledger.set_budget("100").unwrap();
    ledger
        .submit_expense(&ExpenseInput::new("79", "Food", "2024-06-05", ""), &clock())
        .unwrap();

    let alert = ledger
        .submit_expense(&ExpenseInput::new("22", "Bills", "2024-06-06", ""), &clock())
        .unwrap()
        .alert
        .expect("exceeded alert");
    assert_eq!(alert.severity, AlertSeverity::Exceeded);
    assert!(alert.message.contains("$1.00"), "{}", alert.message);

    let after = ledger
        .submit_expense(&ExpenseInput::new("4", "Bills", "2024-06-07", ""), &clock())
        .unwrap();
    assert!(after.alert.is_none());
}

#[test]
fn expenses_outside_the_current_month_never_alert() {
    let mut ledger = memory_ledger();
    ledger.set_budget("10").unwrap();
    let submission = ledger
        .submit_expense(&ExpenseInput::new("500", "Shopping", "2024-05-31", ""), &clock())
        .unwrap();
    assert!(submission.alert.is_none());
    assert_eq!(ledger.month_to_date_spend(date(2024, 6, 20)), 0);
}

#[test]
fn invalid_budget_keeps_the_previous_value() {
    let mut ledger = memory_ledger();
    ledger.set_budget("250.75").unwrap();
    assert!(matches!(
        ledger.set_budget("-3"),
        Err(LedgerError::Validation(ValidationError::InvalidBudget))
    ));
    assert_eq!(ledger.budget_cents(), 25_075);

    ledger.clear_budget().unwrap();
    assert_eq!(ledger.budget_cents(), 0);
}

#[test]
fn reopening_a_file_store_restores_records_and_budget() {
    let (storage, _guard) = file_backend();
    let mut ledger = reopen(&storage);
    ledger.set_budget("300").unwrap();
    let kept = ledger
        .submit_expense(&ExpenseInput::new("9.99", "Entertainment", "2024-06-10", "Movie"), &clock())
        .unwrap()
        .record;
    let dropped = ledger
        .submit_expense(&ExpenseInput::new("45", "Transport", "2024-06-11", "Fuel"), &clock())
        .unwrap()
        .record;
    ledger.delete_record(&dropped.id).unwrap();

    let restored = reopen(&storage);
    assert_eq!(restored.records(), std::slice::from_ref(&kept));
    assert_eq!(restored.budget_cents(), 30_000);
}

#[test]
fn amounts_above_the_limit_are_rejected_before_saving() {
    let mut ledger = memory_ledger();
    let input = ExpenseInput::new("90000000000000000", "Food", "2024-06-10", "");
    assert!(matches!(
        ledger.submit_expense(&input, &clock()),
        Err(LedgerError::Validation(ValidationError::InvalidAmount))
    ));
    assert_eq!(ledger.storage().get(EXPENSES_KEY).unwrap(), None);
}

#[test]
fn repeated_maximum_amounts_keep_totals_and_alerts_working() {
    let mut ledger = memory_ledger();
    ledger.set_budget("1000000000").unwrap();
    let input = ExpenseInput::new("1000000000", "Bills", "2024-06-10", "");

    let first = ledger.submit_expense(&input, &clock()).unwrap();
    assert_eq!(first.record.amount_cents, MAX_AMOUNT_CENTS);
    assert_eq!(
        first.alert.map(|alert| alert.severity),
        Some(AlertSeverity::Warning)
    );
    let second = ledger.submit_expense(&input, &clock()).unwrap();
    assert_eq!(
        second.alert.map(|alert| alert.severity),
        Some(AlertSeverity::Exceeded)
    );

    let summary = ledger.summarize(&FilterSpec::default(), date(2024, 6, 20));
    assert_eq!(summary.total_cents, 2 * MAX_AMOUNT_CENTS);
    assert_eq!(summary.month_spend, 2 * MAX_AMOUNT_CENTS);
    assert_eq!(summary.budget.remaining, -MAX_AMOUNT_CENTS);
}

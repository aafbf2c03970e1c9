use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::{
    currency::{parse_amount_to_cents, CurrencyCode},
    domain::{decode_record, ExpenseId, ExpenseInput, ExpenseRecord, NewExpense},
    errors::{LedgerError, ValidationError},
    query::{self, budget_transition_alert_in, BudgetAlert, FilterSpec, LedgerSummary},
    storage::{KeyValueStore, BUDGET_KEY, EXPENSES_KEY},
    time::Clock,
};

/// Outcome of recording an expense through [`LedgerStore::submit_expense`].
#[derive(Debug, Clone)]
pub struct Submission {
    pub record: ExpenseRecord,
    /// Set when this expense pushed the current month across a budget threshold.
    pub alert: Option<BudgetAlert>,
}

/// Owns the expense records and monthly budget, writing every change through
/// to the injected key-value store.
pub struct LedgerStore {
    records: Vec<ExpenseRecord>,
    budget_cents: i64,
    currency: CurrencyCode,
    storage: Box<dyn KeyValueStore>,
}

impl LedgerStore {
    /// Loads records and budget from `storage`. Never fails: unreadable data
    /// yields an empty ledger.
    pub fn open(storage: Box<dyn KeyValueStore>) -> Self {
        let records = load(storage.as_ref());
        let budget_cents = load_budget(storage.as_ref());
        info!(records = records.len(), budget_cents, "ledger opened");
        Self {
            records,
            budget_cents,
            currency: CurrencyCode::default(),
            storage,
        }
    }

    /// Currency used when rendering alert messages.
    pub fn with_currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = currency;
        self
    }

    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn record(&self, id: &ExpenseId) -> Option<&ExpenseRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    pub fn budget_cents(&self) -> i64 {
        self.budget_cents
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Assigns a fresh id, appends the record and persists the full list.
    /// The append is undone when the write fails.
    pub fn add_record(
        &mut self,
        expense: NewExpense,
        now: DateTime<Utc>,
    ) -> Result<ExpenseRecord, LedgerError> {
        let record = ExpenseRecord::from_new(self.fresh_id(now), expense);
        self.records.push(record.clone());
        if let Err(err) = save(self.storage.as_ref(), &self.records) {
            self.records.pop();
            return Err(err);
        }
        debug!(id = %record.id, amount_cents = record.amount_cents, "expense recorded");
        Ok(record)
    }

    /// Removes the record with `id`. Unknown ids are ignored without writing.
    pub fn delete_record(&mut self, id: &ExpenseId) -> Result<Option<ExpenseRecord>, LedgerError> {
        let Some(index) = self.records.iter().position(|record| &record.id == id) else {
            debug!(%id, "delete ignored for unknown expense");
            return Ok(None);
        };
        let removed = self.records.remove(index);
        if let Err(err) = save(self.storage.as_ref(), &self.records) {
            self.records.insert(index, removed);
            return Err(err);
        }
        debug!(%id, "expense deleted");
        Ok(Some(removed))
    }

    /// Validates raw form input, records it, and reports any budget threshold
    /// the current month just crossed.
    pub fn submit_expense(
        &mut self,
        input: &ExpenseInput,
        clock: &dyn Clock,
    ) -> Result<Submission, LedgerError> {
        let today = clock.today();
        let expense = input.validate(today)?;
        let previous_spend = self.month_to_date_spend(today);
        let record = self.add_record(expense, clock.now())?;
        let alert = if record.in_month_of(today) {
            budget_transition_alert_in(
                previous_spend,
                previous_spend.saturating_add(record.amount_cents),
                self.budget_cents,
                &self.currency,
            )
        } else {
            None
        };
        Ok(Submission { record, alert })
    }

    /// Parses and stores a new monthly budget, returning it in cents.
    pub fn set_budget(&mut self, amount: &str) -> Result<i64, LedgerError> {
        let cents = parse_amount_to_cents(amount).ok_or(ValidationError::InvalidBudget)?;
        save_budget(self.storage.as_ref(), cents)?;
        self.budget_cents = cents;
        info!(budget_cents = cents, "monthly budget set");
        Ok(cents)
    }

    pub fn clear_budget(&mut self) -> Result<(), LedgerError> {
        save_budget(self.storage.as_ref(), 0)?;
        self.budget_cents = 0;
        info!("monthly budget cleared");
        Ok(())
    }

    pub fn month_to_date_spend(&self, reference: NaiveDate) -> i64 {
        query::month_to_date_spend(&self.records, reference)
    }

    pub fn summarize(&self, filter: &FilterSpec, reference: NaiveDate) -> LedgerSummary {
        query::summarize(&self.records, filter, self.budget_cents, reference)
    }

    fn fresh_id(&self, now: DateTime<Utc>) -> ExpenseId {
        loop {
            let id = ExpenseId::generate(now);
            if self.record(&id).is_none() {
                return id;
            }
        }
    }
}

/// Reads the persisted record list. Missing, corrupt or non-array data reads
/// as empty; individual invalid items are dropped.
pub fn load(storage: &dyn KeyValueStore) -> Vec<ExpenseRecord> {
    match storage.get(EXPENSES_KEY) {
        Ok(Some(raw)) => decode_records(&raw),
        Ok(None) => Vec::new(),
        Err(err) => {
            warn!(error = %err, "unable to read expenses; starting empty");
            Vec::new()
        }
    }
}

pub fn decode_records(raw: &str) -> Vec<ExpenseRecord> {
    let items = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(items)) => items,
        Ok(_) => {
            warn!("persisted expenses are not an array; ignoring");
            return Vec::new();
        }
        Err(err) => {
            warn!(error = %err, "persisted expenses are not valid JSON; ignoring");
            return Vec::new();
        }
    };
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match decode_record(item) {
            Ok(record) => Some(record),
            Err(reason) => {
                warn!(index, %reason, "dropping invalid expense record");
                None
            }
        })
        .collect()
}

/// Overwrites the persisted record list.
pub fn save(storage: &dyn KeyValueStore, records: &[ExpenseRecord]) -> Result<(), LedgerError> {
    let json = serde_json::to_string(records)?;
    storage.set(EXPENSES_KEY, &json)?;
    debug!(records = records.len(), "expenses saved");
    Ok(())
}

/// Reads the budget in cents; anything unreadable counts as no budget.
pub fn load_budget(storage: &dyn KeyValueStore) -> i64 {
    match storage.get(BUDGET_KEY) {
        Ok(Some(raw)) => parse_budget(&raw),
        Ok(None) => 0,
        Err(err) => {
            warn!(error = %err, "unable to read budget; treating as unset");
            0
        }
    }
}

/// Coerces stored text to a non-negative whole number of cents.
pub fn parse_budget(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value.round() as i64,
        _ => 0,
    }
}

pub fn save_budget(storage: &dyn KeyValueStore, cents: i64) -> Result<(), LedgerError> {
    storage.set(BUDGET_KEY, &cents.to_string())
}

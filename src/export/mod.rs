//! CSV export of an expense view.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::{
    currency::cents_to_decimal_string, domain::ExpenseRecord, errors::LedgerError,
    utils::persistence::write_atomic,
};

pub const CSV_HEADER: [&str; 5] = ["id", "date", "category", "amount", "description"];

/// Renders `view` as CSV in view order.
///
/// Fields containing a comma, quote or newline are quoted with interior quotes
/// doubled. Rows are separated by `\n` with no trailing terminator.
pub fn export_csv(view: &[ExpenseRecord]) -> Result<String, LedgerError> {
    let mut csv = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    csv.write_record(CSV_HEADER)?;
    for record in view {
        let date = record.date.format("%Y-%m-%d").to_string();
        let amount = cents_to_decimal_string(record.amount_cents);
        csv.write_record([
            record.id.as_str(),
            date.as_str(),
            record.category.as_str(),
            amount.as_str(),
            record.description.as_str(),
        ])?;
    }

    let bytes = csv
        .into_inner()
        .map_err(|err| LedgerError::Io(err.into_error()))?;
    let text = String::from_utf8(bytes)
        .map_err(|err| LedgerError::Storage(format!("CSV output is not UTF-8: {err}")))?;
    Ok(text.strip_suffix('\n').map(str::to_string).unwrap_or(text))
}

/// File name offered for a download made on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("expenses_{}.csv", date.format("%Y-%m-%d"))
}

/// Writes the CSV for `view` into `dir` and returns the file path.
pub fn write_csv_export(
    view: &[ExpenseRecord],
    dir: &Path,
    date: NaiveDate,
) -> Result<PathBuf, LedgerError> {
    let path = dir.join(export_file_name(date));
    let csv = export_csv(view)?;
    write_atomic(&path, &csv)?;
    tracing::info!(path = %path.display(), rows = view.len(), "exported expenses");
    Ok(path)
}

//! Input contract for the excluded upload/CSV layer.
//!
//! The engine consumes an already parsed tabular dataset. Validation here is
//! strict: a missing required column or an unparseable cell fails the whole
//! invocation rather than silently dropping rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result};
use crate::transaction::Transaction;

const REQUIRED_COLUMNS: [&str; 3] = ["Date", "Merchant", "Amount"];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y"];

/// A parsed tabular dataset: a header row plus string cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|col| col.trim().eq_ignore_ascii_case(name))
    }
}

/// Converts a raw table into transactions, assigning internal ids.
pub fn parse_table(table: &RawTable) -> Result<Vec<Transaction>> {
    let mut indices = [0usize; 3];
    for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = table.column_index(name).ok_or_else(|| {
            EngineError::InvalidInput(format!("missing required column `{name}`"))
        })?;
    }
    let [date_idx, merchant_idx, amount_idx] = indices;

    let mut transactions = Vec::with_capacity(table.rows.len());
    for (row_no, row) in table.rows.iter().enumerate() {
        let width = indices.iter().max().copied().unwrap_or(0) + 1;
        if row.len() < width {
            return Err(EngineError::InvalidInput(format!(
                "row {} has {} cells, expected at least {}",
                row_no + 1,
                row.len(),
                width
            )));
        }
        let date = parse_date(&row[date_idx]).ok_or_else(|| {
            EngineError::InvalidInput(format!(
                "row {}: unparseable date `{}`",
                row_no + 1,
                row[date_idx]
            ))
        })?;
        let amount: f64 = row[amount_idx].trim().parse().map_err(|_| {
            EngineError::InvalidInput(format!(
                "row {}: unparseable amount `{}`",
                row_no + 1,
                row[amount_idx]
            ))
        })?;
        let merchant = row[merchant_idx].trim();
        transactions.push(Transaction::new(date, merchant, amount)?);
    }
    tracing::debug!(count = transactions.len(), "Parsed transaction table");
    Ok(transactions)
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn parses_well_formed_rows() {
        let input = table(
            &["Date", "Merchant", "Amount"],
            &[
                &["2024-01-01", "Swiggy Order", "300"],
                &["02/01/2024", "Amazon India", "1200.50"],
            ],
        );
        let transactions = parse_table(&input).expect("valid table");
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].merchant, "Swiggy Order");
        assert_eq!(
            transactions[1].date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }

    #[test]
    fn header_match_ignores_case_and_padding() {
        let input = table(
            &[" date ", "MERCHANT", "amount"],
            &[&["2024-03-05", "Uber Trip", "250"]],
        );
        assert_eq!(parse_table(&input).unwrap().len(), 1);
    }

    #[test]
    fn missing_column_is_invalid_input() {
        let input = table(&["Date", "Amount"], &[&["2024-01-01", "300"]]);
        let err = parse_table(&input).unwrap_err();
        let message = format!("{err}");
        assert!(message.contains("Merchant"), "unexpected error: {message}");
    }

    #[test]
    fn unparseable_date_is_invalid_input() {
        let input = table(
            &["Date", "Merchant", "Amount"],
            &[&["January first", "Swiggy Order", "300"]],
        );
        assert!(matches!(
            parse_table(&input),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn bad_amount_does_not_yield_partial_result() {
        let input = table(
            &["Date", "Merchant", "Amount"],
            &[
                &["2024-01-01", "Swiggy Order", "300"],
                &["2024-01-02", "Amazon India", "lots"],
            ],
        );
        assert!(parse_table(&input).is_err());
    }
}

use crate::{
    categorize::Categorizer,
    data::{Column, Columns, Ledger, ParseError, Transaction},
};
use chrono::NaiveDate;
use log::{debug, info};
use rust_decimal::Decimal;
use serde::Deserialize;

/// What to do with a Category column that's already in the input. Bank exports don't have
/// one, but saved ledgers do and may carry manual overrides: `KeepStored` keeps the
/// non-empty ones.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CategoryPolicy {
    #[default]
    Recompute,
    KeepStored,
}

/// A row as found in the file. French headers are accepted too.
#[derive(Debug, Deserialize)]
struct Row {
    #[serde(rename = "Date", default)]
    date: Option<NaiveDate>,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Amount", alias = "Montant")]
    amount: Decimal,
    #[serde(rename = "Category", alias = "Catégorie", alias = "Categorie", default)]
    category: Option<String>,
}

/// Load a ledger from CSV, categorizing every row. The input order is kept, and any bad
/// row fails the whole load. Columns we don't interpret are carried along so saving gives
/// them back.
pub(crate) fn read_ledger<R: std::io::Read>(
    reader: R,
    categorizer: &Categorizer,
    policy: CategoryPolicy,
) -> Result<Ledger, ParseError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    // Checked up front: serde would report a missing column on the first row only, and
    // not at all on an empty file.
    let headers = rdr.headers()?.clone();
    let columns = Columns::from_headers(&headers)?;

    let mut ledger = Ledger::with_columns(columns.clone());
    for result in rdr.records() {
        let record = result?;
        let row: Row = record.deserialize(Some(&headers))?;
        let category = match (policy, row.category) {
            (CategoryPolicy::KeepStored, Some(stored)) if !stored.is_empty() => stored,
            _ => categorizer.categorize(&row.description).to_string(),
        };
        let extra = record
            .iter()
            .zip(columns.kinds())
            .filter(|(_, kind)| matches!(kind, Column::Extra(_)))
            .map(|(cell, _)| cell.to_string())
            .collect();
        debug!("{:?} {} -> {}", row.date, row.description, category);
        ledger.push(Transaction {
            date: row.date,
            description: row.description,
            amount: row.amount,
            category,
            extra,
        });
    }
    info!("Loaded {} transactions", ledger.len());
    Ok(ledger)
}

use crate::{
    categorize::Categorizer,
    data::{Ledger, Transaction},
    write::write_ledger,
};
use chrono::NaiveDate;
use log::info;
use rust_decimal::Decimal;
use std::path::Path;

/// File name used when saving without an explicit target.
pub const DEFAULT_FILENAME: &str = "budget.csv";

/// A manual entry as typed by the user. An empty category means "let the rules decide".
#[derive(Debug, Clone)]
pub(crate) struct NewEntry {
    pub date: Option<NaiveDate>,
    pub description: String,
    pub amount: Decimal,
    pub category: Option<String>,
}

/// The one piece of mutable state: the ledger being worked on and the rules used for new
/// entries. Everything else (categorizing, building flows) is a pure function of it.
#[derive(Debug)]
pub(crate) struct Session {
    ledger: Ledger,
    categorizer: Categorizer,
}

impl Session {
    pub fn new(ledger: Ledger, categorizer: Categorizer) -> Self {
        Self {
            ledger,
            categorizer,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Append an entry at the end of the ledger and return what was stored. Text is
    /// trimmed the same way loading trims it, so a saved entry reloads unchanged.
    pub fn add_entry(&mut self, entry: NewEntry) -> Transaction {
        let description = entry.description.trim().to_string();
        let category = match entry.category.as_deref().map(str::trim) {
            Some(category) if !category.is_empty() => category.to_string(),
            _ => self.categorizer.categorize(&description).to_string(),
        };
        let tx = Transaction {
            date: entry.date,
            description,
            amount: entry.amount,
            category,
            extra: Vec::new(),
        };
        info!("Added {} ({}) as {}", tx.description, tx.amount, tx.category);
        self.ledger.push(tx.clone());
        tx
    }

    /// Overwrite `path` with the whole ledger, UTF-8 encoded.
    pub fn save(&self, path: &Path) -> Result<(), anyhow::Error> {
        let file = std::fs::File::create(path)?;
        write_ledger(std::io::BufWriter::new(file), &self.ledger)?;
        info!("Saved {} transactions to {}", self.ledger.len(), path.display());
        Ok(())
    }
}

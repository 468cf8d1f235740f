use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Name of the synthetic node every flow starts from.
pub const BUDGET_NODE: &str = "Budget";

/// One line of the ledger. The category is normally derived from the description by a
/// `Categorizer`, but a manual entry may carry its own, so it's stored rather than computed
/// on the fly. `extra` holds the cells of the input columns we don't interpret, in
/// `Column::Extra` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Transaction {
    pub date: Option<NaiveDate>,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub extra: Vec<String>,
}

/// What a column of the ledger file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Column {
    Date,
    Description,
    Amount,
    Category,
    /// Index into `Transaction::extra`.
    Extra(usize),
}

/// Header of the ledger file: names as found in the input, and what each one holds. Saving
/// writes the columns back in this order under these names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Columns {
    names: Vec<String>,
    kinds: Vec<Column>,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            names: ["Date", "Description", "Amount", "Category"]
                .map(String::from)
                .to_vec(),
            kinds: vec![
                Column::Date,
                Column::Description,
                Column::Amount,
                Column::Category,
            ],
        }
    }
}

impl Columns {
    /// Map an input header. Description and amount are required; a Category column is
    /// added when missing since every saved ledger carries one.
    pub fn from_headers(headers: &csv::StringRecord) -> Result<Self, ParseError> {
        let mut columns = Columns {
            names: Vec::new(),
            kinds: Vec::new(),
        };
        let mut extras = 0;
        for name in headers.iter() {
            let kind = match name {
                "Date" => Column::Date,
                "Description" => Column::Description,
                "Amount" | "Montant" => Column::Amount,
                "Category" | "Catégorie" | "Categorie" => Column::Category,
                _ => Column::Extra(extras),
            };
            if let Column::Extra(_) = kind {
                extras += 1;
            }
            columns.names.push(name.to_string());
            columns.kinds.push(kind);
        }
        if !columns.has(Column::Description) {
            return Err(ParseError::MissingColumn("Description"));
        }
        if !columns.has(Column::Amount) {
            return Err(ParseError::MissingColumn("Amount"));
        }
        columns.ensure(Column::Category, "Category");
        Ok(columns)
    }

    pub fn has(&self, kind: Column) -> bool {
        self.kinds.contains(&kind)
    }

    /// Append `kind` under `name` unless a column already holds it.
    pub fn ensure(&mut self, kind: Column, name: &str) {
        if !self.has(kind) {
            self.names.push(name.to_string());
            self.kinds.push(kind);
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn kinds(&self) -> &[Column] {
        &self.kinds
    }
}

/// The ordered set of transactions of a session. Order is significant: it's the display
/// order, the file order and the order flow edges are emitted in.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Ledger {
    pub columns: Columns,
    pub transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns(columns: Columns) -> Self {
        Self {
            columns,
            transactions: Vec::new(),
        }
    }

    /// Append a transaction, growing a Date column if the input had none and this one is
    /// dated.
    pub fn push(&mut self, tx: Transaction) {
        if tx.date.is_some() {
            self.columns.ensure(Column::Date, "Date");
        }
        self.transactions.push(tx);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

impl From<Vec<Transaction>> for Ledger {
    fn from(transactions: Vec<Transaction>) -> Self {
        Self {
            columns: Columns::default(),
            transactions,
        }
    }
}

/// Index-based shape of a `FlowGraph`, the way charting libraries want their Sankey input:
/// parallel `source`/`target`/`value` arrays pointing into `labels`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Sankey {
    pub labels: Vec<String>,
    pub source: Vec<usize>,
    pub target: Vec<usize>,
    pub value: Vec<f64>,
}

/// Errors while turning CSV input into a `Ledger`. Any of them fails the whole load.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Required column `{0}` is missing")]
    MissingColumn(&'static str),
    #[error("Invalid record at line {line}: {message}")]
    InvalidRecord { line: u64, message: String },
    #[error("Unreadable input: {0}")]
    Unreadable(String),
}

impl From<csv::Error> for ParseError {
    fn from(err: csv::Error) -> Self {
        match err.position() {
            Some(pos) => ParseError::InvalidRecord {
                line: pos.line(),
                message: record_message(&err),
            },
            None => ParseError::Unreadable(err.to_string()),
        }
    }
}

/// `csv::Error`'s `Display` already prefixes the position, which we report separately.
fn record_message(err: &csv::Error) -> String {
    match err.kind() {
        csv::ErrorKind::Deserialize { err, .. } => match err.field() {
            Some(field) => format!("field {}: {}", field + 1, err.kind()),
            None => err.kind().to_string(),
        },
        _ => err.to_string(),
    }
}

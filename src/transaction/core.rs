//! Defines the core data model and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, period::Dated};

// ============================================================================
// MODELS
// ============================================================================

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// Whether money entered or left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionKind {
    /// Money entering (revenue).
    Income,
    /// Money leaving (an expense).
    Outcome,
}

impl TransactionKind {
    /// Parse a stored kind value. Anything that is not "income" is treated
    /// as an expense, mirroring how older data is rendered.
    pub fn parse(value: &str) -> Self {
        if value == "income" {
            Self::Income
        } else {
            Self::Outcome
        }
    }

    /// The stored string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Outcome => "outcome",
        }
    }
}

impl From<String> for TransactionKind {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<TransactionKind> for String {
    fn from(value: TransactionKind) -> Self {
        value.as_str().to_owned()
    }
}

/// The settlement state of a transaction.
///
/// Informational only: no aggregation reads this field. By convention
/// income is created as received and expenses as paid, but stored data is
/// not required to follow the convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionStatus {
    /// An expense that has been settled.
    Paid,
    /// Income that has arrived.
    Received,
    /// Not settled yet.
    Pending,
}

impl TransactionStatus {
    /// Parse a stored status value. Unknown values read as pending.
    pub fn parse(value: &str) -> Self {
        match value {
            "paid" => Self::Paid,
            "received" => Self::Received,
            _ => Self::Pending,
        }
    }

    /// The stored string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Received => "received",
            Self::Pending => "pending",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Received => "Received",
            Self::Pending => "Pending",
        }
    }

    /// The conventional status for a newly recorded transaction.
    pub fn default_for(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Income => Self::Received,
            TransactionKind::Outcome => Self::Paid,
        }
    }
}

impl From<String> for TransactionStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<TransactionStatus> for String {
    fn from(value: TransactionStatus) -> Self {
        value.as_str().to_owned()
    }
}

/// An income or expense, i.e. an event where money was either earned or spent.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A short display label for the transaction.
    pub name: String,
    /// The amount of money involved. Always zero or more; the kind says
    /// which direction the money moved.
    pub amount: f64,
    /// Whether the transaction is income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The category the transaction belongs to.
    pub category: String,
    /// When the transaction happened.
    pub date: Date,
    /// The settlement state.
    #[serde(default = "default_status")]
    pub status: TransactionStatus,
}

fn default_status() -> TransactionStatus {
    TransactionStatus::Pending
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability. The status
    /// defaults to the convention for the kind (income is received,
    /// expenses are paid).
    pub fn build(
        name: &str,
        amount: f64,
        kind: TransactionKind,
        category: &str,
        date: Date,
    ) -> TransactionBuilder {
        TransactionBuilder {
            name: name.to_owned(),
            amount,
            kind,
            category: category.to_owned(),
            date,
            status: TransactionStatus::default_for(kind),
        }
    }
}

impl Dated for Transaction {
    fn date(&self) -> Date {
        self.date
    }
}

/// A builder for creating [Transaction] instances.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// A short display label for the transaction. Must not be empty.
    pub name: String,
    /// The monetary amount, zero or more.
    pub amount: f64,
    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,
    /// The category the transaction belongs to.
    pub category: String,
    /// When the transaction happened.
    pub date: Date,
    /// The settlement state.
    pub status: TransactionStatus,
}

impl TransactionBuilder {
    /// Override the conventional status.
    #[allow(dead_code)]
    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    /// Check the invariants the data model requires: a non-empty name and
    /// a non-negative amount.
    ///
    /// # Errors
    /// Returns [Error::EmptyTransactionName] or [Error::NegativeAmount].
    pub fn validate(self) -> Result<Self, Error> {
        if self.name.trim().is_empty() {
            return Err(Error::EmptyTransactionName);
        }

        if self.amount < 0.0 {
            return Err(Error::NegativeAmount(self.amount));
        }

        Ok(self)
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (name, amount, kind, category, date, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, name, amount, kind, category, date, status",
        )?
        .query_row(
            (
                builder.name,
                builder.amount,
                builder.kind.as_str(),
                builder.category,
                builder.date,
                builder.status.as_str(),
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, name, amount, kind, category, date, status
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve all transactions, newest first.
///
/// Period and category filtering happen in memory on the returned
/// snapshot, so the query itself is unconditional.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, name, amount, kind, category, date, status
             FROM \"transaction\" ORDER BY date DESC, id DESC",
        )?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Overwrite the transaction with the given `id` with the builder's values.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\"
         SET name = ?1, amount = ?2, kind = ?3, category = ?4, date = ?5, status = ?6
         WHERE id = ?7",
        (
            builder.name,
            builder.amount,
            builder.kind.as_str(),
            builder.category,
            builder.date,
            builder.status.as_str(),
            id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    Ok(())
}

/// Delete the transaction with the given `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                amount REAL NOT NULL,
                kind TEXT NOT NULL,
                category TEXT NOT NULL,
                date TEXT NOT NULL,
                status TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

pub(crate) fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let kind: String = row.get(3)?;
    let status: String = row.get(6)?;

    Ok(Transaction {
        id: row.get(0)?,
        name: row.get(1)?,
        amount: row.get(2)?,
        kind: TransactionKind::parse(&kind),
        category: row.get(4)?,
        date: row.get(5)?,
        status: TransactionStatus::parse(&status),
    })
}

//! Database session wrapper.
//!
//! The concrete driver is an external collaborator behind the [`Driver`]
//! trait; the core depends on nothing beyond its shape. [`Session`] owns one
//! driver and serializes nothing itself — one in-flight statement at a time
//! is the caller's responsibility.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::sql::Sql;
use crate::value::Value;

/// One fetched row: column name to value.
pub type Row = BTreeMap<String, Value>;

/// The outcome of executing one statement.
#[derive(Debug, Clone, Default)]
pub struct ExecResult {
    /// Rows affected (for mutations) or returned (for queries).
    pub row_count: u64,
    /// Auto-generated key of the last inserted row, when the driver has one.
    pub last_insert_id: Option<u64>,
    /// Fetched rows; empty for mutations.
    pub rows: Vec<Row>,
}

impl ExecResult {
    /// The first fetched row, if any.
    pub fn fetch_one(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// All fetched rows.
    pub fn fetch_all(&self) -> &[Row] {
        &self.rows
    }

    /// Consume the result, returning the fetched rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

/// The driver boundary: everything the session needs from a database
/// connection/cursor pair.
///
/// Driver-level failures (constraint violations, connection errors)
/// propagate unchanged; the core performs no retries and no transaction
/// management beyond the commit/rollback passthroughs.
pub trait Driver {
    /// Execute a statement with positional arguments.
    fn execute(&mut self, sql: &str, args: &[Value]) -> Result<ExecResult>;

    /// Commit the current transaction.
    fn commit(&mut self) -> Result<()>;

    /// Roll back the current transaction.
    fn rollback(&mut self) -> Result<()>;

    /// Close the connection.
    fn close(&mut self) -> Result<()>;
}

/// A thin wrapper owning one driver connection.
pub struct Session {
    driver: Box<dyn Driver>,
}

impl Session {
    /// Create a session owning the given driver.
    pub fn new(driver: impl Driver + 'static) -> Self {
        Self {
            driver: Box::new(driver),
        }
    }

    /// Execute a compiled statement.
    ///
    /// Placeholder/argument parity is checked before the statement reaches
    /// the driver.
    pub fn execute(&mut self, statement: &Sql) -> Result<ExecResult> {
        statement.validate()?;
        tracing::debug!(
            sql = statement.as_str(),
            args = statement.args().len(),
            "executing statement"
        );
        self.driver
            .execute(statement.as_str(), statement.args())
            .inspect_err(|e| tracing::error!(sql = statement.as_str(), error = %e, "execute failed"))
    }

    /// Execute raw text and arguments without going through a builder.
    pub fn execute_raw(&mut self, sql: &str, args: &[Value]) -> Result<ExecResult> {
        tracing::debug!(sql, args = args.len(), "executing raw statement");
        self.driver.execute(sql, args)
    }

    pub fn commit(&mut self) -> Result<()> {
        self.driver.commit()
    }

    pub fn rollback(&mut self) -> Result<()> {
        self.driver.rollback()
    }

    pub fn close(&mut self) -> Result<()> {
        self.driver.close()
    }
}

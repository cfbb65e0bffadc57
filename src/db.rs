//! Database initialization: schema creation and the canonical seed jars.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{Error, jar::create_jar_table, timestamp, transaction::create_transaction_table};

/// Create the application's tables and seed the six canonical jars.
///
/// Safe to call on every startup: tables are only created when missing and
/// the seed jars are only inserted when their IDs are unoccupied.
///
/// # Errors
/// Returns an error if the database schema cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Foreign keys are off by default in SQLite; the transaction table's
    // references into the jar table depend on them.
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_jar_table(&transaction)?;
    create_transaction_table(&transaction)?;
    seed_default_jars(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Insert the six canonical jars of the six-jars budgeting method, all with a
/// zero starting balance.
fn seed_default_jars(connection: &Connection) -> Result<(), Error> {
    let created_at = timestamp::format(timestamp::now())?;

    connection.execute(
        "INSERT OR IGNORE INTO jar (id, name, percentage, description, balance_cents, created_at)
         VALUES
            (1, 'Necessities', '50', 'Essential expenses like housing, utilities, groceries', 0, ?1),
            (2, 'Financial Freedom', '10', 'Long-term investments and wealth building', 0, ?1),
            (3, 'Education', '10', 'Personal development and learning', 0, ?1),
            (4, 'Long-term Savings', '10', 'Emergency fund and future goals', 0, ?1),
            (5, 'Play', '10', 'Entertainment and fun activities', 0, ?1),
            (6, 'Give', '10', 'Charitable donations and helping others', 0, ?1)",
        [&created_at],
    )?;

    Ok(())
}

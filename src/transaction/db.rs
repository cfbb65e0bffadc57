//! Defines the core data model and database queries for transactions.
//!
//! Transactions are append-only: once a row is written there is no update or
//! delete path, so the table is a faithful history of every movement of
//! money between jars.

use rusqlite::{Connection, Row};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    Error,
    jar::JarId,
    money::{cents_to_decimal, decimal_to_cents},
    pagination::{PaginatedResult, PaginationParams},
    timestamp,
};

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// The maximum length of a transaction description in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 200;

const TRANSACTION_COLUMNS: &str =
    "id, source_jar_id, destination_jar_id, amount_cents, description, date, created_at";

/// A movement of money from one jar to another.
///
/// Immutable once created: the ledger is corrected by compensating
/// transfers, never by editing history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The jar the money came from.
    pub source_jar_id: JarId,
    /// The jar the money went to.
    pub destination_jar_id: JarId,
    /// The amount of money moved. Always positive.
    pub amount: Decimal,
    /// A text description of what the movement was for.
    pub description: String,
    /// When the movement happened (business time).
    pub date: OffsetDateTime,
    /// When the record was written.
    pub created_at: OffsetDateTime,
}

/// The validated fields for appending a transaction record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The jar the money came from.
    pub source_jar_id: JarId,
    /// The jar the money went to.
    pub destination_jar_id: JarId,
    /// The amount of money moved.
    pub amount: Decimal,
    /// A text description of what the movement was for.
    pub description: String,
    /// When the movement happened.
    pub date: OffsetDateTime,
}

impl NewTransaction {
    /// Validate the fields for a transaction record.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NonPositiveAmount] if `amount` is zero or negative,
    /// - or [Error::AmountPrecision] if `amount` has more than two decimal places,
    /// - or [Error::SameJarTransfer] if both jars are the same,
    /// - or [Error::EmptyTransactionDescription] if `description` is empty or only whitespace,
    /// - or [Error::TransactionDescriptionTooLong] if it exceeds [MAX_DESCRIPTION_LENGTH] characters.
    pub fn new(
        source_jar_id: JarId,
        destination_jar_id: JarId,
        amount: Decimal,
        description: &str,
        date: OffsetDateTime,
    ) -> Result<Self, Error> {
        if amount <= Decimal::ZERO {
            return Err(Error::NonPositiveAmount);
        }

        decimal_to_cents(amount)?;

        if source_jar_id == destination_jar_id {
            return Err(Error::SameJarTransfer);
        }

        let description = description.trim();

        if description.is_empty() {
            return Err(Error::EmptyTransactionDescription);
        }

        if description.graphemes(true).count() > MAX_DESCRIPTION_LENGTH {
            return Err(Error::TransactionDescriptionTooLong);
        }

        Ok(Self {
            source_jar_id,
            destination_jar_id,
            amount,
            description: description.to_string(),
            date: timestamp::truncate(date),
        })
    }
}

/// Create the transaction table in the database.
///
/// The foreign keys into the jar table do not cascade: deleting a referenced
/// jar fails instead of silently erasing history.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            source_jar_id INTEGER NOT NULL REFERENCES jar(id),
            destination_jar_id INTEGER NOT NULL REFERENCES jar(id),
            amount_cents INTEGER NOT NULL CHECK (amount_cents > 0),
            description TEXT NOT NULL,
            date TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);
        CREATE INDEX IF NOT EXISTS idx_transaction_source_jar ON \"transaction\"(source_jar_id);
        CREATE INDEX IF NOT EXISTS idx_transaction_destination_jar ON \"transaction\"(destination_jar_id);",
    )?;

    Ok(())
}

/// Append a transaction record without touching any jar balance.
///
/// This is the raw escape hatch for seeding and imports. Regular movements
/// of money go through [crate::transaction::transfer_money], which writes
/// the record atomically with its two balance changes; callers using this
/// path are responsible for balance consistency themselves.
///
/// # Errors
/// Returns [Error::NotFound] if either jar does not exist.
pub fn insert_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let cents = decimal_to_cents(new_transaction.amount)?;
    let date = timestamp::format(new_transaction.date)?;
    let created_at = timestamp::format(timestamp::now())?;

    connection
        .prepare(&format!(
            "INSERT INTO \"transaction\"
                (source_jar_id, destination_jar_id, amount_cents, description, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                new_transaction.source_jar_id,
                new_transaction.destination_jar_id,
                cents,
                &new_transaction.description,
                &date,
                &created_at,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                    ..
                },
                _,
            ) => Error::NotFound,
            error => error.into(),
        })
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a valid transaction.
pub fn get_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_row(&[(":id", &id)], map_transaction_row)
        .map_err(|error| error.into())
}

/// Retrieve all transactions, most recent first.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" ORDER BY date DESC, id DESC"
        ))?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Retrieve one page of transactions, most recent first.
///
/// Transactions with the same date are returned newest-inserted first, so
/// paging order is stable and deterministic.
pub fn get_transactions_page(
    params: PaginationParams,
    connection: &Connection,
) -> Result<PaginatedResult<Transaction>, Error> {
    let transaction = connection.unchecked_transaction()?;

    let total_count: u64 =
        transaction.query_row("SELECT COUNT(id) FROM \"transaction\"", [], |row| row.get(0))?;

    let transactions = transaction
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             ORDER BY date DESC, id DESC
             LIMIT ?1 OFFSET ?2"
        ))?
        .query_map((params.page_size(), params.offset()), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect::<Result<Vec<_>, _>>()?;

    transaction.commit()?;

    Ok(PaginatedResult::new(transactions, params, total_count))
}

/// Retrieve one page of the transactions that touched a jar, as source or
/// destination, most recent first.
///
/// An unknown jar ID yields an empty page rather than an error.
pub fn get_transactions_by_jar(
    jar_id: JarId,
    params: PaginationParams,
    connection: &Connection,
) -> Result<PaginatedResult<Transaction>, Error> {
    let transaction = connection.unchecked_transaction()?;

    let total_count: u64 = transaction.query_row(
        "SELECT COUNT(id) FROM \"transaction\" WHERE source_jar_id = ?1 OR destination_jar_id = ?1",
        [jar_id],
        |row| row.get(0),
    )?;

    let transactions = transaction
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE source_jar_id = ?1 OR destination_jar_id = ?1
             ORDER BY date DESC, id DESC
             LIMIT ?2 OFFSET ?3"
        ))?
        .query_map(
            (jar_id, params.page_size(), params.offset()),
            map_transaction_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect::<Result<Vec<_>, _>>()?;

    transaction.commit()?;

    Ok(PaginatedResult::new(transactions, params, total_count))
}

/// Retrieve one page of the transactions whose date falls within the
/// inclusive range `[start, end]`, most recent first.
///
/// # Errors
/// Returns [Error::InvalidDateRange] if `start` is later than `end`.
pub fn get_transactions_by_date_range(
    start: OffsetDateTime,
    end: OffsetDateTime,
    params: PaginationParams,
    connection: &Connection,
) -> Result<PaginatedResult<Transaction>, Error> {
    if start > end {
        return Err(Error::InvalidDateRange);
    }

    let start = timestamp::format(timestamp::truncate(start))?;
    let end = timestamp::format(timestamp::truncate(end))?;

    let transaction = connection.unchecked_transaction()?;

    let total_count: u64 = transaction.query_row(
        "SELECT COUNT(id) FROM \"transaction\" WHERE date BETWEEN ?1 AND ?2",
        [&start, &end],
        |row| row.get(0),
    )?;

    let transactions = transaction
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE date BETWEEN ?1 AND ?2
             ORDER BY date DESC, id DESC
             LIMIT ?3 OFFSET ?4"
        ))?
        .query_map(
            (&start, &end, params.page_size(), params.offset()),
            map_transaction_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect::<Result<Vec<_>, _>>()?;

    transaction.commit()?;

    Ok(PaginatedResult::new(transactions, params, total_count))
}

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let source_jar_id = row.get(1)?;
    let destination_jar_id = row.get(2)?;
    let amount_cents: i64 = row.get(3)?;
    let description = row.get(4)?;
    let date = timestamp::parse_column(row.get(5)?, 5)?;
    let created_at = timestamp::parse_column(row.get(6)?, 6)?;

    Ok(Transaction {
        id,
        source_jar_id,
        destination_jar_id,
        amount: cents_to_decimal(amount_cents),
        description,
        date,
        created_at,
    })
}


#[cfg(test)]
mod transaction_query_tests {
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::macros::datetime;

    use crate::{
        Error,
        db::initialize,
        pagination::PaginationParams,
        transaction::{
            NewTransaction, Transaction, get_all_transactions, get_transaction,
            get_transactions_by_date_range, get_transactions_by_jar, get_transactions_page,
            insert_transaction,
        },
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    fn decimal(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn insert_test_transaction(
        connection: &Connection,
        source: i64,
        destination: i64,
        date: time::OffsetDateTime,
    ) -> Transaction {
        insert_transaction(
            NewTransaction::new(source, destination, decimal("5"), "seeded", date).unwrap(),
            connection,
        )
        .expect("Could not insert transaction")
    }

    #[test]
    fn insert_and_get_round_trip() {
        let connection = get_test_connection();

        let inserted = insert_test_transaction(&connection, 1, 2, datetime!(2025-06-01 12:00 UTC));
        let selected = get_transaction(inserted.id, &connection);

        assert_eq!(Ok(inserted), selected);
    }

    #[test]
    fn get_with_invalid_id_returns_not_found() {
        let connection = get_test_connection();

        let selected = get_transaction(999999, &connection);

        assert_eq!(selected, Err(Error::NotFound));
    }

    #[test]
    fn insert_fails_when_source_jar_is_missing() {
        let connection = get_test_connection();

        let result = insert_transaction(
            NewTransaction::new(999, 2, decimal("5"), "x", datetime!(2025-06-01 12:00 UTC))
                .unwrap(),
            &connection,
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn raw_insert_does_not_touch_balances() {
        let connection = get_test_connection();

        insert_test_transaction(&connection, 1, 2, datetime!(2025-06-01 12:00 UTC));

        assert_eq!(crate::jar::get_balance(1, &connection), Ok(Decimal::ZERO));
        assert_eq!(crate::jar::get_balance(2, &connection), Ok(Decimal::ZERO));
    }

    #[test]
    fn list_orders_by_date_descending_then_id_descending() {
        let connection = get_test_connection();
        let early = insert_test_transaction(&connection, 1, 2, datetime!(2025-06-01 09:00 UTC));
        let late_first = insert_test_transaction(&connection, 2, 3, datetime!(2025-06-01 12:00 UTC));
        let late_second = insert_test_transaction(&connection, 3, 4, datetime!(2025-06-01 12:00 UTC));

        let got = get_all_transactions(&connection).expect("Could not list transactions");

        assert_eq!(got, vec![late_second.clone(), late_first.clone(), early]);

        let page = get_transactions_page(PaginationParams::default(), &connection)
            .expect("Could not get page");
        assert_eq!(page.data[0], late_second);
        assert_eq!(page.data[1], late_first);
        assert_eq!(page.total_count, 3);
    }

    #[test]
    fn paging_splits_results() {
        let connection = get_test_connection();
        for hour in 0..5 {
            insert_test_transaction(
                &connection,
                1,
                2,
                datetime!(2025-06-01 00:00 UTC) + time::Duration::hours(hour),
            );
        }

        let params = PaginationParams {
            page: 2,
            page_size: 2,
        };
        let page =
            get_transactions_page(params, &connection).expect("Could not get page");

        assert_eq!(page.total_count, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.data.len(), 2);
        assert!(page.has_previous);
        assert!(page.has_next);
    }

    #[test]
    fn by_jar_matches_source_and_destination() {
        let connection = get_test_connection();
        let as_source = insert_test_transaction(&connection, 5, 1, datetime!(2025-06-01 09:00 UTC));
        let as_destination =
            insert_test_transaction(&connection, 2, 5, datetime!(2025-06-01 10:00 UTC));
        insert_test_transaction(&connection, 1, 2, datetime!(2025-06-01 11:00 UTC));

        let page = get_transactions_by_jar(5, PaginationParams::default(), &connection)
            .expect("Could not get transactions by jar");

        assert_eq!(page.total_count, 2);
        assert_eq!(page.data, vec![as_destination, as_source]);
    }

    #[test]
    fn by_jar_with_unknown_jar_returns_empty_page() {
        let connection = get_test_connection();
        insert_test_transaction(&connection, 1, 2, datetime!(2025-06-01 09:00 UTC));

        let page = get_transactions_by_jar(999, PaginationParams::default(), &connection)
            .expect("Could not get transactions by jar");

        assert_eq!(page.total_count, 0);
        assert!(page.data.is_empty());
    }

    #[test]
    fn date_range_bounds_are_inclusive() {
        let connection = get_test_connection();
        insert_test_transaction(&connection, 1, 2, datetime!(2025-06-01 00:00 UTC));
        let on_start = insert_test_transaction(&connection, 1, 2, datetime!(2025-06-02 00:00 UTC));
        let on_end = insert_test_transaction(&connection, 1, 2, datetime!(2025-06-03 00:00 UTC));
        insert_test_transaction(&connection, 1, 2, datetime!(2025-06-04 00:00 UTC));

        let page = get_transactions_by_date_range(
            datetime!(2025-06-02 00:00 UTC),
            datetime!(2025-06-03 00:00 UTC),
            PaginationParams::default(),
            &connection,
        )
        .expect("Could not get transactions by date range");

        assert_eq!(page.total_count, 2);
        assert_eq!(page.data, vec![on_end, on_start]);
    }

    #[test]
    fn date_range_rejects_reversed_bounds() {
        let connection = get_test_connection();

        let result = get_transactions_by_date_range(
            datetime!(2025-06-03 00:00 UTC),
            datetime!(2025-06-02 00:00 UTC),
            PaginationParams::default(),
            &connection,
        );

        assert_eq!(result, Err(Error::InvalidDateRange));
    }
}

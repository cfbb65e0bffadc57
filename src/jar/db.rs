//! Database operations for jars.
//!
//! Balances are stored as integer cents with a non-negativity CHECK. Both
//! `deposit` and `withdraw` mutate the balance in a single `UPDATE`
//! statement, so the read-modify-write is atomic per row; `withdraw` folds
//! the sufficient-funds check into the statement's WHERE clause so two
//! callers can never both pass the check against a stale balance.

use rusqlite::{Connection, Row};
use rust_decimal::Decimal;

use crate::{
    Error,
    jar::{Jar, JarId, JarName, NewJar},
    money::{cents_to_decimal, decimal_to_cents},
    pagination::{PaginatedResult, PaginationParams},
    timestamp,
};

const JAR_COLUMNS: &str = "id, name, percentage, description, balance_cents, created_at, updated_at";

/// Create the jar table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_jar_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS jar (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                percentage TEXT NOT NULL,
                description TEXT NOT NULL,
                balance_cents INTEGER NOT NULL DEFAULT 0 CHECK (balance_cents >= 0),
                created_at TEXT NOT NULL,
                updated_at TEXT
                )",
        (),
    )?;

    Ok(())
}

/// Create a jar with a zero balance and return it with its generated ID.
pub fn create_jar(new_jar: NewJar, connection: &Connection) -> Result<Jar, Error> {
    let created_at = timestamp::format(timestamp::now())?;

    let jar = connection
        .prepare(&format!(
            "INSERT INTO jar (name, percentage, description, balance_cents, created_at)
             VALUES (?1, ?2, ?3, 0, ?4)
             RETURNING {JAR_COLUMNS}"
        ))?
        .query_row(
            (
                new_jar.name.as_ref(),
                new_jar.percentage.to_string(),
                &new_jar.description,
                &created_at,
            ),
            map_jar_row,
        )?;

    Ok(jar)
}

/// Retrieve a single jar by ID.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a valid jar.
pub fn get_jar(id: JarId, connection: &Connection) -> Result<Jar, Error> {
    connection
        .prepare(&format!("SELECT {JAR_COLUMNS} FROM jar WHERE id = :id"))?
        .query_row(&[(":id", &id)], map_jar_row)
        .map_err(|error| error.into())
}

/// Retrieve all jars ordered by ID.
pub fn get_all_jars(connection: &Connection) -> Result<Vec<Jar>, Error> {
    connection
        .prepare(&format!("SELECT {JAR_COLUMNS} FROM jar ORDER BY id ASC"))?
        .query_map([], map_jar_row)?
        .map(|maybe_jar| maybe_jar.map_err(|error| error.into()))
        .collect()
}

/// Retrieve one page of jars ordered by ID, along with the total count.
///
/// The count and the page are read inside one SQL transaction so they are
/// mutually consistent.
pub fn get_jars_page(
    params: PaginationParams,
    connection: &Connection,
) -> Result<PaginatedResult<Jar>, Error> {
    let transaction = connection.unchecked_transaction()?;

    let total_count: u64 = transaction.query_row("SELECT COUNT(id) FROM jar", [], |row| row.get(0))?;

    let jars = transaction
        .prepare(&format!(
            "SELECT {JAR_COLUMNS} FROM jar ORDER BY id ASC LIMIT ?1 OFFSET ?2"
        ))?
        .query_map((params.page_size(), params.offset()), map_jar_row)?
        .map(|maybe_jar| maybe_jar.map_err(Error::from))
        .collect::<Result<Vec<_>, _>>()?;

    transaction.commit()?;

    Ok(PaginatedResult::new(jars, params, total_count))
}

/// Replace a jar's metadata (name, percentage, description) and set its
/// last-updated timestamp.
///
/// The balance is deliberately not settable here: it only changes through
/// deposits, withdrawals and transfers.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a valid jar.
pub fn update_jar(id: JarId, changes: NewJar, connection: &Connection) -> Result<Jar, Error> {
    let updated_at = timestamp::format(timestamp::now())?;

    connection
        .prepare(&format!(
            "UPDATE jar SET name = ?1, percentage = ?2, description = ?3, updated_at = ?4
             WHERE id = ?5
             RETURNING {JAR_COLUMNS}"
        ))?
        .query_row(
            (
                changes.name.as_ref(),
                changes.percentage.to_string(),
                &changes.description,
                &updated_at,
                id,
            ),
            map_jar_row,
        )
        .map_err(|error| error.into())
}

/// Delete a jar by ID.
///
/// Returns `Ok(false)` if no jar with `id` exists and `Ok(true)` on success.
///
/// # Errors
/// Returns [Error::JarHasTransactions] if any transaction references the jar
/// as source or destination; jars with history must be kept so the ledger
/// stays interpretable.
pub fn delete_jar(id: JarId, connection: &Connection) -> Result<bool, Error> {
    let transaction = connection.unchecked_transaction()?;

    let has_references: bool = transaction.query_row(
        "SELECT EXISTS (
            SELECT 1 FROM \"transaction\"
            WHERE source_jar_id = ?1 OR destination_jar_id = ?1
        )",
        [id],
        |row| row.get(0),
    )?;

    if has_references {
        return Err(Error::JarHasTransactions);
    }

    let rows_affected = transaction.execute("DELETE FROM jar WHERE id = ?1", [id])?;
    transaction.commit()?;

    Ok(rows_affected > 0)
}

/// Atomically add `amount` to a jar's balance and return the updated jar.
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] if `amount` is zero or negative,
/// - or [Error::AmountPrecision] if `amount` has more than two decimal places,
/// - or [Error::NotFound] if `id` does not refer to a valid jar.
pub fn deposit(id: JarId, amount: Decimal, connection: &Connection) -> Result<Jar, Error> {
    if amount <= Decimal::ZERO {
        return Err(Error::NonPositiveAmount);
    }

    let cents = decimal_to_cents(amount)?;
    let updated_at = timestamp::format(timestamp::now())?;

    connection
        .prepare(&format!(
            "UPDATE jar SET balance_cents = balance_cents + ?1, updated_at = ?2
             WHERE id = ?3
             RETURNING {JAR_COLUMNS}"
        ))?
        .query_row((cents, &updated_at, id), map_jar_row)
        .map_err(|error| error.into())
}

/// Atomically subtract `amount` from a jar's balance and return the updated
/// jar.
///
/// The sufficient-funds check and the decrement are one SQL statement
/// (`WHERE id = ? AND balance_cents >= ?`), so concurrent withdrawals
/// serialize on the row and can never both succeed against a balance that
/// only covers one of them.
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] if `amount` is zero or negative,
/// - or [Error::AmountPrecision] if `amount` has more than two decimal places,
/// - or [Error::NotFound] if `id` does not refer to a valid jar,
/// - or [Error::InsufficientFunds] if the balance cannot cover `amount`.
pub fn withdraw(id: JarId, amount: Decimal, connection: &Connection) -> Result<Jar, Error> {
    if amount <= Decimal::ZERO {
        return Err(Error::NonPositiveAmount);
    }

    let cents = decimal_to_cents(amount)?;
    let updated_at = timestamp::format(timestamp::now())?;

    let result = connection
        .prepare(&format!(
            "UPDATE jar SET balance_cents = balance_cents - ?1, updated_at = ?2
             WHERE id = ?3 AND balance_cents >= ?1
             RETURNING {JAR_COLUMNS}"
        ))?
        .query_row((cents, &updated_at, id), map_jar_row);

    match result {
        Ok(jar) => Ok(jar),
        // No row matched: either the jar is missing or the balance is short.
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            let name: String = connection
                .prepare("SELECT name FROM jar WHERE id = :id")?
                .query_row(&[(":id", &id)], |row| row.get(0))?;

            Err(Error::InsufficientFunds(name))
        }
        Err(error) => Err(error.into()),
    }
}

/// Get a jar's current balance.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a valid jar.
pub fn get_balance(id: JarId, connection: &Connection) -> Result<Decimal, Error> {
    let cents: i64 = connection
        .prepare("SELECT balance_cents FROM jar WHERE id = :id")?
        .query_row(&[(":id", &id)], |row| row.get(0))?;

    Ok(cents_to_decimal(cents))
}

fn map_jar_row(row: &Row) -> Result<Jar, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let raw_percentage: String = row.get(2)?;
    let description = row.get(3)?;
    let balance_cents: i64 = row.get(4)?;
    let created_at = timestamp::parse_column(row.get(5)?, 5)?;
    let updated_at = row
        .get::<_, Option<String>>(6)?
        .map(|value| timestamp::parse_column(value, 6))
        .transpose()?;

    let percentage = raw_percentage.parse().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(error))
    })?;

    Ok(Jar {
        id,
        name: JarName::new_unchecked(&raw_name),
        percentage,
        description,
        balance: cents_to_decimal(balance_cents),
        created_at,
        updated_at,
    })
}

#[cfg(test)]
mod jar_query_tests {
    use rusqlite::Connection;
    use rust_decimal::Decimal;

    use crate::{
        Error,
        db::initialize,
        jar::{
            JarName, NewJar, create_jar, delete_jar, get_all_jars, get_jar, get_jars_page,
            update_jar,
        },
        pagination::PaginationParams,
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    fn test_jar(name: &str) -> NewJar {
        NewJar::new(JarName::new_unchecked(name), Decimal::TEN, "a test jar").unwrap()
    }

    #[test]
    fn create_jar_succeeds_with_zero_balance() {
        let connection = get_test_connection();

        let jar = create_jar(test_jar("Holidays"), &connection).expect("Could not create jar");

        assert!(jar.id > 0);
        assert_eq!(jar.name, JarName::new_unchecked("Holidays"));
        assert_eq!(jar.balance, Decimal::ZERO);
        assert_eq!(jar.updated_at, None);
    }

    #[test]
    fn get_jar_returns_created_jar() {
        let connection = get_test_connection();
        let inserted_jar =
            create_jar(test_jar("Holidays"), &connection).expect("Could not create jar");

        let selected_jar = get_jar(inserted_jar.id, &connection);

        assert_eq!(Ok(inserted_jar), selected_jar);
    }

    #[test]
    fn get_jar_with_invalid_id_returns_not_found() {
        let connection = get_test_connection();

        let selected_jar = get_jar(999999, &connection);

        assert_eq!(selected_jar, Err(Error::NotFound));
    }

    #[test]
    fn get_all_jars_is_ordered_by_id() {
        let connection = get_test_connection();

        let jars = get_all_jars(&connection).expect("Could not get jars");

        // The six canonical jars are seeded at initialization.
        assert_eq!(jars.len(), 6);
        let mut ids: Vec<_> = jars.iter().map(|jar| jar.id).collect();
        ids.sort();
        assert_eq!(ids, jars.iter().map(|jar| jar.id).collect::<Vec<_>>());
    }

    #[test]
    fn get_jars_page_returns_consistent_count() {
        let connection = get_test_connection();
        let params = PaginationParams {
            page: 2,
            page_size: 4,
        };

        let page = get_jars_page(params, &connection).expect("Could not get jars page");

        assert_eq!(page.total_count, 6);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.data.len(), 2);
        assert!(page.has_previous);
        assert!(!page.has_next);
    }

    #[test]
    fn update_jar_replaces_metadata_only() {
        let connection = get_test_connection();
        let jar = create_jar(test_jar("Holidays"), &connection).expect("Could not create jar");

        let changes = NewJar::new(
            JarName::new_unchecked("Travel"),
            Decimal::ONE,
            "renamed jar",
        )
        .unwrap();
        let updated_jar =
            update_jar(jar.id, changes, &connection).expect("Could not update jar");

        assert_eq!(updated_jar.name, JarName::new_unchecked("Travel"));
        assert_eq!(updated_jar.percentage, Decimal::ONE);
        assert_eq!(updated_jar.description, "renamed jar");
        assert_eq!(updated_jar.balance, jar.balance);
        assert!(updated_jar.updated_at.is_some());
    }

    #[test]
    fn update_jar_with_invalid_id_returns_not_found() {
        let connection = get_test_connection();

        let result = update_jar(999999, test_jar("Ghost"), &connection);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_jar_succeeds_for_jar_without_history() {
        let connection = get_test_connection();
        let jar = create_jar(test_jar("Disposable"), &connection).expect("Could not create jar");

        let deleted = delete_jar(jar.id, &connection).expect("Could not delete jar");

        assert!(deleted);
        assert_eq!(get_jar(jar.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_jar_with_invalid_id_returns_false() {
        let connection = get_test_connection();

        let deleted = delete_jar(999999, &connection).expect("Delete should not error");

        assert!(!deleted);
    }
}

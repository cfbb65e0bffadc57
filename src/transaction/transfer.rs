//! Moves money between jars as a single atomic unit of work.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    http::StatusCode,
};
use rusqlite::{Connection, TransactionBehavior};
use rust_decimal::Decimal;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    jar::{JarId, deposit, withdraw},
    timestamp,
    transaction::{NewTransaction, Transaction, insert_transaction},
};

/// Move `amount` from one jar to another and record the movement.
///
/// The withdrawal, the deposit, and the ledger record are committed
/// together or not at all: if any step fails both balances are left
/// untouched and no record is written.
///
/// # Errors
/// This function will return a:
/// - [Error::InsufficientFunds] if the source jar cannot cover `amount`,
/// - or [Error::NotFound] if either jar does not exist,
/// - or the validation errors of [NewTransaction::new].
pub fn transfer_money(
    source_jar_id: JarId,
    destination_jar_id: JarId,
    amount: Decimal,
    description: &str,
    date: Option<OffsetDateTime>,
    connection: &mut Connection,
) -> Result<Transaction, Error> {
    let date = date.unwrap_or_else(timestamp::now);
    let new_transaction =
        NewTransaction::new(source_jar_id, destination_jar_id, amount, description, date)?;

    // An immediate transaction takes the write lock up front so the two
    // balance updates and the ledger insert cannot interleave with
    // another writer. Dropping without commit rolls everything back.
    let db_transaction = connection.transaction_with_behavior(TransactionBehavior::Immediate)?;

    withdraw(source_jar_id, amount, &db_transaction)?;
    deposit(destination_jar_id, amount, &db_transaction)?;
    let transaction = insert_transaction(new_transaction, &db_transaction)?;

    db_transaction.commit()?;

    Ok(transaction)
}

/// The state needed for the transfer endpoint.
#[derive(Debug, Clone)]
pub struct TransferEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransferEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for a transfer between jars.
#[derive(Debug, Clone, Deserialize)]
pub struct TransferParams {
    /// The jar to take the money from.
    pub source_jar_id: JarId,
    /// The jar to put the money into.
    pub destination_jar_id: JarId,
    /// The amount of money to move.
    pub amount: Decimal,
    /// A text description of what the movement is for.
    pub description: String,
    /// When the movement happened. Defaults to now.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
}

/// Handle moving money between jars. Returns the recorded transaction.
pub async fn transfer_endpoint(
    Query(params): Query<TransferParams>,
    State(state): State<TransferEndpointState>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let mut connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let transaction = transfer_money(
        params.source_jar_id,
        params.destination_jar_id,
        params.amount,
        &params.description,
        params.date,
        &mut connection,
    )?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

#[cfg(test)]
mod transfer_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::StatusCode,
    };
    use rusqlite::Connection;

    use crate::{Error, db::initialize, jar::deposit};

    use super::{TransferEndpointState, TransferParams, transfer_endpoint};

    fn get_transfer_state() -> TransferEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        TransferEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn transfer_endpoint_records_transaction() {
        let state = get_transfer_state();
        deposit(
            1,
            "50".parse().unwrap(),
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not deposit");

        let params = TransferParams {
            source_jar_id: 1,
            destination_jar_id: 2,
            amount: "20".parse().unwrap(),
            description: "savings".to_string(),
            date: None,
        };

        let (status, axum::Json(transaction)) =
            transfer_endpoint(Query(params), State(state))
                .await
                .expect("Could not transfer");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(transaction.amount, "20".parse().unwrap());
        assert_eq!(transaction.description, "savings");
    }

    #[tokio::test]
    async fn transfer_endpoint_rejects_same_jar() {
        let state = get_transfer_state();

        let params = TransferParams {
            source_jar_id: 1,
            destination_jar_id: 1,
            amount: "20".parse().unwrap(),
            description: "loop".to_string(),
            date: None,
        };

        let result = transfer_endpoint(Query(params), State(state)).await;

        assert!(matches!(result, Err(Error::SameJarTransfer)));
    }
}

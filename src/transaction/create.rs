//! Raw transaction creation endpoint.
//!
//! Appends a ledger record without moving any money. Useful for seeding
//! and importing history; day-to-day movements go through the transfer
//! endpoint instead.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    jar::JarId,
    timestamp,
    transaction::{NewTransaction, Transaction, db::insert_transaction},
};

/// The state needed for creating a transaction record.
#[derive(Debug, Clone)]
pub struct CreateTransactionEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for a transaction record.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionForm {
    /// The jar the money came from.
    pub source_jar_id: JarId,
    /// The jar the money went to.
    pub destination_jar_id: JarId,
    /// The amount of money moved.
    pub amount: Decimal,
    /// A text description of what the movement was for.
    pub description: String,
    /// When the movement happened. Defaults to now.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
}

/// Handle appending a transaction record.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionEndpointState>,
    Json(form): Json<TransactionForm>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let date = form.date.unwrap_or_else(timestamp::now);
    let new_transaction = NewTransaction::new(
        form.source_jar_id,
        form.destination_jar_id,
        form.amount,
        &form.description,
        date,
    )?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let transaction = insert_transaction(new_transaction, &connection)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

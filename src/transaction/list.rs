//! Transaction history endpoints: unpaged, paged, by jar, and by date range.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    jar::JarId,
    pagination::{PaginatedResult, PaginationParams},
    transaction::{
        Transaction,
        db::{
            get_all_transactions, get_transactions_by_date_range, get_transactions_by_jar,
            get_transactions_page,
        },
    },
};

/// The state needed for listing transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListTransactionsEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The inclusive date range to filter transactions by.
#[derive(Debug, Clone, Deserialize)]
pub struct DateRangeParams {
    /// The earliest date to include.
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    /// The latest date to include.
    #[serde(with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
}

/// Handle listing every transaction, most recent first.
pub async fn get_all_transactions_endpoint(
    State(state): State<ListTransactionsEndpointState>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    get_all_transactions(&connection).map(Json)
}

/// Handle listing one page of transactions.
pub async fn get_transactions_page_endpoint(
    Query(params): Query<PaginationParams>,
    State(state): State<ListTransactionsEndpointState>,
) -> Result<Json<PaginatedResult<Transaction>>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    get_transactions_page(params, &connection).map(Json)
}

/// Handle listing the transactions that touched a jar.
pub async fn get_transactions_by_jar_endpoint(
    Path(jar_id): Path<JarId>,
    Query(params): Query<PaginationParams>,
    State(state): State<ListTransactionsEndpointState>,
) -> Result<Json<PaginatedResult<Transaction>>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    get_transactions_by_jar(jar_id, params, &connection).map(Json)
}

/// Handle listing the transactions within a date range.
pub async fn get_transactions_by_date_range_endpoint(
    Query(range): Query<DateRangeParams>,
    Query(params): Query<PaginationParams>,
    State(state): State<ListTransactionsEndpointState>,
) -> Result<Json<PaginatedResult<Transaction>>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    get_transactions_by_date_range(range.start, range.end, params, &connection).map(Json)
}

//! Balance endpoints: read a jar's balance, add money, and remove money.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    jar::{
        Jar, JarId,
        db::{deposit, get_balance, withdraw},
    },
};

/// The state needed for the balance endpoints.
#[derive(Debug, Clone)]
pub struct BalanceEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BalanceEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for adding or removing money.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AmountForm {
    /// The amount of money to add or remove.
    pub amount: Decimal,
}

/// A jar's current balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    /// The ID of the jar.
    pub jar_id: JarId,
    /// The jar's balance.
    pub balance: Decimal,
}

/// Handle reading a jar's balance.
pub async fn get_balance_endpoint(
    Path(jar_id): Path<JarId>,
    State(state): State<BalanceEndpointState>,
) -> Result<Json<BalanceResponse>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let balance = get_balance(jar_id, &connection)?;

    Ok(Json(BalanceResponse { jar_id, balance }))
}

/// Handle adding money to a jar. Returns the updated jar.
pub async fn deposit_endpoint(
    Path(jar_id): Path<JarId>,
    State(state): State<BalanceEndpointState>,
    Json(form): Json<AmountForm>,
) -> Result<Json<Jar>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    deposit(jar_id, form.amount, &connection).map(Json)
}

/// Handle removing money from a jar. Returns the updated jar.
pub async fn withdraw_endpoint(
    Path(jar_id): Path<JarId>,
    State(state): State<BalanceEndpointState>,
    Json(form): Json<AmountForm>,
) -> Result<Json<Jar>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    withdraw(jar_id, form.amount, &connection).map(Json)
}

#[cfg(test)]
mod balance_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Path, State},
    };
    use rusqlite::Connection;
    use rust_decimal::Decimal;

    use crate::{Error, db::initialize};

    use super::{
        AmountForm, BalanceEndpointState, deposit_endpoint, get_balance_endpoint,
        withdraw_endpoint,
    };

    fn get_balance_state() -> BalanceEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        BalanceEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn decimal(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[tokio::test]
    async fn deposit_then_withdraw_updates_balance() {
        let state = get_balance_state();

        let Json(jar) = deposit_endpoint(
            Path(1),
            State(state.clone()),
            Json(AmountForm {
                amount: decimal("100"),
            }),
        )
        .await
        .expect("Could not deposit");
        assert_eq!(jar.balance, decimal("100.00"));

        let Json(jar) = withdraw_endpoint(
            Path(1),
            State(state.clone()),
            Json(AmountForm {
                amount: decimal("33.50"),
            }),
        )
        .await
        .expect("Could not withdraw");
        assert_eq!(jar.balance, decimal("66.50"));

        let Json(balance) = get_balance_endpoint(Path(1), State(state))
            .await
            .expect("Could not get balance");
        assert_eq!(balance.balance, decimal("66.50"));
    }

    #[tokio::test]
    async fn withdraw_endpoint_rejects_overdraft() {
        let state = get_balance_state();

        let result = withdraw_endpoint(
            Path(1),
            State(state),
            Json(AmountForm {
                amount: decimal("0.01"),
            }),
        )
        .await;

        assert!(matches!(result, Err(Error::InsufficientFunds(_))));
    }

    #[tokio::test]
    async fn deposit_endpoint_rejects_sub_cent_amount() {
        let state = get_balance_state();

        let result = deposit_endpoint(
            Path(1),
            State(state),
            Json(AmountForm {
                amount: decimal("1.005"),
            }),
        )
        .await;

        assert!(matches!(result, Err(Error::AmountPrecision)));
    }
}

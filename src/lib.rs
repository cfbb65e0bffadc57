//! Moneyjars is a small REST API for envelope-style budgeting.
//!
//! Money lives in named "jars", each with a running balance that can never go
//! negative. Every movement of money between jars is recorded as an immutable
//! transaction, written atomically with the two balance changes it describes.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::signal;

mod app_state;
mod db;
mod endpoints;
pub mod jar;
mod logging;
pub mod money;
pub mod pagination;
mod routing;
mod timestamp;
pub mod transaction;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used for a jar name.
    #[error("jar name cannot be empty")]
    EmptyJarName,

    /// A jar name exceeded the maximum length.
    #[error("jar name cannot be longer than 50 characters")]
    JarNameTooLong,

    /// A jar description exceeded the maximum length.
    #[error("jar description cannot be longer than 500 characters")]
    JarDescriptionTooLong,

    /// A jar's allocation percentage was outside the valid range.
    #[error("percentage {0} is outside the range 0 to 100")]
    PercentageOutOfRange(Decimal),

    /// An empty string was used for a transaction description.
    #[error("transaction description cannot be empty")]
    EmptyTransactionDescription,

    /// A transaction description exceeded the maximum length.
    #[error("transaction description cannot be longer than 200 characters")]
    TransactionDescriptionTooLong,

    /// A zero or negative amount was used where money must move.
    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    /// An amount had more precision than the ledger stores.
    ///
    /// Balances and transaction amounts are fixed-point with two fractional
    /// digits; rather than silently rounding, extra digits are rejected.
    #[error("amounts cannot have more than two decimal places")]
    AmountPrecision,

    /// A transfer named the same jar as both source and destination.
    #[error("source and destination jars cannot be the same")]
    SameJarTransfer,

    /// A date-range query had its bounds in the wrong order.
    #[error("start date cannot be later than end date")]
    InvalidDateRange,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A withdrawal or transfer would drive a jar's balance negative.
    ///
    /// Carries the name of the jar whose balance could not cover the amount.
    #[error("insufficient funds in jar {0}")]
    InsufficientFunds(String),

    /// A jar could not be deleted because transactions still reference it.
    #[error("the jar is referenced by existing transactions")]
    JarHasTransactions,

    /// A timestamp could not be formatted as RFC 3339 text for storage.
    #[error("could not format timestamp: {0}")]
    InvalidTimestamp(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::EmptyJarName
            | Error::JarNameTooLong
            | Error::JarDescriptionTooLong
            | Error::PercentageOutOfRange(_)
            | Error::EmptyTransactionDescription
            | Error::TransactionDescriptionTooLong
            | Error::NonPositiveAmount
            | Error::AmountPrecision
            | Error::SameJarTransfer
            | Error::InvalidDateRange
            | Error::InsufficientFunds(_) => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::JarHasTransactions => StatusCode::CONFLICT,
            Error::InvalidTimestamp(_) | Error::DatabaseLockError | Error::SqlError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal failures are logged server-side and not shown to the client.
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred: {}", self);
            return (
                status,
                Json(ErrorBody {
                    error: "an internal server error occurred".to_owned(),
                }),
            )
                .into_response();
        }

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// The JSON body returned for every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// A human-readable description of what went wrong.
    pub error: String,
}

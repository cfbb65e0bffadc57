//! Application router configuration.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};

use crate::{
    AppState, ErrorBody, endpoints,
    jar::{
        create_jar_endpoint, delete_jar_endpoint, deposit_endpoint, get_all_jars_endpoint,
        get_balance_endpoint, get_jar_endpoint, get_jars_page_endpoint, update_jar_endpoint,
        withdraw_endpoint,
    },
    transaction::{
        create_transaction_endpoint, get_all_transactions_endpoint, get_transaction_endpoint,
        get_transactions_by_date_range_endpoint, get_transactions_by_jar_endpoint,
        get_transactions_page_endpoint, transfer_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::JARS, get(get_all_jars_endpoint))
        .route(endpoints::JARS, post(create_jar_endpoint))
        .route(endpoints::JARS_PAGED, get(get_jars_page_endpoint))
        .route(endpoints::JAR, get(get_jar_endpoint))
        .route(endpoints::JAR, put(update_jar_endpoint))
        .route(endpoints::JAR, delete(delete_jar_endpoint))
        .route(endpoints::JAR_BALANCE, get(get_balance_endpoint))
        .route(endpoints::JAR_DEPOSIT, post(deposit_endpoint))
        .route(endpoints::JAR_WITHDRAW, post(withdraw_endpoint))
        .route(endpoints::TRANSACTIONS, get(get_all_transactions_endpoint))
        .route(endpoints::TRANSACTIONS, post(create_transaction_endpoint))
        .route(
            endpoints::TRANSACTIONS_PAGED,
            get(get_transactions_page_endpoint),
        )
        .route(endpoints::TRANSACTION, get(get_transaction_endpoint))
        .route(endpoints::TRANSFER, post(transfer_endpoint))
        .route(
            endpoints::TRANSACTIONS_BY_JAR,
            get(get_transactions_by_jar_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS_BY_DATE_RANGE,
            get(get_transactions_by_date_range_endpoint),
        )
        .fallback(get_404_not_found)
        .with_state(state)
}

/// JSON body for routes that do not exist.
async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "not found".to_owned(),
        }),
    )
        .into_response()
}

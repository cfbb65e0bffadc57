//! Jar listing endpoints, unpaged and paged.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    jar::{
        Jar,
        db::{get_all_jars, get_jars_page},
    },
    pagination::{PaginatedResult, PaginationParams},
};

/// The state needed for listing jars.
#[derive(Debug, Clone)]
pub struct ListJarsEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListJarsEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle listing every jar, ordered by ID.
pub async fn get_all_jars_endpoint(
    State(state): State<ListJarsEndpointState>,
) -> Result<Json<Vec<Jar>>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    get_all_jars(&connection).map(Json)
}

/// Handle listing one page of jars.
pub async fn get_jars_page_endpoint(
    Query(params): Query<PaginationParams>,
    State(state): State<ListJarsEndpointState>,
) -> Result<Json<PaginatedResult<Jar>>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    get_jars_page(params, &connection).map(Json)
}

#[cfg(test)]
mod list_jars_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Query, State},
    };
    use rusqlite::Connection;

    use crate::{db::initialize, pagination::PaginationParams};

    use super::{ListJarsEndpointState, get_all_jars_endpoint, get_jars_page_endpoint};

    fn get_list_jars_state() -> ListJarsEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        ListJarsEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn get_all_jars_endpoint_returns_seeded_jars_in_id_order() {
        let state = get_list_jars_state();

        let Json(jars) = get_all_jars_endpoint(State(state))
            .await
            .expect("Could not list jars");

        assert_eq!(jars.len(), 6);
        let ids: Vec<_> = jars.iter().map(|jar| jar.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[tokio::test]
    async fn get_jars_page_endpoint_clamps_page_size() {
        let state = get_list_jars_state();
        let params = PaginationParams {
            page: 1,
            page_size: 4,
        };

        let Json(page) = get_jars_page_endpoint(Query(params), State(state))
            .await
            .expect("Could not get jars page");

        assert_eq!(page.data.len(), 4);
        assert_eq!(page.total_count, 6);
        assert_eq!(page.total_pages, 2);
        assert!(page.has_next);
        assert!(!page.has_previous);
    }
}

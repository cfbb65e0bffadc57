//! Jar deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    jar::{JarId, db::delete_jar},
};

/// The state needed for deleting a jar.
#[derive(Debug, Clone)]
pub struct DeleteJarEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteJarEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle jar deletion.
///
/// Jars that appear in the ledger cannot be deleted; the history they
/// anchor must stay intact.
pub async fn delete_jar_endpoint(
    Path(jar_id): Path<JarId>,
    State(state): State<DeleteJarEndpointState>,
) -> Result<StatusCode, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    if delete_jar(jar_id, &connection)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::NotFound)
    }
}

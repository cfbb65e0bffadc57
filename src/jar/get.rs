//! Single jar retrieval endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    jar::{Jar, JarId, db::get_jar},
};

/// The state needed for retrieving a jar.
#[derive(Debug, Clone)]
pub struct GetJarEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetJarEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle retrieving a jar by its ID.
pub async fn get_jar_endpoint(
    Path(jar_id): Path<JarId>,
    State(state): State<GetJarEndpointState>,
) -> Result<Json<Jar>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    get_jar(jar_id, &connection).map(Json)
}

//! Jar metadata editing endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    jar::{Jar, JarForm, JarId, NewJar, db::update_jar},
};

/// The state needed for editing a jar.
#[derive(Debug, Clone)]
pub struct UpdateJarEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateJarEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle updating a jar's name, percentage, and description.
///
/// The balance is not editable here: it only changes through deposits,
/// withdrawals, and transfers.
pub async fn update_jar_endpoint(
    Path(jar_id): Path<JarId>,
    State(state): State<UpdateJarEndpointState>,
    Json(form): Json<JarForm>,
) -> Result<Json<Jar>, Error> {
    let changes = NewJar::try_from(form)?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    update_jar(jar_id, changes, &connection).map(Json)
}

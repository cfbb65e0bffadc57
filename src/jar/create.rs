//! Jar creation endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    jar::{Jar, JarForm, NewJar, db::create_jar},
};

/// The state needed for creating a jar.
#[derive(Debug, Clone)]
pub struct CreateJarEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateJarEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle jar creation. Returns the created jar with its assigned ID.
pub async fn create_jar_endpoint(
    State(state): State<CreateJarEndpointState>,
    Json(form): Json<JarForm>,
) -> Result<(StatusCode, Json<Jar>), Error> {
    let new_jar = NewJar::try_from(form)?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let jar = create_jar(new_jar, &connection)?;

    Ok((StatusCode::CREATED, Json(jar)))
}

//! Goal deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, goal::{GoalId, delete_goal}};

/// The state needed for deleting a goal.
#[derive(Debug, Clone)]
pub struct DeleteGoalEndpointState {
    /// The database connection for deleting goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteGoalEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete a goal by ID.
///
/// Returns an empty body on success so that htmx can remove the goal's
/// card in place.
pub async fn delete_goal_endpoint(
    State(state): State<DeleteGoalEndpointState>,
    Path(goal_id): Path<GoalId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_goal(goal_id, &connection) {
        Ok(()) => ().into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while deleting a goal: {error}");

            error.into_alert_response()
        }
    }
}

//! The endpoint for updating a goal's saved balance.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints,
    goal::{GoalId, add_to_saved, reset_saved, subtract_from_saved},
};

/// Form data for the add/subtract/reset controls on a goal card.
///
/// The amount arrives as a raw string because the reset button submits
/// the form with the field empty.
#[derive(Debug, Clone, Deserialize)]
pub struct SavedForm {
    /// "add", "subtract" or "reset".
    pub action: String,
    /// The amount to add or subtract. Ignored for "reset".
    #[serde(default)]
    pub amount: String,
}

/// The state needed for updating a goal's saved balance.
#[derive(Debug, Clone)]
pub struct UpdateSavedEndpointState {
    /// The database connection for updating goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateSavedEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Apply an add, subtract or reset to a goal's saved balance and redirect
/// back to the goals page so the recomputed progress is shown.
pub async fn update_saved_endpoint(
    State(state): State<UpdateSavedEndpointState>,
    Path(goal_id): Path<GoalId>,
    Form(form): Form<SavedForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let result = match form.action.as_str() {
        "add" => parse_amount(&form.amount)
            .and_then(|amount| add_to_saved(goal_id, amount, &connection)),
        "subtract" => parse_amount(&form.amount)
            .and_then(|amount| subtract_from_saved(goal_id, amount, &connection)),
        "reset" => reset_saved(goal_id, &connection),
        other => {
            tracing::warn!("unknown saved-balance action {other:?} for goal {goal_id}");
            return Alert::ErrorSimple {
                message: format!("Unknown action \"{other}\"."),
            }
            .into_response();
        }
    };

    match result {
        Ok(()) => (
            HxRedirect(endpoints::GOALS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Parse the amount field of the saved-balance form.
///
/// # Errors
/// Returns [Error::InvalidSavedAmount] for blank or non-numeric values;
/// the caller's add/subtract check rejects non-positive numbers.
fn parse_amount(value: &str) -> Result<f64, Error> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::InvalidSavedAmount(0.0))
}

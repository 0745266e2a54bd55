//! Goal edit page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    goal::{
        Goal, GoalId, create::GoalFormData, create::goal_form_fields, get_goal, update_goal,
    },
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
};

/// The state needed for editing a goal.
#[derive(Debug, Clone)]
pub struct EditGoalEndpointState {
    /// The database connection for updating goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditGoalEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the edit page for an existing goal.
pub async fn get_edit_goal_page(
    State(state): State<EditGoalEndpointState>,
    Path(goal_id): Path<GoalId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let goal = get_goal(goal_id, &connection)?;

    Ok(edit_goal_view(&goal).into_response())
}

/// Handle the edit form submission for an existing goal.
///
/// The saved balance is not editable here; it only changes through the
/// add/subtract/reset operations on the goals page.
pub async fn update_goal_endpoint(
    State(state): State<EditGoalEndpointState>,
    Path(goal_id): Path<GoalId>,
    Form(form): Form<GoalFormData>,
) -> Response {
    let builder = match form.into_builder() {
        Ok(builder) => builder,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_goal(goal_id, builder, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::GOALS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while updating a goal: {error}");

            error.into_alert_response()
        }
    }
}

fn edit_goal_view(goal: &Goal) -> Markup {
    let nav_bar = NavBar::new(endpoints::GOALS_VIEW).into_html();
    let update_endpoint = format_endpoint(endpoints::GOAL, goal.id);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "Edit Goal" }

            form
                hx-put=(update_endpoint)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (goal_form_fields(Some(goal)))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Changes" }
            }
        }
    };

    base("Edit Goal", &[], &content)
}

//! Goal creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    category::CATEGORIES,
    endpoints,
    goal::{Goal, GoalBuilder, GoalKind, create_goal},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE,
        FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
};

/// Form data for creating and editing goals.
#[derive(Debug, Clone, Deserialize)]
pub struct GoalFormData {
    /// Display name.
    pub name: String,
    /// Target amount.
    pub amount: f64,
    /// Category from the fixed vocabulary.
    pub category: String,
    /// Goal kind value, e.g. "expense_limit".
    pub kind: String,
}

impl GoalFormData {
    pub(super) fn into_builder(self) -> Result<GoalBuilder, Error> {
        GoalBuilder {
            name: self.name.trim().to_owned(),
            category: self.category,
            amount: self.amount,
            kind: GoalKind::parse(&self.kind),
        }
        .validate()
    }
}

/// The state needed for creating a goal.
#[derive(Debug, Clone)]
pub struct CreateGoalEndpointState {
    /// The database connection for storing goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateGoalEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the goal creation page.
pub async fn get_new_goal_page() -> Response {
    new_goal_view().into_response()
}

/// Handle goal creation form submission.
pub async fn create_goal_endpoint(
    State(state): State<CreateGoalEndpointState>,
    Form(form): Form<GoalFormData>,
) -> Response {
    let builder = match form.into_builder() {
        Ok(builder) => builder,
        Err(error) => {
            return new_goal_form_view(&format!("Error: {error}")).into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_goal(builder, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::GOALS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a goal: {error}");

            error.into_alert_response()
        }
    }
}

fn new_goal_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_GOAL_VIEW).into_html();
    let form = new_goal_form_view("");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "New Goal" }
            (form)
        }
    };

    base("New Goal", &[], &content)
}

/// The shared field markup for the goal form.
///
/// Only the four concrete kinds are offered; [GoalKind::Other] exists for
/// data written by other versions, not for new goals.
pub(super) fn goal_form_fields(goal: Option<&Goal>) -> Markup {
    let name = goal.map(|goal| goal.name.as_str()).unwrap_or_default();
    let amount = goal.map(|goal| format!("{:.2}", goal.amount));
    let category = goal.map(|goal| goal.category.as_str()).unwrap_or_default();
    let kind = goal.map(|goal| goal.kind).unwrap_or(GoalKind::ExpenseLimit);

    html! {
        div
        {
            label for="name" class=(FORM_LABEL_STYLE) { "Goal Name" }

            input
                id="name"
                type="text"
                name="name"
                placeholder="e.g. Groceries ceiling"
                required
                autofocus
                value=(name)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Target Amount" }

            input
                id="amount"
                type="number"
                name="amount"
                step="0.01"
                required
                value=[amount]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="kind" class=(FORM_LABEL_STYLE) { "Kind" }

            select id="kind" name="kind" class=(FORM_SELECT_STYLE)
            {
                @for option in [
                    GoalKind::ExpenseLimit,
                    GoalKind::Savings,
                    GoalKind::Investment,
                    GoalKind::DebtPayment,
                ] {
                    option value=(option.as_str()) selected[kind == option] { (option.label()) }
                }
            }
        }

        div
        {
            label for="category" class=(FORM_LABEL_STYLE) { "Category" }

            select id="category" name="category" class=(FORM_SELECT_STYLE)
            {
                @for option in CATEGORIES {
                    option value=(option) selected[category == option] { (option) }
                }
            }
        }
    }
}

fn new_goal_form_view(error_message: &str) -> Markup {
    let create_endpoint = endpoints::GOALS_API;

    html! {
        form
            hx-post=(create_endpoint)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            (goal_form_fields(None))

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Goal" }
        }
    }
}

#[cfg(test)]
mod new_goal_page_tests {
    use axum::http::StatusCode;

    use crate::{
        endpoints,
        goal::get_new_goal_page,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            must_get_form, parse_html_document,
        },
    };

    #[tokio::test]
    async fn render_page() {
        let response = get_new_goal_page().await;

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::GOALS_API, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_input(&form, "amount", "number");
        assert_form_submit_button(&form);
    }
}

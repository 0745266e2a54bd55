//! Card creation page and endpoint.

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
    card::{Card, CardBrand, CardBuilder, create_card, parse_day_of_month},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE,
        FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
};

/// Form data for creating and editing cards.
///
/// The day fields arrive as raw strings so that blank inputs can mean
/// "unknown" instead of failing deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct CardFormData {
    /// Display name.
    pub name: String,
    /// Card network value, e.g. "visa".
    pub brand: String,
    /// Credit limit, zero or more.
    pub limit: f64,
    /// Used balance, zero or more.
    #[serde(default)]
    pub used: f64,
    /// Statement closing day, 1-31 or blank.
    #[serde(default)]
    pub closing_day: String,
    /// Payment due day, 1-31 or blank.
    #[serde(default)]
    pub due_day: String,
}

impl CardFormData {
    /// Convert the raw form values into a validated [CardBuilder].
    pub(super) fn into_builder(self) -> Result<CardBuilder, Error> {
        let closing_day = parse_day_of_month(&self.closing_day)?;
        let due_day = parse_day_of_month(&self.due_day)?;

        CardBuilder {
            name: self.name.trim().to_owned(),
            brand: CardBrand::parse(&self.brand),
            limit: self.limit,
            used: self.used,
            closing_day,
            due_day,
        }
        .validate()
    }
}

/// The state needed for creating a card.
#[derive(Debug, Clone)]
pub struct CreateCardEndpointState {
    /// The database connection for storing cards.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCardEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the card creation page.
pub async fn get_new_card_page() -> Response {
    new_card_view().into_response()
}

/// Handle card creation form submission.
pub async fn create_card_endpoint(
    State(state): State<CreateCardEndpointState>,
    Form(form): Form<CardFormData>,
) -> Response {
    let builder = match form.into_builder() {
        Ok(builder) => builder,
        Err(error) => {
            return new_card_form_view(&format!("Error: {error}")).into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_card(builder, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::CARDS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a card: {error}");

            error.into_alert_response()
        }
    }
}

fn new_card_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_CARD_VIEW).into_html();
    let form = new_card_form_view("");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "New Card" }
            (form)
        }
    };

    base("New Card", &[], &content)
}

/// The shared field markup for the card form.
pub(super) fn card_form_fields(card: Option<&Card>) -> Markup {
    let name = card.map(|card| card.name.as_str()).unwrap_or_default();
    let brand = card.map(|card| card.brand).unwrap_or(CardBrand::Mastercard);
    let limit = card.map(|card| format!("{:.2}", card.limit));
    let used = card.map(|card| format!("{:.2}", card.used));
    let closing_day = card
        .and_then(|card| card.closing_day)
        .map(|day| day.to_string())
        .unwrap_or_default();
    let due_day = card
        .and_then(|card| card.due_day)
        .map(|day| day.to_string())
        .unwrap_or_default();

    html! {
        div
        {
            label for="name" class=(FORM_LABEL_STYLE) { "Card Name" }

            input
                id="name"
                type="text"
                name="name"
                placeholder="e.g. Daily spending"
                required
                autofocus
                value=(name)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="brand" class=(FORM_LABEL_STYLE) { "Brand" }

            select id="brand" name="brand" class=(FORM_SELECT_STYLE)
            {
                @for option in [
                    CardBrand::Mastercard,
                    CardBrand::Visa,
                    CardBrand::Elo,
                    CardBrand::Amex,
                    CardBrand::Other,
                ] {
                    option value=(option.as_str()) selected[brand == option] { (option.label()) }
                }
            }
        }

        div
        {
            label for="limit" class=(FORM_LABEL_STYLE) { "Limit" }

            input
                id="limit"
                type="number"
                name="limit"
                step="0.01"
                min="0"
                required
                value=[limit]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="used" class=(FORM_LABEL_STYLE) { "Used" }

            input
                id="used"
                type="number"
                name="used"
                step="0.01"
                min="0"
                required
                value=[used]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div class="grid grid-cols-2 gap-4"
        {
            div
            {
                label for="closing_day" class=(FORM_LABEL_STYLE) { "Closing day" }

                input
                    id="closing_day"
                    type="number"
                    name="closing_day"
                    min="1"
                    max="31"
                    value=(closing_day)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="due_day" class=(FORM_LABEL_STYLE) { "Due day" }

                input
                    id="due_day"
                    type="number"
                    name="due_day"
                    min="1"
                    max="31"
                    value=(due_day)
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }
    }
}

fn new_card_form_view(error_message: &str) -> Markup {
    let create_endpoint = endpoints::CARDS_API;

    html! {
        form
            hx-post=(create_endpoint)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            (card_form_fields(None))

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Card" }
        }
    }
}


#[cfg(test)]
mod create_card_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;

    use crate::{
        card::{CardBrand, create_card_table, get_card},
        endpoints,
        test_utils::{
            assert_form_error_message, assert_hx_redirect, must_get_form, parse_html_fragment,
        },
    };

    use super::{CardFormData, CreateCardEndpointState, create_card_endpoint};

    fn get_test_state() -> CreateCardEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_card_table(&connection).expect("Could not create card table");

        CreateCardEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn form(name: &str) -> CardFormData {
        CardFormData {
            name: name.to_owned(),
            brand: "visa".to_owned(),
            limit: 1500.0,
            used: 0.0,
            closing_day: "5".to_owned(),
            due_day: "12".to_owned(),
        }
    }

    #[tokio::test]
    async fn can_create_card() {
        let state = get_test_state();

        let response = create_card_endpoint(State(state.clone()), Form(form("Daily")))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::CARDS_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let created = get_card(1, &connection).unwrap();
        assert_eq!(created.name, "Daily");
        assert_eq!(created.brand, CardBrand::Visa);
        assert_eq!(created.closing_day, Some(5));
    }

    #[tokio::test]
    async fn blank_days_are_stored_as_unknown() {
        let state = get_test_state();
        let mut card_form = form("No days");
        card_form.closing_day = String::new();
        card_form.due_day = String::new();

        let response = create_card_endpoint(State(state.clone()), Form(card_form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let connection = state.db_connection.lock().unwrap();
        let created = get_card(1, &connection).unwrap();
        assert_eq!(created.closing_day, None);
        assert_eq!(created.due_day, None);
    }

    #[tokio::test]
    async fn create_card_fails_on_out_of_range_day() {
        let state = get_test_state();
        let mut card_form = form("Bad day");
        card_form.closing_day = "32".to_owned();

        let response = create_card_endpoint(State(state), Form(card_form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: \"32\" is not a valid day of the month");
    }

    #[tokio::test]
    async fn create_card_fails_on_empty_name() {
        let state = get_test_state();

        let response = create_card_endpoint(State(state), Form(form("  ")))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: Card name cannot be empty");
    }
}

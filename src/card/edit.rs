//! Card edit page and endpoint.

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
    card::{
        Card, CardId, create::CardFormData, create::card_form_fields, get_card, update_card,
    },
    endpoints::{self, format_endpoint},
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
};

/// The state needed for editing a card.
#[derive(Debug, Clone)]
pub struct EditCardEndpointState {
    /// The database connection for updating cards.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCardEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the edit page for an existing card.
pub async fn get_edit_card_page(
    State(state): State<EditCardEndpointState>,
    Path(card_id): Path<CardId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let card = get_card(card_id, &connection)?;

    Ok(edit_card_view(&card).into_response())
}

/// Handle the edit form submission for an existing card.
pub async fn update_card_endpoint(
    State(state): State<EditCardEndpointState>,
    Path(card_id): Path<CardId>,
    Form(form): Form<CardFormData>,
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

    match update_card(card_id, builder, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::CARDS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while updating a card: {error}");

            error.into_alert_response()
        }
    }
}

fn edit_card_view(card: &Card) -> Markup {
    let nav_bar = NavBar::new(endpoints::CARDS_VIEW).into_html();
    let update_endpoint = format_endpoint(endpoints::CARD, card.id);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "Edit Card" }

            form
                hx-put=(update_endpoint)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (card_form_fields(Some(card)))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Changes" }
            }
        }
    };

    base("Edit Card", &[], &content)
}

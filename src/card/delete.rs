//! Card deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, card::{CardId, delete_card}};

/// The state needed for deleting a card.
#[derive(Debug, Clone)]
pub struct DeleteCardEndpointState {
    /// The database connection for deleting cards.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCardEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete a card by ID.
///
/// Returns an empty body on success so that htmx can remove the card's
/// panel in place.
pub async fn delete_card_endpoint(
    State(state): State<DeleteCardEndpointState>,
    Path(card_id): Path<CardId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_card(card_id, &connection) {
        Ok(()) => ().into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while deleting a card: {error}");

            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_card_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;

    use crate::{
        Error,
        card::{CardBrand, CardBuilder, create_card, create_card_table, get_card},
    };

    use super::{DeleteCardEndpointState, delete_card_endpoint};

    fn get_test_state() -> DeleteCardEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_card_table(&connection).expect("Could not create card table");

        DeleteCardEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn deletes_existing_card() {
        let state = get_test_state();
        let inserted = {
            let connection = state.db_connection.lock().unwrap();
            create_card(
                CardBuilder {
                    name: "Doomed".to_owned(),
                    brand: CardBrand::Visa,
                    limit: 100.0,
                    used: 0.0,
                    closing_day: None,
                    due_day: None,
                },
                &connection,
            )
            .unwrap()
        };

        let response = delete_card_endpoint(State(state.clone()), Path(inserted.id))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_card(inserted.id, &connection), Err(Error::NotFound));
    }

    #[tokio::test]
    async fn deleting_unknown_card_returns_alert() {
        let state = get_test_state();

        let response = delete_card_endpoint(State(state), Path(999))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

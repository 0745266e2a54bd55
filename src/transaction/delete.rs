//! Transaction deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, transaction::{TransactionId, delete_transaction}};

/// The state needed for deleting a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionEndpointState {
    /// The database connection for deleting transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete a transaction by ID.
///
/// Returns an empty body on success so that htmx can remove the
/// transaction's table row in place.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionEndpointState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_transaction(transaction_id, &connection) {
        Ok(()) => ().into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while deleting a transaction: {error}");

            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_transaction_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        transaction::{
            Transaction, TransactionKind, create_transaction, create_transaction_table,
            get_transaction,
        },
    };

    use super::{DeleteTransactionEndpointState, delete_transaction_endpoint};

    fn get_test_state() -> DeleteTransactionEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_transaction_table(&connection).expect("Could not create transaction table");

        DeleteTransactionEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn deletes_existing_transaction() {
        let state = get_test_state();
        let inserted = {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(
                    "Doomed",
                    1.0,
                    TransactionKind::Outcome,
                    "Outros",
                    date!(2024 - 03 - 05),
                ),
                &connection,
            )
            .unwrap()
        };

        let response = delete_transaction_endpoint(State(state.clone()), Path(inserted.id))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_transaction(inserted.id, &connection),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn deleting_unknown_transaction_returns_alert() {
        let state = get_test_state();

        let response = delete_transaction_endpoint(State(state), Path(999))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

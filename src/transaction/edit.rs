//! Transaction edit page and endpoint.

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
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    transaction::{
        Transaction, TransactionId, TransactionKind, create::TransactionFormData,
        create::transaction_form_fields, get_transaction, update_transaction,
    },
};

/// The state needed for editing a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionEndpointState {
    /// The database connection for updating transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the edit page for an existing transaction.
pub async fn get_edit_transaction_page(
    State(state): State<EditTransactionEndpointState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = get_transaction(transaction_id, &connection)?;

    Ok(edit_transaction_view(&transaction, "").into_response())
}

/// Handle the edit form submission for an existing transaction.
pub async fn update_transaction_endpoint(
    State(state): State<EditTransactionEndpointState>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<TransactionFormData>,
) -> Response {
    let kind = TransactionKind::parse(&form.kind);
    let builder = Transaction::build(
        form.name.trim(),
        form.amount,
        kind,
        &form.category,
        form.date,
    );

    let builder = match builder.validate() {
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

    match update_transaction(transaction_id, builder, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while updating a transaction: {error}");

            error.into_alert_response()
        }
    }
}

fn edit_transaction_view(transaction: &Transaction, error_message: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let update_endpoint = format_endpoint(endpoints::TRANSACTION, transaction.id);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "Edit Transaction" }

            form
                hx-put=(update_endpoint)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (transaction_form_fields(
                    &transaction.name,
                    Some(transaction.amount),
                    transaction.kind,
                    &transaction.category,
                    Some(transaction.date),
                ))

                @if !error_message.is_empty() {
                    p class="text-red-600 dark:text-red-400" { (error_message) }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Changes" }
            }
        }
    };

    base("Edit Transaction", &[], &content)
}

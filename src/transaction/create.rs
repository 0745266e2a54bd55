//! Transaction creation page and endpoint.

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
use time::Date;

use crate::{
    AppState, Error,
    category::CATEGORIES,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE,
        FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
    transaction::{Transaction, TransactionKind, create_transaction},
};

/// Form data for creating and editing transactions.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionFormData {
    /// Display label.
    pub name: String,
    /// Monetary amount, zero or more.
    pub amount: f64,
    /// "income" or "outcome".
    pub kind: String,
    /// Category from the fixed vocabulary.
    pub category: String,
    /// The day the money moved.
    pub date: Date,
}

/// The state needed for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionEndpointState {
    /// The database connection for storing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the transaction creation page.
pub async fn get_new_transaction_page() -> Response {
    new_transaction_view().into_response()
}

/// Handle transaction creation form submission.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionEndpointState>,
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
        Err(error) => {
            return transaction_form_view(&format!("Error: {error}")).into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_transaction(builder, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a transaction: {error}");

            error.into_alert_response()
        }
    }
}

fn new_transaction_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();
    let form = transaction_form_view("");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "New Transaction" }
            (form)
        }
    };

    base("New Transaction", &[], &content)
}

/// The shared field markup for the transaction form.
pub(super) fn transaction_form_fields(
    name: &str,
    amount: Option<f64>,
    kind: TransactionKind,
    category: &str,
    date: Option<Date>,
) -> Markup {
    html! {
        div
        {
            label for="name" class=(FORM_LABEL_STYLE) { "Name" }

            input
                id="name"
                type="text"
                name="name"
                placeholder="e.g. Groceries"
                required
                autofocus
                value=(name)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            input
                id="amount"
                type="number"
                name="amount"
                step="0.01"
                min="0"
                required
                value=[amount.map(|amount| format!("{amount:.2}"))]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="kind" class=(FORM_LABEL_STYLE) { "Type" }

            select id="kind" name="kind" class=(FORM_SELECT_STYLE)
            {
                option value="outcome" selected[kind == TransactionKind::Outcome] { "Expense" }
                option value="income" selected[kind == TransactionKind::Income] { "Income" }
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

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                id="date"
                type="date"
                name="date"
                required
                value=[date.map(|date| date.to_string())]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

fn transaction_form_view(error_message: &str) -> Markup {
    let create_endpoint = endpoints::TRANSACTIONS_API;

    html! {
        form
            hx-post=(create_endpoint)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            (transaction_form_fields("", None, TransactionKind::Outcome, "", None))

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Transaction" }
        }
    }
}

#[cfg(test)]
mod new_transaction_page_tests {
    use axum::http::StatusCode;

    use crate::{
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            must_get_form, parse_html_document,
        },
        transaction::get_new_transaction_page,
    };

    #[tokio::test]
    async fn render_page() {
        let response = get_new_transaction_page().await;

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::TRANSACTIONS_API, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "date", "date");
        assert_form_submit_button(&form);
    }
}

#[cfg(test)]
mod create_transaction_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, response::IntoResponse};
    use axum::http::StatusCode;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        endpoints,
        test_utils::{
            assert_form_error_message, assert_hx_redirect, assert_valid_html, must_get_form,
            parse_html_fragment,
        },
        transaction::{TransactionKind, create_transaction_table, get_transaction},
    };

    use super::{CreateTransactionEndpointState, TransactionFormData, create_transaction_endpoint};

    fn get_test_state() -> CreateTransactionEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_transaction_table(&connection).expect("Could not create transaction table");

        CreateTransactionEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let state = get_test_state();
        let form = TransactionFormData {
            name: "Groceries".to_owned(),
            amount: 230.0,
            kind: "outcome".to_owned(),
            category: "Alimentação".to_owned(),
            date: date!(2024 - 03 - 05),
        };

        let response = create_transaction_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::TRANSACTIONS_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let created = get_transaction(1, &connection).unwrap();
        assert_eq!(created.name, "Groceries");
        assert_eq!(created.kind, TransactionKind::Outcome);
        assert_eq!(
            created.status,
            crate::transaction::TransactionStatus::Paid,
            "expense status should default to paid"
        );
    }

    #[tokio::test]
    async fn create_transaction_fails_on_empty_name() {
        let state = get_test_state();
        let form = TransactionFormData {
            name: "  ".to_owned(),
            amount: 10.0,
            kind: "outcome".to_owned(),
            category: "Outros".to_owned(),
            date: date!(2024 - 03 - 05),
        };

        let response = create_transaction_endpoint(State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: Transaction name cannot be empty");
    }

    #[tokio::test]
    async fn create_transaction_fails_on_negative_amount() {
        let state = get_test_state();
        let form = TransactionFormData {
            name: "Oops".to_owned(),
            amount: -1.0,
            kind: "outcome".to_owned(),
            category: "Outros".to_owned(),
            date: date!(2024 - 03 - 05),
        };

        let response = create_transaction_endpoint(State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: -1 is negative, amounts must be zero or more");
    }
}

//! Export endpoints: the full snapshot as a JSON backup or a CSV report.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::header,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    card::{Card, get_all_cards},
    goal::{Goal, get_all_goals},
    report::snapshot::Snapshot,
    transaction::{Transaction, get_all_transactions},
};

/// The state needed for the export endpoints.
#[derive(Debug, Clone)]
pub struct ExportState {
    /// The database connection for reading the snapshot.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn load_snapshot(connection: &Connection) -> Result<Snapshot, Error> {
    Ok(Snapshot {
        transactions: get_all_transactions(connection)?,
        cards: get_all_cards(connection)?,
        goals: get_all_goals(connection)?,
    })
}

/// Download the full snapshot as a pretty-printed JSON backup.
pub async fn export_json_endpoint(State(state): State<ExportState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let snapshot = load_snapshot(&connection)
        .inspect_err(|error| tracing::error!("could not load snapshot: {error}"))?;

    let body = serde_json::to_string_pretty(&snapshot)
        .map_err(|error| Error::JsonSerializationError(error.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"myfinance-backup.json\"",
            ),
        ],
        body,
    )
        .into_response())
}

/// Download a CSV report with transaction, card and goal sections.
pub async fn export_csv_endpoint(State(state): State<ExportState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let snapshot = load_snapshot(&connection)
        .inspect_err(|error| tracing::error!("could not load snapshot: {error}"))?;

    let body = write_csv_report(&snapshot)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"myfinance-report.csv\"",
            ),
        ],
        body,
    )
        .into_response())
}

/// Write the three snapshot sections into one CSV document.
///
/// The sections have different column counts, so the writer is flexible.
fn write_csv_report(snapshot: &Snapshot) -> Result<String, Error> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    let write_error =
        |error: csv::Error| Error::CsvError(error.to_string());

    writer.write_record(["TRANSACTIONS"]).map_err(write_error)?;
    writer
        .write_record(["Name", "Category", "Type", "Amount", "Date", "Status"])
        .map_err(write_error)?;
    for transaction in &snapshot.transactions {
        writer
            .write_record(transaction_record(transaction))
            .map_err(write_error)?;
    }

    writer.write_record([""]).map_err(write_error)?;
    writer.write_record(["CARDS"]).map_err(write_error)?;
    writer
        .write_record([
            "Name",
            "Brand",
            "Limit",
            "Used",
            "Available",
            "Closing Day",
            "Due Day",
        ])
        .map_err(write_error)?;
    for card in &snapshot.cards {
        writer.write_record(card_record(card)).map_err(write_error)?;
    }

    writer.write_record([""]).map_err(write_error)?;
    writer.write_record(["GOALS"]).map_err(write_error)?;
    writer
        .write_record(["Name", "Category", "Type", "Target", "Saved"])
        .map_err(write_error)?;
    for goal in &snapshot.goals {
        writer.write_record(goal_record(goal)).map_err(write_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;

    String::from_utf8(bytes)
        .map_err(|error| Error::CsvError(format!("output was not UTF-8: {error}")))
}

fn transaction_record(transaction: &Transaction) -> Vec<String> {
    vec![
        transaction.name.clone(),
        transaction.category.clone(),
        transaction.kind.as_str().to_owned(),
        format!("{:.2}", transaction.amount),
        transaction.date.to_string(),
        transaction.status.as_str().to_owned(),
    ]
}

fn card_record(card: &Card) -> Vec<String> {
    let day_or_blank =
        |day: Option<u8>| day.map(|day| day.to_string()).unwrap_or_default();

    vec![
        card.name.clone(),
        card.brand.as_str().to_owned(),
        format!("{:.2}", card.limit),
        format!("{:.2}", card.used),
        format!("{:.2}", card.available()),
        day_or_blank(card.closing_day),
        day_or_blank(card.due_day),
    ]
}

fn goal_record(goal: &Goal) -> Vec<String> {
    vec![
        goal.name.clone(),
        goal.category.clone(),
        goal.kind.as_str().to_owned(),
        format!("{:.2}", goal.amount),
        format!("{:.2}", goal.saved),
    ]
}

#[cfg(test)]
mod export_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::StatusCode;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        card::{CardBrand, CardBuilder, create_card},
        db::initialize,
        goal::{GoalBuilder, GoalKind, create_goal},
        test_utils::get_header,
        transaction::{Transaction, TransactionKind, create_transaction},
    };

    use super::{ExportState, export_csv_endpoint, export_json_endpoint};

    fn get_test_state() -> ExportState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        ExportState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn seed(state: &ExportState) {
        let connection = state.db_connection.lock().unwrap();
        create_transaction(
            Transaction::build(
                "Groceries",
                230.0,
                TransactionKind::Outcome,
                "Alimentação",
                date!(2024 - 03 - 05),
            ),
            &connection,
        )
        .unwrap();
        create_card(
            CardBuilder {
                name: "Daily".to_owned(),
                brand: CardBrand::Visa,
                limit: 1000.0,
                used: 300.0,
                closing_day: Some(5),
                due_day: None,
            },
            &connection,
        )
        .unwrap();
        create_goal(
            GoalBuilder {
                name: "Trip".to_owned(),
                category: "Lazer".to_owned(),
                amount: 2000.0,
                kind: GoalKind::Savings,
            },
            &connection,
        )
        .unwrap();
    }

    async fn body_text(response: axum::response::Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8_lossy(&body).to_string()
    }

    #[tokio::test]
    async fn json_export_contains_the_full_snapshot() {
        let state = get_test_state();
        seed(&state);

        let response = export_json_endpoint(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(get_header(&response, "content-type"), "application/json");
        assert!(get_header(&response, "content-disposition").contains("myfinance-backup.json"));

        let body = body_text(response).await;
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(parsed["transactions"].as_array().unwrap().len(), 1);
        assert_eq!(parsed["cards"].as_array().unwrap().len(), 1);
        assert_eq!(parsed["goals"].as_array().unwrap().len(), 1);
        assert_eq!(parsed["transactions"][0]["type"], "outcome");
    }

    #[tokio::test]
    async fn csv_export_contains_all_sections() {
        let state = get_test_state();
        seed(&state);

        let response = export_csv_endpoint(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(get_header(&response, "content-type").starts_with("text/csv"));

        let body = body_text(response).await;

        assert!(body.contains("TRANSACTIONS"));
        assert!(body.contains("CARDS"));
        assert!(body.contains("GOALS"));
        assert!(body.contains("Groceries,Alimentação,outcome,230.00,2024-03-05,paid"));
        assert!(body.contains("Daily,visa,1000.00,300.00,700.00,5,"));
        assert!(body.contains("Trip,Lazer,savings,2000.00,0.00"));
    }

    #[tokio::test]
    async fn exports_work_on_an_empty_database() {
        let state = get_test_state();

        let response = export_json_endpoint(State(state.clone())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = export_csv_endpoint(State(state)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

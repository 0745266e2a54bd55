//! The endpoint for importing a JSON backup.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Multipart, State, multipart::Field},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    report::snapshot::Snapshot,
};

/// The state needed for importing a backup.
#[derive(Debug, Clone)]
pub struct ImportState {
    /// The database connection for replacing the snapshot.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ImportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Route handler for importing a JSON backup.
///
/// The uploaded snapshot replaces all stored data in a single database
/// transaction; a malformed file leaves the stored data untouched.
pub async fn import_backup_endpoint(
    State(state): State<ImportState>,
    mut multipart: Multipart,
) -> Result<Response, Response> {
    let mut snapshot = None;

    loop {
        let field = multipart.next_field().await.map_err(|error| {
            Error::MultipartError(error.to_string()).into_alert_response()
        })?;

        let Some(field) = field else {
            break;
        };

        let parsed = parse_backup_field(field)
            .await
            .map_err(|error| error.into_alert_response())?;
        snapshot = Some(parsed);
    }

    let Some(snapshot) = snapshot else {
        return Err(Error::NotJson.into_alert_response());
    };

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError.into_alert_response()
    })?;

    replace_snapshot(&snapshot, &connection)
        .inspect_err(|error| tracing::error!("could not replace snapshot: {error}"))
        .map_err(|error| error.into_alert_response())?;

    tracing::info!(
        "imported backup with {} transactions, {} cards, {} goals",
        snapshot.transactions.len(),
        snapshot.cards.len(),
        snapshot.goals.len()
    );

    Ok((
        HxRedirect(endpoints::REPORTS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response())
}

/// Read one multipart field and parse it as a backup snapshot.
async fn parse_backup_field(field: Field<'_>) -> Result<Snapshot, Error> {
    let looks_like_json = field
        .file_name()
        .map(|name| name.to_lowercase().ends_with(".json"))
        .unwrap_or(false)
        || field
            .content_type()
            .map(|content_type| content_type.contains("json"))
            .unwrap_or(false);

    if !looks_like_json {
        return Err(Error::NotJson);
    }

    let data = field
        .bytes()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))?;

    serde_json::from_slice(&data).map_err(|error| Error::InvalidBackup(error.to_string()))
}

/// Replace all stored records with the snapshot's, atomically.
fn replace_snapshot(snapshot: &Snapshot, connection: &Connection) -> Result<(), Error> {
    let tx = connection.unchecked_transaction()?;

    tx.execute("DELETE FROM \"transaction\"", ())?;
    tx.execute("DELETE FROM card", ())?;
    tx.execute("DELETE FROM goal", ())?;

    for transaction in &snapshot.transactions {
        tx.execute(
            "INSERT INTO \"transaction\" (id, name, amount, kind, category, date, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            (
                transaction.id,
                &transaction.name,
                transaction.amount,
                transaction.kind.as_str(),
                &transaction.category,
                transaction.date,
                transaction.status.as_str(),
            ),
        )?;
    }

    for card in &snapshot.cards {
        tx.execute(
            "INSERT INTO card (id, name, brand, \"limit\", used, closing_day, due_day)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            (
                card.id,
                &card.name,
                card.brand.as_str(),
                card.limit,
                card.used,
                card.closing_day,
                card.due_day,
            ),
        )?;
    }

    for goal in &snapshot.goals {
        tx.execute(
            "INSERT INTO goal (id, name, category, amount, kind, saved)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                goal.id,
                &goal.name,
                &goal.category,
                goal.amount,
                goal.kind.as_str(),
                goal.saved,
            ),
        )?;
    }

    tx.commit()?;

    Ok(())
}

#[cfg(test)]
mod import_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        goal::{GoalKind, get_all_goals},
        transaction::{Transaction, TransactionKind, create_transaction, get_all_transactions},
    };

    use super::{Snapshot, replace_snapshot};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    #[test]
    fn replace_snapshot_overwrites_existing_data() {
        let connection = get_test_connection();
        create_transaction(
            Transaction::build(
                "To be replaced",
                1.0,
                TransactionKind::Outcome,
                "Outros",
                date!(2024 - 01 - 01),
            ),
            &connection,
        )
        .unwrap();

        // A backup in the original on-disk shape, legacy `budgets` key
        // and `type` fields included.
        let json = r#"{
            "transactions": [
                {
                    "id": 1717171717171,
                    "name": "Mercado",
                    "amount": 250.5,
                    "type": "outcome",
                    "category": "Alimentação",
                    "date": "2024-03-05",
                    "status": "paid"
                }
            ],
            "cards": [
                {
                    "id": 2,
                    "name": "Nubank",
                    "brand": "mastercard",
                    "limit": 3000,
                    "used": 450.75,
                    "closingDay": 3,
                    "dueDay": 10
                }
            ],
            "budgets": [
                {"id": 3, "name": "Mercado", "category": "Alimentação", "amount": 500, "type": "expense_limit"}
            ]
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();

        replace_snapshot(&snapshot, &connection).unwrap();

        let transactions = get_all_transactions(&connection).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].id, 1717171717171);
        assert_eq!(transactions[0].name, "Mercado");
        assert_eq!(transactions[0].amount, 250.5);

        let goals = get_all_goals(&connection).unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].kind, GoalKind::ExpenseLimit);
        assert_eq!(goals[0].saved, 0.0);
    }

    #[test]
    fn replace_snapshot_with_empty_backup_clears_everything() {
        let connection = get_test_connection();
        create_transaction(
            Transaction::build(
                "Old",
                1.0,
                TransactionKind::Outcome,
                "Outros",
                date!(2024 - 01 - 01),
            ),
            &connection,
        )
        .unwrap();

        replace_snapshot(&Snapshot::default(), &connection).unwrap();

        assert!(get_all_transactions(&connection).unwrap().is_empty());
    }

    #[test]
    fn malformed_backup_is_rejected_before_touching_the_database() {
        let result: Result<Snapshot, _> = serde_json::from_str("{\"transactions\": 42}");

        assert!(result.is_err());
    }
}

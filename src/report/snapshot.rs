//! The full application state as a serializable snapshot.

use serde::{Deserialize, Serialize};

use crate::{card::Card, goal::Goal, transaction::Transaction};

/// Everything the application stores, in the shape used by JSON backups.
///
/// Every collection defaults to empty so that partial or older backups
/// import cleanly. Backups written before goals were renamed used a
/// `budgets` key, which is accepted as an alias.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(super) struct Snapshot {
    /// All transactions.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// All cards.
    #[serde(default)]
    pub cards: Vec<Card>,
    /// All goals.
    #[serde(default, alias = "budgets")]
    pub goals: Vec<Goal>,
}

#[cfg(test)]
mod snapshot_tests {
    use crate::goal::GoalKind;

    use super::Snapshot;

    #[test]
    fn accepts_the_legacy_budgets_key() {
        let json = r#"{
            "transactions": [],
            "cards": [],
            "budgets": [
                {"id": 1, "name": "Mercado", "category": "Alimentação", "amount": 500}
            ]
        }"#;

        let snapshot: Snapshot = serde_json::from_str(json).unwrap();

        assert_eq!(snapshot.goals.len(), 1);
        assert_eq!(snapshot.goals[0].name, "Mercado");
        assert_eq!(snapshot.goals[0].kind, GoalKind::Savings);
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let snapshot: Snapshot = serde_json::from_str("{}").unwrap();

        assert!(snapshot.transactions.is_empty());
        assert!(snapshot.cards.is_empty());
        assert!(snapshot.goals.is_empty());
    }

    #[test]
    fn serializes_under_the_goals_key() {
        let json = serde_json::to_string(&Snapshot::default()).unwrap();

        assert!(json.contains("\"goals\""));
        assert!(!json.contains("\"budgets\""));
    }
}

//! Summing transactions and card balances into the dashboard figures.
//!
//! These are plain reductions over an already period-filtered snapshot:
//! the caller decides which transactions are in scope and whether card
//! balances should be folded in.

use std::collections::HashMap;

use crate::{
    card::Card,
    category::CREDIT_CARD_CATEGORY,
    transaction::{Transaction, TransactionKind},
};

/// The headline figures for a month of activity.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MonthSummary {
    /// Total income from transactions.
    pub income: f64,
    /// Total expenses: outcome transactions plus every card's used balance.
    pub outcome: f64,
    /// `income - outcome`.
    pub balance: f64,
    /// The share of income already spent, as a percentage. Zero when
    /// there is no income. Unclamped; the progress bar clamps for display.
    pub outcome_percentage: f64,
}

/// Compute the summary figures for the given transactions and cards.
pub(crate) fn summarize_month(transactions: &[Transaction], cards: &[Card]) -> MonthSummary {
    let income: f64 = transactions
        .iter()
        .filter(|transaction| transaction.kind == TransactionKind::Income)
        .map(|transaction| transaction.amount)
        .sum();

    let transaction_outcome: f64 = transactions
        .iter()
        .filter(|transaction| transaction.kind == TransactionKind::Outcome)
        .map(|transaction| transaction.amount)
        .sum();

    let card_used: f64 = cards.iter().map(|card| card.used).sum();

    let outcome = transaction_outcome + card_used;
    let balance = income - outcome;
    let outcome_percentage = if income > 0.0 {
        outcome / income * 100.0
    } else {
        0.0
    };

    MonthSummary {
        income,
        outcome,
        balance,
        outcome_percentage,
    }
}

/// Total expenses per category, largest first.
///
/// When `include_card_spend` is set, every card's used balance is added
/// to the credit card category. Cards with nothing used contribute
/// nothing, so the category only appears when there is actual spend.
pub(crate) fn expenses_by_category(
    transactions: &[Transaction],
    cards: &[Card],
    include_card_spend: bool,
) -> Vec<(String, f64)> {
    let mut totals: HashMap<String, f64> = HashMap::new();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.kind == TransactionKind::Outcome)
    {
        *totals.entry(transaction.category.clone()).or_insert(0.0) += transaction.amount;
    }

    if include_card_spend {
        let card_used: f64 = cards.iter().map(|card| card.used).sum();

        if card_used > 0.0 {
            *totals.entry(CREDIT_CARD_CATEGORY.to_owned()).or_insert(0.0) += card_used;
        }
    }

    let mut sorted: Vec<(String, f64)> = totals.into_iter().collect();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    sorted
}

#[cfg(test)]
mod aggregation_tests {
    use time::macros::date;

    use crate::{
        card::{Card, CardBrand},
        category::CREDIT_CARD_CATEGORY,
        transaction::{Transaction, TransactionKind, TransactionStatus},
    };

    use super::{expenses_by_category, summarize_month};

    fn transaction(kind: TransactionKind, category: &str, amount: f64) -> Transaction {
        Transaction {
            id: 0,
            name: "Test".to_owned(),
            amount,
            kind,
            category: category.to_owned(),
            date: date!(2024 - 03 - 10),
            status: TransactionStatus::Paid,
        }
    }

    fn card(used: f64) -> Card {
        Card {
            id: 0,
            name: "Card".to_owned(),
            brand: CardBrand::Visa,
            limit: 1000.0,
            used,
            closing_day: None,
            due_day: None,
        }
    }

    #[test]
    fn summary_folds_card_used_into_outcome() {
        let transactions = vec![
            transaction(TransactionKind::Income, "Salário", 4000.0),
            transaction(TransactionKind::Outcome, "Alimentação", 500.0),
        ];
        let cards = vec![card(300.0), card(200.0)];

        let summary = summarize_month(&transactions, &cards);

        assert_eq!(summary.income, 4000.0);
        assert_eq!(summary.outcome, 1000.0);
        assert_eq!(summary.balance, 3000.0);
        assert_eq!(summary.outcome_percentage, 25.0);
    }

    #[test]
    fn summary_with_no_income_reports_zero_percentage() {
        let transactions = vec![transaction(TransactionKind::Outcome, "Outros", 100.0)];

        let summary = summarize_month(&transactions, &[]);

        assert_eq!(summary.outcome_percentage, 0.0);
        assert_eq!(summary.balance, -100.0);
    }

    #[test]
    fn summary_of_empty_snapshot_is_all_zero() {
        let summary = summarize_month(&[], &[]);

        assert_eq!(summary.income, 0.0);
        assert_eq!(summary.outcome, 0.0);
        assert_eq!(summary.balance, 0.0);
        assert_eq!(summary.outcome_percentage, 0.0);
    }

    #[test]
    fn category_totals_sort_largest_first() {
        let transactions = vec![
            transaction(TransactionKind::Outcome, "Alimentação", 100.0),
            transaction(TransactionKind::Outcome, "Transporte", 300.0),
            transaction(TransactionKind::Outcome, "Alimentação", 50.0),
            transaction(TransactionKind::Income, "Salário", 9999.0),
        ];

        let totals = expenses_by_category(&transactions, &[], true);

        assert_eq!(
            totals,
            vec![
                ("Transporte".to_owned(), 300.0),
                ("Alimentação".to_owned(), 150.0),
            ]
        );
    }

    #[test]
    fn card_used_lands_in_the_credit_card_category() {
        let transactions = vec![transaction(
            TransactionKind::Outcome,
            CREDIT_CARD_CATEGORY,
            100.0,
        )];
        let cards = vec![card(400.0)];

        let totals = expenses_by_category(&transactions, &cards, true);

        assert_eq!(totals, vec![(CREDIT_CARD_CATEGORY.to_owned(), 500.0)]);
    }

    #[test]
    fn card_fold_is_suppressed_when_excluded() {
        let cards = vec![card(400.0)];

        let totals = expenses_by_category(&[], &cards, false);

        assert!(totals.is_empty());
    }

    #[test]
    fn unused_cards_do_not_create_a_category() {
        let cards = vec![card(0.0)];

        let totals = expenses_by_category(&[], &cards, true);

        assert!(totals.is_empty());
    }
}

//! Aggregations for the reports page.

use time::{Date, Month};

use crate::{
    card::Card,
    category::CREDIT_CARD_CATEGORY,
    period::{PeriodSelector, months_back},
    transaction::{Transaction, TransactionKind},
};

/// One row of the per-category summary table.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct CategorySummaryRow {
    /// The category name.
    pub category: String,
    /// Total spent in the category over the period.
    pub total: f64,
    /// How many entries contributed to the total. The card fold counts as
    /// a single entry.
    pub count: usize,
    /// `total / count`.
    pub average: f64,
}

/// Per-category expense summary, largest total first, plus the total
/// expense figure the percentage column is measured against.
///
/// The reference total covers outcome transactions only, so when card
/// balances are folded in the card category's share can read above 100%.
/// That mirrors how the stored data has always been reported.
pub(super) fn category_summary(
    transactions: &[Transaction],
    cards: &[Card],
    include_card_spend: bool,
) -> (Vec<CategorySummaryRow>, f64) {
    let mut rows: Vec<CategorySummaryRow> = Vec::new();

    let mut total_expense = 0.0;

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.kind == TransactionKind::Outcome)
    {
        total_expense += transaction.amount;

        match rows
            .iter_mut()
            .find(|row| row.category == transaction.category)
        {
            Some(row) => {
                row.total += transaction.amount;
                row.count += 1;
            }
            None => rows.push(CategorySummaryRow {
                category: transaction.category.clone(),
                total: transaction.amount,
                count: 1,
                average: 0.0,
            }),
        }
    }

    if include_card_spend {
        let card_used: f64 = cards.iter().map(|card| card.used).sum();

        if card_used > 0.0 {
            match rows
                .iter_mut()
                .find(|row| row.category == CREDIT_CARD_CATEGORY)
            {
                Some(row) => {
                    row.total += card_used;
                    row.count += 1;
                }
                None => rows.push(CategorySummaryRow {
                    category: CREDIT_CARD_CATEGORY.to_owned(),
                    total: card_used,
                    count: 1,
                    average: 0.0,
                }),
            }
        }
    }

    for row in &mut rows {
        row.average = row.total / row.count as f64;
    }

    rows.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.category.cmp(&b.category)));

    (rows, total_expense)
}

/// Expense totals for each of the last six calendar months, oldest first.
///
/// Always computed over the full history, independent of the page's
/// period selection.
pub(super) fn monthly_expense_series(
    transactions: &[Transaction],
    today: Date,
) -> (Vec<String>, Vec<f64>) {
    let mut labels = Vec::with_capacity(6);
    let mut values = Vec::with_capacity(6);

    for months_ago in (0..6).rev() {
        let (year, month) = months_back(today.year(), today.month(), months_ago);
        let selector = PeriodSelector::ExactMonth { month, year };

        let total: f64 = transactions
            .iter()
            .filter(|transaction| {
                transaction.kind == TransactionKind::Outcome
                    && selector.contains(transaction.date, today)
            })
            .map(|transaction| transaction.amount)
            .sum();

        labels.push(month_abbreviation(month).to_owned());
        values.push(total);
    }

    (labels, values)
}

fn month_abbreviation(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

#[cfg(test)]
mod summary_tests {
    use time::macros::date;

    use crate::{
        card::{Card, CardBrand},
        category::CREDIT_CARD_CATEGORY,
        transaction::{Transaction, TransactionKind, TransactionStatus},
    };

    use super::{category_summary, monthly_expense_series};

    fn outcome_on(category: &str, amount: f64, date: time::Date) -> Transaction {
        Transaction {
            id: 0,
            name: "Expense".to_owned(),
            amount,
            kind: TransactionKind::Outcome,
            category: category.to_owned(),
            date,
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
    fn summary_counts_and_averages_per_category() {
        let day = date!(2024 - 03 - 10);
        let transactions = vec![
            outcome_on("Alimentação", 100.0, day),
            outcome_on("Alimentação", 50.0, day),
            outcome_on("Transporte", 30.0, day),
        ];

        let (rows, total_expense) = category_summary(&transactions, &[], false);

        assert_eq!(total_expense, 180.0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category, "Alimentação");
        assert_eq!(rows[0].total, 150.0);
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[0].average, 75.0);
        assert_eq!(rows[1].count, 1);
    }

    #[test]
    fn card_fold_counts_as_one_entry_and_skips_reference_total() {
        let day = date!(2024 - 03 - 10);
        let transactions = vec![outcome_on(CREDIT_CARD_CATEGORY, 100.0, day)];
        let cards = vec![card(300.0), card(100.0)];

        let (rows, total_expense) = category_summary(&transactions, &cards, true);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total, 500.0);
        assert_eq!(rows[0].count, 2, "card fold adds a single entry");
        // The percentage reference only covers transactions.
        assert_eq!(total_expense, 100.0);
    }

    #[test]
    fn card_fold_suppressed_for_historical_periods() {
        let cards = vec![card(300.0)];

        let (rows, _) = category_summary(&[], &cards, false);

        assert!(rows.is_empty());
    }

    #[test]
    fn monthly_series_covers_six_months_oldest_first() {
        let today = date!(2024 - 03 - 15);
        let transactions = vec![
            outcome_on("Outros", 100.0, date!(2024 - 03 - 05)),
            outcome_on("Outros", 50.0, date!(2024 - 01 - 20)),
            // Outside the six month window.
            outcome_on("Outros", 999.0, date!(2023 - 09 - 01)),
            // Income never counts.
            Transaction {
                kind: TransactionKind::Income,
                ..outcome_on("Salário", 4000.0, date!(2024 - 03 - 05))
            },
        ];

        let (labels, values) = monthly_expense_series(&transactions, today);

        assert_eq!(labels, vec!["Oct", "Nov", "Dec", "Jan", "Feb", "Mar"]);
        assert_eq!(values, vec![0.0, 0.0, 0.0, 50.0, 0.0, 100.0]);
    }
}

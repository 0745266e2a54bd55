//! Computing a goal's progress from the current snapshot of records.
//!
//! [compute_progress] is a pure function: it never touches the database,
//! never mutates its inputs, and always returns a usable snapshot even
//! for degenerate data (zero targets, empty collections, over-limit
//! spending). Callers decide which transactions are in scope by
//! period-filtering them first, and whether card balances should be
//! folded in (`include_card_spend`) — card `used` values are
//! present-moment snapshots, so report views suppress them for
//! historical periods.

use crate::{
    card::Card,
    category::CREDIT_CARD_CATEGORY,
    goal::{Goal, GoalKind},
    html::format_currency,
    transaction::{Transaction, TransactionKind},
};

/// The derived progress of a single goal.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    /// The goal's current value: category spend for expense limits, the
    /// saved balance for everything else.
    pub current: f64,
    /// The goal's target amount.
    pub target: f64,
    /// `current / target * 100`, or 0 when the target is not positive.
    /// Deliberately unclamped; clamping to a progress-bar width is a
    /// rendering concern.
    pub percent: f64,
    /// A short status line, e.g. "Within limit" or "Goal reached!".
    pub status: String,
    /// A sentence describing the remaining gap or the achievement.
    pub message: String,
    /// Whether the add/subtract value controls apply to this goal.
    pub show_add_control: bool,
}

impl ProgressSnapshot {
    /// Whether the goal's target has been met (or its limit exhausted).
    pub fn reached(&self) -> bool {
        self.percent >= 100.0
    }
}

/// Compute the progress of `goal` against the given records.
///
/// `transactions` is expected to already be scoped to the period of
/// interest; this function applies no date filtering of its own.
pub fn compute_progress(
    goal: &Goal,
    transactions: &[Transaction],
    cards: &[Card],
    include_card_spend: bool,
) -> ProgressSnapshot {
    match goal.kind {
        GoalKind::ExpenseLimit => expense_limit_progress(goal, transactions, cards, include_card_spend),
        GoalKind::Savings => saved_balance_progress(
            goal,
            "Goal reached! 🎉",
            &format!("Congratulations! You saved {}", format_currency(goal.saved)),
            "Saving...",
            "left to reach the goal",
        ),
        GoalKind::Investment => saved_balance_progress(
            goal,
            "Investment goal reached! 🚀",
            &format!(
                "You have already set aside {} for {}",
                format_currency(goal.saved),
                goal.name
            ),
            "Setting aside...",
            "left to complete",
        ),
        GoalKind::DebtPayment => saved_balance_progress(
            goal,
            "Debt cleared! 🎊",
            "Congratulations! You paid off the whole debt",
            "Paying off...",
            "left to clear the debt",
        ),
        GoalKind::Other => saved_balance_progress(
            goal,
            "Goal reached! 🎉",
            "Congratulations! You completed the goal",
            "In progress...",
            "left to complete",
        ),
    }
}

/// Progress for an expense-limit goal: the current value is what was
/// spent in the linked category, never the saved balance.
fn expense_limit_progress(
    goal: &Goal,
    transactions: &[Transaction],
    cards: &[Card],
    include_card_spend: bool,
) -> ProgressSnapshot {
    let mut current: f64 = transactions
        .iter()
        .filter(|transaction| {
            transaction.category == goal.category && transaction.kind == TransactionKind::Outcome
        })
        .map(|transaction| transaction.amount)
        .sum();

    // Card balances are one undifferentiated expense bucket: a goal linked
    // to the card category absorbs every card's used balance, with no
    // attempt to attribute spend per card.
    if include_card_spend && goal.category == CREDIT_CARD_CATEGORY {
        current += cards.iter().map(|card| card.used).sum::<f64>();
    }

    let target = goal.amount;
    let percent = percent_of_target(current, target);

    let (status, message) = if percent >= 100.0 {
        (
            "Limit exceeded!".to_owned(),
            format!(
                "You spent {} more than planned",
                format_currency(current - target)
            ),
        )
    } else {
        (
            "Within limit".to_owned(),
            format!("You may still spend {}", format_currency(target - current)),
        )
    };

    ProgressSnapshot {
        current,
        target,
        percent,
        status,
        message,
        show_add_control: false,
    }
}

/// Progress for every goal kind that tracks a manually accumulated saved
/// balance. Transactions and cards play no part.
fn saved_balance_progress(
    goal: &Goal,
    reached_status: &str,
    reached_message: &str,
    pending_status: &str,
    remaining_suffix: &str,
) -> ProgressSnapshot {
    let current = goal.saved;
    let target = goal.amount;
    let percent = percent_of_target(current, target);

    let (status, message) = if percent >= 100.0 {
        (reached_status.to_owned(), reached_message.to_owned())
    } else {
        (
            pending_status.to_owned(),
            format!(
                "{} {remaining_suffix}",
                format_currency(target - current)
            ),
        )
    };

    ProgressSnapshot {
        current,
        target,
        percent,
        status,
        message,
        show_add_control: true,
    }
}

/// The share of the target reached, as a percentage. Defined as 0 for
/// non-positive targets so degenerate goals never divide by zero.
fn percent_of_target(current: f64, target: f64) -> f64 {
    if target > 0.0 {
        current / target * 100.0
    } else {
        0.0
    }
}

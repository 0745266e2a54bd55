//! Core goal domain types.

use serde::{Deserialize, Serialize};

use crate::Error;

/// Database identifier for a goal.
pub type GoalId = i64;

/// The kind of goal, which decides where its current value comes from.
///
/// Expense limits measure spending against transactions; every other kind
/// tracks a manually accumulated saved balance. Stored values that are
/// missing or empty resolve to [GoalKind::Savings]; unrecognized values
/// resolve to [GoalKind::Other] so data written by newer versions keeps
/// loading, with generic labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GoalKind {
    /// A ceiling on spending in the linked category.
    ExpenseLimit,
    /// A savings target.
    #[default]
    Savings,
    /// An investment target.
    Investment,
    /// A debt payoff target.
    DebtPayment,
    /// An unrecognized kind from older or imported data.
    Other,
}

impl GoalKind {
    /// Parse a stored kind value.
    pub fn parse(value: &str) -> Self {
        match value {
            "" => Self::Savings,
            "expense_limit" => Self::ExpenseLimit,
            "savings" => Self::Savings,
            "investment" => Self::Investment,
            "debt_payment" => Self::DebtPayment,
            _ => Self::Other,
        }
    }

    /// The stored string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExpenseLimit => "expense_limit",
            Self::Savings => "savings",
            Self::Investment => "investment",
            Self::DebtPayment => "debt_payment",
            Self::Other => "other",
        }
    }

    /// Human-readable label for the kind chip on goal cards.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ExpenseLimit => "Spending Limit",
            Self::Savings => "Savings",
            Self::Investment => "Investment",
            Self::DebtPayment => "Debt Payment",
            Self::Other => "Goal",
        }
    }

    /// Whether this kind tracks the manually accumulated saved balance.
    ///
    /// Expense limits derive their current value entirely from
    /// transactions, so the saved balance is meaningless for them and the
    /// add/subtract/reset operations do not apply.
    pub fn uses_saved_balance(&self) -> bool {
        !matches!(self, Self::ExpenseLimit)
    }
}

impl From<String> for GoalKind {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<GoalKind> for String {
    fn from(value: GoalKind) -> Self {
        value.as_str().to_owned()
    }
}

/// A user-defined financial target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// The ID of the goal.
    pub id: GoalId,
    /// The display name of the goal.
    pub name: String,
    /// The category the goal is linked to. Only expense limits read it,
    /// but every goal carries one.
    #[serde(default)]
    pub category: String,
    /// The target amount. Expected to be positive, but zero and negative
    /// targets are tolerated (progress reads as 0%).
    pub amount: f64,
    /// The kind of goal.
    #[serde(default, rename = "type")]
    pub kind: GoalKind,
    /// The manually accumulated balance for kinds that use one.
    #[serde(default)]
    pub saved: f64,
}

/// The validated field values for creating or updating a goal.
///
/// The saved balance is not part of the builder: it starts at zero and is
/// only changed through the add/subtract/reset operations.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalBuilder {
    /// The display name of the goal. Must not be empty.
    pub name: String,
    /// The category the goal is linked to.
    pub category: String,
    /// The target amount.
    pub amount: f64,
    /// The kind of goal.
    pub kind: GoalKind,
}

impl GoalBuilder {
    /// Check that the goal has a name.
    ///
    /// The target amount is deliberately not validated: zero and negative
    /// targets must not crash anything downstream, so they are allowed in
    /// and the progress calculator treats them as 0%.
    ///
    /// # Errors
    /// Returns [Error::EmptyGoalName] if the name is blank.
    pub fn validate(self) -> Result<Self, Error> {
        if self.name.trim().is_empty() {
            return Err(Error::EmptyGoalName);
        }

        Ok(self)
    }
}

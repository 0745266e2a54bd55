//! Core credit card domain types.

use serde::{Deserialize, Serialize};

use crate::Error;

/// Database identifier for a card.
pub type CardId = i64;

/// The card network. Stored as a lowercase string; unknown values read as
/// [CardBrand::Other] so older or imported data keeps working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CardBrand {
    /// Mastercard.
    Mastercard,
    /// Visa.
    Visa,
    /// Elo.
    Elo,
    /// American Express.
    Amex,
    /// Anything else.
    Other,
}

impl CardBrand {
    /// Parse a stored brand value.
    pub fn parse(value: &str) -> Self {
        match value {
            "mastercard" => Self::Mastercard,
            "visa" => Self::Visa,
            "elo" => Self::Elo,
            "amex" => Self::Amex,
            _ => Self::Other,
        }
    }

    /// The stored string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mastercard => "mastercard",
            Self::Visa => "visa",
            Self::Elo => "elo",
            Self::Amex => "amex",
            Self::Other => "other",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mastercard => "Mastercard",
            Self::Visa => "Visa",
            Self::Elo => "Elo",
            Self::Amex => "American Express",
            Self::Other => "Other",
        }
    }
}

impl From<String> for CardBrand {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<CardBrand> for String {
    fn from(value: CardBrand) -> Self {
        value.as_str().to_owned()
    }
}

/// A credit card with its limit and current usage.
///
/// `used` is a present-moment balance snapshot, not a history: report
/// views only fold it into totals for periods that include "now".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// The ID of the card.
    pub id: CardId,
    /// The display name of the card.
    pub name: String,
    /// The card network.
    #[serde(default = "default_brand")]
    pub brand: CardBrand,
    /// The credit limit, zero or more.
    pub limit: f64,
    /// The amount of the limit currently used. May exceed the limit.
    #[serde(default)]
    pub used: f64,
    /// The day of the month the statement closes, if known.
    #[serde(default, rename = "closingDay")]
    pub closing_day: Option<u8>,
    /// The day of the month payment is due, if known.
    #[serde(default, rename = "dueDay")]
    pub due_day: Option<u8>,
}

fn default_brand() -> CardBrand {
    CardBrand::Other
}

impl Card {
    /// The credit still available: `limit - used`. Negative when the card
    /// is over its limit.
    pub fn available(&self) -> f64 {
        self.limit - self.used
    }

    /// The share of the limit used as a percentage. Zero when the card has
    /// no limit, so a zero-limit card never divides by zero.
    pub fn percent_used(&self) -> f64 {
        if self.limit > 0.0 {
            self.used / self.limit * 100.0
        } else {
            0.0
        }
    }
}

/// The validated field values for creating or updating a card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardBuilder {
    /// The display name of the card. Must not be empty.
    pub name: String,
    /// The card network.
    pub brand: CardBrand,
    /// The credit limit, zero or more.
    pub limit: f64,
    /// The amount of the limit currently used.
    pub used: f64,
    /// The day of the month the statement closes, if known.
    pub closing_day: Option<u8>,
    /// The day of the month payment is due, if known.
    pub due_day: Option<u8>,
}

impl CardBuilder {
    /// Check the invariants the data model requires: a non-empty name and
    /// non-negative money values.
    ///
    /// # Errors
    /// Returns [Error::EmptyCardName] or [Error::NegativeAmount].
    pub fn validate(self) -> Result<Self, Error> {
        if self.name.trim().is_empty() {
            return Err(Error::EmptyCardName);
        }

        if self.limit < 0.0 {
            return Err(Error::NegativeAmount(self.limit));
        }

        if self.used < 0.0 {
            return Err(Error::NegativeAmount(self.used));
        }

        Ok(self)
    }
}

/// Parse an optional day-of-month form field.
///
/// An empty field means the day is unknown; anything else must be a
/// number from 1 to 31.
///
/// # Errors
/// Returns [Error::InvalidDayOfMonth] for values outside 1-31 or that are
/// not numbers.
pub fn parse_day_of_month(value: &str) -> Result<Option<u8>, Error> {
    let value = value.trim();

    if value.is_empty() {
        return Ok(None);
    }

    match value.parse::<u8>() {
        Ok(day) if (1..=31).contains(&day) => Ok(Some(day)),
        _ => Err(Error::InvalidDayOfMonth(value.to_owned())),
    }
}

#[cfg(test)]
mod card_domain_tests {
    use crate::Error;

    use super::{Card, CardBrand, CardBuilder, parse_day_of_month};

    fn card(limit: f64, used: f64) -> Card {
        Card {
            id: 1,
            name: "Test card".to_owned(),
            brand: CardBrand::Visa,
            limit,
            used,
            closing_day: Some(5),
            due_day: Some(12),
        }
    }

    #[test]
    fn available_may_go_negative() {
        assert_eq!(card(1000.0, 250.0).available(), 750.0);
        assert_eq!(card(0.0, 200.0).available(), -200.0);
    }

    #[test]
    fn percent_used_is_zero_for_zero_limit() {
        // No division by zero: a zero-limit card reports 0% used.
        let card = card(0.0, 200.0);

        assert_eq!(card.percent_used(), 0.0);
        assert_eq!(card.available(), -200.0);
    }

    #[test]
    fn percent_used_can_exceed_one_hundred() {
        assert_eq!(card(100.0, 150.0).percent_used(), 150.0);
    }

    #[test]
    fn unknown_brand_reads_as_other() {
        assert_eq!(CardBrand::parse("visa"), CardBrand::Visa);
        assert_eq!(CardBrand::parse("diners"), CardBrand::Other);
    }

    #[test]
    fn parse_day_of_month_accepts_blank_and_valid_days() {
        assert_eq!(parse_day_of_month(""), Ok(None));
        assert_eq!(parse_day_of_month("  "), Ok(None));
        assert_eq!(parse_day_of_month("1"), Ok(Some(1)));
        assert_eq!(parse_day_of_month("31"), Ok(Some(31)));
    }

    #[test]
    fn parse_day_of_month_rejects_out_of_range_values() {
        assert_eq!(
            parse_day_of_month("0"),
            Err(Error::InvalidDayOfMonth("0".to_owned()))
        );
        assert_eq!(
            parse_day_of_month("32"),
            Err(Error::InvalidDayOfMonth("32".to_owned()))
        );
        assert_eq!(
            parse_day_of_month("soon"),
            Err(Error::InvalidDayOfMonth("soon".to_owned()))
        );
    }

    #[test]
    fn builder_rejects_negative_limits() {
        let builder = CardBuilder {
            name: "Card".to_owned(),
            brand: CardBrand::Visa,
            limit: -1.0,
            used: 0.0,
            closing_day: None,
            due_day: None,
        };

        assert_eq!(builder.validate(), Err(Error::NegativeAmount(-1.0)));
    }

    #[test]
    fn serializes_days_in_camel_case() {
        let json = serde_json::to_string(&card(1000.0, 100.0)).unwrap();

        assert!(json.contains("\"closingDay\":5"));
        assert!(json.contains("\"dueDay\":12"));
        assert!(json.contains("\"brand\":\"visa\""));
    }
}

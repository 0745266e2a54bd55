//! The fixed transaction category vocabulary.
//!
//! Categories are opaque strings shared between transactions and goals.
//! The list mirrors the vocabulary of the stored data, so the labels are
//! kept in Portuguese; the rest of the code only ever does exact string
//! matches against them.

/// The sentinel category that folds credit card spend into expense-limit
/// goals and category breakdowns.
pub const CREDIT_CARD_CATEGORY: &str = "Cartão de Crédito";

/// The fallback category for records whose category is not in the list.
pub const FALLBACK_CATEGORY: &str = "Outros";

/// All known categories, in the order they appear in selection controls.
pub const CATEGORIES: [&str; 12] = [
    "Alimentação",
    "Transporte",
    "Saúde",
    "Lazer",
    "Moradia",
    "Educação",
    CREDIT_CARD_CATEGORY,
    "Salário",
    "Investimento",
    "Beleza",
    "Seguro",
    FALLBACK_CATEGORY,
];

/// The badge style for a category, used when rendering category chips in
/// tables and cards. Unknown categories get the "Outros" styling.
pub fn badge_class(category: &str) -> &'static str {
    match category {
        "Alimentação" => "bg-green-100 text-green-700",
        "Transporte" => "bg-blue-100 text-blue-700",
        "Saúde" => "bg-red-100 text-red-700",
        "Lazer" => "bg-purple-100 text-purple-700",
        "Moradia" => "bg-indigo-100 text-indigo-700",
        "Educação" => "bg-yellow-100 text-yellow-700",
        CREDIT_CARD_CATEGORY => "bg-pink-100 text-pink-700",
        "Salário" => "bg-teal-100 text-teal-700",
        "Investimento" => "bg-orange-100 text-orange-700",
        "Beleza" => "bg-fuchsia-100 text-fuchsia-700",
        _ => "bg-gray-100 text-gray-700",
    }
}

//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/goals/{goal_id}', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page with the monthly overview.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for displaying and filtering transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The page for listing credit cards.
pub const CARDS_VIEW: &str = "/cards";
/// The page for creating a new card.
pub const NEW_CARD_VIEW: &str = "/cards/new";
/// The page for editing an existing card.
pub const EDIT_CARD_VIEW: &str = "/cards/{card_id}/edit";
/// The page for listing goals.
pub const GOALS_VIEW: &str = "/goals";
/// The page for creating a new goal.
pub const NEW_GOAL_VIEW: &str = "/goals/new";
/// The page for editing an existing goal.
pub const EDIT_GOAL_VIEW: &str = "/goals/{goal_id}/edit";
/// The reports page with period filtering and exports.
pub const REPORTS_VIEW: &str = "/reports";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to create a transaction.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to update or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to create a card.
pub const CARDS_API: &str = "/api/cards";
/// The route to update or delete a single card.
pub const CARD: &str = "/api/cards/{card_id}";
/// The route to create a goal.
pub const GOALS_API: &str = "/api/goals";
/// The route to update or delete a single goal.
pub const GOAL: &str = "/api/goals/{goal_id}";
/// The route to add to, subtract from or reset a goal's saved balance.
pub const GOAL_SAVED: &str = "/api/goals/{goal_id}/saved";
/// The route to download the full state as a JSON backup.
pub const EXPORT_JSON: &str = "/api/export/json";
/// The route to download a CSV report of the full state.
pub const EXPORT_CSV: &str = "/api/export/csv";
/// The route to upload a JSON backup, replacing the stored state.
pub const IMPORT: &str = "/api/import";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/goals/{goal_id}', '{goal_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

//! Dashboard module
//!
//! Provides the landing page with the current month's summary, the
//! category expense chart, the latest transactions and a card preview.

mod aggregation;
mod charts;
mod handlers;

pub use handlers::get_dashboard_page;

pub(crate) use aggregation::{MonthSummary, expenses_by_category, summarize_month};
pub(crate) use charts::{currency_formatter, currency_tooltip};

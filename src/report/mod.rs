//! Reports: period-filtered breakdowns, goals-vs-actual comparison, and
//! the JSON/CSV export and JSON import endpoints.

mod charts;
mod export;
mod import;
mod page;
mod snapshot;
mod summary;

pub use export::{export_csv_endpoint, export_json_endpoint};
pub use import::import_backup_endpoint;
pub use page::get_reports_page;

//! MyFinance is a web app for tracking personal finances: income and
//! expense transactions, credit cards, and savings and spending goals.
//!
//! This library provides an HTTP server that directly serves HTML pages.
//! All derived figures (dashboard summaries, goal progress, report
//! breakdowns) are recomputed from the stored records on every request by
//! two pure components: the period filter ([period]) and the goal
//! progress calculator ([goal]).

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod card;
mod category;
mod dashboard;
mod db;
mod endpoints;
mod goal;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod period;
mod report;
mod routing;
#[cfg(test)]
mod test_utils;
mod timezone;
mod transaction;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

use crate::{
    alert::Alert,
    internal_server_error::{InternalServerErrorPage, render_internal_server_error},
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used for a transaction name.
    #[error("Transaction name cannot be empty")]
    EmptyTransactionName,

    /// An empty string was used for a card name.
    #[error("Card name cannot be empty")]
    EmptyCardName,

    /// An empty string was used for a goal name.
    #[error("Goal name cannot be empty")]
    EmptyGoalName,

    /// A negative amount was used where only non-negative money values are
    /// allowed (transaction amounts, card limits and used balances).
    #[error("{0} is negative, amounts must be zero or more")]
    NegativeAmount(f64),

    /// A card closing or due day was outside the range 1-31.
    #[error("\"{0}\" is not a valid day of the month")]
    InvalidDayOfMonth(String),

    /// A goal saved-balance update was requested with a zero or negative
    /// amount.
    #[error("{0} is not a valid amount, use a value greater than zero")]
    InvalidSavedAmount(f64),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a card that does not exist
    #[error("tried to delete a card that is not in the database")]
    DeleteMissingCard,

    /// Tried to update a card that does not exist
    #[error("tried to update a card that is not in the database")]
    UpdateMissingCard,

    /// Tried to delete a goal that does not exist
    #[error("tried to delete a goal that is not in the database")]
    DeleteMissingGoal,

    /// Tried to update a goal that does not exist
    #[error("tried to update a goal that is not in the database")]
    UpdateMissingGoal,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The multipart form could not be parsed as an uploaded file.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// The uploaded file is not a JSON backup.
    #[error("File is not a JSON backup")]
    NotJson,

    /// The uploaded backup could not be parsed.
    #[error("Could not parse the backup file: {0}")]
    InvalidBackup(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JsonSerializationError(String),

    /// An error occurred while writing a CSV report.
    #[error("could not write CSV: {0}")]
    CsvError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => {
                render_internal_server_error(InternalServerErrorPage {
                    description: "Invalid Timezone Settings",
                    fix: &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                    ),
                })
            }
            Error::DatabaseLockError => render_internal_server_error(Default::default()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(Default::default())
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::EmptyTransactionName
            | Error::EmptyCardName
            | Error::EmptyGoalName
            | Error::NegativeAmount(_)
            | Error::InvalidDayOfMonth(_)
            | Error::InvalidSavedAmount(_) => {
                let details = self.to_string();
                (
                    StatusCode::BAD_REQUEST,
                    Alert::Error {
                        message: "Invalid input".to_owned(),
                        details,
                    }
                    .into_html(),
                )
                    .into_response()
            }
            Error::UpdateMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update transaction".to_owned(),
                    details: "The transaction could not be found.".to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete transaction".to_owned(),
                    details: "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted."
                        .to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::UpdateMissingCard => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update card".to_owned(),
                    details: "The card could not be found.".to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::DeleteMissingCard => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete card".to_owned(),
                    details: "The card could not be found. \
                    Try refreshing the page to see if the card has already been deleted."
                        .to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::UpdateMissingGoal => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update goal".to_owned(),
                    details: "The goal could not be found.".to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::DeleteMissingGoal => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete goal".to_owned(),
                    details: "The goal could not be found. \
                    Try refreshing the page to see if the goal has already been deleted."
                        .to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::NotJson => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "File type must be JSON.".to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::InvalidBackup(details) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Could not import backup".to_owned(),
                    details: format!("Check that the file is a MyFinance JSON backup: {details}"),
                }
                .into_html(),
            )
                .into_response(),
            Error::MultipartError(details) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Could not read the uploaded file".to_owned(),
                    details,
                }
                .into_html(),
            )
                .into_response(),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details: "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                }
                .into_html(),
            )
                .into_response(),
        }
    }
}

//! Alert messages for displaying success and error feedback to users.
//!
//! Alerts are rendered into the fixed `#alert-container` element via the
//! htmx `response-targets` extension, so endpoints return them as the
//! response body with an appropriate status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// A user-facing alert message.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// An operation completed successfully.
    Success {
        /// Short headline for the alert.
        message: String,
        /// Supporting detail text.
        details: String,
    },
    /// An operation failed.
    Error {
        /// Short headline for the alert.
        message: String,
        /// Supporting detail text.
        details: String,
    },
    /// An operation failed and a headline is all the detail there is.
    ErrorSimple {
        /// Short headline for the alert.
        message: String,
    },
}

impl Alert {
    /// Render the alert as markup for the `#alert-container` element.
    pub fn into_html(self) -> Markup {
        let (container_style, message, details) = match self {
            Alert::Success { message, details } => (
                "text-green-800 border-green-300 bg-green-50 dark:text-green-400 \
                dark:border-green-800",
                message,
                details,
            ),
            Alert::Error { message, details } => (
                "text-red-800 border-red-300 bg-red-50 dark:text-red-400 \
                dark:border-red-800",
                message,
                details,
            ),
            Alert::ErrorSimple { message } => (
                "text-red-800 border-red-300 bg-red-50 dark:text-red-400 \
                dark:border-red-800",
                message,
                String::new(),
            ),
        };

        html! {
            div
                class={ "p-4 mb-4 border rounded-lg dark:bg-gray-800 shadow-lg " (container_style) }
                role="alert"
            {
                span class="font-medium" { (message) }

                @if !details.is_empty() {
                    p class="mt-1 text-sm" { (details) }
                }

                button
                    type="button"
                    class="mt-2 text-sm underline cursor-pointer bg-transparent border-none"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "Dismiss"
                }
            }
        }
    }

    /// Render the alert as a complete HTTP response.
    pub fn into_response(self) -> Response {
        let status = match self {
            Alert::Success { .. } => StatusCode::OK,
            Alert::Error { .. } | Alert::ErrorSimple { .. } => StatusCode::BAD_REQUEST,
        };

        (status, self.into_html()).into_response()
    }
}

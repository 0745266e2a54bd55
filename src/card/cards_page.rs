//! The page that lists credit cards.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    card::{Card, get_all_cards},
    endpoints::{self, format_endpoint},
    html::{BUTTON_DELETE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base, format_currency},
    navigation::NavBar,
};

/// Usage above this share of the limit gets warning styling.
const HIGH_USAGE_PERCENT: f64 = 80.0;

/// The state needed for the cards page.
#[derive(Debug, Clone)]
pub struct CardsViewState {
    /// The database connection for reading cards.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CardsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render an overview of the user's credit cards.
pub async fn get_cards_page(State(state): State<CardsViewState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let cards = get_all_cards(&connection)
        .inspect_err(|error| tracing::error!("could not get cards: {error}"))?;

    Ok(cards_view(&cards).into_response())
}

fn cards_view(cards: &[Card]) -> Markup {
    let nav_bar = NavBar::new(endpoints::CARDS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl"
            {
                div class="flex justify-between items-baseline mb-4"
                {
                    h2 class="text-xl font-bold" { "Cards" }

                    a href=(endpoints::NEW_CARD_VIEW) class=(LINK_STYLE) { "New card" }
                }

                @if cards.is_empty() {
                    div class="text-center text-gray-400 py-10"
                    {
                        p { "No cards registered yet." }
                    }
                } @else {
                    div class="grid grid-cols-1 md:grid-cols-2 xl:grid-cols-3 gap-4"
                    {
                        @for card in cards {
                            (card_panel(card, true))
                        }
                    }
                }
            }
        }
    };

    base("Cards", &[], &content)
}

/// Renders a single card with its usage bar. `with_actions` controls
/// whether the edit and delete buttons are included (the dashboard embeds
/// the same panel without them).
pub(crate) fn card_panel(card: &Card, with_actions: bool) -> Markup {
    let percent = card.percent_used();
    let display_percent = percent.clamp(0.0, 100.0);
    let high_usage = percent > HIGH_USAGE_PERCENT;
    let bar_style = if high_usage {
        "bg-red-500"
    } else {
        "bg-blue-600 dark:bg-blue-500"
    };

    let edit_url = format_endpoint(endpoints::EDIT_CARD_VIEW, card.id);
    let delete_url = format_endpoint(endpoints::CARD, card.id);

    html! {
        div
            data-card-panel="true"
            class="bg-white dark:bg-gray-800 border border-gray-200
                dark:border-gray-700 rounded-lg p-4 shadow-md flex flex-col gap-2"
        {
            div class="flex justify-between items-center mb-2"
            {
                span
                    class="inline-block bg-blue-600 text-white px-3 py-1
                        rounded-full text-xs font-bold"
                {
                    (card.brand.label())
                }

                span class="text-lg font-bold" { (format_currency(card.limit)) }
            }

            h3 class="font-bold text-xl mb-1 break-words" { (card.name) }

            div class="flex gap-4 text-sm text-gray-600 dark:text-gray-400 mb-2"
            {
                span
                {
                    "Closes: "
                    span class="font-semibold"
                    {
                        @match card.closing_day {
                            Some(day) => { (day) }
                            None => { "-" }
                        }
                    }
                }

                span
                {
                    "Due: "
                    span class="font-semibold"
                    {
                        @match card.due_day {
                            Some(day) => { (day) }
                            None => { "-" }
                        }
                    }
                }
            }

            div class="flex flex-col gap-1 mb-2"
            {
                span class="text-sm"
                {
                    "Used: "
                    span class="font-semibold text-red-500" { (format_currency(card.used)) }
                }

                span class="text-sm"
                {
                    "Available: "
                    span class="font-semibold text-green-600" { (format_currency(card.available())) }
                }

                div
                    class="w-full bg-gray-200 dark:bg-gray-700 rounded-full h-2 mt-1"
                    role="progressbar"
                    aria-valuenow=(format!("{display_percent:.0}"))
                    aria-valuemin="0"
                    aria-valuemax="100"
                {
                    @if display_percent > 0.0 {
                        div
                            class={ (bar_style) " h-2 rounded-full transition-all" }
                            style=(format!("width: {display_percent:.1}%"))
                        {}
                    }
                }

                p class="text-right text-xs text-gray-400 mt-1" { (format!("{percent:.0}")) "% used" }

                @if high_usage {
                    p class="text-xs text-red-500 mt-1" { "High usage!" }
                }
            }

            @if with_actions {
                div class="flex justify-end gap-4 mt-2"
                {
                    a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                    button
                        type="button"
                        class=(BUTTON_DELETE_STYLE)
                        hx-delete=(delete_url)
                        hx-confirm=(format!("Delete the card \"{}\"? This cannot be undone.", card.name))
                        hx-target="closest div[data-card-panel]"
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container"
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}

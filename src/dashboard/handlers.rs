//! Dashboard HTTP handler and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    card::{Card, card_panel, get_all_cards},
    category::badge_class,
    dashboard::{
        MonthSummary,
        charts::category_expenses_chart,
        expenses_by_category, summarize_month,
    },
    endpoints,
    html::{
        ChartPanel, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, chart_container, charts_script, echarts_script_link,
        format_currency, format_date, link,
    },
    navigation::NavBar,
    period::{PeriodSelector, RollingWindow, filter_by_period},
    timezone::get_local_offset,
    transaction::{Transaction, TransactionKind, get_all_transactions},
};

/// How many cards the dashboard previews before pointing at the cards page.
const CARD_PREVIEW_COUNT: usize = 3;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading the snapshot.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display a page with an overview of the current month.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Err(Error::InvalidTimezoneError(state.local_timezone));
    };
    let today = OffsetDateTime::now_utc().to_offset(local_offset).date();

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_all_transactions(&connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
    let cards = get_all_cards(&connection)
        .inspect_err(|error| tracing::error!("could not get cards: {error}"))?;

    let month_transactions = filter_by_period(
        &transactions,
        PeriodSelector::Rolling(RollingWindow::CurrentMonth),
        today,
    );

    let summary = summarize_month(&month_transactions, &cards);
    let expenses = expenses_by_category(&month_transactions, &cards, true);

    Ok(dashboard_view(today, &summary, &expenses, &month_transactions, &cards).into_response())
}

fn dashboard_view(
    today: Date,
    summary: &MonthSummary,
    expenses: &[(String, f64)],
    month_transactions: &[Transaction],
    cards: &[Card],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let chart = ChartPanel {
        id: "category-expenses-chart",
        options: category_expenses_chart(expenses).to_string(),
    };

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl"
            {
                div class="flex justify-between items-baseline mb-4"
                {
                    h2 class="text-xl font-bold" { "Dashboard" }

                    span class="text-sm text-gray-600 dark:text-gray-400"
                    {
                        (month_label(today))
                    }
                }

                (summary_section(summary))

                div class="grid grid-cols-1 xl:grid-cols-2 gap-4 mb-8"
                {
                    @if expenses.is_empty() {
                        div class="text-center text-gray-400 py-10"
                        {
                            "No expenses recorded yet"
                        }
                    } @else {
                        (chart_container(&chart))
                    }

                    (recent_transactions_table(month_transactions))
                }

                (cards_section(cards))
            }
        }
    };

    let scripts = [echarts_script_link(), charts_script(&[chart])];

    base("Dashboard", &scripts, &content)
}

/// The heading of the dashboard, e.g. "March 2024".
fn month_label(today: Date) -> String {
    format!("{} {}", today.month(), today.year())
}

fn summary_section(summary: &MonthSummary) -> Markup {
    let committed = summary.outcome_percentage;
    let bar_width = committed.clamp(0.0, 100.0);

    html! {
        section class="grid grid-cols-1 md:grid-cols-3 gap-4 mb-8"
        {
            (stat_card("Income", summary.income, "text-green-600 dark:text-green-400"))
            (stat_card("Expenses", summary.outcome, "text-red-500 dark:text-red-400"))

            div
                class="bg-white dark:bg-gray-800 border border-gray-200
                    dark:border-gray-700 rounded-lg p-4 shadow-md"
            {
                h3 class="text-sm text-gray-600 dark:text-gray-400 mb-1" { "Balance" }

                div class="text-2xl font-bold mb-2" { (format_currency(summary.balance)) }

                div
                    class="w-full bg-gray-200 dark:bg-gray-700 rounded-full h-2"
                    role="progressbar"
                    aria-valuenow=(format!("{bar_width:.0}"))
                    aria-valuemin="0"
                    aria-valuemax="100"
                {
                    @if bar_width > 0.0 {
                        div
                            class="bg-blue-600 dark:bg-blue-500 h-2 rounded-full"
                            style=(format!("width: {bar_width:.1}%"))
                        {}
                    }
                }

                p class="text-xs text-gray-500 mt-1"
                {
                    (format!("{committed:.0}")) "% of income committed"
                }
            }
        }
    }
}

fn stat_card(label: &str, amount: f64, amount_style: &str) -> Markup {
    html! {
        div
            class="bg-white dark:bg-gray-800 border border-gray-200
                dark:border-gray-700 rounded-lg p-4 shadow-md"
        {
            h3 class="text-sm text-gray-600 dark:text-gray-400 mb-1" { (label) }

            div class={ "text-2xl font-bold " (amount_style) } { (format_currency(amount)) }
        }
    }
}

fn recent_transactions_table(transactions: &[Transaction]) -> Markup {
    html! {
        div class="relative overflow-x-auto shadow-md sm:rounded-lg"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Amount" }
                    }
                }

                tbody
                {
                    @if transactions.is_empty() {
                        tr
                        {
                            td colspan="4" class="text-center py-10 text-gray-500"
                            {
                                "No transactions this month. Start by "
                                (link(endpoints::NEW_TRANSACTION_VIEW, "adding one"))
                                "!"
                            }
                        }
                    }

                    @for transaction in transactions {
                        @let amount_style = match transaction.kind {
                            TransactionKind::Income => "text-green-600 dark:text-green-400",
                            TransactionKind::Outcome => "text-red-500 dark:text-red-400",
                        };
                        @let sign = match transaction.kind {
                            TransactionKind::Income => "+",
                            TransactionKind::Outcome => "-",
                        };

                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class={ (TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white" }
                            {
                                (transaction.name)
                            }

                            td class=(TABLE_CELL_STYLE)
                            {
                                span class={ "px-2 py-1 rounded-full text-xs " (badge_class(&transaction.category)) }
                                {
                                    (transaction.category)
                                }
                            }

                            td class=(TABLE_CELL_STYLE) { (format_date(transaction.date)) }

                            td class={ (TABLE_CELL_STYLE) " text-right font-medium " (amount_style) }
                            {
                                (sign) " " (format_currency(transaction.amount))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn cards_section(cards: &[Card]) -> Markup {
    html! {
        section class="mb-8"
        {
            div class="flex justify-between items-baseline mb-4"
            {
                h3 class="text-lg font-semibold" { "Cards" }

                a href=(endpoints::CARDS_VIEW) class=(LINK_STYLE) { "Manage cards" }
            }

            @if cards.is_empty() {
                div class="text-center text-gray-400 py-10"
                {
                    p { "No cards registered yet." }
                    (link(endpoints::NEW_CARD_VIEW, "Add your first card"))
                }
            } @else {
                div class="grid grid-cols-1 md:grid-cols-2 xl:grid-cols-3 gap-4"
                {
                    @for card in cards.iter().take(CARD_PREVIEW_COUNT) {
                        (card_panel(card, false))
                    }
                }
            }
        }
    }
}

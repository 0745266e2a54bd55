//! The page that lists transactions with month/year, text, kind and
//! category filters.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    category::{CATEGORIES, badge_class},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency, format_date,
    },
    navigation::NavBar,
    period::{PeriodSelector, filter_by_period},
    timezone::get_local_offset,
    transaction::{Transaction, TransactionKind, get_all_transactions},
};

/// The query parameters of the transactions page filter form.
///
/// Every field is optional so that a bare `/transactions` URL works; the
/// month and year default to the current month.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionFilterParams {
    /// Month number 1-12, or "all".
    pub month: Option<String>,
    /// Calendar year, or "all".
    pub year: Option<String>,
    /// Case-insensitive substring match on the transaction name.
    pub q: Option<String>,
    /// "income", "outcome", or "all".
    pub kind: Option<String>,
    /// An exact category, or "all".
    pub category: Option<String>,
}

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsViewState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render an overview of the user's transactions for the selected filters.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
    Query(params): Query<TransactionFilterParams>,
) -> Result<Response, Error> {
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

    let filter = resolve_filter(params, today);
    let transactions = apply_filter(&transactions, &filter, today);

    Ok(transactions_view(&transactions, &filter).into_response())
}

/// The filter selections after defaults have been applied.
struct ResolvedFilter {
    month: String,
    year: String,
    search: String,
    kind: Option<TransactionKind>,
    kind_value: String,
    category: String,
}

fn resolve_filter(params: TransactionFilterParams, today: Date) -> ResolvedFilter {
    let month = params
        .month
        .unwrap_or_else(|| u8::from(today.month()).to_string());
    let year = params.year.unwrap_or_else(|| today.year().to_string());
    let search = params.q.unwrap_or_default();
    let kind_value = params.kind.unwrap_or_else(|| "all".to_owned());
    let kind = match kind_value.as_str() {
        "income" => Some(TransactionKind::Income),
        "outcome" => Some(TransactionKind::Outcome),
        _ => None,
    };
    let category = params.category.unwrap_or_else(|| "all".to_owned());

    ResolvedFilter {
        month,
        year,
        search,
        kind,
        kind_value,
        category,
    }
}

fn apply_filter(
    transactions: &[Transaction],
    filter: &ResolvedFilter,
    today: Date,
) -> Vec<Transaction> {
    let selector = PeriodSelector::from_month_year(&filter.month, &filter.year);
    let mut filtered = filter_by_period(transactions, selector, today);

    let search = filter.search.trim().to_lowercase();
    if !search.is_empty() {
        filtered.retain(|transaction| transaction.name.to_lowercase().contains(&search));
    }

    if let Some(kind) = filter.kind {
        filtered.retain(|transaction| transaction.kind == kind);
    }

    if filter.category != "all" {
        filtered.retain(|transaction| transaction.category == filter.category);
    }

    filtered
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// The year range offered by the filter, matching the stored data.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 2024..=2035;

fn transactions_view(transactions: &[Transaction], filter: &ResolvedFilter) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl"
            {
                div class="flex justify-between items-baseline mb-4"
                {
                    h2 class="text-xl font-bold" { "Transactions" }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "New transaction"
                    }
                }

                (filter_form(filter))

                (transactions_table(transactions))
            }
        }
    };

    base("Transactions", &[], &content)
}

fn filter_form(filter: &ResolvedFilter) -> Markup {
    html! {
        form
            method="get"
            action=(endpoints::TRANSACTIONS_VIEW)
            class="grid grid-cols-2 md:grid-cols-6 gap-3 items-end mb-6
                bg-gray-50 dark:bg-gray-800 p-4 rounded-lg"
        {
            div
            {
                label for="month" class=(FORM_LABEL_STYLE) { "Month" }
                select id="month" name="month" class=(FORM_SELECT_STYLE)
                {
                    option value="all" selected[filter.month == "all"] { "All months" }
                    @for (index, name) in MONTH_NAMES.iter().enumerate() {
                        @let value = (index + 1).to_string();
                        option value=(value) selected[filter.month == value] { (name) }
                    }
                }
            }

            div
            {
                label for="year" class=(FORM_LABEL_STYLE) { "Year" }
                select id="year" name="year" class=(FORM_SELECT_STYLE)
                {
                    option value="all" selected[filter.year == "all"] { "All years" }
                    @for year in YEAR_RANGE {
                        @let value = year.to_string();
                        option value=(value) selected[filter.year == value] { (value) }
                    }
                }
            }

            div
            {
                label for="q" class=(FORM_LABEL_STYLE) { "Search" }
                input
                    id="q"
                    type="text"
                    name="q"
                    placeholder="Name"
                    value=(filter.search)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="kind" class=(FORM_LABEL_STYLE) { "Type" }
                select id="kind" name="kind" class=(FORM_SELECT_STYLE)
                {
                    option value="all" selected[filter.kind_value == "all"] { "All types" }
                    option value="income" selected[filter.kind_value == "income"] { "Income" }
                    option value="outcome" selected[filter.kind_value == "outcome"] { "Expense" }
                }
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                select id="category" name="category" class=(FORM_SELECT_STYLE)
                {
                    option value="all" selected[filter.category == "all"] { "All categories" }
                    @for category in CATEGORIES {
                        option value=(category) selected[filter.category == category] { (category) }
                    }
                }
            }

            div class="flex gap-3 items-center"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Filter" }

                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Clear" }
            }
        }
    }
}

fn transactions_table(transactions: &[Transaction]) -> Markup {
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
                        th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                        th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Amount" }
                        th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Actions" }
                    }
                }

                tbody
                {
                    @if transactions.is_empty() {
                        tr
                        {
                            td
                                colspan="6"
                                data-empty-state="true"
                                class="text-center py-10 text-gray-500"
                            {
                                "No transactions found for the selected period."
                            }
                        }
                    }

                    @for transaction in transactions {
                        (transaction_row(transaction))
                    }
                }
            }
        }
    }
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let amount_style = match transaction.kind {
        TransactionKind::Income => "text-green-600 dark:text-green-400",
        TransactionKind::Outcome => "text-red-500 dark:text-red-400",
    };
    let amount_sign = match transaction.kind {
        TransactionKind::Income => "+",
        TransactionKind::Outcome => "-",
    };
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let delete_url = format_endpoint(endpoints::TRANSACTION, transaction.id);

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
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

            td class=(TABLE_CELL_STYLE) { (transaction.status.label()) }

            td class={ (TABLE_CELL_STYLE) " text-right font-medium " (amount_style) }
            {
                (amount_sign) " " (format_currency(transaction.amount))
            }

            td class={ (TABLE_CELL_STYLE) " text-right" }
            {
                a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                " "

                button
                    type="button"
                    class={ (BUTTON_DELETE_STYLE) " ml-2" }
                    hx-delete=(delete_url)
                    hx-confirm="Delete this transaction? This cannot be undone."
                    hx-target="closest tr"
                    hx-swap="outerHTML"
                    hx-target-error="#alert-container"
                {
                    "Delete"
                }
            }
        }
    }
}

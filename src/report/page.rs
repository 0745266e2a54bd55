//! The reports page: quick stats, charts, the category summary table and
//! the goals-vs-actual comparison, all scoped by a period selector.

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
    card::get_all_cards,
    category::badge_class,
    dashboard::expenses_by_category,
    endpoints,
    goal::{Goal, ProgressSnapshot, compute_progress, get_all_goals},
    html::{
        BUTTON_PRIMARY_STYLE, ChartPanel, FORM_LABEL_STYLE, FORM_SELECT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        chart_container, charts_script, echarts_script_link, format_currency, format_date,
    },
    navigation::NavBar,
    period::{PeriodSelector, RollingWindow, filter_by_period},
    report::{
        charts::{monthly_expenses_chart, top_categories_chart},
        summary::{CategorySummaryRow, category_summary, monthly_expense_series},
    },
    timezone::get_local_offset,
    transaction::get_all_transactions,
};

/// How many categories the top-categories chart shows.
const TOP_CATEGORY_COUNT: usize = 5;

/// The query parameters of the reports page.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// The period value, e.g. "last-3-months". Unrecognized values and
    /// "all" select the full history.
    pub period: Option<String>,
}

/// The state needed for the reports page.
#[derive(Debug, Clone)]
pub struct ReportsViewState {
    /// The database connection for reading the snapshot.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for ReportsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Whether card balances belong in the figures for this period.
///
/// Card `used` is a present-moment snapshot, so folding it into a
/// historical period would misstate what was spent back then. Only the
/// full history and the current month include it.
fn include_card_spend(selector: PeriodSelector) -> bool {
    matches!(
        selector,
        PeriodSelector::All | PeriodSelector::Rolling(RollingWindow::CurrentMonth)
    )
}

/// Render the reports page for the selected period.
pub async fn get_reports_page(
    State(state): State<ReportsViewState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Err(Error::InvalidTimezoneError(state.local_timezone));
    };
    let today = OffsetDateTime::now_utc().to_offset(local_offset).date();

    let period_value = query.period.unwrap_or_else(|| "all".to_owned());
    let selector = PeriodSelector::from_report_query(&period_value);
    let with_cards = include_card_spend(selector);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_all_transactions(&connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
    let cards = get_all_cards(&connection)
        .inspect_err(|error| tracing::error!("could not get cards: {error}"))?;
    let goals = get_all_goals(&connection)
        .inspect_err(|error| tracing::error!("could not get goals: {error}"))?;

    let filtered = filter_by_period(&transactions, selector, today);

    let (summary_rows, total_expense) = category_summary(&filtered, &cards, with_cards);
    let top_categories: Vec<(String, f64)> = expenses_by_category(&filtered, &cards, with_cards)
        .into_iter()
        .take(TOP_CATEGORY_COUNT)
        .collect();
    let (month_labels, month_values) = monthly_expense_series(&transactions, today);

    let goals_with_progress: Vec<(Goal, ProgressSnapshot)> = goals
        .into_iter()
        .map(|goal| {
            let progress = compute_progress(&goal, &filtered, &cards, with_cards);
            (goal, progress)
        })
        .collect();

    let view = ReportView {
        period_value,
        filtered_count: filtered.len(),
        card_count: cards.len(),
        goal_count: goals_with_progress.len(),
        latest_transaction: filtered.iter().map(|transaction| transaction.date).max(),
        summary_rows,
        total_expense,
        goals_with_progress,
    };

    Ok(reports_view(&view, top_categories, month_labels, month_values).into_response())
}

/// Everything the reports view needs, precomputed.
struct ReportView {
    period_value: String,
    filtered_count: usize,
    card_count: usize,
    goal_count: usize,
    latest_transaction: Option<Date>,
    summary_rows: Vec<CategorySummaryRow>,
    total_expense: f64,
    goals_with_progress: Vec<(Goal, ProgressSnapshot)>,
}

fn reports_view(
    view: &ReportView,
    top_categories: Vec<(String, f64)>,
    month_labels: Vec<String>,
    month_values: Vec<f64>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::REPORTS_VIEW).into_html();

    let monthly_chart = ChartPanel {
        id: "monthly-expenses-chart",
        options: monthly_expenses_chart(month_labels, month_values).to_string(),
    };
    let categories_chart = ChartPanel {
        id: "top-categories-chart",
        options: top_categories_chart(&top_categories).to_string(),
    };

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl"
            {
                div class="flex justify-between items-baseline mb-4"
                {
                    h2 class="text-xl font-bold" { "Reports" }

                    (period_form(&view.period_value))
                }

                (quick_stats(view))

                div class="grid grid-cols-1 xl:grid-cols-2 gap-4 mb-8"
                {
                    (chart_container(&monthly_chart))

                    @if top_categories.is_empty() {
                        div class="text-center text-gray-400 py-10"
                        {
                            "No expenses in the selected period"
                        }
                    } @else {
                        (chart_container(&categories_chart))
                    }
                }

                (category_summary_table(&view.summary_rows, view.total_expense))

                (goals_comparison(&view.goals_with_progress))

                (export_section())
            }
        }
    };

    let scripts = [
        echarts_script_link(),
        charts_script(&[monthly_chart, categories_chart]),
    ];

    base("Reports", &scripts, &content)
}

fn period_form(period_value: &str) -> Markup {
    let windows = [
        RollingWindow::CurrentMonth,
        RollingWindow::LastMonth,
        RollingWindow::LastThreeMonths,
        RollingWindow::LastSixMonths,
        RollingWindow::LastYear,
    ];

    html! {
        form
            method="get"
            action=(endpoints::REPORTS_VIEW)
            class="flex items-end gap-3"
        {
            div
            {
                label for="period" class=(FORM_LABEL_STYLE) { "Period" }

                select id="period" name="period" class=(FORM_SELECT_STYLE)
                {
                    option value="all" selected[period_value == "all"] { "All time" }

                    @for window in windows {
                        option
                            value=(window.as_query_value())
                            selected[period_value == window.as_query_value()]
                        {
                            (window.label())
                        }
                    }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }
        }
    }
}

fn quick_stats(view: &ReportView) -> Markup {
    let latest = view
        .latest_transaction
        .map(format_date)
        .unwrap_or_else(|| "-".to_owned());

    html! {
        section class="grid grid-cols-2 md:grid-cols-4 gap-4 mb-8"
        {
            (stat_tile("Transactions", &view.filtered_count.to_string()))
            (stat_tile("Cards", &view.card_count.to_string()))
            (stat_tile("Goals", &view.goal_count.to_string()))
            (stat_tile("Latest activity", &latest))
        }
    }
}

fn stat_tile(label: &str, value: &str) -> Markup {
    html! {
        div
            class="bg-white dark:bg-gray-800 border border-gray-200
                dark:border-gray-700 rounded-lg p-4 shadow-md text-center"
        {
            div class="text-2xl font-bold" { (value) }
            div class="text-sm text-gray-600 dark:text-gray-400" { (label) }
        }
    }
}

fn category_summary_table(rows: &[CategorySummaryRow], total_expense: f64) -> Markup {
    html! {
        section class="mb-8"
        {
            h3 class="text-lg font-semibold mb-4" { "Expenses by category" }

            div class="relative overflow-x-auto shadow-md sm:rounded-lg"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Total" }
                            th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Entries" }
                            th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Average" }
                            th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Share" }
                        }
                    }

                    tbody
                    {
                        @if rows.is_empty() {
                            tr
                            {
                                td
                                    colspan="5"
                                    data-empty-state="true"
                                    class="text-center py-8 text-gray-400"
                                {
                                    "No transactions recorded"
                                }
                            }
                        }

                        @for row in rows {
                            @let share = if total_expense > 0.0 {
                                row.total / total_expense * 100.0
                            } else {
                                0.0
                            };
                            @let bar_width = share.clamp(0.0, 100.0);

                            tr class=(TABLE_ROW_STYLE) data-category-row="true"
                            {
                                td class=(TABLE_CELL_STYLE)
                                {
                                    span class={ "px-2 py-1 rounded-full text-xs " (badge_class(&row.category)) }
                                    {
                                        (row.category)
                                    }
                                }

                                td class={ (TABLE_CELL_STYLE) " text-right font-semibold text-red-500" }
                                {
                                    (format_currency(row.total))
                                }

                                td class={ (TABLE_CELL_STYLE) " text-right" } { (row.count) }

                                td class={ (TABLE_CELL_STYLE) " text-right" }
                                {
                                    (format_currency(row.average))
                                }

                                td class={ (TABLE_CELL_STYLE) " text-right" }
                                {
                                    div class="flex items-center justify-end gap-2"
                                    {
                                        div class="w-16 bg-gray-200 dark:bg-gray-700 rounded-full h-2"
                                        {
                                            @if bar_width > 0.0 {
                                                div
                                                    class="bg-blue-600 h-2 rounded-full"
                                                    style=(format!("width: {bar_width:.1}%"))
                                                {}
                                            }
                                        }

                                        span class="text-sm font-semibold w-12"
                                        {
                                            (format!("{share:.1}")) "%"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn goals_comparison(goals: &[(Goal, ProgressSnapshot)]) -> Markup {
    html! {
        section class="mb-8"
        {
            h3 class="text-lg font-semibold mb-4" { "Goals vs. actual" }

            @if goals.is_empty() {
                p class="text-center text-gray-400 py-6" { "No goals created yet" }
            } @else {
                div class="grid grid-cols-1 md:grid-cols-2 gap-4"
                {
                    @for (goal, progress) in goals {
                        @let bar_width = progress.percent.clamp(0.0, 100.0);
                        @let bar_style = if progress.reached() { "bg-green-500" } else { "bg-blue-600" };

                        div
                            data-goal-comparison="true"
                            class="bg-white dark:bg-gray-800 border border-gray-200
                                dark:border-gray-700 rounded-lg p-4 shadow-md"
                        {
                            div class="flex justify-between items-start mb-2"
                            {
                                div
                                {
                                    h4 class="font-bold" { (goal.name) }

                                    span
                                        class="text-xs px-2 py-1 rounded-full bg-blue-100
                                            text-blue-700 dark:bg-blue-900 dark:text-blue-300"
                                    {
                                        (goal.kind.label())
                                    }
                                }

                                span class="text-sm font-semibold"
                                {
                                    (format!("{:.0}", progress.percent.round())) "%"
                                }
                            }

                            div class="w-full bg-gray-200 dark:bg-gray-700 rounded-full h-2 mb-2"
                            {
                                @if bar_width > 0.0 {
                                    div
                                        class={ (bar_style) " h-2 rounded-full transition-all" }
                                        style=(format!("width: {bar_width:.1}%"))
                                    {}
                                }
                            }

                            div class="flex justify-between text-xs text-gray-600 dark:text-gray-400"
                            {
                                span { (format_currency(progress.current)) }
                                span { "Target: " (format_currency(progress.target)) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn export_section() -> Markup {
    html! {
        section class="mb-8"
        {
            h3 class="text-lg font-semibold mb-4" { "Export and import" }

            div class="flex flex-wrap items-center gap-4"
            {
                a href=(endpoints::EXPORT_JSON) class=(LINK_STYLE) { "Download JSON backup" }

                a href=(endpoints::EXPORT_CSV) class=(LINK_STYLE) { "Download CSV report" }

                form
                    hx-post=(endpoints::IMPORT)
                    hx-encoding="multipart/form-data"
                    hx-target-error="#alert-container"
                    class="flex items-center gap-2"
                {
                    input
                        type="file"
                        name="backup"
                        accept="application/json,.json"
                        required
                        class="text-sm text-gray-600 dark:text-gray-400";

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Import backup" }
                }
            }

            p class="text-xs text-gray-500 mt-2"
            {
                "Importing a backup replaces all stored data."
            }
        }
    }
}

//! The page that lists goals with their computed progress.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    card::get_all_cards,
    endpoints::{self, format_endpoint},
    goal::{Goal, ProgressSnapshot, compute_progress, get_all_goals},
    html::{
        BUTTON_DELETE_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base,
        format_currency,
    },
    navigation::NavBar,
    period::{PeriodSelector, RollingWindow, filter_by_period},
    timezone::get_local_offset,
    transaction::get_all_transactions,
};

/// The state needed for the goals page.
#[derive(Debug, Clone)]
pub struct GoalsViewState {
    /// The database connection for reading goals, transactions and cards.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for GoalsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the goals overview.
///
/// Expense-limit progress is measured against the current month's
/// transactions with card balances folded in, the same scope the
/// dashboard uses.
pub async fn get_goals_page(State(state): State<GoalsViewState>) -> Result<Response, Error> {
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

    let goals = get_all_goals(&connection)
        .inspect_err(|error| tracing::error!("could not get goals: {error}"))?;
    let transactions = get_all_transactions(&connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
    let cards = get_all_cards(&connection)
        .inspect_err(|error| tracing::error!("could not get cards: {error}"))?;

    let month_transactions = filter_by_period(
        &transactions,
        PeriodSelector::Rolling(RollingWindow::CurrentMonth),
        today,
    );

    let goals_with_progress: Vec<(Goal, ProgressSnapshot)> = goals
        .into_iter()
        .map(|goal| {
            let progress = compute_progress(&goal, &month_transactions, &cards, true);
            (goal, progress)
        })
        .collect();

    Ok(goals_view(&goals_with_progress).into_response())
}

fn goals_view(goals: &[(Goal, ProgressSnapshot)]) -> Markup {
    let nav_bar = NavBar::new(endpoints::GOALS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl"
            {
                div class="flex justify-between items-baseline mb-4"
                {
                    h2 class="text-xl font-bold" { "Goals" }

                    a href=(endpoints::NEW_GOAL_VIEW) class=(LINK_STYLE) { "New goal" }
                }

                @if goals.is_empty() {
                    div class="text-center text-gray-400 py-10"
                    {
                        p { "No goals created yet." }
                        p class="text-sm"
                        {
                            "Create goals to limit spending, save up, or pay off debt!"
                        }
                    }
                } @else {
                    div class="grid grid-cols-1 md:grid-cols-2 xl:grid-cols-3 gap-4"
                    {
                        @for (goal, progress) in goals {
                            (goal_card(goal, progress))
                        }
                    }
                }
            }
        }
    };

    base("Goals", &[], &content)
}

/// Renders a single goal card with its progress bar and controls.
pub(crate) fn goal_card(goal: &Goal, progress: &ProgressSnapshot) -> Markup {
    // The displayed percentage is unclamped, the bar width is.
    let bar_width = progress.percent.clamp(0.0, 100.0);
    let bar_style = if progress.reached() {
        "bg-green-500"
    } else if progress.percent > 80.0 {
        "bg-yellow-500"
    } else {
        "bg-blue-600 dark:bg-blue-500"
    };
    let percent_style = if progress.reached() {
        "text-green-600 dark:text-green-400"
    } else {
        "text-gray-600 dark:text-gray-400"
    };

    let edit_url = format_endpoint(endpoints::EDIT_GOAL_VIEW, goal.id);
    let delete_url = format_endpoint(endpoints::GOAL, goal.id);

    html! {
        div
            data-goal-card="true"
            class="bg-white dark:bg-gray-800 border border-gray-200
                dark:border-gray-700 rounded-lg p-4 shadow-md flex flex-col"
        {
            div class="flex justify-between items-start mb-3"
            {
                div class="flex-1"
                {
                    h3 class="font-bold text-lg" { (goal.name) }

                    span
                        class="text-xs px-2 py-1 rounded-full bg-gray-100
                            text-gray-700 dark:bg-gray-700 dark:text-gray-300"
                    {
                        (goal.kind.label())
                    }

                    div class="text-xs text-gray-500 mt-1" { (goal.category) }
                }

                div class="text-right"
                {
                    div class="text-sm font-medium text-gray-500"
                    {
                        "Target: " (format_currency(progress.target))
                    }

                    div class="text-sm font-semibold" { (format_currency(progress.current)) }
                }
            }

            div class="flex-grow"
            {
                div class="flex justify-between text-sm mb-2"
                {
                    span class="font-medium" { (progress.status) }

                    span class={ "font-semibold " (percent_style) }
                    {
                        (format!("{:.0}", progress.percent.round())) "%"
                    }
                }

                div
                    class="w-full bg-gray-200 dark:bg-gray-700 rounded-full h-3 mb-2"
                    role="progressbar"
                    aria-valuenow=(format!("{bar_width:.0}"))
                    aria-valuemin="0"
                    aria-valuemax="100"
                {
                    @if bar_width > 0.0 {
                        div
                            class={ (bar_style) " h-3 rounded-full transition-all" }
                            style=(format!("width: {bar_width:.1}%"))
                        {}
                    }
                }

                p class="text-sm text-gray-600 dark:text-gray-400" { (progress.message) }
            }

            @if progress.show_add_control {
                (saved_controls(goal))
            }

            div class="flex justify-end gap-4 mt-4"
            {
                a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                button
                    type="button"
                    class=(BUTTON_DELETE_STYLE)
                    hx-delete=(delete_url)
                    hx-confirm=(format!("Delete the goal \"{}\"? This cannot be undone.", goal.name))
                    hx-target="closest div[data-goal-card]"
                    hx-swap="outerHTML"
                    hx-target-error="#alert-container"
                {
                    "Delete"
                }
            }
        }
    }
}

/// The inline add/subtract/reset form shown on goals that track a saved
/// balance.
fn saved_controls(goal: &Goal) -> Markup {
    let saved_endpoint = format_endpoint(endpoints::GOAL_SAVED, goal.id);

    html! {
        form
            hx-post=(saved_endpoint)
            hx-target-error="#alert-container"
            class="mt-3 flex flex-wrap items-center gap-2"
        {
            input
                type="number"
                name="amount"
                step="0.01"
                min="0.01"
                placeholder="0.00"
                class={ (FORM_TEXT_INPUT_STYLE) " max-w-[8rem]" };

            button
                type="submit"
                name="action"
                value="add"
                class="bg-green-600 hover:bg-green-700 text-white px-3 py-1.5
                    rounded text-sm font-medium"
            {
                "Add"
            }

            button
                type="submit"
                name="action"
                value="subtract"
                class="bg-red-600 hover:bg-red-700 text-white px-3 py-1.5
                    rounded text-sm font-medium"
            {
                "Subtract"
            }

            button
                type="submit"
                name="action"
                value="reset"
                class="text-xs text-gray-400 hover:text-red-600 underline
                    bg-transparent border-none cursor-pointer"
                hx-confirm=(format!("Reset the progress of \"{}\"?", goal.name))
            {
                "Reset progress"
            }
        }
    }
}

#[cfg(test)]
mod goals_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::StatusCode;
    use rusqlite::Connection;
    use scraper::Selector;
    use time::OffsetDateTime;

    use crate::{
        card::{CardBrand, CardBuilder, create_card},
        category::CREDIT_CARD_CATEGORY,
        db::initialize,
        goal::{Goal, GoalBuilder, GoalKind, ProgressSnapshot, add_to_saved, compute_progress, create_goal},
        test_utils::{assert_valid_html, parse_html_document},
        transaction::{Transaction, TransactionKind, create_transaction},
    };

    use super::{GoalsViewState, get_goals_page, goal_card};

    fn get_test_state() -> GoalsViewState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        GoalsViewState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn page_shows_empty_state_without_goals() {
        let state = get_test_state();

        let response = get_goals_page(State(state)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("No goals created yet."));
    }

    #[tokio::test]
    async fn expense_limit_goal_uses_current_month_spend_and_cards() {
        let state = get_test_state();
        let today = OffsetDateTime::now_utc().date();

        {
            let connection = state.db_connection.lock().unwrap();
            create_goal(
                GoalBuilder {
                    name: "Card ceiling".to_owned(),
                    category: CREDIT_CARD_CATEGORY.to_owned(),
                    amount: 1000.0,
                    kind: GoalKind::ExpenseLimit,
                },
                &connection,
            )
            .unwrap();
            create_transaction(
                Transaction::build(
                    "Card payment",
                    200.0,
                    TransactionKind::Outcome,
                    CREDIT_CARD_CATEGORY,
                    today,
                ),
                &connection,
            )
            .unwrap();
            create_card(
                CardBuilder {
                    name: "Daily".to_owned(),
                    brand: CardBrand::Visa,
                    limit: 2000.0,
                    used: 300.0,
                    closing_day: None,
                    due_day: None,
                },
                &connection,
            )
            .unwrap();
        }

        let response = get_goals_page(State(state)).await.unwrap();
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let text = html.root_element().text().collect::<String>();
        // 200 transaction + 300 card used = 500 of the 1000 limit.
        assert!(text.contains("R$500.00"), "current should be 500: {text}");
        assert!(text.contains("50%"));
        assert!(text.contains("Within limit"));
    }

    #[tokio::test]
    async fn saved_goals_render_add_controls() {
        let state = get_test_state();

        {
            let connection = state.db_connection.lock().unwrap();
            let goal = create_goal(
                GoalBuilder {
                    name: "Trip".to_owned(),
                    category: "Lazer".to_owned(),
                    amount: 1000.0,
                    kind: GoalKind::Savings,
                },
                &connection,
            )
            .unwrap();
            add_to_saved(goal.id, 400.0, &connection).unwrap();
        }

        let response = get_goals_page(State(state)).await.unwrap();
        let html = parse_html_document(response).await;

        let button_selector = Selector::parse("button[name='action'][value='add']").unwrap();
        assert!(html.select(&button_selector).next().is_some());
    }

    fn snapshot_for(goal: &Goal) -> ProgressSnapshot {
        compute_progress(goal, &[], &[], true)
    }

    #[test]
    fn expense_limit_card_has_no_add_controls() {
        let goal = Goal {
            id: 1,
            name: "Groceries cap".to_owned(),
            category: "Alimentação".to_owned(),
            amount: 500.0,
            kind: GoalKind::ExpenseLimit,
            saved: 0.0,
        };

        let html = goal_card(&goal, &snapshot_for(&goal)).into_string();

        assert!(!html.contains("name=\"action\""));
    }

    #[test]
    fn over_limit_goal_clamps_bar_width_but_not_percent() {
        let goal = Goal {
            id: 1,
            name: "Trip".to_owned(),
            category: "Lazer".to_owned(),
            amount: 100.0,
            kind: GoalKind::Savings,
            saved: 250.0,
        };

        let html = goal_card(&goal, &snapshot_for(&goal)).into_string();

        assert!(html.contains("250%"));
        assert!(html.contains("width: 100.0%"));
    }
}

//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    card::{
        create_card_endpoint, delete_card_endpoint, get_cards_page, get_edit_card_page,
        get_new_card_page, update_card_endpoint,
    },
    dashboard::get_dashboard_page,
    endpoints,
    goal::{
        create_goal_endpoint, delete_goal_endpoint, get_edit_goal_page, get_goals_page,
        get_new_goal_page, update_goal_endpoint, update_saved_endpoint,
    },
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    report::{export_csv_endpoint, export_json_endpoint, get_reports_page, import_backup_endpoint},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_edit_transaction_page,
        get_new_transaction_page, get_transactions_page, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_new_transaction_page),
        )
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(endpoints::CARDS_VIEW, get(get_cards_page))
        .route(endpoints::NEW_CARD_VIEW, get(get_new_card_page))
        .route(endpoints::EDIT_CARD_VIEW, get(get_edit_card_page))
        .route(endpoints::GOALS_VIEW, get(get_goals_page))
        .route(endpoints::NEW_GOAL_VIEW, get(get_new_goal_page))
        .route(endpoints::EDIT_GOAL_VIEW, get(get_edit_goal_page))
        .route(endpoints::REPORTS_VIEW, get(get_reports_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS_API,
            post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            put(update_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(endpoints::CARDS_API, post(create_card_endpoint))
        .route(
            endpoints::CARD,
            put(update_card_endpoint).delete(delete_card_endpoint),
        )
        .route(endpoints::GOALS_API, post(create_goal_endpoint))
        .route(
            endpoints::GOAL,
            put(update_goal_endpoint).delete(delete_goal_endpoint),
        )
        .route(endpoints::GOAL_SAVED, post(update_saved_endpoint))
        .route(endpoints::EXPORT_JSON, get(export_json_endpoint))
        .route(endpoints::EXPORT_CSV, get(export_csv_endpoint))
        .route(endpoints::IMPORT, post(import_backup_endpoint));

    page_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod root_route_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{endpoints, routing::get_index_page};

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let response = get_index_page().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::DASHBOARD_VIEW);
    }

    #[test]
    fn build_router_accepts_app_state() {
        let connection = rusqlite::Connection::open_in_memory().unwrap();
        let state = crate::AppState::new(connection, "Etc/UTC").unwrap();

        // Route registration panics on conflicting paths, so building the
        // router is itself the assertion.
        let _router = super::build_router(state);
    }
}

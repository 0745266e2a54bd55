//! Goal management: the `Goal` model, the progress calculator, database
//! queries, and the pages and endpoints for listing, creating, editing,
//! deleting and updating the saved balance of goals.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;
mod progress;
mod saved;

pub use create::{create_goal_endpoint, get_new_goal_page};
pub use db::{
    add_to_saved, create_goal, create_goal_table, delete_goal, get_all_goals, get_goal,
    reset_saved, subtract_from_saved, update_goal,
};
pub use delete::delete_goal_endpoint;
pub use domain::{Goal, GoalBuilder, GoalId, GoalKind};
pub use edit::{get_edit_goal_page, update_goal_endpoint};
pub use list::get_goals_page;
pub use progress::{ProgressSnapshot, compute_progress};
pub use saved::update_saved_endpoint;

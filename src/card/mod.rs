//! Credit card management: the `Card` model, database queries, and the
//! pages and endpoints for listing, creating, editing and deleting cards.

mod cards_page;
mod create;
mod db;
mod delete;
mod domain;
mod edit;

pub use cards_page::get_cards_page;
pub(crate) use cards_page::card_panel;
pub use create::{create_card_endpoint, get_new_card_page};
pub use db::{create_card, create_card_table, delete_card, get_all_cards, get_card, update_card};
pub use delete::delete_card_endpoint;
pub use domain::{Card, CardBrand, CardBuilder, CardId, parse_day_of_month};
pub use edit::{get_edit_card_page, update_card_endpoint};

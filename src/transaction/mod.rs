//! Transaction management: the `Transaction` model, database queries, and
//! the pages and endpoints for listing, creating, editing and deleting
//! transactions.

mod core;
mod create;
mod delete;
mod edit;
mod transactions_page;

pub use core::{
    Transaction, TransactionBuilder, TransactionId, TransactionKind, TransactionStatus,
    create_transaction, create_transaction_table, delete_transaction, get_all_transactions,
    get_transaction, update_transaction,
};
pub use create::{create_transaction_endpoint, get_new_transaction_page};
pub use delete::delete_transaction_endpoint;
pub use edit::{get_edit_transaction_page, update_transaction_endpoint};
pub use transactions_page::get_transactions_page;

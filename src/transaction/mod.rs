//! The append-only ledger of money movements between jars.

mod create;
mod db;
mod get;
mod list;
mod transfer;

pub use create::create_transaction_endpoint;
pub use db::{
    NewTransaction, Transaction, TransactionId, create_transaction_table, get_all_transactions,
    get_transaction, get_transactions_by_date_range, get_transactions_by_jar,
    get_transactions_page, insert_transaction,
};
pub use get::get_transaction_endpoint;
pub use list::{
    get_all_transactions_endpoint, get_transactions_by_date_range_endpoint,
    get_transactions_by_jar_endpoint, get_transactions_page_endpoint,
};
pub use transfer::{transfer_endpoint, transfer_money};

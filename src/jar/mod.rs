//! Money jars: named budget envelopes with running balances.

mod balance;
mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod get;
mod list;

pub use balance::{deposit_endpoint, get_balance_endpoint, withdraw_endpoint};
pub use create::create_jar_endpoint;
pub use db::{
    create_jar, create_jar_table, delete_jar, deposit, get_all_jars, get_balance, get_jar,
    get_jars_page, update_jar, withdraw,
};
pub use delete::delete_jar_endpoint;
pub use domain::{Jar, JarForm, JarId, JarName, NewJar};
pub use edit::update_jar_endpoint;
pub use get::get_jar_endpoint;
pub use list::{get_all_jars_endpoint, get_jars_page_endpoint};

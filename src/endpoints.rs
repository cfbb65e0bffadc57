//! The API endpoint URIs.

/// The route to list and create jars.
pub const JARS: &str = "/api/jars";
/// The route to list jars one page at a time.
pub const JARS_PAGED: &str = "/api/jars/paged";
/// The route to get, update, or delete a single jar.
pub const JAR: &str = "/api/jars/{jar_id}";
/// The route to read a jar's balance.
pub const JAR_BALANCE: &str = "/api/jars/{jar_id}/balance";
/// The route to add money to a jar.
pub const JAR_DEPOSIT: &str = "/api/jars/{jar_id}/add";
/// The route to remove money from a jar.
pub const JAR_WITHDRAW: &str = "/api/jars/{jar_id}/remove";

/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to list transactions one page at a time.
pub const TRANSACTIONS_PAGED: &str = "/api/transactions/paged";
/// The route to get a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to move money between jars.
pub const TRANSFER: &str = "/api/transactions/transfer";
/// The route to list the transactions that touched a jar.
pub const TRANSACTIONS_BY_JAR: &str = "/api/transactions/jar/{jar_id}";
/// The route to list the transactions within a date range.
pub const TRANSACTIONS_BY_DATE_RANGE: &str = "/api/transactions/daterange";

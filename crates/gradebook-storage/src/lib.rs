//! Revision ledger: durable, revision-keyed storage of eval runs in SQLite.

pub mod codec;
pub mod connection;
pub mod ledger;
pub mod migrations;
pub mod queries;

pub use ledger::Ledger;

//! Database access layer
//!
//! Pool initialization and schema creation. Query modules live in
//! verdia-api next to the domain models they load.

pub mod init;

pub use init::{create_tables, init_database, init_memory_database};

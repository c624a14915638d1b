//! Database query modules
//!
//! Pool initialization and schema live in verdia-common; the query
//! functions here map rows into the domain models.

pub mod briefs;
pub mod catalog;
pub mod products;

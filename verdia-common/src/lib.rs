//! # Verdia Common Library
//!
//! Shared code for the Verdia backend:
//! - Error type used across crates
//! - TOML configuration loading and path resolution
//! - Database pool initialization and schema creation

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};

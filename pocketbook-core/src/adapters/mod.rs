//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - JSON file and DuckDB for the KeyValueStore port
//! - In-memory store for tests
//! - Demo data for demo mode

pub mod demo;
pub mod duckdb;
pub mod json_file;
pub mod memory;

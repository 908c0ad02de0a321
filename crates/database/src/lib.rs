//! # Candleview Database Crate
//!
//! This crate acts as a high-level, application-specific interface to the
//! SQLite history database. It is the system's memory of past analyses.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** This crate encapsulates all database-specific logic. It provides a
//!   clean, abstract API to the rest of the application, hiding the underlying SQL.
//! - **Bounded:** Only the most recent analyses are retained. Saving beyond the
//!   configured limit drops the oldest entries together with their trades.
//! - **Asynchronous & Pooled:** All operations are asynchronous and share a
//!   connection pool (`SqlitePool`).
//!
//! ## Public API
//!
//! - `connect`: The async function to establish the database connection pool.
//! - `run_migrations`: A utility to apply database migrations, ensuring the schema is up-to-date.
//! - `HistoryRepository`: Holds the connection pool and provides the history operations
//!   (`save_analysis`, `list_analyses`, `get_analysis`, `get_trades`, `delete_analysis`).
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, connect_in_memory, run_migrations};
pub use error::DbError;
pub use repository::{HistoryEntry, HistoryRepository};

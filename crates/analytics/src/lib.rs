//! # Candleview Analytics Engine
//!
//! This crate turns a market price series, a trader's closed trades and a starting
//! capital into a risk/return report plus the equity and benchmark curves used
//! for charting.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** No I/O of any kind. It depends only on `core-types`.
//! - **Stateless Calculation:** The `AnalyticsEngine` holds no state between calls
//!   and never mutates its inputs, so identical inputs always give an identical
//!   report and the engine can be shared freely between threads.
//!
//! ## Pipeline
//!
//! 1. `filter`: keeps trades exiting inside the market span and indexes them by exit day.
//! 2. `equity`: walks the market days once, booking same-day P&L into capital.
//! 3. `drawdown`: worst percentage and absolute retracement of capital.
//! 4. `returns`: daily returns, annualized Sharpe and Sortino.
//! 5. `aggregates`: win rate, profit factor, recovery factor, average profit.
//! 6. `report`: the raw metrics and their two-decimal display form.

// Declare the modules that constitute this crate.
pub mod aggregates;
pub mod drawdown;
pub mod engine;
pub mod equity;
pub mod error;
pub mod filter;
pub mod format;
mod math;
pub mod report;
pub mod returns;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::{Analysis, PerformanceMetrics, StatisticsReport};

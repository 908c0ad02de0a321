//! # Candleview Ingest
//!
//! The parsing boundary in front of the analytics engine. Trade files and market
//! data files are read and validated here so the engine only ever receives
//! well-formed records.

pub mod error;
pub mod market;
pub mod trades;

pub use error::IngestError;
pub use market::{parse_market_data, parse_market_value};
pub use trades::{parse_trade_file, parse_trade_value};

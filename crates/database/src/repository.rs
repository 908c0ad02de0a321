use crate::DbError;
use analytics::StatisticsReport;
use chrono::{DateTime, NaiveDate, Utc};
use core_types::Trade;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;
use uuid::Uuid;

/// One saved analysis as listed in the history panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub capital: Decimal,
    /// `"<start> - <end>"`, ready for display.
    pub date_range: String,
    /// The formatted total return of the report, e.g. `"12.34"`.
    pub total_return: String,
    /// The formatted Sharpe ratio of the report.
    pub sharpe: String,
}

impl HistoryEntry {
    /// Creates a new entry stamped with a fresh id and the current time.
    pub fn from_report(
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        capital: Decimal,
        report: &StatisticsReport,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            symbol: symbol.to_string(),
            start_date,
            end_date,
            capital,
            date_range: format!("{} - {}", start_date, end_date),
            total_return: report.total_return.clone(),
            sharpe: report.sharpe.clone(),
        }
    }
}

// This struct represents a row fetched from the analyses table.
#[derive(FromRow, Debug, Clone)]
struct DbHistoryRow {
    id: String,
    created_at: DateTime<Utc>,
    symbol: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    capital: String,
    date_range: String,
    total_return: String,
    sharpe: String,
}

impl DbHistoryRow {
    fn into_entry(self) -> Result<HistoryEntry, DbError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| DbError::CorruptRecord(format!("analysis id '{}': {}", self.id, e)))?;
        let capital = Decimal::from_str(&self.capital)
            .map_err(|e| DbError::CorruptRecord(format!("capital of {}: {}", self.id, e)))?;

        Ok(HistoryEntry {
            id,
            timestamp: self.created_at,
            symbol: self.symbol,
            start_date: self.start_date,
            end_date: self.end_date,
            capital,
            date_range: self.date_range,
            total_return: self.total_return,
            sharpe: self.sharpe,
        })
    }
}

const SELECT_ENTRY: &str = r#"
    SELECT id, created_at, symbol, start_date, end_date, capital, date_range, total_return, sharpe
    FROM analyses
"#;

/// The `HistoryRepository` provides a high-level, application-specific interface
/// to the history database. It encapsulates all SQL queries and data access logic.
///
/// Only the `limit` most recent analyses are kept; saving a new one prunes the rest.
#[derive(Debug, Clone)]
pub struct HistoryRepository {
    pool: SqlitePool,
    limit: usize,
}

impl HistoryRepository {
    /// Creates a new `HistoryRepository` with a shared database connection pool.
    pub fn new(pool: SqlitePool, limit: usize) -> Self {
        Self { pool, limit }
    }

    /// Stores an analysis with its trade list, then drops everything beyond the newest `limit`.
    ///
    /// Runs in one transaction: either the entry, its trades and the pruning all land, or none do.
    pub async fn save_analysis(&self, entry: &HistoryEntry, trades: &[Trade]) -> Result<(), DbError> {
        let trades_json = serde_json::to_string(trades)?;
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO analyses (id, created_at, symbol, start_date, end_date, capital, date_range, total_return, sharpe)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(entry.id.to_string())
        .bind(entry.timestamp)
        .bind(&entry.symbol)
        .bind(entry.start_date)
        .bind(entry.end_date)
        .bind(entry.capital.to_string())
        .bind(&entry.date_range)
        .bind(&entry.total_return)
        .bind(&entry.sharpe)
        .execute(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO analysis_trades (analysis_id, trades) VALUES ($1, $2)")
            .bind(entry.id.to_string())
            .bind(trades_json)
            .execute(&mut *tx)
            .await?;

        // `LIMIT -1` is SQLite for "no limit", leaving only the OFFSET.
        let stale: Vec<String> = sqlx::query_scalar(
            "SELECT id FROM analyses ORDER BY created_at DESC, rowid DESC LIMIT -1 OFFSET $1",
        )
        .bind(self.limit as i64)
        .fetch_all(&mut *tx)
        .await?;

        for id in &stale {
            sqlx::query("DELETE FROM analysis_trades WHERE analysis_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM analyses WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        tracing::info!(id = %entry.id, symbol = %entry.symbol, pruned = stale.len(), "Analysis saved to history.");
        Ok(())
    }

    /// Fetches all saved analyses, newest first.
    pub async fn list_analyses(&self) -> Result<Vec<HistoryEntry>, DbError> {
        let rows = sqlx::query_as::<_, DbHistoryRow>(&format!(
            "{} ORDER BY created_at DESC, rowid DESC",
            SELECT_ENTRY
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(DbHistoryRow::into_entry).collect()
    }

    /// Fetches a single saved analysis.
    pub async fn get_analysis(&self, id: Uuid) -> Result<HistoryEntry, DbError> {
        let row = sqlx::query_as::<_, DbHistoryRow>(&format!("{} WHERE id = $1", SELECT_ENTRY))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::NotFound)?;

        row.into_entry()
    }

    /// Fetches the trade list stored with an analysis.
    pub async fn get_trades(&self, id: Uuid) -> Result<Vec<Trade>, DbError> {
        let json: String =
            sqlx::query_scalar("SELECT trades FROM analysis_trades WHERE analysis_id = $1")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?
                .ok_or(DbError::NotFound)?;

        Ok(serde_json::from_str(&json)?)
    }

    /// Removes an analysis together with its trades.
    pub async fn delete_analysis(&self, id: Uuid) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM analysis_trades WHERE analysis_id = $1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM analyses WHERE id = $1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(DbError::NotFound);
        }
        tx.commit().await?;
        tracing::info!(%id, "Analysis deleted from history.");
        Ok(())
    }
}

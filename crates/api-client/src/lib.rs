use crate::error::ApiError;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use configuration::MarketDataSettings;
use core_types::MarketDataPoint;
use reqwest::Url;
use std::time::Duration;

pub mod benchmark;
pub mod error;
pub mod responses;
// --- Public API ---
pub use benchmark::attach_benchmark;
pub use responses::{ChartErrorResponse, ChartResponse, ChartResult};

/// The chart API turns away requests without a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0 (compatible; candleview/0.1)";

/// The generic, abstract interface for a daily market data source.
/// This trait is the contract the web server and the CLI use, allowing the
/// underlying implementation (live or stub) to be swapped out.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetches daily bars for `symbol` from `start` up to, but excluding, `end`.
    ///
    /// Bars come back in ascending order with `benchmark_pct` filled in.
    async fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MarketDataPoint>, ApiError>;
}

/// A concrete implementation of the `MarketDataProvider` for the Yahoo Finance chart API.
#[derive(Clone)]
pub struct YahooClient {
    client: reqwest::Client,
    base_url: Url,
}

impl YahooClient {
    pub fn new(settings: &MarketDataSettings) -> Result<Self, ApiError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|e| ApiError::InvalidData(format!("Invalid base URL '{}': {}", settings.base_url, e)))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, base_url })
    }

    fn chart_url(&self, symbol: &str) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidData(format!("Base URL cannot take a path: {}", self.base_url)))?
            .pop_if_empty()
            .push(symbol);
        Ok(url)
    }
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    async fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MarketDataPoint>, ApiError> {
        let no_data = || ApiError::NoData {
            symbol: symbol.to_string(),
            start: start.to_string(),
            end: end.to_string(),
        };
        if start >= end {
            return Err(no_data());
        }

        let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let period2 = end.and_time(NaiveTime::MIN).and_utc().timestamp();
        let url = self.chart_url(symbol)?;
        tracing::info!(symbol, %start, %end, "Fetching daily market data.");

        let response = self
            .client
            .get(url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
            ])
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        let body: ChartResponse = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(ApiError::Provider(format!("HTTP {}: {}", status, text)));
            }
            Err(e) => return Err(ApiError::Deserialization(e.to_string())),
        };
        if let Some(error) = body.chart.error {
            return Err(ApiError::Provider(format!("{}: {}", error.code, error.description)));
        }

        let result = body
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(no_data)?;
        let mut points = result.into_points()?;
        // The API may append today's live bar past `period2`.
        points.retain(|p| p.time.normalize().is_ok_and(|day| day >= start && day < end));
        if points.is_empty() {
            return Err(no_data());
        }

        attach_benchmark(&mut points)?;
        tracing::debug!(symbol, count = points.len(), "Market data received.");
        Ok(points)
    }
}

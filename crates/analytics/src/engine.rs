use crate::aggregates::aggregate_trades;
use crate::drawdown::track_drawdown;
use crate::equity::{build_equity_curve, return_pct};
use crate::error::AnalyticsError;
use crate::filter::TradeIndex;
use crate::report::{Analysis, PerformanceMetrics, StatisticsReport};
use crate::returns::risk_ratios;
use core_types::{CurvePoint, MarketDataPoint, Trade};
use rust_decimal::Decimal;

/// A stateless calculator for deriving performance metrics from a trader's closed trades.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point: computes the formatted report handed to the dashboard.
    ///
    /// # Arguments
    ///
    /// * `market` - Daily market data, ascending by time.
    /// * `trades` - Every trade from the trade file. Only those exiting inside the
    ///   market span are counted.
    /// * `initial_capital` - The starting capital. Must be positive.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `StatisticsReport` or an `AnalyticsError`.
    pub fn calculate(
        &self,
        market: &[MarketDataPoint],
        trades: &[Trade],
        initial_capital: Decimal,
    ) -> Result<StatisticsReport, AnalyticsError> {
        Ok(self.analyze(market, trades, initial_capital)?.into_report())
    }

    /// Same pipeline as [`calculate`](Self::calculate), returning full-precision metrics.
    pub fn analyze(
        &self,
        market: &[MarketDataPoint],
        trades: &[Trade],
        initial_capital: Decimal,
    ) -> Result<Analysis, AnalyticsError> {
        if initial_capital <= Decimal::ZERO {
            return Err(AnalyticsError::InvalidCapital(initial_capital));
        }

        let index = TradeIndex::build(trades, market)?;
        tracing::debug!(
            days = market.len(),
            trades = trades.len(),
            in_range = index.len(),
            "Indexed trades by exit day."
        );

        let equity = build_equity_curve(market, &index, initial_capital)?;
        let drawdown = track_drawdown(&equity.capital)?;
        let ratios = risk_ratios(&equity.capital)?;
        let aggregates = aggregate_trades(index.trades())?;

        let metrics = PerformanceMetrics {
            initial_capital,
            final_capital: equity.final_capital,
            total_return_pct: return_pct(equity.final_capital, initial_capital)?,
            benchmark_pct: market.last().map_or(Decimal::ZERO, |p| p.benchmark_pct),
            sharpe_ratio: ratios.sharpe,
            sortino_ratio: ratios.sortino,
            max_drawdown_pct: drawdown.max_drawdown_pct,
            max_drawdown_abs: drawdown.max_drawdown_abs,
            recovery_factor: aggregates.recovery_factor(drawdown.max_drawdown_abs)?,
            total_trades: aggregates.total_trades,
            winning_trades: aggregates.winning_trades,
            win_rate_pct: aggregates.win_rate_pct,
            gross_profit: aggregates.gross_profit,
            gross_loss: aggregates.gross_loss,
            profit_factor: aggregates.profit_factor,
            avg_profit_per_trade: aggregates.avg_profit_per_trade,
        };

        let benchmark_curve = market
            .iter()
            .map(|p| CurvePoint {
                time: p.time.clone(),
                value: p.benchmark_pct,
            })
            .collect();

        Ok(Analysis {
            metrics,
            equity_curve: equity.points,
            benchmark_curve,
        })
    }
}

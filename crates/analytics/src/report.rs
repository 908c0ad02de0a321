use crate::format::format_fixed;
use core_types::CurvePoint;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The raw, full-precision metrics of one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    // I. Returns
    pub initial_capital: Decimal,
    pub final_capital: Decimal,
    pub total_return_pct: Decimal,
    pub benchmark_pct: Decimal,

    // II. Risk and Drawdown
    pub sharpe_ratio: Decimal,
    pub sortino_ratio: Decimal,
    pub max_drawdown_pct: Decimal,
    pub max_drawdown_abs: Decimal,
    pub recovery_factor: Decimal,

    // III. Trade-Level Statistics
    pub total_trades: usize,
    pub winning_trades: usize,
    pub win_rate_pct: Decimal,
    pub gross_profit: Decimal,
    pub gross_loss: Decimal,
    pub profit_factor: Decimal,
    pub avg_profit_per_trade: Decimal,
}

impl PerformanceMetrics {
    /// Metrics of an analysis where nothing happened: capital never moved.
    pub fn flat(initial_capital: Decimal) -> Self {
        Self {
            initial_capital,
            final_capital: initial_capital,
            total_return_pct: Decimal::ZERO,
            benchmark_pct: Decimal::ZERO,
            sharpe_ratio: Decimal::ZERO,
            sortino_ratio: Decimal::ZERO,
            max_drawdown_pct: Decimal::ZERO,
            max_drawdown_abs: Decimal::ZERO,
            recovery_factor: Decimal::ZERO,
            total_trades: 0,
            winning_trades: 0,
            win_rate_pct: Decimal::ZERO,
            gross_profit: Decimal::ZERO,
            gross_loss: Decimal::ZERO,
            profit_factor: Decimal::ZERO,
            avg_profit_per_trade: Decimal::ZERO,
        }
    }
}

/// Everything one engine invocation produces, before formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub metrics: PerformanceMetrics,
    pub equity_curve: Vec<CurvePoint>,
    pub benchmark_curve: Vec<CurvePoint>,
}

impl Analysis {
    pub fn into_report(self) -> StatisticsReport {
        let m = &self.metrics;
        StatisticsReport {
            total_return: format_fixed(m.total_return_pct),
            benchmark: format_fixed(m.benchmark_pct),
            sharpe: format_fixed(m.sharpe_ratio),
            max_drawdown: format_fixed(m.max_drawdown_pct),
            win_rate: format_fixed(m.win_rate_pct),
            profit_factor: format_fixed(m.profit_factor),
            sortino: format_fixed(m.sortino_ratio),
            recovery_factor: format_fixed(m.recovery_factor),
            number_of_trades: m.total_trades,
            final_capital: format_fixed(m.final_capital),
            avg_profit_per_trade: format_fixed(m.avg_profit_per_trade),
            equity_curve: self.equity_curve,
            benchmark_curve: self.benchmark_curve,
        }
    }
}

/// The report handed to the display and charting layers.
///
/// Scalar metrics are display strings with two decimals. Percentages
/// (`total_return`, `benchmark`, `max_drawdown`, `win_rate`) carry no `%` sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsReport {
    pub total_return: String,
    pub benchmark: String,
    pub sharpe: String,
    pub max_drawdown: String,
    pub win_rate: String,
    pub profit_factor: String,
    pub sortino: String,
    pub recovery_factor: String,
    pub number_of_trades: usize,
    pub final_capital: String,
    pub avg_profit_per_trade: String,
    pub equity_curve: Vec<CurvePoint>,
    pub benchmark_curve: Vec<CurvePoint>,
}

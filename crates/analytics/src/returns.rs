//! Day-over-day capital returns and the ratios annualized from them.

use crate::error::AnalyticsError;
use crate::math::{checked_sum, out_of_range, pct_change};
use rust_decimal::{Decimal, MathematicalOps};

pub const TRADING_DAYS: Decimal = Decimal::from_parts(252, 0, 0, false, 0);

/// Annualized risk-adjusted ratios. Zero whenever the deviation is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RiskRatios {
    pub sharpe: Decimal,
    pub sortino: Decimal,
}

/// Percent change between consecutive capital values. Zero when the previous value is zero.
pub fn daily_returns(capital: &[Decimal]) -> Result<Vec<Decimal>, AnalyticsError> {
    capital
        .windows(2)
        .map(|w| {
            if w[0].is_zero() {
                Ok(Decimal::ZERO)
            } else {
                pct_change(w[0], w[1]).ok_or_else(|| out_of_range("daily return"))
            }
        })
        .collect()
}

pub fn mean(values: &[Decimal]) -> Result<Decimal, AnalyticsError> {
    if values.is_empty() {
        return Ok(Decimal::ZERO);
    }
    checked_sum(values.iter().copied())
        .and_then(|sum| sum.checked_div(Decimal::from(values.len())))
        .ok_or_else(|| out_of_range("mean return"))
}

/// Variance over the whole population (divides by `n`, not `n - 1`).
pub fn population_variance(values: &[Decimal]) -> Result<Decimal, AnalyticsError> {
    if values.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let avg = mean(values)?;
    mean_square(values.iter().map(|v| v.checked_sub(avg)), values.len())
        .ok_or_else(|| out_of_range("return variance"))
}

/// Root mean square of the strictly negative returns, over the count of negatives only.
pub fn downside_deviation(values: &[Decimal]) -> Result<Decimal, AnalyticsError> {
    let negatives: Vec<Decimal> = values.iter().copied().filter(|v| *v < Decimal::ZERO).collect();
    if negatives.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let mean_square = mean_square(negatives.iter().copied().map(Some), negatives.len())
        .ok_or_else(|| out_of_range("downside deviation"))?;
    sqrt(mean_square, "downside deviation")
}

/// Sum of squares over `count`. `None` when any term is `None` or overflows.
fn mean_square(terms: impl Iterator<Item = Option<Decimal>>, count: usize) -> Option<Decimal> {
    let mut sum = Decimal::ZERO;
    for term in terms {
        let term = term?;
        sum = sum.checked_add(term.checked_mul(term)?)?;
    }
    sum.checked_div(Decimal::from(count))
}

/// Sharpe and Sortino of the daily returns of `capital`, annualized by `sqrt(252)`.
pub fn risk_ratios(capital: &[Decimal]) -> Result<RiskRatios, AnalyticsError> {
    let returns = daily_returns(capital)?;
    let avg = mean(&returns)?;
    let variance = population_variance(&returns)?;
    let annualization = sqrt(TRADING_DAYS, "annualization factor")?;

    let sharpe = if variance > Decimal::ZERO {
        annualized(avg, sqrt(variance, "return variance")?, annualization)
            .ok_or_else(|| out_of_range("Sharpe ratio"))?
    } else {
        Decimal::ZERO
    };

    let downside = downside_deviation(&returns)?;
    let sortino = if downside > Decimal::ZERO {
        annualized(avg, downside, annualization).ok_or_else(|| out_of_range("Sortino ratio"))?
    } else {
        Decimal::ZERO
    };

    Ok(RiskRatios { sharpe, sortino })
}

fn annualized(avg: Decimal, deviation: Decimal, annualization: Decimal) -> Option<Decimal> {
    avg.checked_div(deviation)?.checked_mul(annualization)
}

fn sqrt(value: Decimal, what: &str) -> Result<Decimal, AnalyticsError> {
    value
        .sqrt()
        .ok_or_else(|| AnalyticsError::Calculation(format!("square root of {} ({})", what, value)))
}

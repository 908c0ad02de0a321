use crate::error::ApiError;
use core_types::MarketDataPoint;
use rust_decimal::Decimal;

/// Fills in `benchmark_pct` as the buy-and-hold return from the first close.
///
/// `benchmark_pct = (close - first_close) / first_close * 100`. A zero first close
/// leaves every value at zero. A return outside the decimal range is `InvalidData`.
pub fn attach_benchmark(points: &mut [MarketDataPoint]) -> Result<(), ApiError> {
    let Some(first_close) = points.first().map(|p| p.close) else {
        return Ok(());
    };
    if first_close.is_zero() {
        points.iter_mut().for_each(|p| p.benchmark_pct = Decimal::ZERO);
        return Ok(());
    }

    for point in points.iter_mut() {
        point.benchmark_pct = point
            .close
            .checked_sub(first_close)
            .and_then(|change| change.checked_div(first_close))
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or_else(|| {
                ApiError::InvalidData(format!(
                    "benchmark return on {} from first close {}",
                    point.time, first_close
                ))
            })?;
    }
    Ok(())
}

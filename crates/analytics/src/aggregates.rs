use crate::error::AnalyticsError;
use crate::math::out_of_range;
use core_types::Trade;
use rust_decimal::Decimal;

/// Trade-level statistics over the filtered trade set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TradeAggregates {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub win_rate_pct: Decimal,
    /// Sum of positive P&L.
    pub gross_profit: Decimal,
    /// Sum of the absolute value of zero or negative P&L.
    pub gross_loss: Decimal,
    /// `gross_profit / gross_loss`, or zero when there is no loss at all.
    pub profit_factor: Decimal,
    pub avg_profit_per_trade: Decimal,
}

impl TradeAggregates {
    pub fn net_profit(&self) -> Result<Decimal, AnalyticsError> {
        self.gross_profit
            .checked_sub(self.gross_loss)
            .ok_or_else(|| out_of_range("net profit"))
    }

    /// Net profit per unit of the worst absolute drawdown. Zero without a drawdown.
    pub fn recovery_factor(&self, max_drawdown_abs: Decimal) -> Result<Decimal, AnalyticsError> {
        if max_drawdown_abs > Decimal::ZERO {
            self.net_profit()?
                .checked_div(max_drawdown_abs)
                .ok_or_else(|| out_of_range("recovery factor"))
        } else {
            Ok(Decimal::ZERO)
        }
    }
}

pub fn aggregate_trades(trades: &[&Trade]) -> Result<TradeAggregates, AnalyticsError> {
    let mut agg = TradeAggregates {
        total_trades: trades.len(),
        ..TradeAggregates::default()
    };

    for trade in trades {
        if trade.is_winner() {
            agg.winning_trades += 1;
        }

        let pnl = trade.pnl().ok_or_else(|| out_of_range("trade P&L"))?;
        if pnl > Decimal::ZERO {
            agg.gross_profit = agg
                .gross_profit
                .checked_add(pnl)
                .ok_or_else(|| out_of_range("gross profit"))?;
        } else {
            agg.gross_loss = agg
                .gross_loss
                .checked_add(pnl.abs())
                .ok_or_else(|| out_of_range("gross loss"))?;
        }
    }

    if agg.total_trades > 0 {
        // The count is at least one, so neither quotient can grow.
        let count = Decimal::from(agg.total_trades);
        agg.win_rate_pct = Decimal::from(agg.winning_trades) / count * Decimal::ONE_HUNDRED;
        agg.avg_profit_per_trade = agg.net_profit()? / count;
    }

    // No losing trades leaves the factor at zero rather than unbounded.
    if agg.gross_loss > Decimal::ZERO {
        agg.profit_factor = agg
            .gross_profit
            .checked_div(agg.gross_loss)
            .ok_or_else(|| out_of_range("profit factor"))?;
    }

    Ok(agg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn trade(entry_price: Decimal, exit_price: Decimal, shares: Decimal) -> Trade {
        Trade {
            entry_time: Some("2024-01-01".into()),
            exit_time: "2024-01-02".into(),
            entry_price,
            exit_price,
            shares,
        }
    }

    #[test]
    fn win_rate_and_profit_factor() {
        let trades = vec![
            trade(dec!(100), dec!(105), dec!(10)), // +50
            trade(dec!(100), dec!(103), dec!(10)), // +30
            trade(dec!(100), dec!(98), dec!(10)),  // -20
            trade(dec!(100), dec!(100), dec!(10)), // 0, not a win
        ];
        let refs: Vec<&Trade> = trades.iter().collect();

        let agg = aggregate_trades(&refs).unwrap();

        assert_eq!(agg.total_trades, 4);
        assert_eq!(agg.winning_trades, 2);
        assert_eq!(agg.win_rate_pct, dec!(50));
        assert_eq!(agg.gross_profit, dec!(80));
        assert_eq!(agg.gross_loss, dec!(20));
        assert_eq!(agg.profit_factor, dec!(4));
        assert_eq!(agg.avg_profit_per_trade, dec!(15));
    }

    #[test]
    fn profit_factor_is_zero_without_losses() {
        let trades = vec![trade(dec!(10), dec!(12), dec!(1))];
        let refs: Vec<&Trade> = trades.iter().collect();

        let agg = aggregate_trades(&refs).unwrap();

        assert_eq!(agg.gross_profit, dec!(2));
        assert_eq!(agg.profit_factor, Decimal::ZERO);
    }

    #[test]
    fn empty_set_is_all_zero() {
        assert_eq!(aggregate_trades(&[]).unwrap(), TradeAggregates::default());
    }

    #[test]
    fn recovery_factor_uses_net_profit() {
        let trades = vec![trade(dec!(10), dec!(20), dec!(1)), trade(dec!(10), dec!(6), dec!(1))];
        let refs: Vec<&Trade> = trades.iter().collect();
        let agg = aggregate_trades(&refs).unwrap();

        assert_eq!(agg.recovery_factor(dec!(4)).unwrap(), dec!(1.5));
        assert_eq!(agg.recovery_factor(Decimal::ZERO).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn tiny_loss_against_huge_profit_is_an_error() {
        let trades = vec![
            trade(dec!(0), dec!(10000000000000000000), dec!(1)),
            trade(dec!(1), dec!(0.99999999999999999999), dec!(1)),
        ];
        let refs: Vec<&Trade> = trades.iter().collect();

        assert!(matches!(aggregate_trades(&refs), Err(AnalyticsError::Calculation(_))));
    }
}

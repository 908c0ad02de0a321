use analytics::StatisticsReport;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use core_types::Trade;
use database::HistoryEntry;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

/// The dashboard's statistics as a two-column table.
pub fn report_table(report: &StatisticsReport) -> Table {
    let mut table = new_table(vec!["Metric", "Value"]);
    let rows = [
        ("Total Return %", report.total_return.clone()),
        ("Benchmark %", report.benchmark.clone()),
        ("Sharpe Ratio", report.sharpe.clone()),
        ("Sortino Ratio", report.sortino.clone()),
        ("Max Drawdown %", report.max_drawdown.clone()),
        ("Recovery Factor", report.recovery_factor.clone()),
        ("Win Rate %", report.win_rate.clone()),
        ("Profit Factor", report.profit_factor.clone()),
        ("Number of Trades", report.number_of_trades.to_string()),
        ("Avg Profit / Trade", report.avg_profit_per_trade.clone()),
        ("Final Capital", report.final_capital.clone()),
    ];
    for (label, value) in rows {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(value).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn history_table(entries: &[HistoryEntry]) -> Table {
    let mut table = new_table(vec![
        "ID", "Saved", "Symbol", "Range", "Capital", "Return %", "Sharpe",
    ]);
    for entry in entries {
        table.add_row(vec![
            Cell::new(entry.id),
            Cell::new(entry.timestamp.format("%Y-%m-%d %H:%M")),
            Cell::new(&entry.symbol),
            Cell::new(&entry.date_range),
            Cell::new(entry.capital).set_alignment(CellAlignment::Right),
            Cell::new(&entry.total_return).set_alignment(CellAlignment::Right),
            Cell::new(&entry.sharpe).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn trades_table(trades: &[Trade]) -> Table {
    let mut table = new_table(vec!["#", "Entry", "Exit", "Entry Price", "Exit Price", "Shares", "P&L"]);
    for (i, trade) in trades.iter().enumerate() {
        let entry = trade.entry_time.as_ref().map(ToString::to_string).unwrap_or_default();
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(entry),
            Cell::new(&trade.exit_time),
            Cell::new(trade.entry_price).set_alignment(CellAlignment::Right),
            Cell::new(trade.exit_price).set_alignment(CellAlignment::Right),
            Cell::new(trade.shares).set_alignment(CellAlignment::Right),
            Cell::new(trade.pnl().map_or_else(|| "out of range".to_string(), |pnl| pnl.to_string()))
                .set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

//! Human-readable renderings of engine results for the terminal.

use std::fmt::Write;
use strikelab_options::models::{MatrixPoint, Trade, TradeIdea};

const HEAVY_RULE: &str = "═══════════════════════════════════════════";
const LIGHT_RULE: &str = "───────────────────────────────────────────";

fn money(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", -value)
    } else {
        format!("${:.2}", value)
    }
}

fn break_evens(trade: &Trade) -> String {
    let points = &trade.metrics().break_evens;
    if points.is_empty() {
        return "none".to_string();
    }
    points.iter().map(|p| format!("{:.2}", p)).collect::<Vec<_>>().join(", ")
}

/// Block of metrics for a single trade.
pub fn trade_summary(trade: &Trade) -> String {
    let m = trade.metrics();
    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]", trade.name, trade.sentiment);
    if !trade.description.is_empty() {
        let _ = writeln!(out, "  {}", trade.description);
    }
    if let Some(label) = &trade.expiry_label {
        let _ = writeln!(out, "  Expiry:       {}", label);
    }
    let entry = if m.is_credit() { "Net Credit:  " } else { "Net Debit:   " };
    let _ = writeln!(out, "  {} {}", entry, money(m.net_debit.abs()));
    let max_profit = if m.profit_unbounded { "Unlimited".to_string() } else { money(m.max_profit) };
    let _ = writeln!(out, "  Max Profit:   {}", max_profit);
    let _ = writeln!(out, "  Max Risk:     {}", money(m.max_risk));
    let _ = writeln!(out, "  Break-evens:  {}", break_evens(trade));
    let _ = writeln!(out, "  Return/Risk:  {:.1}%", m.return_on_risk());
    let _ = writeln!(
        out,
        "  Greeks:       Δ {:.2}  Γ {:.4}  Θ {:.2}  V {:.2}",
        m.greeks.delta, m.greeks.gamma, m.greeks.theta, m.greeks.vega
    );
    out
}

pub fn strategies_report(underlying: &str, trades: &[Trade]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", HEAVY_RULE);
    let _ = writeln!(out, "  {} strategies for {}", trades.len(), underlying);
    let _ = writeln!(out, "{}", HEAVY_RULE);
    for (i, trade) in trades.iter().enumerate() {
        if i > 0 {
            let _ = writeln!(out, "{}", LIGHT_RULE);
        }
        out.push_str(&trade_summary(trade));
    }
    let _ = writeln!(out, "{}", HEAVY_RULE);
    out
}

pub fn ideas_report(ideas: &[TradeIdea]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", HEAVY_RULE);
    for idea in ideas {
        let _ = writeln!(out, "{}  (expected ROI {})", idea.risk_profile, idea.roi);
        let _ = writeln!(out, "  {}", idea.description);
        out.push_str(&trade_summary(&idea.trade));
        let _ = writeln!(out, "{}", LIGHT_RULE);
    }
    if ideas.is_empty() {
        let _ = writeln!(out, "No trade ideas for this chain");
    }
    out
}

/// Grid with one row per date and one column per price, profits in dollars.
pub fn matrix_table(points: &[MatrixPoint]) -> String {
    let mut out = String::new();
    let Some(first) = points.first() else {
        return out;
    };
    let columns = points.iter().take_while(|p| p.date == first.date).count();

    let _ = write!(out, "{:>10}", "date");
    for point in &points[..columns] {
        let _ = write!(out, " {:>9.2}", point.price);
    }
    out.push('\n');

    for row in points.chunks(columns) {
        let _ = write!(out, "{:>10}", row[0].date.format("%Y-%m-%d").to_string());
        for point in row {
            let _ = write!(out, " {:>9.0}", point.profit);
        }
        out.push('\n');
    }
    out
}

use std::time::Duration;

use colored::Colorize;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use itertools::Itertools;

use crate::cards::{Card, StartingHand, Suit};
use crate::equity::EquityReport;

pub fn card_display(card: Card) -> String {
    let text = card.to_string();
    match card.suit() {
        Suit::Spades => text.white().bold().to_string(),
        Suit::Hearts => text.red().bold().to_string(),
        Suit::Diamonds => text.blue().bold().to_string(),
        Suit::Clubs => text.green().bold().to_string(),
    }
}

pub fn hand_display(hand: &StartingHand) -> String {
    hand.cards().iter().map(|&c| card_display(c)).join("")
}

pub fn board_display(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "(none)".dimmed().to_string();
    }
    cards.iter().map(|&c| card_display(c)).join(" ")
}

pub fn equity_bar(equity: f64, width: usize) -> String {
    let filled = ((equity.clamp(0.0, 1.0) * width as f64) as usize).min(width);
    let bar: String = "\u{2588}".repeat(filled) + &"\u{2591}".repeat(width - filled);

    if equity >= 0.6 {
        bar.green().to_string()
    } else if equity >= 0.4 {
        bar.yellow().to_string()
    } else {
        bar.red().to_string()
    }
}

/// Renders the per-hand results. `hands` must be in the report's seat order.
pub fn report_table(hands: &[StartingHand], report: &EquityReport) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Hand".bold().to_string()),
        Cell::new("Equity".bold().to_string()),
        Cell::new("").set_alignment(CellAlignment::Left),
        Cell::new("Pots won".bold().to_string()).set_alignment(CellAlignment::Right),
        Cell::new("Win %".bold().to_string()).set_alignment(CellAlignment::Right),
        Cell::new("Pots tied".bold().to_string()).set_alignment(CellAlignment::Right),
        Cell::new("Tie %".bold().to_string()).set_alignment(CellAlignment::Right),
    ]);

    for (hand, p) in hands.iter().zip(&report.players) {
        table.add_row(vec![
            Cell::new(hand_display(hand)),
            Cell::new(format!("{:.3}%", p.equity * 100.0).bold().to_string())
                .set_alignment(CellAlignment::Right),
            Cell::new(equity_bar(p.equity, 20)),
            Cell::new(p.wins).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.3}%", p.win_rate * 100.0)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.3}", p.tied_pots)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.3}%", p.tie_rate * 100.0)).set_alignment(CellAlignment::Right),
        ]);
    }

    table.to_string()
}

pub fn format_elapsed(elapsed: Duration) -> String {
    let millis = elapsed.as_secs_f64() * 1000.0;
    if millis < 1000.0 {
        format!("{:.2}ms", millis)
    } else {
        format!("{:.2}s", elapsed.as_secs_f64())
    }
}

pub fn throughput_line(iterations: u64, elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64().max(f64::EPSILON);
    format!(
        "Simulated {} hands in {} (~{:.0} hands/s)",
        iterations,
        format_elapsed(elapsed),
        iterations as f64 / secs
    )
}

pub fn print_progress(iterations: u64, target: u64) {
    let pct = (iterations as f64 / target.max(1) as f64 * 100.0).min(100.0);
    eprint!("\r  {} {:>6.2}%  ({} hands)", "Simulating".cyan().bold(), pct, iterations);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg);
}

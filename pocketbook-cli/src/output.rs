//! Output formatting utilities

use colored::{ColoredString, Colorize};
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use pocketbook_core::domain::UtilizationLevel;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Width of the text progress bars, in cells
const BAR_WIDTH: usize = 20;

pub fn success(msg: &str) {
    println!("{}", msg.green());
}

pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn money(amount: Decimal) -> String {
    format!("${:.2}", amount)
}

/// Signed amount, green for money in and red for money out
pub fn signed_money(amount: Decimal) -> ColoredString {
    if amount.is_sign_negative() {
        format!("-{}", money(amount.abs())).red()
    } else {
        format!("+{}", money(amount)).green()
    }
}

pub fn percent(value: Option<Decimal>) -> String {
    match value {
        Some(p) => format!("{:.1}%", p),
        None => "-".to_string(),
    }
}

/// Fixed-width bar for a 0..=100 value
pub fn bar(percent: Decimal) -> String {
    let filled = (percent * Decimal::from(BAR_WIDTH as u64) / Decimal::ONE_HUNDRED)
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

pub fn level_bar(percent: Decimal, level: UtilizationLevel) -> ColoredString {
    let bar = bar(percent);
    match level {
        UtilizationLevel::Healthy => bar.green(),
        UtilizationLevel::Warning => bar.yellow(),
        UtilizationLevel::Critical => bar.red(),
    }
}

/// First eight characters of an id, enough to tell rows apart
pub fn short_id(id: &uuid::Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

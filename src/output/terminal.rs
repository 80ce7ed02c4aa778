//! Terminal output utilities.
//!
//! Provides styling and column helpers for wizard screens.

use crate::models::IpAddressPool;
use colored::{ColoredString, Colorize};
use itertools::Itertools;

/// How a wizard message is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain,
    Bold,
    /// Screen titles and questions.
    Cyan,
    /// Progress.
    Green,
    /// Hints and defaults taken.
    Yellow,
    /// Rejected input and fatal states.
    Red,
}

pub fn styled(style: Style, msg: &str) -> ColoredString {
    match style {
        Style::Plain => msg.normal(),
        Style::Bold => msg.bold(),
        Style::Cyan => msg.cyan(),
        Style::Green => msg.green(),
        Style::Yellow => msg.yellow(),
        Style::Red => msg.red(),
    }
}

/// Format a value as a left-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    if value_str.len() >= width {
        value_str
    } else {
        format!("{value_str:<width$}")
    }
}

/// Lines describing one existing pool in the selection menu.
pub fn format_pool_listing(index: usize, pool: &IpAddressPool) -> Vec<String> {
    let head = format!("{index}) {} : ", pool.name);
    let pad = " ".repeat(head.len());
    let mut lines = vec![format!(
        "{head}Static/Block Subnets : {} available IPs",
        pool.available_ip_addresses
    )];

    if !pool.static_subnets.is_empty() {
        lines.push(format!("{pad}Static Subnets"));
        lines.push(format!("{pad}  -----CIDR-------------IP Ranges-----------"));
        for subnet in &pool.static_subnets {
            let ranges = subnet
                .ip_address_pool_ranges
                .iter()
                .map(|r| format!("{}-{}", r.start, r.end))
                .join(", ");
            lines.push(format!("{pad}  {} : {ranges}", format_field(subnet.cidr, 18)));
        }
    }

    if let Some(blocks) = pool.block_subnets.as_ref().filter(|b| !b.is_empty()) {
        lines.push(format!("{pad}Block Subnets"));
        lines.push(format!("{pad}  -----CIDR-------------Size----------------"));
        for block in blocks {
            lines.push(format!("{pad}  {} : {}", format_field(block.cidr, 18), block.size));
        }
    }

    lines
}

use colored::Colorize;
use std::fmt;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

fn build_label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Info => "",
        MessageKind::Success => "[ok]",
        MessageKind::Warning => "[!]",
        MessageKind::Error => "[x]",
        MessageKind::Section => "",
    }
}

pub fn style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    let base = match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        _ => {
            let label = build_label(kind);
            if label.is_empty() {
                text
            } else {
                format!("{label} {text}")
            }
        }
    };

    match kind {
        MessageKind::Success => base.bright_green().to_string(),
        MessageKind::Warning => base.bright_yellow().to_string(),
        MessageKind::Error => base.bright_red().to_string(),
        MessageKind::Section => base.bold().to_string(),
        MessageKind::Info => base,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = style(kind, message);
    match kind {
        MessageKind::Section => println!("\n{}", formatted),
        MessageKind::Error => eprintln!("{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Two-decimal amount followed by the currency code, e.g. `1234.50 ARS`.
pub fn money(amount: f64, currency: &str) -> String {
    format!("{:.2} {}", amount, currency)
}

/// Colors a signed amount green when non-negative and red otherwise.
pub fn signed_money(amount: f64, currency: &str) -> String {
    let text = money(amount, currency);
    if amount >= 0.0 {
        text.green().to_string()
    } else {
        text.red().to_string()
    }
}

pub fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_uses_two_decimals() {
        assert_eq!(money(1234.5, "ARS"), "1234.50 ARS");
        assert_eq!(percent(12.345), "12.3%");
    }

    #[test]
    fn styled_messages_keep_their_text() {
        colored::control::set_override(false);
        assert_eq!(style(MessageKind::Success, "saved"), "[ok] saved");
        assert_eq!(style(MessageKind::Section, " Budgets "), "=== Budgets ===");
        assert_eq!(style(MessageKind::Info, "plain"), "plain");
    }
}

//! Indonesian-locale display helpers used by the list views and numeric inputs.

use chrono::{DateTime, Datelike, Utc};

/// Groups thousands with `.`: `1234567` becomes `1.234.567`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Rupiah amount as `Rp 15.000,00` (with a no-break space after `Rp`).
pub fn rupiah(value: u64) -> String {
    format!("Rp\u{a0}{},00", group_thousands(value))
}

/// Reads a grouped number typed into a text input.
///
/// Separators are dropped and the leading digits are taken; anything without a
/// leading digit (empty, negative, text) reads as 0.
pub fn parse_grouped(input: &str) -> u64 {
    let cleaned: String = input.trim().chars().filter(|c| *c != '.').collect();
    let digits: String = cleaned.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Text shown in a numeric input: empty for 0, grouped otherwise.
pub fn input_text(value: u64) -> String {
    if value == 0 {
        String::new()
    } else {
        group_thousands(value)
    }
}

/// Short date as `d/m/yyyy`.
pub fn short_date(at: DateTime<Utc>) -> String {
    format!("{}/{}/{}", at.day(), at.month(), at.year())
}

/// Optional date as `d/m/yyyy`, or `-` when unset.
pub fn date_or_dash(at: Option<DateTime<Utc>>) -> String {
    at.map(short_date).unwrap_or_else(|| "-".to_string())
}

/// Lower-cased name, or `-` when unset.
pub fn name_or_dash(name: Option<&str>) -> String {
    name.map(str::to_lowercase).unwrap_or_else(|| "-".to_string())
}

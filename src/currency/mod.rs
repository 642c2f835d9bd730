//! Amount rounding and display formatting for hosts.

use serde::{Deserialize, Serialize};

/// ISO 4217 currency code, stored upper-case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn symbol(&self) -> &str {
        symbol_for(&self.0)
    }

    pub fn minor_units(&self) -> u8 {
        minor_units_for(&self.0)
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum NegativeStyle {
    #[default]
    Sign,
    Parentheses,
}

/// Separators for a language tag such as `en-US` or `de-DE`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    #[serde(default)]
    pub negative_style: NegativeStyle,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::from_tag("en-US")
    }
}

impl LocaleConfig {
    /// Unknown tags fall back to `.` decimals with `,` grouping.
    pub fn from_tag(tag: &str) -> Self {
        let language = tag.split(['-', '_']).next().unwrap_or_default();
        let (decimal_separator, grouping_separator) = match language.to_ascii_lowercase().as_str() {
            "de" | "es" | "it" | "nl" | "pt" => (',', '.'),
            "fr" => (',', ' '),
            _ => ('.', ','),
        };
        Self {
            language_tag: tag.to_string(),
            decimal_separator,
            grouping_separator,
            negative_style: NegativeStyle::Sign,
        }
    }
}

pub fn symbol_for(code: &str) -> &str {
    match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "AUD" => "A$",
        _ => code,
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

/// Rounds half away from zero to whole cents.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn format_number(locale: &LocaleConfig, value: f64, precision: u8) -> String {
    let body = format!("{:.*}", precision as usize, value.abs());
    let (int_part, fraction) = match body.split_once('.') {
        Some((int_part, fraction)) => (int_part, Some(fraction)),
        None => (body.as_str(), None),
    };
    let mut rendered = group_digits(int_part, locale.grouping_separator);
    if let Some(fraction) = fraction {
        rendered.push(locale.decimal_separator);
        rendered.push_str(fraction);
    }
    if value < 0.0 && rendered.chars().any(|ch| ch.is_ascii_digit() && ch != '0') {
        rendered.insert(0, '-');
    }
    rendered
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index != 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Renders `amount` with the currency symbol, e.g. `$1,234.50` or `-$12.00`.
pub fn format_currency_value(amount: f64, code: &CurrencyCode, locale: &LocaleConfig) -> String {
    let body = format_number(locale, amount.abs(), code.minor_units());
    let symbol = code.symbol();
    let negative = amount < 0.0 && body.chars().any(|ch| ch.is_ascii_digit() && ch != '0');
    match (negative, locale.negative_style) {
        (false, _) => format!("{symbol}{body}"),
        (true, NegativeStyle::Sign) => format!("-{symbol}{body}"),
        (true, NegativeStyle::Parentheses) => format!("({symbol}{body})"),
    }
}

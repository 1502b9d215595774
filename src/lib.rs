#![deny(rust_2018_idioms)]

use std::borrow::Cow;

pub mod header;

pub mod store;

pub mod vendor;
pub use vendor::Vendor;

pub mod period;

pub mod fees;

pub mod ingest;
pub use ingest::function::ingest;

pub mod summarize;
pub use summarize::summarize;

pub mod reconcile;
pub use reconcile::function::reconcile;

pub mod report;

/// Characters dropped from amounts before parsing them, in addition to whitespace.
const NUMBER_NOISE: &[char] = &[',', '$', '€', '£', '¥'];

/// A cell value that can be turned into an amount with [`clean_number()`].
pub trait Amount {
    /// Return the value itself if it is numeric already, or the text to parse it from.
    fn number_or_text(&self) -> Result<f64, Cow<'_, str>>;
}

impl Amount for f64 {
    fn number_or_text(&self) -> Result<f64, Cow<'_, str>> {
        Ok(*self)
    }
}

impl Amount for str {
    fn number_or_text(&self) -> Result<f64, Cow<'_, str>> {
        Err(Cow::Borrowed(self))
    }
}

impl Amount for String {
    fn number_or_text(&self) -> Result<f64, Cow<'_, str>> {
        Err(Cow::Borrowed(self.as_str()))
    }
}

impl Amount for [u8] {
    fn number_or_text(&self) -> Result<f64, Cow<'_, str>> {
        Err(String::from_utf8_lossy(self))
    }
}

/// Turn amounts as they appear in delivery platform exports, like `$1,234.56` or ` 12.5 `, into numbers.
///
/// This never fails: empty and malformed values are `0.0`, and so are values that parse to infinity or NaN.
/// Values wrapped in parentheses, the accounting notation for negatives, are negated, so `($12.50)` is `-12.5`.
pub fn clean_number(value: &(impl Amount + ?Sized)) -> f64 {
    let text = match value.number_or_text() {
        Ok(number) => return number,
        Err(text) => text,
    };
    let text = text.trim();
    let (negate, text) = match text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, text),
    };
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && !NUMBER_NOISE.contains(c))
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }
    match cleaned.parse::<f64>() {
        Ok(number) if number.is_finite() => {
            if negate {
                -number
            } else {
                number
            }
        }
        _ => 0.0,
    }
}

/// Format `value` as US dollars with thousands separators and two decimals, like `-$1,234.50`.
pub fn format_currency(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let digits = (cents / 100).to_string();
    let mut dollars = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, digit) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            dollars.push(',');
        }
        dollars.push(digit);
    }
    let sign = if value < 0.0 && cents != 0 { "-" } else { "" };
    format!("{sign}${dollars}.{:02}", cents % 100)
}

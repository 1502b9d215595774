//! Calendar months to restrict exports to, and the date notations found in exports.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Period '{0}' must be a month in the form YYYY-MM")]
    Invalid(String),
}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub year: i32,
    pub month: time::Month,
}

impl Period {
    pub fn contains(&self, date: time::Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::Invalid(s.to_owned());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 {
            return Err(invalid());
        }
        let year = year.parse().map_err(|_| invalid())?;
        let month = month
            .parse::<u8>()
            .ok()
            .and_then(|month| time::Month::try_from(month).ok())
            .ok_or_else(invalid)?;
        Ok(Period { year, month })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, u8::from(self.month))
    }
}

/// Parse the date of a transaction as written by the vendors, either `1/31/2025` or `2025-01-31`.
///
/// A time of day following the date is ignored.
pub fn parse_date(text: &str) -> Option<time::Date> {
    static US: &[time::format_description::FormatItem<'static>] =
        time::macros::format_description!("[month padding:none]/[day padding:none]/[year]");
    static ISO: &[time::format_description::FormatItem<'static>] =
        time::macros::format_description!("[year]-[month]-[day]");
    let date = text
        .trim()
        .split(|c: char| c.is_whitespace() || c == 'T')
        .next()?;
    [US, ISO]
        .into_iter()
        .find_map(|format| time::Date::parse(date, format).ok())
}

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar month, stored with a zero-based month index (0 = January).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthPeriod {
    pub year: i32,
    pub month: u32,
}

impl MonthPeriod {
    /// Builds a period from a zero-based month and a full year. Returns `None`
    /// when `month` is outside `0..=11`.
    pub fn new(month: u32, year: i32) -> Option<Self> {
        if month > 11 {
            return None;
        }
        Some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month0(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month0() == self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.year, self.month + 1)
    }

    /// Returns the date for `day` in this month, clamped to the month's last day.
    pub fn day_clamped(&self, day: u32) -> NaiveDate {
        let day = day.clamp(1, self.days_in_month());
        NaiveDate::from_ymd_opt(self.year, self.month + 1, day).unwrap_or_else(|| self.first_day())
    }

    /// Moves the period by `months`, which may be negative.
    pub fn shift(&self, months: i32) -> Self {
        let index = self.year * 12 + self.month as i32 + months;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32,
        }
    }

    /// Parses `YYYY-MM` (one-based month, as typed by users).
    pub fn parse(raw: &str) -> Option<Self> {
        let (year, month) = raw.trim().split_once('-')?;
        let year: i32 = year.parse().ok()?;
        let month: u32 = month.parse().ok()?;
        if !(1..=12).contains(&month) {
            return None;
        }
        Self::new(month - 1, year)
    }
}

impl fmt::Display for MonthPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month + 1)
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    match NaiveDate::from_ymd_opt(next_year, next_month, 1) {
        Some(first_next) => (first_next - Duration::days(1)).day(),
        None => 28,
    }
}

/// Serde helpers for calendar dates persisted either as `YYYY-MM-DD` or as a
/// full RFC 3339 timestamp. Always written back as `YYYY-MM-DD`.
pub mod flexible_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, FORMAT) {
            return Some(date);
        }
        if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
            return Some(stamp.date_naive());
        }
        raw.get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, FORMAT).ok())
    }

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("unparseable date `{raw}`")))
    }

    pub mod option {
        use chrono::NaiveDate;
        use serde::{de::Error, Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match date {
                Some(date) => super::serialize(date, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            match raw {
                None => Ok(None),
                Some(value) if value.trim().is_empty() => Ok(None),
                Some(value) => super::parse(&value)
                    .map(Some)
                    .ok_or_else(|| D::Error::custom(format!("unparseable date `{value}`"))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn shift_crosses_year_boundaries() {
        let january = MonthPeriod::new(0, 2024).unwrap();
        assert_eq!(january.shift(-1), MonthPeriod::new(11, 2023).unwrap());
        assert_eq!(january.shift(13), MonthPeriod::new(1, 2025).unwrap());
        assert_eq!(january.shift(-25), MonthPeriod::new(11, 2021).unwrap());
    }

    #[test]
    fn day_clamped_respects_month_length() {
        let february = MonthPeriod::new(1, 2024).unwrap();
        assert_eq!(february.day_clamped(31), date(2024, 2, 29));
        let april = MonthPeriod::new(3, 2023).unwrap();
        assert_eq!(april.day_clamped(31), date(2023, 4, 30));
        assert_eq!(april.day_clamped(0), date(2023, 4, 1));
    }

    #[test]
    fn parse_reads_one_based_months() {
        let period = MonthPeriod::parse("2024-06").unwrap();
        assert_eq!(period.month, 5);
        assert_eq!(period.to_string(), "2024-06");
        assert!(MonthPeriod::parse("2024-13").is_none());
        assert!(MonthPeriod::parse("june").is_none());
    }

    #[test]
    fn flexible_date_accepts_timestamps() {
        assert_eq!(
            flexible_date::parse("2024-06-01T03:00:00.000Z"),
            Some(date(2024, 6, 1))
        );
        assert_eq!(flexible_date::parse("2024-06-01"), Some(date(2024, 6, 1)));
        assert_eq!(flexible_date::parse("yesterday"), None);
    }
}

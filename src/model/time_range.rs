// File: ./src/model/time_range.rs
//! Date ranges as written in the event tables ("12.04.2025", "12.-13.04.2025", ...).
use anyhow::{Result, anyhow, bail};
use chrono::{Datelike, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static RE_WEEKDAY_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{2,3}\.?,?\s+").expect("valid regex"));
static RE_SINGLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})\.(\d{1,2})\.(\d{4})$").expect("valid regex"));
static RE_FULL_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})\.(\d{1,2})\.(\d{4})\s*-\s*(\d{1,2})\.(\d{1,2})\.(\d{4})$")
        .expect("valid regex")
});
static RE_MONTH_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})\.(\d{1,2})\.\s*-\s*(\d{1,2})\.(\d{1,2})\.(\d{4})$").expect("valid regex")
});
static RE_DAY_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})\.\s*-\s*(\d{1,2})\.(\d{1,2})\.(\d{4})$").expect("valid regex")
});
static RE_ISO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid regex"));

const MONTHS: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

/// German month name, `month` is 1-based.
pub fn month_str(month: u32) -> &'static str {
    MONTHS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

pub fn weekday_str(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mo.",
        Weekday::Tue => "Di.",
        Weekday::Wed => "Mi.",
        Weekday::Thu => "Do.",
        Weekday::Fri => "Fr.",
        Weekday::Sat => "Sa.",
        Weekday::Sun => "So.",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub original: String,
    pub formatted: String,
}

fn date(d: &str, m: &str, y: &str) -> Result<NaiveDate> {
    let (d, m, y) = (d.parse::<u32>()?, m.parse::<u32>()?, y.parse::<i32>()?);
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| anyhow!("invalid date {d:02}.{m:02}.{y}"))
}

fn format_date(d: NaiveDate) -> String {
    format!("{} {}", weekday_str(d.weekday()), d.format("%d.%m.%Y"))
}

/// Parses a single date (`dd.mm.yyyy` or `yyyy-mm-dd`).
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if let Some(c) = RE_SINGLE.captures(s) {
        return date(&c[1], &c[2], &c[3]);
    }
    if let Some(c) = RE_ISO.captures(s) {
        return date(&c[3], &c[2], &c[1]);
    }
    bail!("cannot parse date '{s}'")
}

impl TimeRange {
    pub fn single(d: NaiveDate) -> Self {
        Self::range(d, d)
    }

    pub fn range(from: NaiveDate, to: NaiveDate) -> Self {
        let formatted = if from == to {
            format_date(from)
        } else {
            format!("{} - {}", format_date(from), format_date(to))
        };
        Self {
            from: Some(from),
            to: Some(to),
            original: formatted.clone(),
            formatted,
        }
    }

    /// Parses the table text. On failure the returned error carries an unset
    /// range that still remembers the original text.
    pub fn parse(text: &str) -> std::result::Result<Self, (Self, anyhow::Error)> {
        let unset = Self {
            original: text.to_string(),
            ..Self::default()
        };
        match Self::parse_dates(text) {
            Ok((from, to)) => {
                let mut r = Self::range(from, to);
                r.original = text.to_string();
                Ok(r)
            }
            Err(e) => Err((unset, e)),
        }
    }

    fn parse_dates(text: &str) -> Result<(NaiveDate, NaiveDate)> {
        let s = text.trim();
        if s.is_empty() {
            bail!("empty date");
        }
        let stripped = RE_WEEKDAY_PREFIX.replace(s, "");
        let s: &str = &stripped;

        let (from, to) = if let Ok(d) = parse_date(s) {
            (d, d)
        } else if let Some(c) = RE_FULL_RANGE.captures(s) {
            (date(&c[1], &c[2], &c[3])?, date(&c[4], &c[5], &c[6])?)
        } else if let Some(c) = RE_MONTH_RANGE.captures(s) {
            (date(&c[1], &c[2], &c[5])?, date(&c[3], &c[4], &c[5])?)
        } else if let Some(c) = RE_DAY_RANGE.captures(s) {
            (date(&c[1], &c[3], &c[4])?, date(&c[2], &c[3], &c[4])?)
        } else {
            bail!("cannot parse date '{text}'");
        };

        if to < from {
            bail!("date range '{text}' ends before it starts");
        }
        Ok((from, to))
    }

    pub fn is_zero(&self) -> bool {
        self.from.is_none()
    }

    /// Start strictly before `d`. Unset ranges are never before anything.
    pub fn is_before(&self, d: NaiveDate) -> bool {
        self.from.is_some_and(|from| from < d)
    }

    pub fn is_before_range(&self, other: &TimeRange) -> bool {
        match (self.from, other.from) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }

    pub fn year(&self) -> Option<i32> {
        self.from.map(|d| d.year())
    }
}

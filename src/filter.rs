// src/filter.rs
//! Release-date filtering for lookup results

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use tracing::{debug, warn};

/// Cutoff below which records are left out of a report
///
/// Built once from the `--filter-date` argument. A threshold that was
/// supplied but could not be parsed keeps `is_supplied()` true but filters
/// nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateThreshold {
    cutoff: Option<DateTime<Utc>>,
    supplied: bool,
}

impl DateThreshold {
    /// Threshold that never excludes anything
    pub fn none() -> Self {
        Self::default()
    }

    /// Build a threshold from the raw command-line value
    pub fn from_arg(arg: Option<&str>) -> Self {
        Self::from_arg_at(arg, Utc::now())
    }

    /// Build a threshold resolving relative dates against `now`
    pub fn from_arg_at(arg: Option<&str>, now: DateTime<Utc>) -> Self {
        let raw = match arg.map(str::trim) {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Self::none(),
        };

        match parse_date(raw, now) {
            Ok(cutoff) => {
                debug!("Filtering out records released before {}", cutoff.to_rfc3339());
                Self {
                    cutoff: Some(cutoff),
                    supplied: true,
                }
            }
            Err(e) => {
                warn!("Failed to parse filter date '{}': {:#}. Not filtering results.", raw, e);
                Self {
                    cutoff: None,
                    supplied: true,
                }
            }
        }
    }

    /// Build a threshold from an already resolved instant
    pub fn at(cutoff: DateTime<Utc>) -> Self {
        Self {
            cutoff: Some(cutoff),
            supplied: true,
        }
    }

    /// Whether the user asked for filtering at all
    pub fn is_supplied(&self) -> bool {
        self.supplied
    }

    /// The resolved cutoff, if filtering is active
    pub fn cutoff(&self) -> Option<DateTime<Utc>> {
        self.cutoff
    }

    /// Decide whether a record released at `timestamp` belongs in the report
    ///
    /// Records are kept unless their RFC 3339 timestamp is strictly before
    /// the cutoff. A timestamp that does not parse keeps the record.
    pub fn includes(&self, timestamp: &str) -> bool {
        let Some(cutoff) = self.cutoff else {
            return true;
        };

        match DateTime::parse_from_rfc3339(timestamp.trim()) {
            Ok(released) => released.with_timezone(&Utc) >= cutoff,
            Err(e) => {
                warn!("Failed to parse release time '{}': {}. Keeping record.", timestamp, e);
                true
            }
        }
    }
}

/// Parse a loosely formatted date into a UTC instant
///
/// Accepts RFC 3339, partial dates such as `2021`, `2021-3` or
/// `2021/03/04 15:30`, the words `now`, `today` and `yesterday`, and
/// phrases like `3 weeks ago`. Times without a zone are taken as UTC.
pub fn parse_date(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    match lower.as_str() {
        "" => anyhow::bail!("empty date"),
        "now" => return Ok(now),
        "today" => return Ok(start_of_day(now)),
        "yesterday" => return Ok(start_of_day(now) - Duration::days(1)),
        _ => {}
    }

    if lower.ends_with(" ago") {
        return parse_relative(&lower, now);
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(datetime.with_timezone(&Utc));
    }

    parse_partial(trimmed).map(|naive| Utc.from_utc_datetime(&naive))
}

fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::MIN))
}

/// `<n> <unit>[s] ago`
fn parse_relative(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let [amount, unit, "ago"] = parts[..] else {
        anyhow::bail!("expected '<number> <unit> ago', got '{}'", input);
    };

    let amount: u32 = amount
        .parse()
        .with_context(|| format!("invalid amount '{}'", amount))?;
    let unit = unit.strip_suffix('s').unwrap_or(unit);
    let span = i64::from(amount);

    let resolved = match unit {
        "minute" | "min" => now.checked_sub_signed(Duration::minutes(span)),
        "hour" => now.checked_sub_signed(Duration::hours(span)),
        "day" => now.checked_sub_signed(Duration::days(span)),
        "week" => now.checked_sub_signed(Duration::weeks(span)),
        "month" => now.checked_sub_months(Months::new(amount)),
        "year" => amount
            .checked_mul(12)
            .and_then(|months| now.checked_sub_months(Months::new(months))),
        other => anyhow::bail!("unknown time unit '{}'", other),
    };

    resolved.context("relative date out of range")
}

/// `Y[-M[-D]][ H[:M[:S]]]`, with `/` accepted for `-` and `T` for the space
fn parse_partial(input: &str) -> Result<NaiveDateTime> {
    let normalized = input.replace('/', "-");
    let (date_part, time_part) = match normalized.split_once([' ', 'T']) {
        Some((date, time)) => (date, Some(time.trim())),
        None => (normalized.as_str(), None),
    };

    let date_fields = parse_fields(date_part, '-', 3)
        .with_context(|| format!("unrecognised date '{}'", input))?;
    let year = i32::try_from(date_fields[0]).context("year out of range")?;
    let month = date_fields.get(1).copied().unwrap_or(1);
    let day = date_fields.get(2).copied().unwrap_or(1);

    let date = NaiveDate::from_ymd_opt(year, month, day)
        .with_context(|| format!("no such date '{}'", input))?;

    let time = match time_part {
        Some(time) => {
            let fields = parse_fields(time, ':', 3)
                .with_context(|| format!("unrecognised time in '{}'", input))?;
            NaiveTime::from_hms_opt(
                fields[0],
                fields.get(1).copied().unwrap_or(0),
                fields.get(2).copied().unwrap_or(0),
            )
            .with_context(|| format!("no such time in '{}'", input))?
        }
        None => NaiveTime::MIN,
    };

    Ok(date.and_time(time))
}

fn parse_fields(input: &str, separator: char, max: usize) -> Option<Vec<u32>> {
    let fields: Vec<u32> = input
        .split(separator)
        .map(|field| {
            if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
                None
            } else {
                field.parse().ok()
            }
        })
        .collect::<Option<_>>()?;

    if fields.is_empty() || fields.len() > max {
        return None;
    }

    Some(fields)
}

//! Cleanup schedule expressions.
//!
//! Supported forms:
//! - `HH:MM` / `HH:MM:SS`: daily at that UTC time of day
//! - `@daily`, `@midnight`: daily at 00:00 UTC
//! - `@hourly`: every hour on the hour
//! - `@every <N><s|m|h|d>`: fixed interval, e.g. `@every 6h`
//! - daily cron forms `S M H * * ?` and `M H * * *` (day fields must be wildcards)

use crate::common::error::{CommonError, CommonResult};
use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc};
use std::fmt;
use std::str::FromStr;

/// Default schedule: daily at midnight UTC.
pub const DEFAULT_CLEANUP_SCHEDULE: &str = "00:00";

/// When the retention cleanup fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupSchedule {
    /// Once a day at the given UTC time.
    DailyAt(NaiveTime),
    /// At minute zero of every hour.
    Hourly,
    /// Fixed interval measured from the previous fire.
    Every(Duration),
}

impl CleanupSchedule {
    /// Parse a schedule expression.
    pub fn parse(expr: &str) -> CommonResult<Self> {
        let expr = expr.trim();
        let invalid = |reason: &str| {
            CommonError::Config(format!("invalid cleanup schedule '{}': {}", expr, reason))
        };

        match expr {
            "" => return Err(invalid("empty expression")),
            "@daily" | "@midnight" => return Ok(Self::DailyAt(NaiveTime::MIN)),
            "@hourly" => return Ok(Self::Hourly),
            _ => {}
        }

        if let Some(interval) = expr.strip_prefix("@every") {
            return parse_interval(interval.trim())
                .map(Self::Every)
                .ok_or_else(|| invalid("expected @every <N><s|m|h|d> with N > 0"));
        }

        if expr.contains(' ') {
            return parse_daily_cron(expr)
                .map(Self::DailyAt)
                .ok_or_else(|| invalid("only daily cron expressions are supported"));
        }

        NaiveTime::parse_from_str(expr, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(expr, "%H:%M"))
            .map(Self::DailyAt)
            .map_err(|_| invalid("expected HH:MM or HH:MM:SS"))
    }

    /// Next fire time strictly after `now`.
    ///
    /// Saturates at `DateTime::<Utc>::MAX_UTC` when the result is out of range.
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let next = match *self {
            Self::DailyAt(time) => {
                let today = now.date_naive().and_time(time).and_utc();
                if today > now {
                    Some(today)
                } else {
                    today.checked_add_signed(Duration::days(1))
                }
            }
            Self::Hourly => {
                let hour_start = now
                    .date_naive()
                    .and_hms_opt(now.hour(), 0, 0)
                    .map(|naive| naive.and_utc())
                    .unwrap_or(now);
                hour_start.checked_add_signed(Duration::hours(1))
            }
            Self::Every(interval) => now.checked_add_signed(interval),
        };
        next.unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl Default for CleanupSchedule {
    fn default() -> Self {
        Self::DailyAt(NaiveTime::MIN)
    }
}

impl FromStr for CleanupSchedule {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CleanupSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DailyAt(time) => write!(f, "daily at {} UTC", time.format("%H:%M:%S")),
            Self::Hourly => f.write_str("hourly"),
            Self::Every(interval) => write!(f, "every {}s", interval.num_seconds()),
        }
    }
}

fn parse_interval(value: &str) -> Option<Duration> {
    let split = value.len().checked_sub(1)?;
    if !value.is_char_boundary(split) {
        return None;
    }
    let (amount, unit) = value.split_at(split);
    let amount: i64 = amount.trim().parse().ok().filter(|n| *n > 0)?;
    match unit {
        "s" => Duration::try_seconds(amount),
        "m" => Duration::try_minutes(amount),
        "h" => Duration::try_hours(amount),
        "d" => Duration::try_days(amount),
        _ => None,
    }
}

/// `S M H * * ?` (6 fields) or `M H * * *` (5 fields)
fn parse_daily_cron(expr: &str) -> Option<NaiveTime> {
    let fields: Vec<&str> = expr.split_whitespace().collect();
    let (second, minute, hour, days) = match fields.as_slice() {
        [s, m, h, rest @ ..] if rest.len() == 3 => (*s, *m, *h, rest),
        [m, h, rest @ ..] if rest.len() == 3 => ("0", *m, *h, rest),
        _ => return None,
    };
    if !days.iter().all(|f| matches!(*f, "*" | "?")) {
        return None;
    }
    NaiveTime::from_hms_opt(hour.parse().ok()?, minute.parse().ok()?, second.parse().ok()?)
}

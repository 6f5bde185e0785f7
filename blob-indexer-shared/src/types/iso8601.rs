//! ISO-8601 durations (`P1D`, `PT2H30M`) as used by indexer schedules.
//!
//! Only day, hour, minute and second components are supported; the service
//! never emits years, months or weeks for schedule intervals.

use std::time::Duration;

use serde::{de, Deserialize, Deserializer, Serializer};

const SECS_PER_DAY: u64 = 86_400;
const SECS_PER_HOUR: u64 = 3_600;
const SECS_PER_MINUTE: u64 = 60;

/// Format a duration with whole-second precision.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let days = total / SECS_PER_DAY;
    let hours = (total % SECS_PER_DAY) / SECS_PER_HOUR;
    let minutes = (total % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = total % SECS_PER_MINUTE;

    let mut out = String::from("P");
    if days > 0 {
        out.push_str(&format!("{days}D"));
    }
    if hours > 0 || minutes > 0 || seconds > 0 || days == 0 {
        out.push('T');
        if hours > 0 {
            out.push_str(&format!("{hours}H"));
        }
        if minutes > 0 {
            out.push_str(&format!("{minutes}M"));
        }
        if seconds > 0 || total == 0 {
            out.push_str(&format!("{seconds}S"));
        }
    }
    out
}

/// Parse a duration of the form `P[nD][T[nH][nM][nS]]`.
pub fn parse_duration(value: &str) -> Option<Duration> {
    let rest = value.strip_prefix('P')?;
    let (date, time) = match rest.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };
    if date.is_empty() && time.is_none() {
        return None;
    }

    let mut secs = 0u64;
    if !date.is_empty() {
        let days: u64 = date.strip_suffix('D')?.parse().ok()?;
        secs = secs.checked_add(days.checked_mul(SECS_PER_DAY)?)?;
    }

    if let Some(time) = time {
        if time.is_empty() {
            return None;
        }
        let mut number = String::new();
        // Units must appear at most once, in H, M, S order.
        let mut last_unit = u64::MAX;
        for c in time.chars() {
            let unit = match c {
                '0'..='9' => {
                    number.push(c);
                    continue;
                }
                'H' => SECS_PER_HOUR,
                'M' => SECS_PER_MINUTE,
                'S' => 1,
                _ => return None,
            };
            if unit >= last_unit {
                return None;
            }
            last_unit = unit;
            let n: u64 = number.parse().ok()?;
            number.clear();
            secs = secs.checked_add(n.checked_mul(unit)?)?;
        }
        if !number.is_empty() {
            return None;
        }
    }

    Some(Duration::from_secs(secs))
}

/// `#[serde(with = "iso8601")]` support for `Duration` fields.
pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_duration(*duration))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_duration(&raw)
        .ok_or_else(|| de::Error::custom(format!("invalid ISO-8601 duration: {raw}")))
}

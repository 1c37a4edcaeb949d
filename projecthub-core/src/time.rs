//! Time utilities: due-date parsing, day arithmetic and local display.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// Parse a stored due date: RFC 3339, or a bare `YYYY-MM-DD` taken as midnight UTC.
pub fn parse_due_date(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ndt.and_utc());
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid due date '{raw}': {e}"))?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

/// Parse a wall-clock time like "2026-02-20 23:59" in an IANA tz like "America/Chicago",
/// returning UTC.
pub fn parse_local_to_utc(local: &str, tz: Tz) -> Result<DateTime<Utc>> {
    let ndt = NaiveDateTime::parse_from_str(local, "%Y-%m-%d %H:%M")
        .map_err(|e| anyhow::anyhow!("invalid local datetime '{local}': {e}"))?;

    let local_dt = tz
        .from_local_datetime(&ndt)
        .single()
        .ok_or_else(|| anyhow::anyhow!("ambiguous or invalid local time (DST?): {local} {tz}"))?;

    Ok(local_dt.with_timezone(&Utc))
}

/// Accepts RFC 3339 or the local "YYYY-MM-DD HH:MM" form.
pub fn parse_instant(raw: &str, tz: Tz) -> Result<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(_) => parse_local_to_utc(raw.trim(), tz),
    }
}

/// Whole days until a deadline, rounded up: 1ms left counts as 1 day,
/// 1.5 days overdue counts as -1.
pub fn ceil_days(until: TimeDelta) -> i64 {
    let ms = until.num_milliseconds();
    -(-ms).div_euclid(MS_PER_DAY)
}

/// Short numeric date (`M/D/YYYY`) as seen from `tz`.
pub fn format_local_date(dt: DateTime<Utc>, tz: Tz) -> String {
    dt.with_timezone(&tz).format("%-m/%-d/%Y").to_string()
}

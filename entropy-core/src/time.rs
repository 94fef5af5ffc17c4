//! Time utilities: timezone-aware "now" overrides and display.

use anyhow::Result;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// Parse a local time like "2026-02-20 23:59" in an IANA tz like "America/Chicago",
/// returning UTC.
pub fn parse_local_to_utc(local: &str, tz: &str) -> Result<DateTime<Utc>> {
    let tz = parse_timezone(tz)?;

    let ndt = NaiveDateTime::parse_from_str(local.trim(), "%Y-%m-%d %H:%M")
        .map_err(|e| anyhow::anyhow!("invalid local datetime '{local}': {e}"))?;

    let local_dt = tz
        .from_local_datetime(&ndt)
        .single()
        .ok_or_else(|| anyhow::anyhow!("ambiguous or invalid local time (DST?): {local} {tz}"))?;

    Ok(local_dt.with_timezone(&Utc))
}

/// Format a UTC instant for humans in the given zone, e.g. "Tue 03 Mar 14:05".
pub fn format_local(dt: DateTime<Utc>, tz: Tz) -> String {
    dt.with_timezone(&tz).format("%a %d %b %H:%M").to_string()
}

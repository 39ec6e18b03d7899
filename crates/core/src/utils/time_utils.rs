use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parses a server timestamp.
///
/// The API emits RFC 3339 strings, naive ISO datetimes (assumed UTC) or
/// plain dates depending on the endpoint.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Human "time ago" label relative to `now`.
pub fn time_ago(instant: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - instant).num_seconds();
    if seconds < 45 {
        return "less than a minute ago".to_string();
    }
    let minutes = (seconds + 30) / 60;
    if minutes < 60 {
        return plural(minutes, "minute");
    }
    let hours = (minutes + 30) / 60;
    if hours < 24 {
        return plural(hours, "hour");
    }
    let days = (hours + 12) / 24;
    if days < 30 {
        return plural(days, "day");
    }
    let months = days / 30;
    if months < 12 {
        return plural(months, "month");
    }
    plural(months / 12, "year")
}

/// `time_ago` for a raw server string; unparseable input is returned as-is.
pub fn display_time_ago(raw: &str, now: DateTime<Utc>) -> String {
    parse_timestamp(raw)
        .map(|instant| time_ago(instant, now))
        .unwrap_or_else(|| raw.to_string())
}

/// Calendar date part of a server timestamp, for tables.
pub fn display_date(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|instant| instant.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn plural(value: i64, unit: &str) -> String {
    if value == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", value, unit)
    }
}

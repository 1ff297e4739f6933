//! Display formatting for upstream video fields

use chrono::{DateTime, Utc};

use crate::constants::UNKNOWN_DURATION;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Format an ISO-8601 duration token (`PT1H2M3S`) as `H:MM:SS` or `MM:SS`.
///
/// A leading day component (`P1DT2H`) is folded into the hours. Tokens that
/// do not parse render as `00:00`.
pub fn format_duration(token: &str) -> String {
    match parse_iso8601_duration(token) {
        Some((hours, minutes, seconds)) if hours > 0 => {
            format!("{}:{:02}:{:02}", hours, minutes, seconds)
        }
        Some((_, minutes, seconds)) => format!("{:02}:{:02}", minutes, seconds),
        None => UNKNOWN_DURATION.to_string(),
    }
}

/// Parse `P[nD][T[nH][nM][nS]]` into (hours, minutes, seconds).
///
/// Components are reported as given; `PT90M` yields 90 minutes.
fn parse_iso8601_duration(token: &str) -> Option<(u64, u64, u64)> {
    let rest = token.trim().strip_prefix('P')?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    let mut hours = 0u64;
    let mut minutes = 0u64;
    let mut seconds = 0u64;
    let mut saw_component = false;

    for (value, unit) in components(date_part)? {
        match unit {
            'D' => hours = hours.checked_add(value.checked_mul(24)?)?,
            // weeks/months/years never appear in video durations
            _ => return None,
        }
        saw_component = true;
    }

    if let Some(time_part) = time_part {
        if time_part.is_empty() {
            return None;
        }
        for (value, unit) in components(time_part)? {
            match unit {
                'H' => hours = hours.checked_add(value)?,
                'M' => minutes = value,
                'S' => seconds = value,
                _ => return None,
            }
            saw_component = true;
        }
    }

    saw_component.then_some((hours, minutes, seconds))
}

/// Split `1H2M3S` into [(1, 'H'), (2, 'M'), (3, 'S')].
fn components(part: &str) -> Option<Vec<(u64, char)>> {
    let mut out = Vec::new();
    let mut digits = String::new();

    for ch in part.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
        } else {
            if digits.is_empty() {
                return None;
            }
            out.push((digits.parse().ok()?, ch));
            digits.clear();
        }
    }

    // trailing digits without a unit
    if !digits.is_empty() {
        return None;
    }

    Some(out)
}

/// Format a view count with a K/M suffix and one decimal.
/// Ties round up, so 1,250 is `1.3K`.
pub fn format_views(count: u64) -> String {
    if count >= 1_000_000 {
        with_one_decimal(count, 1_000_000, 'M')
    } else if count >= 1_000 {
        with_one_decimal(count, 1_000, 'K')
    } else {
        count.to_string()
    }
}

fn with_one_decimal(count: u64, unit: u64, suffix: char) -> String {
    let step = unit / 10;
    let tenths = count.saturating_add(step / 2) / step;
    format!("{}.{}{}", tenths / 10, tenths % 10, suffix)
}

/// Format the raw upstream view count string. Hidden or malformed
/// statistics render as `0`.
pub fn format_view_count(raw: Option<&str>) -> String {
    let count = raw
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(0);
    format_views(count)
}

/// Coarse relative bucket for `published` as seen from `now`.
pub fn format_relative(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = (now - published).num_seconds().abs();
    // partial days round up
    let days = (elapsed + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY;

    match days {
        0 => "today".to_string(),
        1 => "yesterday".to_string(),
        d if d < 7 => format!("{} days ago", d),
        d if d < 30 => plural(d / 7, "week"),
        d if d < 365 => plural(d / 30, "month"),
        d => plural(d / 365, "year"),
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

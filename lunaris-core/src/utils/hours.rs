//! Clock-time arithmetic for time-tracking exports

/// Minutes since midnight for an `HH:MM` string.
///
/// Seconds (`HH:MM:SS`) must be valid and are then ignored.
pub fn parse_clock(raw: &str) -> Option<i64> {
    let mut parts = raw.trim().split(':');
    let hours: i64 = parts.next()?.parse().ok()?;
    let minutes: i64 = parts.next()?.parse().ok()?;
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return None;
    }
    if let Some(seconds) = parts.next() {
        let seconds: i64 = seconds.parse().ok()?;
        if !(0..60).contains(&seconds) || parts.next().is_some() {
            return None;
        }
    }
    Some(hours * 60 + minutes)
}

/// Decimal hours between `entry` and `exit`, formatted with two decimals.
///
/// Returns `None` when either side is missing or unparseable. Spans where
/// exit precedes entry come out negative.
#[allow(clippy::cast_precision_loss)]
pub fn decimal_hours(entry: Option<&str>, exit: Option<&str>) -> Option<String> {
    let entry = parse_clock(entry?)?;
    let exit = parse_clock(exit?)?;
    Some(format!("{:.2}", (exit - entry) as f64 / 60.0))
}

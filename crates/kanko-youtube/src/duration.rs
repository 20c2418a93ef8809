//! ISO-8601 duration parsing for the `contentDetails.duration` field.

/// Parses an ISO-8601 duration of the form `P[nD]T[nH][nM][nS]` into
/// seconds. Fractional seconds are accepted. Returns `None` for anything
/// that does not match that shape (week designators and date components
/// beyond days never occur in video durations).
#[must_use]
pub fn parse_iso8601_duration(raw: &str) -> Option<f64> {
    let rest = raw.strip_prefix('P')?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((d, t)) => (d, t),
        None => (rest, ""),
    };

    let mut total = 0.0;

    if !date_part.is_empty() {
        let days: f64 = date_part.strip_suffix('D')?.parse().ok()?;
        total += days * 86_400.0;
    }

    let mut number = String::new();
    for c in time_part.chars() {
        if c.is_ascii_digit() || c == '.' {
            number.push(c);
            continue;
        }
        let value: f64 = number.parse().ok()?;
        number.clear();
        match c {
            'H' => total += value * 3_600.0,
            'M' => total += value * 60.0,
            'S' => total += value,
            _ => return None,
        }
    }
    if !number.is_empty() {
        // Trailing digits without a unit designator.
        return None;
    }

    Some(total)
}

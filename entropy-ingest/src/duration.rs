//! Quick-capture duration labels: "15m", "1h", "1h 30m", "1.5h", "45".

use regex::Regex;

/// Parse a duration label into minutes. Bare numbers are minutes.
pub fn parse_duration_label(label: &str) -> Option<u32> {
    let s = label.trim().to_lowercase();
    if s.is_empty() {
        return None;
    }

    if let Ok(n) = s.parse::<f64>() {
        return (n.is_finite() && n >= 0.0).then(|| n.round() as u32);
    }

    let part_re = Regex::new(r"(\d+(?:\.\d+)?)\s*([a-z]+)").ok()?;

    let mut total = 0.0;
    let mut consumed = 0usize;
    for caps in part_re.captures_iter(&s) {
        let whole = caps.get(0)?;
        // only whitespace may sit between parts
        if !s[consumed..whole.start()].trim().is_empty() {
            return None;
        }
        consumed = whole.end();

        let value: f64 = caps[1].parse().ok()?;
        let factor = match &caps[2] {
            "h" | "hr" | "hrs" | "hour" | "hours" => 60.0,
            "m" | "min" | "mins" | "minute" | "minutes" => 1.0,
            _ => return None,
        };
        total += value * factor;
    }

    if consumed == 0 || !s[consumed..].trim().is_empty() {
        return None;
    }
    Some(total.round() as u32)
}

/// Compact label for display: minutes under an hour, whole hours above.
pub fn format_duration_label(minutes: u32) -> String {
    if minutes < 60 {
        format!("{minutes}m")
    } else {
        format!("{}h", minutes / 60)
    }
}

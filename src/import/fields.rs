use chrono::{NaiveDate, NaiveTime};

/// Parse a broker-report money cell into a signed value.
///
/// Handles accounting notation (`(123.45)` is negative), currency suffixes,
/// grouping spaces, and mixed comma/period separators: whichever of the last
/// comma and last period occurs later in the string is the decimal point,
/// the rest are grouping marks.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.replace('\u{a0}', " ");
    let trimmed = trimmed.trim();
    if trimmed.is_empty() || trimmed == "-" || trimmed == "--" {
        return None;
    }

    let negative_parens = trimmed.starts_with('(') && trimmed.ends_with(')');
    let inner = if negative_parens {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };

    let filtered: String = inner
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | ',' | '.'))
        .collect();
    if filtered.is_empty() {
        return None;
    }

    let decimal_pos = match (filtered.rfind(','), filtered.rfind('.')) {
        (Some(c), Some(d)) => Some(c.max(d)),
        (Some(c), None) => Some(c),
        (None, Some(d)) => Some(d),
        (None, None) => None,
    };

    let mut cleaned = String::with_capacity(filtered.len());
    for (i, ch) in filtered.char_indices() {
        match ch {
            ',' | '.' => {
                if Some(i) == decimal_pos {
                    cleaned.push('.');
                }
            }
            _ => cleaned.push(ch),
        }
    }

    let value = cleaned.parse::<f64>().ok()?;
    Some(if negative_parens { -value } else { value })
}

/// Normalize `.` and `/` date separators to `-`.
pub fn normalize_date_separators(raw: &str) -> String {
    raw.replace(['.', '/'], "-")
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let normalized = normalize_date_separators(raw.trim());
    for format in ["%Y-%m-%d", "%d-%m-%Y", "%m-%d-%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(&normalized, format) {
            return Some(date);
        }
    }
    None
}

pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    for format in ["%H:%M:%S", "%H:%M"] {
        if let Ok(time) = NaiveTime::parse_from_str(trimmed, format) {
            return Some(time);
        }
    }
    None
}

/// Split an open-time cell ("2024.01.15 13:45") into date and optional
/// time. The date part is required; a missing or unparseable time is not.
pub fn parse_timestamp(raw: &str) -> Option<(NaiveDate, Option<NaiveTime>)> {
    let mut parts = raw.split_whitespace();
    let date = parse_date(parts.next()?)?;
    let time = parts.next().and_then(parse_time);
    Some((date, time))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_amounts() {
        assert_eq!(parse_amount("123.45"), Some(123.45));
        assert_eq!(parse_amount("-90.35"), Some(-90.35));
        assert_eq!(parse_amount("  42  "), Some(42.0));
    }

    #[test]
    fn parenthesized_amounts_are_negative() {
        assert_eq!(parse_amount("(123.45)"), Some(-123.45));
        assert_eq!(parse_amount("(1 234,56)"), Some(-1234.56));
    }

    #[test]
    fn later_separator_wins_as_decimal_point() {
        assert_eq!(parse_amount("1,234.56"), Some(1234.56));
        assert_eq!(parse_amount("1.234,56"), Some(1234.56));
        assert_eq!(parse_amount("12.345.678,90"), Some(12345678.90));
    }

    #[test]
    fn currency_suffixes_are_ignored() {
        assert_eq!(parse_amount("-53.11 USDT"), Some(-53.11));
        assert_eq!(parse_amount("$1,250.00"), Some(1250.0));
    }

    #[test]
    fn garbage_cells_are_rejected() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("--"), None);
        assert_eq!(parse_amount("n/a"), None);
    }

    #[test]
    fn dates_accept_dot_slash_and_dash() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_date("2024.01.15"), Some(expected));
        assert_eq!(parse_date("2024/01/15"), Some(expected));
        assert_eq!(parse_date("2024-01-15"), Some(expected));
        assert_eq!(parse_date("15.01.2024"), Some(expected));
    }

    #[test]
    fn timestamps_split_date_and_time() {
        let (date, time) = parse_timestamp("2024.01.15 13:45:30").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(time, NaiveTime::from_hms_opt(13, 45, 30));

        let (date, time) = parse_timestamp("2024.01.15").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(time, None);

        assert!(parse_timestamp("not a date").is_none());
    }
}

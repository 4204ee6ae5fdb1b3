#![forbid(unsafe_code)]

//! Lenient parsing of attribute values.
//!
//! Trait panels hand values over as strings typed by the user. Nothing here
//! fails: malformed input collapses to a safe value.

/// Parse an integer, accepting surrounding whitespace, a `px` suffix and a
/// fractional part (truncated toward zero). Returns `None` when no number
/// can be read.
///
/// ```
/// use mailframe_core::attr::parse_int;
///
/// assert_eq!(parse_int(" 20px "), Some(20));
/// assert_eq!(parse_int("12.9"), Some(12));
/// assert_eq!(parse_int("wide"), None);
/// ```
#[must_use]
pub fn parse_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let number = strip_suffix_ignore_case(trimmed, "px").unwrap_or(trimmed).trim_end();
    if number.is_empty() {
        return None;
    }
    if let Ok(value) = number.parse::<i64>() {
        return Some(value);
    }
    let value = number.parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }
    // Saturating float-to-int cast.
    #[allow(clippy::cast_possible_truncation)]
    Some(value.trunc() as i64)
}

/// Parse a non-negative pixel length. Anything unreadable or negative
/// becomes `0`.
///
/// ```
/// use mailframe_core::attr::parse_px;
///
/// assert_eq!(parse_px("15"), 15);
/// assert_eq!(parse_px("-4"), 0);
/// assert_eq!(parse_px("abc"), 0);
/// ```
#[must_use]
pub fn parse_px(raw: &str) -> u32 {
    parse_int(raw).map_or(0, |v| u32::try_from(v.max(0)).unwrap_or(u32::MAX))
}

/// Normalize a CSS color value. Blank input means "no color". Values that
/// could break out of an inline style declaration are rejected.
///
/// ```
/// use mailframe_core::attr::parse_color;
///
/// assert_eq!(parse_color(" #FF0000 ").as_deref(), Some("#FF0000"));
/// assert_eq!(parse_color(""), None);
/// assert_eq!(parse_color("red; display:none"), None);
/// ```
#[must_use]
pub fn parse_color(raw: &str) -> Option<String> {
    const MAX_LEN: usize = 64;
    let value = raw.trim();
    if value.is_empty() || value.len() > MAX_LEN {
        return None;
    }
    let unsafe_char = |c: char| matches!(c, ';' | ':' | '"' | '\'' | '<' | '>' | '{' | '}' | '\\') || c.is_control();
    if value.chars().any(unsafe_char) {
        return None;
    }
    Some(value.to_owned())
}

fn strip_suffix_ignore_case<'a>(value: &'a str, suffix: &str) -> Option<&'a str> {
    let split = value.len().checked_sub(suffix.len())?;
    if !value.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = value.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_int_handles_suffix_case_and_spacing() {
        assert_eq!(parse_int("20 PX"), Some(20));
        assert_eq!(parse_int("+7"), Some(7));
        assert_eq!(parse_int("-3"), Some(-3));
        assert_eq!(parse_int("px"), None);
        assert_eq!(parse_int(""), None);
    }

    #[test]
    fn parse_int_rejects_non_finite() {
        assert_eq!(parse_int("NaN"), None);
        assert_eq!(parse_int("inf"), None);
    }

    #[test]
    fn parse_px_saturates_huge_values() {
        assert_eq!(parse_px("99999999999"), u32::MAX);
        assert_eq!(parse_px("3.99px"), 3);
    }

    #[test]
    fn parse_color_accepts_common_forms() {
        assert_eq!(parse_color("rgb(1, 2, 3)").as_deref(), Some("rgb(1, 2, 3)"));
        assert_eq!(parse_color("transparent").as_deref(), Some("transparent"));
        assert_eq!(parse_color("   "), None);
    }

    #[test]
    fn parse_color_rejects_injection_and_oversize() {
        assert_eq!(parse_color("red\" onclick=\"x"), None);
        assert_eq!(parse_color("url(javascript:alert(1))"), None);
        assert_eq!(parse_color(&"a".repeat(65)), None);
    }

    #[test]
    fn strip_suffix_is_utf8_safe() {
        assert_eq!(strip_suffix_ignore_case("é", "px"), None);
        assert_eq!(strip_suffix_ignore_case("10Px", "px"), Some("10"));
    }
}

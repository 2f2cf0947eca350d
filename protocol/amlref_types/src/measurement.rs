// Lenient parsing of numeric form fields

/// Parse a numeric field as typed into the assessment form.
///
/// Surrounding whitespace is ignored. Empty, unparseable, or non-finite text
/// yields `None`; the caller treats that as "not measured" rather than an
/// error.
///
/// ```
/// use amlref_types::parse_measurement;
/// assert_eq!(parse_measurement(" 0.25 "), Some(0.25));
/// assert_eq!(parse_measurement(""), None);
/// assert_eq!(parse_measurement("NaN"), None);
/// ```
pub fn parse_measurement(text: &str) -> Option<f64> {
    let t = text.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Same as [`parse_measurement`] for optional form state.
pub fn parse_optional_measurement(text: Option<&str>) -> Option<f64> {
    text.and_then(parse_measurement)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_scientific_numbers() {
        assert_eq!(parse_measurement("150"), Some(150.0));
        assert_eq!(parse_measurement("-3.5"), Some(-3.5));
        assert_eq!(parse_measurement("1e-5"), Some(1e-5));
    }

    #[test]
    fn rejects_garbage_and_non_finite_values() {
        assert_eq!(parse_measurement("   "), None);
        assert_eq!(parse_measurement("12abc"), None);
        assert_eq!(parse_measurement("inf"), None);
        assert_eq!(parse_measurement("-infinity"), None);
        assert_eq!(parse_optional_measurement(None), None);
        assert_eq!(parse_optional_measurement(Some("7")), Some(7.0));
    }
}

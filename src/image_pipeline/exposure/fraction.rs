/// Parses rational-looking tag text such as `"1/125"`, `"28/10"`, `"100"` or
/// `"[100, 100]"` (first element wins). An `f/` prefix is accepted for apertures.
///
/// Returns `None` for anything malformed, a zero denominator or a non-finite result.
pub fn parse_fraction(text: &str) -> Option<f64> {
    let text = text.trim();
    let text = text
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .unwrap_or(text);
    let first = text.split(',').next()?.trim();
    let first = first
        .strip_prefix("f/")
        .or_else(|| first.strip_prefix("F/"))
        .unwrap_or(first)
        .trim();

    if first.is_empty() {
        return None;
    }

    let value = match first.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator: f64 = numerator.trim().parse().ok()?;
            let denominator: f64 = denominator.trim().parse().ok()?;
            if denominator == 0.0 {
                return None;
            }
            numerator / denominator
        }
        None => first.parse().ok()?,
    };

    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fractions() {
        assert_eq!(parse_fraction("1/125"), Some(1.0 / 125.0));
        assert_eq!(parse_fraction("28/10"), Some(2.8));
        assert_eq!(parse_fraction(" 1 / 4 "), Some(0.25));
    }

    #[test]
    fn test_plain_numbers_and_lists() {
        assert_eq!(parse_fraction("100"), Some(100.0));
        assert_eq!(parse_fraction("2.8"), Some(2.8));
        assert_eq!(parse_fraction("[100, 100]"), Some(100.0));
        assert_eq!(parse_fraction("[1/60]"), Some(1.0 / 60.0));
        assert_eq!(parse_fraction("f/2.8"), Some(2.8));
    }

    #[test]
    fn test_malformed_input_is_none() {
        assert_eq!(parse_fraction(""), None);
        assert_eq!(parse_fraction("[]"), None);
        assert_eq!(parse_fraction("abc"), None);
        assert_eq!(parse_fraction("1/0"), None);
        assert_eq!(parse_fraction("1/2/3"), None);
        assert_eq!(parse_fraction("nan"), None);
        assert_eq!(parse_fraction("inf"), None);
        assert_eq!(parse_fraction("/125"), None);
    }
}

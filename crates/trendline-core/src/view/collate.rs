use std::cmp::Ordering;

/// Locale-style text ordering: case-folded first, raw code points as the
/// tie-break so the order stays total.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

/// Missing numbers sort below every present one.
pub fn numeric_cmp(a: Option<f64>, b: Option<f64>) -> Ordering {
    a.unwrap_or(f64::NEG_INFINITY)
        .total_cmp(&b.unwrap_or(f64::NEG_INFINITY))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_before_raw() {
        assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_cmp("Banana", "apple"), Ordering::Greater);
        assert_eq!(locale_cmp("Apple", "apple"), Ordering::Less);
        assert_eq!(locale_cmp("same", "same"), Ordering::Equal);
    }

    #[test]
    fn none_is_negative_infinity() {
        assert_eq!(numeric_cmp(None, Some(-1e300)), Ordering::Less);
        assert_eq!(numeric_cmp(None, None), Ordering::Equal);
        assert_eq!(numeric_cmp(Some(2.0), Some(1.0)), Ordering::Greater);
    }
}

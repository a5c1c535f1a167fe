//! Coercion of JSON amounts into finite floats.

use serde_json::Value;

/// Convert a JSON number, or a string holding a number, into a finite `f64`.
///
/// Strings are trimmed before parsing, so `" 12.50 "` is accepted. Returns
/// `None` for any other JSON type, unparseable text, and infinite or NaN values.
pub fn parse_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    amount.is_finite().then_some(amount)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::parse_amount;

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_amount(&json!(19.99)), Some(19.99));
        assert_eq!(parse_amount(&json!(-5)), Some(-5.0));
        assert_eq!(parse_amount(&json!("42.5")), Some(42.5));
        assert_eq!(parse_amount(&json!(" 7 ")), Some(7.0));
    }

    #[test]
    fn rejects_non_numeric_values() {
        assert_eq!(parse_amount(&json!("abc")), None);
        assert_eq!(parse_amount(&json!("")), None);
        assert_eq!(parse_amount(&json!(true)), None);
        assert_eq!(parse_amount(&json!(null)), None);
        assert_eq!(parse_amount(&json!([1.0])), None);
    }

    #[test]
    fn rejects_non_finite_values() {
        assert_eq!(parse_amount(&json!("inf")), None);
        assert_eq!(parse_amount(&json!("NaN")), None);
    }
}

//! Decimal parsing and display helpers shared by adapters and the formatter

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a decimal from plain or scientific notation
pub fn parse_decimal(raw: &str) -> Result<Decimal, rust_decimal::Error> {
    let raw = raw.trim();
    Decimal::from_str(raw).or_else(|e| {
        if raw.contains(['e', 'E']) {
            Decimal::from_scientific(raw)
        } else {
            Err(e)
        }
    })
}

/// Decimal from a JSON number or numeric string
pub fn decimal_from_json(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::Number(n) => parse_decimal(&n.to_string()).ok(),
        serde_json::Value::String(s) => parse_decimal(s).ok(),
        _ => None,
    }
}

/// Render with a fixed number of decimals, rounding half away from zero
pub fn fixed(value: Decimal, dp: u32) -> String {
    let rounded =
        value.round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", dp as usize, rounded)
}

/// Whole-number rendering with thousands separators, e.g. `67,250`
pub fn thousands(value: Decimal) -> String {
    let whole = fixed(value, 0);
    let (sign, digits) = match whole.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", whole.as_str()),
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    format!("{sign}{out}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_decimal_plain() {
        assert_eq!(parse_decimal("0.52").unwrap(), dec!(0.52));
        assert_eq!(parse_decimal(" 1000 ").unwrap(), dec!(1000));
    }

    #[test]
    fn test_parse_decimal_scientific() {
        assert_eq!(parse_decimal("1.5e2").unwrap(), dec!(150));
        assert_eq!(parse_decimal("2E-3").unwrap(), dec!(0.002));
    }

    #[test]
    fn test_parse_decimal_invalid() {
        assert!(parse_decimal("abc").is_err());
        assert!(parse_decimal("").is_err());
    }

    #[test]
    fn test_decimal_from_json() {
        assert_eq!(
            decimal_from_json(&serde_json::json!(67000.12)),
            Some(dec!(67000.12))
        );
        assert_eq!(decimal_from_json(&serde_json::json!("42.5")), Some(dec!(42.5)));
        assert_eq!(decimal_from_json(&serde_json::json!(null)), None);
        assert_eq!(decimal_from_json(&serde_json::json!("n/a")), None);
    }

    #[test]
    fn test_fixed() {
        assert_eq!(fixed(dec!(3.5), 2), "3.50");
        assert_eq!(fixed(dec!(-1.234), 2), "-1.23");
        assert_eq!(fixed(dec!(64.5), 0), "65");
        assert_eq!(fixed(dec!(35), 0), "35");
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(dec!(67250.4)), "67,250");
        assert_eq!(thousands(dec!(999)), "999");
        assert_eq!(thousands(dec!(1000)), "1,000");
        assert_eq!(thousands(dec!(1234567.8)), "1,234,568");
        assert_eq!(thousands(dec!(-4500)), "-4,500");
        assert_eq!(thousands(dec!(0)), "0");
    }
}

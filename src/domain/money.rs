use std::fmt;

/// Amounts are fixed-point decimals with two fractional digits, stored as
/// integer cents so sums never drift. 1.00 = 100 cents.
pub type Cents = i64;

/// Largest amount a single transaction may carry: 99,999,999.99.
/// Ten digits of precision keeps any realistic number of rows summable in i64.
pub const MAX_AMOUNT_CENTS: Cents = 9_999_999_999;

/// Format cents as a plain decimal string.
/// Example: 11000 -> "110.00", -4000 -> "-40.00"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Convert cents to a float for chart rendering.
///
/// Only the presentation layer should call this; every total is computed in
/// cents first.
pub fn cents_to_f64(cents: Cents) -> f64 {
    cents as f64 / 100.0
}

/// Parse a decimal string into cents.
/// Example: "100.00" -> 10000, "12.5" -> 1250, "40" -> 4000
///
/// More than two fractional digits is rejected rather than rounded, matching
/// the two-digit precision of stored amounts.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseCentsError::Empty);
    }

    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };

    let (units_str, fraction_str) = match digits.split_once('.') {
        Some((units, fraction)) => (units, fraction),
        None => (digits, ""),
    };

    if units_str.is_empty() && fraction_str.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }
    if !units_str.chars().all(|c| c.is_ascii_digit())
        || !fraction_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ParseCentsError::InvalidFormat);
    }
    if fraction_str.len() > 2 {
        return Err(ParseCentsError::TooPrecise);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str
            .parse()
            .map_err(|_| ParseCentsError::InvalidFormat)?
    };
    let fraction: i64 = match fraction_str.len() {
        0 => 0,
        // "12.5" means fifty cents
        1 => fraction_str.parse::<i64>().map_err(|_| ParseCentsError::InvalidFormat)? * 10,
        _ => fraction_str
            .parse()
            .map_err(|_| ParseCentsError::InvalidFormat)?,
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(fraction))
        .ok_or(ParseCentsError::InvalidFormat)?;
    Ok(if negative { -cents } else { cents })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    Empty,
    InvalidFormat,
    TooPrecise,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::Empty => write!(f, "amount is empty"),
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::TooPrecise => write!(f, "at most two decimal places are allowed"),
        }
    }
}

impl std::error::Error for ParseCentsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(11000), "110.00");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-4000), "-40.00");
        assert_eq!(format_cents(-1), "-0.01");
    }

    #[test]
    fn test_parse_cents() {
        assert_eq!(parse_cents("100.00"), Ok(10000));
        assert_eq!(parse_cents("40"), Ok(4000));
        assert_eq!(parse_cents("12.5"), Ok(1250));
        assert_eq!(parse_cents(".75"), Ok(75));
        assert_eq!(parse_cents(" 3.10 "), Ok(310));
        assert_eq!(parse_cents("-2.50"), Ok(-250));
    }

    #[test]
    fn test_parse_cents_rejects_garbage() {
        assert_eq!(parse_cents(""), Err(ParseCentsError::Empty));
        assert_eq!(parse_cents("abc"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("1.2.3"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("."), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("10.999"), Err(ParseCentsError::TooPrecise));
    }

    #[test]
    fn test_max_amount_parses_and_formats() {
        assert_eq!(parse_cents("99999999.99"), Ok(MAX_AMOUNT_CENTS));
        assert_eq!(format_cents(MAX_AMOUNT_CENTS), "99999999.99");
    }

    #[test]
    fn test_cents_to_f64() {
        assert_eq!(cents_to_f64(15000), 150.0);
        assert_eq!(cents_to_f64(4025), 40.25);
    }
}

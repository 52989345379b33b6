use std::fmt;

/// Amounts are stored as JSON numbers, so they are handled as `f64` end to end.
/// Totals are summed in record order; callers must not reorder before summing.
pub type Amount = f64;

/// Format an amount with two decimals.
/// Example: 12.5 -> "12.50", 3.0 -> "3.00"
pub fn format_amount(amount: Amount) -> String {
    format!("{:.2}", amount)
}

/// Parse a user-entered amount.
/// Accepts anything `f64` parses after trimming ("12.5", "3", "1e2"),
/// as long as the value is finite and not negative.
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| ParseAmountError::InvalidFormat)?;

    if !value.is_finite() {
        return Err(ParseAmountError::NotFinite);
    }
    if value < 0.0 {
        return Err(ParseAmountError::Negative);
    }
    // "-0" parses to negative zero
    Ok(value.abs())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    InvalidFormat,
    NotFinite,
    Negative,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::InvalidFormat => write!(f, "not a number"),
            ParseAmountError::NotFinite => write!(f, "not a finite number"),
            ParseAmountError::Negative => write!(f, "amount is negative"),
        }
    }
}

impl std::error::Error for ParseAmountError {}

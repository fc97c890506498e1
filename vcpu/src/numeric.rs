//! Auto-base numeric literal parsing shared by the assembler's directive
//! arguments and the CPU's immediate-operand resolution, instead of the
//! three separate ad-hoc `int(x, 0)` call sites the source this machine is
//! modeled on uses.

use std::fmt;

/// A numeric literal token was empty or contained non-digit characters for
/// its detected base.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NumberFormatError(pub String);

impl fmt::Display for NumberFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed numeric literal \"{}\"", self.0)
    }
}

impl std::error::Error for NumberFormatError {}

/// Parses a signed integer literal with automatic base detection: a `0x`
/// (or `0X`) prefix selects hexadecimal, `0b`/`0B` selects binary, anything
/// else is parsed as decimal. A leading `-` is permitted before the prefix.
pub fn parse_auto_base(token: &str) -> Result<i64, NumberFormatError> {
    let (negative, rest) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };

    let (radix, digits) = if let Some(digits) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        (16, digits)
    } else if let Some(digits) = rest.strip_prefix("0b").or_else(|| rest.strip_prefix("0B")) {
        (2, digits)
    } else {
        (10, rest)
    };

    if digits.is_empty() {
        return Err(NumberFormatError(token.to_owned()));
    }

    let magnitude = i64::from_str_radix(digits, radix).map_err(|_| NumberFormatError(token.to_owned()))?;

    Ok(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decimal() {
        assert_eq!(parse_auto_base("42").unwrap(), 42);
        assert_eq!(parse_auto_base("-42").unwrap(), -42);
    }

    #[test]
    fn hex() {
        assert_eq!(parse_auto_base("0x2A").unwrap(), 42);
        assert_eq!(parse_auto_base("0x3FF").unwrap(), 1023);
    }

    #[test]
    fn binary() {
        assert_eq!(parse_auto_base("0b101010").unwrap(), 42);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_auto_base("0xZZ").is_err());
        assert!(parse_auto_base("").is_err());
        assert!(parse_auto_base("abc").is_err());
    }
}

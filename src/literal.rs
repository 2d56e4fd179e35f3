use num_bigint::BigUint;

use crate::error::{Error, Result};

/// Parse a numeric operand: decimal, `0x` hexadecimal or `0b` binary.
///
/// There is no upper bound and no sign; negative byte values are written in
/// their unsigned form (`246` for -10).
pub fn parse_literal(token: &str) -> Result<BigUint> {
    let (digits, radix) = split_radix(token);

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(Error::InvalidLiteral(token.to_string()));
    }

    BigUint::parse_bytes(digits.as_bytes(), radix)
        .ok_or_else(|| Error::InvalidLiteral(token.to_string()))
}

fn split_radix(token: &str) -> (&str, u32) {
    let bytes = token.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b'0' {
        match bytes[1] {
            b'x' | b'X' => return (&token[2..], 16),
            b'b' | b'B' => return (&token[2..], 2),
            _ => {}
        }
    }
    (token, 10)
}

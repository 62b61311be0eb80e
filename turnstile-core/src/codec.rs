//! Compact base-62 references to review items.
//!
//! External references are produced by encoding the numeric item id over a
//! fixed 62-symbol alphabet. The alphabet ordering (`0-9`, then `a-z`, then
//! `A-Z`) is a compatibility contract: references are exchanged with other
//! tools, and both sides must agree on the symbol table for the same string
//! to name the same item.

use thiserror::Error;

/// Symbol table; index 0 is `'0'`, index 61 is `'Z'`.
const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const BASE: i64 = 62;

/// Validation failures for malformed caller input.
///
/// These are the only hard errors in the crate: the codec cannot degrade
/// gracefully on input that does not denote an item id.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("cannot encode a negative id")]
    Negative,
    #[error("empty reference")]
    Empty,
    #[error("invalid symbol {symbol:?} in reference")]
    InvalidSymbol { symbol: char },
    #[error("reference does not fit in a 64-bit id")]
    Overflow,
}

fn symbol_index(c: char) -> Option<i64> {
    match c {
        '0'..='9' => Some(c as i64 - '0' as i64),
        'a'..='z' => Some(10 + c as i64 - 'a' as i64),
        'A'..='Z' => Some(36 + c as i64 - 'A' as i64),
        _ => None,
    }
}

/// Encode a non-negative id as a compact reference.
///
/// The result carries no leading zero-symbols; `0` itself encodes as `"0"`.
pub fn encode(n: i64) -> Result<String, CodecError> {
    if n < 0 {
        return Err(CodecError::Negative);
    }
    if n == 0 {
        return Ok("0".to_string());
    }

    let mut digits = Vec::new();
    let mut rest = n;
    while rest > 0 {
        digits.push(ALPHABET[(rest % BASE) as usize] as char);
        rest /= BASE;
    }

    Ok(digits.iter().rev().collect())
}

/// Decode a compact reference back to the item id.
pub fn decode(s: &str) -> Result<i64, CodecError> {
    if s.is_empty() {
        return Err(CodecError::Empty);
    }

    let mut value: i64 = 0;
    for c in s.chars() {
        let index = symbol_index(c).ok_or(CodecError::InvalidSymbol { symbol: c })?;
        value = value
            .checked_mul(BASE)
            .and_then(|v| v.checked_add(index))
            .ok_or(CodecError::Overflow)?;
    }

    Ok(value)
}

/// Interpret an inbound reference token as an item id.
///
/// Routes receive either a plain decimal id or an encoded reference. A token
/// containing any non-digit alphabet symbol must be encoded (a decimal id
/// never contains one); an all-digit token is already the id.
pub fn parse_item_ref(token: &str) -> Result<i64, CodecError> {
    if token.is_empty() {
        return Err(CodecError::Empty);
    }
    if token.chars().all(|c| c.is_ascii_digit()) {
        token.parse::<i64>().map_err(|_| CodecError::Overflow)
    } else {
        decode(token)
    }
}

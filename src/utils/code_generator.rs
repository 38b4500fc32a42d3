//! Counter-based short code generation.
//!
//! Codes are the base-62 rendering of a process-wide counter. The space is
//! dense and sequential, so codes are unique but guessable.

use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::AppError;

/// Symbol table: digits, then uppercase, then lowercase.
pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

const BASE: u64 = ALPHABET.len() as u64;

/// Codes that would shadow a fixed route and can never resolve.
pub const RESERVED_CODES: &[&str] = &["api", "health"];

/// Errors returned by [`decode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Short code is empty")]
    Empty,

    #[error("Invalid base-62 symbol {0:?}")]
    InvalidSymbol(char),

    #[error("Short code does not fit in 64 bits")]
    Overflow,
}

/// Hands out unique short codes from an atomic counter.
///
/// One instance is shared (via `Arc`) by every request handler; the counter
/// starts at 1 and is never reset for the lifetime of the generator.
#[derive(Debug)]
pub struct CodeGenerator {
    counter: AtomicU64,
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Creates a generator whose first code encodes `first`.
    ///
    /// Values below 1 are clamped to 1 so an empty code is never produced.
    pub fn starting_at(first: u64) -> Self {
        Self {
            counter: AtomicU64::new(first.max(1)),
        }
    }

    /// Returns the next code, skipping counter values that encode to a
    /// reserved code.
    pub fn next(&self) -> String {
        loop {
            let code = encode(self.counter.fetch_add(1, Ordering::Relaxed));
            if !is_reserved(&code) {
                return code;
            }
        }
    }

    /// Value that the next call to [`Self::next`] will encode.
    pub fn peek(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Rejects caller-chosen codes that collide with a fixed route.
///
/// # Errors
///
/// Returns [`AppError::Validation`] for a reserved code.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if is_reserved(code) {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}

/// Encodes `num` in base 62. Zero encodes to the empty string.
pub fn encode(mut num: u64) -> String {
    let mut symbols = Vec::with_capacity(11);

    while num > 0 {
        symbols.push(ALPHABET[(num % BASE) as usize]);
        num /= BASE;
    }

    symbols.reverse();
    // ALPHABET is pure ASCII
    symbols.into_iter().map(char::from).collect()
}

/// Decodes a base-62 code back to its counter value.
///
/// # Errors
///
/// Returns [`DecodeError`] for empty input, symbols outside [`ALPHABET`],
/// or values that overflow `u64`.
pub fn decode(code: &str) -> Result<u64, DecodeError> {
    if code.is_empty() {
        return Err(DecodeError::Empty);
    }

    code.chars().try_fold(0u64, |acc, c| {
        let digit = symbol_value(c).ok_or(DecodeError::InvalidSymbol(c))?;
        acc.checked_mul(BASE)
            .and_then(|v| v.checked_add(digit))
            .ok_or(DecodeError::Overflow)
    })
}

fn symbol_value(c: char) -> Option<u64> {
    match c {
        '0'..='9' => Some(c as u64 - '0' as u64),
        'A'..='Z' => Some(c as u64 - 'A' as u64 + 10),
        'a'..='z' => Some(c as u64 - 'a' as u64 + 36),
        _ => None,
    }
}

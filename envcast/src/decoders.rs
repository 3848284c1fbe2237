//! Primitive and union decoders.
//!
//! Every constructor returns a required [`Decoder`]; use
//! [`with_default`](Decoder::with_default) or [`optional`](Decoder::optional)
//! to relax it.

use crate::{DecodeError, Decoder, NotAllowed};

/// Accepts any input that is present, unchanged.
pub fn as_string() -> Decoder<String> {
    Decoder::new(decode_string)
}

/// Accepts numeric input.
///
/// Surrounding whitespace is ignored. Besides plain decimals (`42`, `-1.5`,
/// `1e3`) this understands `Infinity` and the `0x`, `0o` and `0b` integer
/// prefixes. Empty or blank input reads as `0`. `NaN` is rejected.
pub fn as_number() -> Decoder<f64> {
    Decoder::new(decode_number)
}

/// Accepts exactly `0`, `false`, `1` and `true`.
pub fn as_boolean() -> Decoder<bool> {
    Decoder::new(|input| match input {
        Some("0" | "false") => Ok(false),
        Some("1" | "true") => Ok(true),
        other => Err(DecodeError::NotABoolean {
            value: other.map(str::to_owned),
        }),
    })
}

/// Accepts a string that is one of `allowed`.
///
/// ```
/// use envcast::as_string_union;
///
/// let level = as_string_union(["debug", "info"]);
/// assert_eq!(level.decode(Some("info")).unwrap(), "info");
/// assert_eq!(
///     level.decode(Some("trace")).unwrap_err().to_string(),
///     "allowed strings are debug, info, got trace"
/// );
/// ```
pub fn as_string_union<I, S>(allowed: I) -> Decoder<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let allowed: Vec<String> = allowed.into_iter().map(Into::into).collect();

    Decoder::new(move |input| {
        let text = decode_string(input)?;

        if allowed.contains(&text) {
            Ok(text)
        } else {
            Err(NotAllowed::Strings {
                allowed: allowed.clone(),
                actual: text,
            }
            .into())
        }
    })
}

/// Accepts a number that is one of `allowed`.
pub fn as_number_union<I, N>(allowed: I) -> Decoder<f64>
where
    I: IntoIterator<Item = N>,
    N: Into<f64>,
{
    let allowed: Vec<f64> = allowed.into_iter().map(Into::into).collect();

    Decoder::new(move |input| {
        let number = decode_number(input)?;

        if allowed.iter().any(|n| *n == number) {
            Ok(number)
        } else {
            Err(NotAllowed::Numbers {
                allowed: allowed.clone(),
                actual: number,
            }
            .into())
        }
    })
}

/// The decoder used for a type when none is given explicitly.
pub trait DefaultDecoder: Sized {
    fn decoder() -> Decoder<Self>;
}

impl DefaultDecoder for String {
    fn decoder() -> Decoder<Self> {
        as_string()
    }
}

impl DefaultDecoder for f64 {
    fn decoder() -> Decoder<Self> {
        as_number()
    }
}

impl DefaultDecoder for bool {
    fn decoder() -> Decoder<Self> {
        as_boolean()
    }
}

impl<T: DefaultDecoder + 'static> DefaultDecoder for Option<T> {
    fn decoder() -> Decoder<Self> {
        T::decoder().optional()
    }
}

fn decode_string(input: Option<&str>) -> Result<String, DecodeError> {
    input.map(str::to_owned).ok_or(DecodeError::MissingValue)
}

fn decode_number(input: Option<&str>) -> Result<f64, DecodeError> {
    let text = decode_string(input)?;

    parse_number(&text).ok_or(DecodeError::NotANumber { value: Some(text) })
}

fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0.0);
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = text.strip_prefix(prefix) {
            return parse_radix(digits, radix);
        }
    }

    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    if unsigned == "Infinity" {
        return Some(if text.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    // Rust also accepts `inf` and `NaN` spellings; those are not numbers here.
    let decimal = !unsigned.is_empty()
        && unsigned
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));

    if decimal { text.parse().ok() } else { None }
}

fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }

    digits.chars().try_fold(0.0, |acc: f64, c| {
        c.to_digit(radix)
            .map(|digit| acc * f64::from(radix) + f64::from(digit))
    })
}

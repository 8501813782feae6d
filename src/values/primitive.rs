//! Value implementations for primitive types
//!
//! Supported scalars: `String`, `bool`, the signed and unsigned integer
//! families, `f32`/`f64`, and `Complex<f32>`/`Complex<f64>`. A `Vec` of any
//! of them is a [`VariadicValue`].
//!
//! Accepted text forms:
//!
//! | type      | accepted                                              | rendered        |
//! |-----------|-------------------------------------------------------|-----------------|
//! | `bool`    | `1 t T TRUE true True`, `0 f F FALSE false False`      | `true`, `false` |
//! | integers  | optional sign; `0x`, `0o`, `0b` prefixes; leading `0` is octal; with a prefix, single `_` after it or between digits | decimal |
//! | floats    | Rust float syntax, including `inf` and `NaN`           | shortest form   |
//! | complex   | `re+imi`, e.g. `1.5-2i`                                | `re+imi`        |
//! | `String`  | anything                                              | itself          |
//!
//! Rendering and setting round-trip for every value except `NaN` (floats and
//! the components of complex numbers), which re-parses to a `NaN` that does
//! not compare equal to the original.

use num_complex::Complex;

use super::{ArgumentMode, Value, VariadicValue};
use crate::error::{ParseError, ParseResult};

/// Scalars that can be collected into a variadic `Vec`.
pub trait Primitive: Value + Default {}

impl Value for String {
    fn set(&mut self, token: &str) -> ParseResult<()> {
        token.clone_into(self);
        Ok(())
    }

    fn render(&self) -> String {
        self.clone()
    }
}

impl Primitive for String {}

/// Parse the classic boolean spellings.
pub fn parse_bool(token: &str) -> Option<bool> {
    match token {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

impl Value for bool {
    fn set(&mut self, token: &str) -> ParseResult<()> {
        *self = parse_bool(token).ok_or_else(|| ParseError::invalid_value(token, "bool"))?;
        Ok(())
    }

    fn render(&self) -> String {
        self.to_string()
    }

    // A bare `--flag` means true; `--flag=false` still works.
    fn mode(&self) -> ArgumentMode {
        ArgumentMode::optional("true")
    }
}

impl Primitive for bool {}

/// Split an integer literal into its sign and magnitude.
///
/// Returns `None` for anything that is not a well-formed literal or does not
/// fit in 128 bits.
fn parse_magnitude(token: &str) -> Option<(bool, u128)> {
    let (negative, body) = match token.as_bytes().first()? {
        b'-' => (true, &token[1..]),
        b'+' => (false, &token[1..]),
        _ => (false, token),
    };

    let lower = body.get(..2).map(|p| p.to_ascii_lowercase());
    let (radix, digits, prefixed) = match lower.as_deref() {
        Some("0x") => (16, &body[2..], true),
        Some("0o") => (8, &body[2..], true),
        Some("0b") => (2, &body[2..], true),
        _ if body.len() > 1 && body.starts_with('0') => (8, &body[1..], true),
        _ => (10, body, false),
    };

    let digits = if prefixed && digits.contains('_') {
        // Underscores separate digits or follow the prefix.
        if digits.ends_with('_') || digits.contains("__") {
            return None;
        }
        digits.replace('_', "")
    } else {
        digits.to_string()
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }

    u128::from_str_radix(&digits, radix)
        .ok()
        .map(|magnitude| (negative, magnitude))
}

fn parse_signed(token: &str) -> Option<i128> {
    let (negative, magnitude) = parse_magnitude(token)?;
    if negative {
        0i128.checked_sub_unsigned(magnitude)
    } else {
        i128::try_from(magnitude).ok()
    }
}

fn parse_unsigned(token: &str) -> Option<u128> {
    match parse_magnitude(token)? {
        (true, 0) => Some(0),
        (true, _) => None,
        (false, magnitude) => Some(magnitude),
    }
}

macro_rules! integer_values {
    ($parse:ident: $($ty:ty),*) => {
        $(
            impl Value for $ty {
                fn set(&mut self, token: &str) -> ParseResult<()> {
                    *self = $parse(token)
                        .and_then(|v| <$ty>::try_from(v).ok())
                        .ok_or_else(|| ParseError::invalid_value(token, stringify!($ty)))?;
                    Ok(())
                }

                fn render(&self) -> String {
                    self.to_string()
                }
            }

            impl Primitive for $ty {}
        )*
    };
}

integer_values!(parse_signed: i8, i16, i32, i64, isize);
integer_values!(parse_unsigned: u8, u16, u32, u64, usize);

macro_rules! float_values {
    ($($ty:ty => $name:expr),*) => {
        $(
            impl Value for $ty {
                fn set(&mut self, token: &str) -> ParseResult<()> {
                    *self = token
                        .parse::<$ty>()
                        .map_err(|_| ParseError::invalid_value(token, $name))?;
                    Ok(())
                }

                fn render(&self) -> String {
                    self.to_string()
                }
            }

            impl Primitive for $ty {}
        )*
    };
}

float_values!(
    f32 => "f32",
    f64 => "f64",
    Complex<f32> => "Complex<f32>",
    Complex<f64> => "Complex<f64>"
);

impl<T: Primitive> VariadicValue for Vec<T> {
    fn set_all(&mut self, tokens: &[String]) -> ParseResult<()> {
        let mut values = Vec::with_capacity(tokens.len());
        for token in tokens {
            let mut value = T::default();
            if let Err(err) = value.set(token) {
                self.clear();
                return Err(err);
            }
            values.push(value);
        }
        *self = values;
        Ok(())
    }
}

//! Text form of atomic units.
//!
//! | Form | Example | Used when |
//! |------|---------|-----------|
//! | sentinel | `undefined`, `-undefined` | either sentinel orientation |
//! | integer | `-42` | only slot `a` is set |
//! | ratio | `3/6` | only slots `a` and `b` are set, `b != 0` |
//! | complex | `3+4i`, `-5i`, `i` | only slots `a` and `i` are set, `i != 0` |
//! | general | `{a=1, c=-2, i=5}` | anything else |
//!
//! The compact forms are only used when no zero slot carries a sign flag;
//! the general form writes such slots as `-0`. Parsing accepts every form
//! that printing produces, so `text.parse::<AtomicUnit>()` inverts `Display`.
//! Ratios are read slot for slot and never reduced.

use std::fmt;
use std::str::FromStr;

use super::AtomicUnit;
use crate::core::{OrdinalIndex, OrdinalVector, MAGNITUDE_MAX};
use crate::error::QnError;

const SLOT_A: u16 = 1 << 0;
const SLOT_B: u16 = 1 << 1;
const SLOT_I: u16 = 1 << 8;

impl fmt::Display for AtomicUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_symbolic_undefined() {
            let text = if *self == Self::SYMBOLIC_UNDEFINED {
                "undefined"
            } else {
                "-undefined"
            };
            return f.write_str(text);
        }

        let plain = OrdinalIndex::all().all(|s| self.magnitude(s) != 0 || !self.sign(s));
        let used = OrdinalIndex::all()
            .filter(|&s| self.magnitude(s) != 0)
            .fold(0u16, |mask, s| mask | 1 << s.get());

        if plain {
            if used & !SLOT_A == 0 {
                return write!(f, "{}", self.real());
            }
            if used & !(SLOT_A | SLOT_B) == 0 && used & SLOT_B != 0 {
                return write!(f, "{}/{}", self.real(), self.get(OrdinalIndex::DENOMINATOR));
            }
            if used & !(SLOT_A | SLOT_I) == 0 && used & SLOT_I != 0 {
                return write_complex(f, self.real(), self.imaginary());
            }
        }

        f.write_str("{")?;
        let mut first = true;
        for slot in OrdinalIndex::all() {
            let (magnitude, negative) = (self.magnitude(slot), self.sign(slot));
            if magnitude == 0 && !negative {
                continue;
            }
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            let sign = if negative { "-" } else { "" };
            write!(f, "{slot}={sign}{magnitude}")?;
        }
        f.write_str("}")
    }
}

fn write_complex(f: &mut fmt::Formatter<'_>, re: i32, im: i32) -> fmt::Result {
    if re != 0 {
        write!(f, "{re}")?;
        f.write_str(if im < 0 { "-" } else { "+" })?;
    } else if im < 0 {
        f.write_str("-")?;
    }
    match im.unsigned_abs() {
        1 => f.write_str("i"),
        m => write!(f, "{m}i"),
    }
}

/// Parses `[+-]digits` into `(magnitude, negative)`.
fn parse_slot(text: &str) -> Result<(u32, bool), &'static str> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err("invalid number");
    }
    match digits.parse::<u64>() {
        Ok(m) if m <= u64::from(MAGNITUDE_MAX) => Ok((m as u32, negative)),
        _ => Err("ordinal out of range"),
    }
}

fn parse_general(body: &str) -> Result<OrdinalVector, &'static str> {
    let body = body.strip_suffix('}').ok_or("unclosed brace")?;
    let mut ordinals = OrdinalVector::new();
    let mut seen = 0u16;
    for entry in body.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (name, value) = entry.split_once('=').ok_or("expected name=value")?;
        let mut chars = name.trim().chars();
        let slot = match (chars.next(), chars.next()) {
            (Some(c), None) => OrdinalIndex::from_name(c).ok_or("unknown slot name")?,
            _ => return Err("unknown slot name"),
        };
        if seen & 1 << slot.get() != 0 {
            return Err("duplicate slot");
        }
        seen |= 1 << slot.get();
        let (magnitude, negative) = parse_slot(value)?;
        ordinals.put(slot.get(), magnitude, negative);
    }
    Ok(ordinals)
}

fn parse_complex(body: &str) -> Result<OrdinalVector, &'static str> {
    let split = body
        .char_indices()
        .rev()
        .find(|&(i, c)| i > 0 && (c == '+' || c == '-'))
        .map(|(i, _)| i);
    let (re, im) = match split {
        Some(i) => (Some(&body[..i]), &body[i..]),
        None => (None, body),
    };
    let mut ordinals = OrdinalVector::new();
    if let Some(re) = re {
        let (magnitude, negative) = parse_slot(re)?;
        ordinals.put(OrdinalIndex::REAL.get(), magnitude, negative);
    }
    let (magnitude, negative) = match im.trim() {
        "" | "+" => (1, false),
        "-" => (1, true),
        digits => parse_slot(digits)?,
    };
    ordinals.put(OrdinalIndex::IMAGINARY.get(), magnitude, negative);
    Ok(ordinals)
}

fn parse_unit(text: &str) -> Result<AtomicUnit, &'static str> {
    match text {
        "" => return Err("empty input"),
        "undefined" => return Ok(AtomicUnit::SYMBOLIC_UNDEFINED),
        "-undefined" => return Ok(-AtomicUnit::SYMBOLIC_UNDEFINED),
        _ => {}
    }
    let ordinals = if let Some(body) = text.strip_prefix('{') {
        parse_general(body)?
    } else if let Some((n, d)) = text.split_once('/') {
        let (n, n_negative) = parse_slot(n)?;
        let (d, d_negative) = parse_slot(d)?;
        if d == 0 {
            return Err("zero denominator");
        }
        let mut ordinals = OrdinalVector::new();
        ordinals.put(OrdinalIndex::REAL.get(), n, n_negative);
        ordinals.put(OrdinalIndex::DENOMINATOR.get(), d, d_negative);
        ordinals
    } else if let Some(body) = text.strip_suffix('i') {
        parse_complex(body)?
    } else {
        let (magnitude, negative) = parse_slot(text)?;
        let mut ordinals = OrdinalVector::new();
        ordinals.put(OrdinalIndex::REAL.get(), magnitude, negative);
        ordinals
    };
    Ok(AtomicUnit::new(ordinals))
}

impl FromStr for AtomicUnit {
    type Err = QnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_unit(s.trim()).map_err(|reason| QnError::Parse {
            input: s.to_string(),
            reason,
        })
    }
}

//! Modified UTF-8, the string encoding of `CONSTANT_Utf8` entries.
//!
//! Differs from standard UTF-8 in two ways: NUL is encoded as the two bytes `C0 80`, and
//! characters outside the BMP are written as a UTF-16 surrogate pair, three bytes per unit.

use crate::error::{ClassFileError, Result};

/// Encode a string as modified UTF-8.
pub fn encode(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    for ch in s.chars() {
        let c = ch as u32;
        match c {
            0x01..=0x7F => out.push(c as u8),
            0x00 | 0x80..=0x7FF => {
                out.push(0xC0 | (c >> 6) as u8);
                out.push(0x80 | (c & 0x3F) as u8);
            }
            0x800..=0xFFFF => push_unit(&mut out, c as u16),
            _ => {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    push_unit(&mut out, *unit);
                }
            }
        }
    }
    out
}

/// Number of bytes `encode` produces for `s`.
pub fn encoded_len(s: &str) -> usize {
    s.chars()
        .map(|ch| match ch as u32 {
            0x01..=0x7F => 1,
            0x00 | 0x80..=0x7FF => 2,
            0x800..=0xFFFF => 3,
            _ => 6,
        })
        .sum()
}

fn push_unit(out: &mut Vec<u8>, unit: u16) {
    out.push(0xE0 | (unit >> 12) as u8);
    out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
    out.push(0x80 | (unit & 0x3F) as u8);
}

/// Decode modified UTF-8. Unpaired surrogates are rejected.
pub fn decode(bytes: &[u8]) -> Result<String> {
    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0usize;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            0x01..=0x7F => {
                units.push(b as u16);
                i += 1;
            }
            0xC0..=0xDF => {
                let b2 = continuation(bytes, i + 1)?;
                units.push(((b as u16 & 0x1F) << 6) | b2);
                i += 2;
            }
            0xE0..=0xEF => {
                let b2 = continuation(bytes, i + 1)?;
                let b3 = continuation(bytes, i + 2)?;
                units.push(((b as u16 & 0x0F) << 12) | (b2 << 6) | b3);
                i += 3;
            }
            _ => return Err(ClassFileError::InvalidModifiedUtf8(i)),
        }
    }
    String::from_utf16(&units).map_err(|_| ClassFileError::InvalidModifiedUtf8(bytes.len()))
}

fn continuation(bytes: &[u8], at: usize) -> Result<u16> {
    match bytes.get(at) {
        Some(b) if b & 0xC0 == 0x80 => Ok((b & 0x3F) as u16),
        _ => Err(ClassFileError::InvalidModifiedUtf8(at)),
    }
}

//! Regrouping of bit streams between group widths, most significant bit
//! first. Bech32 carries 8-bit payloads as 5-bit groups.

use alloc::vec::Vec;

use crate::bech32::Error;

/// Regroups `data`, whose values are `from` bits wide, into values `to` bits
/// wide.
///
/// With `pad` set, a trailing partial group is filled with zero bits and
/// emitted. Without it, the trailing bits must be fewer than `from` and all
/// zero, otherwise the input was not produced by a padded conversion.
///
/// # Examples
///
/// ```
/// use lnurl::bits::convert_bits;
/// assert_eq!(convert_bits(&[0xff], 8, 5, true).unwrap(), vec![31, 28]);
/// assert_eq!(convert_bits(&[31, 28], 5, 8, false).unwrap(), vec![0xff]);
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidGroupWidth`] if `from` or `to` is not in `1..=8`,
/// [`Error::InvalidData`] if a value does not fit in `from` bits and
/// [`Error::InvalidPadding`] if unpadded input leaves a non-canonical tail.
pub fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Result<Vec<u8>, Error> {
    if let Some(width) = [from, to].into_iter().find(|w| !(1..=8).contains(w)) {
        return Err(Error::InvalidGroupWidth(width));
    }
    if let Some(&value) = data.iter().find(|&&v| u32::from(v) >> from != 0) {
        return Err(Error::InvalidData(value));
    }
    let (mut out, acc, bits) = regroup(data, from, to);
    if pad {
        push_padded(&mut out, acc, bits, to);
    } else if bits >= from || (acc << (to - bits)) & mask(to) != 0 {
        return Err(Error::InvalidPadding);
    }
    Ok(out)
}

/// Regroups bytes into zero-padded 5-bit groups. Never fails.
#[must_use]
pub fn to_base32(data: &[u8]) -> Vec<u8> {
    let (mut out, acc, bits) = regroup(data, 8, 5);
    push_padded(&mut out, acc, bits, 5);
    out
}

/// Regroups 5-bit groups back into bytes.
///
/// # Errors
///
/// See [`convert_bits`].
pub fn from_base32(data: &[u8]) -> Result<Vec<u8>, Error> {
    convert_bits(data, 5, 8, false)
}

fn mask(width: u32) -> u32 {
    (1 << width) - 1
}

/// Returns the complete groups along with the accumulator and the number of
/// bits still pending in it.
#[allow(clippy::cast_possible_truncation)]
fn regroup(data: &[u8], from: u32, to: u32) -> (Vec<u8>, u32, u32) {
    let max_acc = mask(from + to - 1);
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    for &value in data {
        acc = ((acc << from) | u32::from(value)) & max_acc;
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & mask(to)) as u8);
        }
    }
    (out, acc, bits)
}

#[allow(clippy::cast_possible_truncation)]
fn push_padded(out: &mut Vec<u8>, acc: u32, bits: u32, to: u32) {
    if bits > 0 {
        out.push(((acc << (to - bits)) & mask(to)) as u8);
    }
}

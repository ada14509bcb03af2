//! Encode and decode 5-bit payloads according to the [`bech32`](https://github.com/bitcoin/bips/blob/master/bip-0173.mediawiki) scheme.
//!
//! A bech32 string consists of a human-readable part, the separator `1`, the
//! data part mapped through a 32-character alphabet, and a six character
//! checksum over both parts.
//!
//! ```
//! use lnurl::bech32::{decode, encode};
//! let encoded = encode("a", &[]).unwrap();
//! assert_eq!(encoded, "a12uel5l");
//! assert_eq!(decode("A12UEL5L").unwrap(), ("a".to_string(), vec![]));
//! ```
//!
//! Unlike BIP-173 addresses, no overall length limit is enforced: LNURLs
//! wrap entire URLs and routinely exceed 90 characters.

use alloc::string::String;
use alloc::vec::Vec;

use crate::constants::{CHARSET, CHECKSUM_LENGTH, GENERATOR, SEPARATOR};

/// Longest human-readable part accepted by the encoder.
const MAX_HRP_LENGTH: usize = 83;

/// The different errors that can be returned when encoding or decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The string mixes upper and lower case characters.
    MixedCase,
    /// A character is outside the printable ASCII range or, in the data
    /// part, outside the bech32 alphabet.
    InvalidChar(char),
    /// The separator is missing, the human-readable part is empty, or the
    /// data part is too short to hold a checksum.
    InvalidSeparator,
    /// The checksum doesn't validate.
    InvalidChecksum,
    /// The trailing bits of a 5-bit payload are not a canonical zero padding.
    InvalidPadding,
    /// A value does not fit in the source group width.
    InvalidData(u8),
    /// A group width outside `1..=8` bits.
    InvalidGroupWidth(u32),
    /// The human-readable part is empty, too long or not printable ASCII.
    InvalidHrp,
    /// The string decoded fine but carries another human-readable part.
    UnexpectedHrp(String),
    /// The decoded payload is not valid UTF-8.
    NonUtf8,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MixedCase => write!(f, "mixed-case string"),
            Self::InvalidChar(c) => write!(f, "invalid character {c:?}"),
            Self::InvalidSeparator => write!(f, "missing or misplaced separator"),
            Self::InvalidChecksum => write!(f, "invalid checksum"),
            Self::InvalidPadding => write!(f, "non-canonical padding"),
            Self::InvalidData(v) => write!(f, "value {v} does not fit the group width"),
            Self::InvalidGroupWidth(w) => write!(f, "group width {w} is not between 1 and 8"),
            Self::InvalidHrp => write!(f, "invalid human-readable part"),
            Self::UnexpectedHrp(hrp) => write!(f, "unexpected human-readable part {hrp:?}"),
            Self::NonUtf8 => write!(f, "payload is not valid UTF-8"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

fn polymod(values: impl Iterator<Item = u8>) -> u32 {
    let mut chk: u32 = 1;
    for value in values {
        let top = chk >> 25;
        chk = ((chk & 0x01ff_ffff) << 5) ^ u32::from(value);
        for (i, g) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }
    chk
}

fn hrp_expand(hrp: &str) -> impl Iterator<Item = u8> + '_ {
    hrp.bytes()
        .map(|c| c >> 5)
        .chain(core::iter::once(0))
        .chain(hrp.bytes().map(|c| c & 0x1f))
}

#[allow(clippy::cast_possible_truncation)]
fn create_checksum(hrp: &str, data: &[u8]) -> [u8; CHECKSUM_LENGTH] {
    let values = hrp_expand(hrp)
        .chain(data.iter().copied())
        .chain([0; CHECKSUM_LENGTH]);
    let residue = polymod(values) ^ 1;
    let mut checksum = [0; CHECKSUM_LENGTH];
    for (i, c) in checksum.iter_mut().enumerate() {
        *c = ((residue >> (5 * (CHECKSUM_LENGTH - 1 - i))) & 0x1f) as u8;
    }
    checksum
}

fn verify_checksum(hrp: &str, data: &[u8]) -> bool {
    polymod(hrp_expand(hrp).chain(data.iter().copied())) == 1
}

#[allow(clippy::cast_possible_truncation)]
fn value_of(c: char) -> Option<u8> {
    if !c.is_ascii() {
        return None;
    }
    CHARSET.iter().position(|&a| a == c as u8).map(|v| v as u8)
}

/// Encodes 5-bit `data` under the human-readable part `hrp`. The result is
/// always lowercase.
///
/// # Examples
///
/// ```
/// use lnurl::bech32::encode;
/// assert_eq!(encode("lnurl", &[0, 1, 2, 3]).unwrap(), "lnurl1qpzrzz6uc7");
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidHrp`] if `hrp` is empty, longer than 83
/// characters or contains characters outside `!`..=`~`, and
/// [`Error::InvalidData`] if a data value does not fit in five bits.
pub fn encode(hrp: &str, data: &[u8]) -> Result<String, Error> {
    if hrp.is_empty()
        || hrp.len() > MAX_HRP_LENGTH
        || !hrp.bytes().all(|c| (0x21..=0x7e).contains(&c))
    {
        return Err(Error::InvalidHrp);
    }
    if let Some(&value) = data.iter().find(|&&v| v >= 32) {
        return Err(Error::InvalidData(value));
    }
    Ok(encode_unchecked(&hrp.to_ascii_lowercase(), data))
}

/// Encodes without validating `hrp` or `data`. Callers guarantee a lowercase
/// printable `hrp` and values below 32.
pub(crate) fn encode_unchecked(hrp: &str, data: &[u8]) -> String {
    let checksum = create_checksum(hrp, data);
    let mut encoded = String::with_capacity(hrp.len() + 1 + data.len() + CHECKSUM_LENGTH);
    encoded.push_str(hrp);
    encoded.push(SEPARATOR);
    encoded.extend(
        data.iter()
            .chain(checksum.iter())
            .map(|&v| char::from(CHARSET[usize::from(v)])),
    );
    encoded
}

/// Decodes a bech32 string into its lowercase human-readable part and its
/// 5-bit data, with the checksum stripped.
///
/// # Examples
///
/// ```
/// use lnurl::bech32::decode;
/// let (hrp, data) = decode("lnurl1qpzrzz6uc7").unwrap();
/// assert_eq!(hrp, "lnurl");
/// assert_eq!(data, vec![0, 1, 2, 3]);
/// ```
///
/// # Errors
///
/// Fails if the string mixes case, contains characters outside the printable
/// ASCII range or the alphabet, lacks a well-placed separator, or if the
/// checksum does not verify.
pub fn decode(encoded: &str) -> Result<(String, Vec<u8>), Error> {
    if let Some(c) = encoded.chars().find(|&c| !('!'..='~').contains(&c)) {
        return Err(Error::InvalidChar(c));
    }
    let has_lower = encoded.bytes().any(|c| c.is_ascii_lowercase());
    let has_upper = encoded.bytes().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(Error::MixedCase);
    }
    let encoded = encoded.to_ascii_lowercase();

    let position = encoded.rfind(SEPARATOR).ok_or(Error::InvalidSeparator)?;
    if position == 0 || position + 1 + CHECKSUM_LENGTH > encoded.len() {
        return Err(Error::InvalidSeparator);
    }
    let (hrp, rest) = encoded.split_at(position);
    let mut data = rest[1..]
        .chars()
        .map(|c| value_of(c).ok_or(Error::InvalidChar(c)))
        .collect::<Result<Vec<u8>, Error>>()?;

    if !verify_checksum(hrp, &data) {
        return Err(Error::InvalidChecksum);
    }
    data.truncate(data.len() - CHECKSUM_LENGTH);
    Ok((hrp.into(), data))
}

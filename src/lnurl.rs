//! Wrapping of opaque payloads, usually URLs, into `lnurl`-tagged bech32
//! strings for transport in QR codes and other out-of-band channels.

use alloc::string::String;
use alloc::vec::Vec;

use crate::bech32::{self, Error};
use crate::bits;
use crate::constants::HRP;

/// Encodes a byte payload into an `lnurl1...` string.
///
/// # Examples
///
/// ```
/// assert_eq!(lnurl::encode(b""), "lnurl13myvsu");
/// assert_eq!(lnurl::encode(b"hello"), "lnurl1dpjkcmr02q7dea");
/// ```
#[must_use]
pub fn encode(data: &[u8]) -> String {
    bech32::encode_unchecked(HRP, &bits::to_base32(data))
}

/// Same as [`encode`] but uppercase, which QR encoders pack into the denser
/// alphanumeric mode.
#[must_use]
pub fn encode_upper(data: &[u8]) -> String {
    encode(data).to_ascii_uppercase()
}

/// Encodes a URL into an `lnurl1...` string.
#[must_use]
pub fn encode_url(url: &str) -> String {
    encode(url.as_bytes())
}

/// Decodes an `lnurl1...` string, in either case, back into its payload.
///
/// # Examples
///
/// ```
/// assert_eq!(lnurl::decode("lnurl1dpjkcmr02q7dea").unwrap(), b"hello");
/// assert_eq!(lnurl::decode("LNURL1DPJKCMR02Q7DEA").unwrap(), b"hello");
/// ```
///
/// # Errors
///
/// Any format error reported by [`bech32::decode`], [`Error::UnexpectedHrp`]
/// when the human-readable part is not `lnurl`, and [`Error::InvalidPadding`]
/// when the data part is not a canonical regrouping of whole bytes.
pub fn decode(encoded: &str) -> Result<Vec<u8>, Error> {
    let (hrp, data) = bech32::decode(encoded)?;
    if hrp != HRP {
        return Err(Error::UnexpectedHrp(hrp));
    }
    bits::from_base32(&data)
}

/// Decodes an `lnurl1...` string whose payload is a URL.
///
/// # Errors
///
/// See [`decode`]; additionally [`Error::NonUtf8`] if the payload is not
/// UTF-8.
pub fn decode_url(encoded: &str) -> Result<String, Error> {
    String::from_utf8(decode(encoded)?).map_err(|_| Error::NonUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str =
        "https://service.com/api?q=3fc3645b439ce8e7f2553a69e5267081d96dcd340693afabe04be7b0ccd178df";
    const ENCODED: &str = "lnurl1dp68gurn8ghj7um9wfmxjcm99e3k7mf0v9cxj0m385ekvcenxc6r2c35xvukxefcv5mkvv34x5ekzd3ev56nyd3hxqurzepexejxxepnxscrvwfnv9nxzcn9xq6xyefhvgcxxcmyxymnserxfq5fns";

    #[test]
    fn test_encode() {
        assert_eq!(encode_url(URL), ENCODED);
        assert_eq!(encode(&[0]), "lnurl1qqgzqm6d");
        assert_eq!(encode(&[0xff]), "lnurl1ludh0vcf");
        assert_eq!(encode_upper(&[0xff]), "LNURL1LUDH0VCF");
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode_url(ENCODED).unwrap(), URL);
        assert_eq!(decode_url(&ENCODED.to_ascii_uppercase()).unwrap(), URL);
        assert_eq!(decode("lnurl13myvsu").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_round_trip() {
        for length in 0..=100 {
            #[allow(clippy::cast_possible_truncation)]
            let data: Vec<u8> = (0..length).map(|i| (i * 151 + 7) as u8).collect();
            assert_eq!(decode(&encode(&data)).unwrap(), data);
        }
    }

    #[test]
    fn test_single_character_changes_are_detected() {
        let encoded = encode_url("https://localhost:3000/lnurl?id=5d4aeb462a");
        for (index, c) in encoded.char_indices() {
            let replacement = if index < crate::constants::HRP.len() {
                if c == 'x' { 'y' } else { 'x' }
            } else if c == '1' {
                'q'
            } else {
                let value = crate::constants::CHARSET
                    .iter()
                    .position(|&a| char::from(a) == c)
                    .unwrap();
                char::from(crate::constants::CHARSET[(value + 1) % 32])
            };
            let mut corrupted = encoded.clone();
            corrupted.replace_range(index..=index, &replacement.to_string());
            assert!(decode(&corrupted).is_err(), "{corrupted}");
        }
    }

    #[test]
    fn test_decode_errors() {
        // mixed case
        assert_eq!(decode("lnurl1DPJKCMR02Q7DEA").unwrap_err(), Error::MixedCase);
        // 'b' is not part of the alphabet
        assert_eq!(decode("lnurl1bpjkcmr02q7dea").unwrap_err(), Error::InvalidChar('b'));
        // bad checksum
        assert_eq!(decode("lnurl1dpjkcmr02q7deq").unwrap_err(), Error::InvalidChecksum);
        // a lone trailing group holds five bits
        assert_eq!(decode("lnurl1leltelt").unwrap_err(), Error::InvalidPadding);
        // nonzero padding bits
        assert_eq!(decode("lnurl1laspme9m").unwrap_err(), Error::InvalidPadding);
        // valid bech32, foreign prefix
        assert_eq!(decode("a12uel5l").unwrap_err(), Error::UnexpectedHrp("a".into()));
    }
}

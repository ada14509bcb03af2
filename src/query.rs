//! Canonical query strings.
//!
//! A [`Query`] is kept sorted by key, so its serialization is deterministic
//! no matter the insertion order. The serialized form is what gets signed,
//! so both the ordering and the escaping must match byte for byte on every
//! implementation that verifies it.
//!
//! ```
//! use lnurl::query::{stringify, Query};
//! let mut query = Query::new();
//! query.insert("tag".into(), "withdrawRequest".into());
//! query.insert("defaultDescription".into(), "coffee & cake".into());
//! assert_eq!(
//!     stringify(&query),
//!     "defaultDescription=coffee%20%26%20cake&tag=withdrawRequest"
//! );
//! ```

use alloc::borrow::ToOwned;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::constants::{KEY_TAG, SHORT_KEYS, SHORT_TAGS};

/// Query parameters, ordered by key.
pub type Query = BTreeMap<String, String>;

/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is escaped, the same set
/// JavaScript's `encodeURIComponent` leaves intact.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes every byte outside the unreserved set as `%XX` with
/// uppercase hex digits.
///
/// ```
/// use lnurl::query::escape;
/// assert_eq!(escape("a b/ü"), "a%20b%2F%C3%BC");
/// assert_eq!(escape("-_.!~*'()"), "-_.!~*'()");
/// ```
#[must_use]
pub fn escape(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Serializes `query` as `key=value` pairs joined by `&`, in ascending key
/// order, with keys and values escaped by [`escape`].
#[must_use]
pub fn stringify(query: &Query) -> String {
    query
        .iter()
        .map(|(key, value)| alloc::format!("{}={}", escape(key), escape(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Parses a query string, with or without a leading `?`. Pairs without `=`
/// get an empty value; invalid UTF-8 in escapes is replaced.
#[must_use]
pub fn parse(query_string: &str) -> Query {
    let query_string = query_string.strip_prefix('?').unwrap_or(query_string);
    query_string
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (unescape(key), unescape(value))
        })
        .collect()
}

fn unescape(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

/// Returns a copy of `query` with known keys and the `tag` value replaced by
/// their abbreviations. Unknown keys pass through unchanged.
#[must_use]
pub fn shorten(query: &Query) -> Query {
    query
        .iter()
        .map(|(key, value)| {
            let value = if key == KEY_TAG {
                SHORT_TAGS
                    .get(value.as_str())
                    .copied()
                    .unwrap_or(value.as_str())
            } else {
                value.as_str()
            };
            let key = SHORT_KEYS.get(key.as_str()).copied().unwrap_or(key.as_str());
            (key.to_owned(), value.to_owned())
        })
        .collect()
}

/// Reverses [`shorten`].
#[must_use]
pub fn expand(query: &Query) -> Query {
    query
        .iter()
        .map(|(key, value)| {
            let key = SHORT_KEYS
                .entries()
                .find(|(_, short)| **short == key.as_str())
                .map_or(key.as_str(), |(long, _)| *long);
            let value = if key == KEY_TAG {
                SHORT_TAGS
                    .entries()
                    .find(|(_, short)| **short == value.as_str())
                    .map_or(value.as_str(), |(long, _)| *long)
            } else {
                value.as_str()
            };
            (key.to_owned(), value.to_owned())
        })
        .collect()
}

/// Whether `key` is a reserved parameter, in either its long or its
/// abbreviated form.
#[must_use]
pub fn is_reserved_key(key: &str) -> bool {
    SHORT_KEYS
        .entries()
        .any(|(long, short)| *long == key || *short == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> Query {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_stringify_is_sorted() {
        let forward = query(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let backward = query(&[("c", "3"), ("b", "2"), ("a", "1")]);
        assert_eq!(stringify(&forward), "a=1&b=2&c=3");
        assert_eq!(stringify(&backward), "a=1&b=2&c=3");
        // byte order: uppercase sorts before lowercase
        assert_eq!(stringify(&query(&[("b", ""), ("B", ""), ("a", "")])), "B=&a=&b=");
        assert_eq!(stringify(&Query::new()), "");
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("abcABC0123 ESCAPED # UNESCAPED -_.!~*'() RESERVED ;,/?:@&=+$"),
            "abcABC0123%20ESCAPED%20%23%20UNESCAPED%20-_.!~*'()%20RESERVED%20%3B%2C%2F%3F%3A%40%26%3D%2B%24"
        );
        assert_eq!(escape("café ⚡"), "caf%C3%A9%20%E2%9A%A1");
        assert_eq!(escape("\"<>[]{}|\\^`%"), "%22%3C%3E%5B%5D%7B%7D%7C%5C%5E%60%25");
        assert_eq!(escape("9Pfv1wY="), "9Pfv1wY%3D");
    }

    #[test]
    fn test_hex_digests_need_no_escaping() {
        let digits = "0123456789abcdef";
        assert_eq!(escape(digits), digits);
        assert_eq!(escape(&digits.to_uppercase()), digits.to_uppercase());
    }

    #[test]
    fn test_parse() {
        let parsed = parse("?b=x%20y&a=&c");
        assert_eq!(parsed, query(&[("a", ""), ("b", "x y"), ("c", "")]));
        let original = query(&[("desc", "a&b=c ü"), ("id", "9Pfv1wY=")]);
        assert_eq!(parse(&stringify(&original)), original);
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_shorten() {
        let long = query(&[
            ("id", "5d4aeb462a"),
            ("tag", "withdrawRequest"),
            ("nonce", "n0"),
            ("minWithdrawable", "1"),
            ("maxWithdrawable", "2"),
            ("defaultDescription", ""),
            ("fiatCurrency", "CZK"),
            ("signature", "00"),
            ("custom", "kept"),
        ]);
        let short = shorten(&long);
        assert_eq!(
            stringify(&short),
            "custom=kept&f=CZK&id=5d4aeb462a&n=n0&pd=&pn=1&px=2&s=00&t=w"
        );
        assert_eq!(expand(&short), long);
    }

    #[test]
    fn test_unknown_tag_is_kept() {
        let long = query(&[("tag", "payRequest")]);
        assert_eq!(shorten(&long), query(&[("t", "payRequest")]));
    }

    #[test]
    fn test_reserved_keys() {
        for key in [
            "id",
            "nonce",
            "n",
            "signature",
            "s",
            "tag",
            "t",
            "minWithdrawable",
            "pn",
            "maxWithdrawable",
            "px",
            "defaultDescription",
            "pd",
            "fiatCurrency",
            "f",
        ] {
            assert!(is_reserved_key(key), "{key}");
        }
        for key in ["custom1", "ID", "withdrawRequest", "w", ""] {
            assert!(!is_reserved_key(key), "{key}");
        }
    }
}

//! `lnurl` is a crate for devices that hand out [LNURL](https://github.com/lnurl/luds)
//! links without talking to the LNURL server themselves.
//!
//! # Encode a URL
//! ```
//! let encoded = lnurl::encode(b"https://service.com/api?q=3fc3645b439ce8e7f2553a69e5267081d96dcd340693afabe04be7b0ccd178df");
//! assert_eq!(
//!     encoded,
//!     "lnurl1dp68gurn8ghj7um9wfmxjcm99e3k7mf0v9cxj0m385ekvcenxc6r2c35xvukxefcv5mkvv34x5ekzd3ev56nyd3hxqurzepexejxxepnxscrvwfnv9nxzcn9xq6xyefhvgcxxcmyxymnserxfq5fns"
//! );
//! assert_eq!(
//!     lnurl::decode(&encoded).unwrap(),
//!     b"https://service.com/api?q=3fc3645b439ce8e7f2553a69e5267081d96dcd340693afabe04be7b0ccd178df"
//! );
//! ```
//!
//! # Sign a withdraw request
//!
//! The server shares an API key with the device. The device signs the
//! request parameters with it, so the server can trust a URL it has never
//! seen before.
//! ```
//! use lnurl::{ApiKey, KeyEncoding, Signer, SignerConfig, WithdrawParams};
//!
//! let api_key = ApiKey::new(
//!     "5d4aeb462a",
//!     "ef9901bebc801518e7d862c2edaedd3acd86ec132fb3bd5ac0013c9a5ba478db",
//!     KeyEncoding::Hex,
//! );
//! let config = SignerConfig::new(api_key, "https://localhost:3000/lnurl").with_shorten(true);
//! let signer = Signer::new(config).unwrap();
//! let url = signer
//!     .create_withdraw_url(&WithdrawParams::msat(50000, 60000), "test_w_s")
//!     .unwrap();
//! assert_eq!(
//!     url,
//!     "https://localhost:3000/lnurl?id=5d4aeb462a&n=test_w_s&pd=&pn=50000&px=60000\
//!      &s=de03a6590821287d5cba14f99e74fa8fb047118ea2cf1a8f0e812a6c42a99277&t=w"
//! );
//!
//! // Wrap it for a QR code.
//! let link = lnurl::encode_upper(url.as_bytes());
//! assert!(link.starts_with("LNURL1"));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod bech32;
pub mod bits;
pub mod constants;
pub mod lnurl;
pub mod query;
pub mod signer;

pub use self::lnurl::{decode, decode_url, encode, encode_upper, encode_url};
pub use self::query::Query;
pub use self::signer::{ApiKey, KeyEncoding, Signer, SignerConfig, WithdrawParams, Withdrawable};

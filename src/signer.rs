//! Signed LNURL callback URLs.
//!
//! A [`Signer`] holds an API key shared with the LNURL server. Every URL it
//! builds carries an HMAC-SHA256 signature over the canonical form of its
//! query (see [`crate::query::stringify`]), so the server can check the
//! request was built by a holder of the key without the device ever talking
//! to it.
//!
//! ```
//! use lnurl::{ApiKey, KeyEncoding, Signer, SignerConfig, WithdrawParams};
//!
//! let api_key = ApiKey::new(
//!     "5d4aeb462a",
//!     "ef9901bebc801518e7d862c2edaedd3acd86ec132fb3bd5ac0013c9a5ba478db",
//!     KeyEncoding::Hex,
//! );
//! let signer = Signer::new(SignerConfig::new(api_key, "https://localhost:3000/lnurl")).unwrap();
//! let url = signer
//!     .create_withdraw_url(&WithdrawParams::msat(40000, 60000), "test_withdraw")
//!     .unwrap();
//! assert_eq!(
//!     url,
//!     "https://localhost:3000/lnurl?defaultDescription=&id=5d4aeb462a&maxWithdrawable=60000\
//!      &minWithdrawable=40000&nonce=test_withdraw\
//!      &signature=73eed1984c403ff10d3ae211fe0dbc880ce16923abe3da08aedea5cd80fb7f8f&tag=withdrawRequest"
//! );
//! ```

use alloc::borrow::ToOwned;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::str::FromStr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bitcoin_hashes::{hmac, sha256, Hash, HashEngine};

use crate::constants::{
    KEY_DEFAULT_DESCRIPTION, KEY_FIAT_CURRENCY, KEY_ID, KEY_MAX_WITHDRAWABLE,
    KEY_MIN_WITHDRAWABLE, KEY_NONCE, KEY_SIGNATURE, KEY_TAG, TAG_WITHDRAW_REQUEST,
};
use crate::query::{self, Query};

/// Errors raised while configuring a [`Signer`] or validating a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The key encoding is not one of `"hex"`, `"base64"` or `""`.
    UnsupportedEncoding(String),
    /// The key is not valid under its declared encoding.
    InvalidKey(KeyEncoding),
    /// The nonce is empty.
    MissingNonce,
    /// The named amount is not a finite number.
    InvalidAmount(&'static str),
    /// The named amount is negative.
    NegativeAmount(&'static str),
    /// `maxWithdrawable` is lower than `minWithdrawable`.
    InvertedBounds,
    /// A custom parameter uses a reserved key.
    ReservedKey(String),
}

impl Error {
    /// Whether the error comes from the signer configuration rather than
    /// from a single request.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::UnsupportedEncoding(_) | Self::InvalidKey(_))
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnsupportedEncoding(encoding) => write!(
                f,
                "Invalid config (\"apiKey.encoding\"): Unsupported encoding {encoding:?} - \"hex\", \"base64\", or \"\" are permitted."
            ),
            Self::InvalidKey(encoding) => write!(
                f,
                "Invalid config (\"apiKey.key\"): Not valid {encoding} data"
            ),
            Self::MissingNonce => write!(f, "Missing required argument: \"nonce\""),
            Self::InvalidAmount(field) => write!(f, "\"{field}\" must be a number"),
            Self::NegativeAmount(field) => {
                write!(f, "\"{field}\" must be greater than or equal to zero")
            }
            Self::InvertedBounds => write!(
                f,
                "\"maxWithdrawable\" must be greater than or equal to \"minWithdrawable\""
            ),
            Self::ReservedKey(key) => {
                write!(f, "Invalid custom parameter key (\"{key}\"): Reserved")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// How the secret of an [`ApiKey`] is written down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum KeyEncoding {
    /// Hex digits, decoded before use.
    Hex,
    /// Standard base64, decoded before use.
    Base64,
    /// The key text itself is the secret.
    #[default]
    Unspecified,
}

impl KeyEncoding {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hex => "hex",
            Self::Base64 => "base64",
            Self::Unspecified => "",
        }
    }
}

impl FromStr for KeyEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hex" => Ok(Self::Hex),
            "base64" => Ok(Self::Base64),
            "" => Ok(Self::Unspecified),
            other => Err(Error::UnsupportedEncoding(other.to_owned())),
        }
    }
}

impl TryFrom<String> for KeyEncoding {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeyEncoding> for String {
    fn from(encoding: KeyEncoding) -> Self {
        encoding.as_str().into()
    }
}

impl core::fmt::Display for KeyEncoding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unspecified => write!(f, "unspecified"),
            encoding => write!(f, "{}", encoding.as_str()),
        }
    }
}

/// Identity and secret shared with the LNURL server.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApiKey {
    pub id: String,
    pub key: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub encoding: KeyEncoding,
}

impl ApiKey {
    #[must_use]
    pub fn new(id: impl Into<String>, key: impl Into<String>, encoding: KeyEncoding) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            encoding,
        }
    }

    /// The raw HMAC key.
    fn secret(&self) -> Result<Vec<u8>, Error> {
        match self.encoding {
            KeyEncoding::Hex => {
                hex::decode(&self.key).map_err(|_| Error::InvalidKey(self.encoding))
            }
            KeyEncoding::Base64 => BASE64
                .decode(&self.key)
                .map_err(|_| Error::InvalidKey(self.encoding)),
            KeyEncoding::Unspecified => Ok(self.key.as_bytes().to_vec()),
        }
    }
}

impl core::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiKey")
            .field("id", &self.id)
            .field("key", &"<redacted>")
            .field("encoding", &self.encoding)
            .finish()
    }
}

/// Everything a [`Signer`] needs to build URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct SignerConfig {
    pub api_key: ApiKey,
    /// Base URL the signed query is appended to.
    pub callback_url: String,
    /// Currency of fiat-denominated withdrawals, e.g. `"EUR"`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub fiat_currency: String,
    /// Abbreviate keys and the tag value after signing.
    #[cfg_attr(feature = "serde", serde(default))]
    pub shorten: bool,
}

impl SignerConfig {
    #[must_use]
    pub fn new(api_key: ApiKey, callback_url: impl Into<String>) -> Self {
        Self {
            api_key,
            callback_url: callback_url.into(),
            fiat_currency: String::new(),
            shorten: false,
        }
    }

    #[must_use]
    pub fn with_fiat_currency(mut self, fiat_currency: impl Into<String>) -> Self {
        self.fiat_currency = fiat_currency.into();
        self
    }

    #[must_use]
    pub fn with_shorten(mut self, shorten: bool) -> Self {
        self.shorten = shorten;
        self
    }
}

/// Withdrawable range of a withdraw request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Withdrawable {
    /// Millisatoshis.
    MilliSatoshis { min: u64, max: u64 },
    /// Units of the signer's configured fiat currency.
    Fiat { min: f64, max: f64 },
}

impl Withdrawable {
    /// Checks the range and renders both ends as decimal text. Fiat amounts
    /// use the shortest representation that round-trips, without exponent,
    /// so `50.0` becomes `"50"`.
    fn render(&self) -> Result<(String, String), Error> {
        match *self {
            Self::MilliSatoshis { min, max } => {
                if max < min {
                    return Err(Error::InvertedBounds);
                }
                Ok((alloc::format!("{min}"), alloc::format!("{max}")))
            }
            Self::Fiat { min, max } => {
                if !min.is_finite() {
                    return Err(Error::InvalidAmount(KEY_MIN_WITHDRAWABLE));
                }
                if !max.is_finite() {
                    return Err(Error::InvalidAmount(KEY_MAX_WITHDRAWABLE));
                }
                if min < 0.0 {
                    return Err(Error::NegativeAmount(KEY_MIN_WITHDRAWABLE));
                }
                if max < min {
                    return Err(Error::InvertedBounds);
                }
                // -0.0 would otherwise render as "-0"
                Ok((alloc::format!("{}", min + 0.0), alloc::format!("{}", max + 0.0)))
            }
        }
    }
}

/// Parameters of an LNURL-withdraw request.
#[derive(Debug, Clone, PartialEq)]
pub struct WithdrawParams {
    pub withdrawable: Withdrawable,
    pub default_description: String,
    /// Extra query parameters. Keys must not be reserved.
    pub custom: BTreeMap<String, String>,
}

impl WithdrawParams {
    #[must_use]
    pub fn msat(min: u64, max: u64) -> Self {
        Self::new(Withdrawable::MilliSatoshis { min, max })
    }

    #[must_use]
    pub fn fiat(min: f64, max: f64) -> Self {
        Self::new(Withdrawable::Fiat { min, max })
    }

    fn new(withdrawable: Withdrawable) -> Self {
        Self {
            withdrawable,
            default_description: String::new(),
            custom: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.default_description = description.into();
        self
    }

    #[must_use]
    pub fn with_custom(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom.insert(key.into(), value.into());
        self
    }
}

/// Builds signed callback URLs. Immutable once constructed and safe to share
/// between threads.
pub struct Signer {
    config: SignerConfig,
    secret: Vec<u8>,
}

impl core::fmt::Debug for Signer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Signer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Signer {
    /// Validates `config` and decodes its key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKey`] if the key does not decode under its
    /// declared encoding.
    pub fn new(config: SignerConfig) -> Result<Self, Error> {
        let secret = config.api_key.secret()?;
        tracing::debug!(
            key_id = %config.api_key.id,
            encoding = %config.api_key.encoding,
            callback_url = %config.callback_url,
            shorten = config.shorten,
            "created signer"
        );
        Ok(Self { config, secret })
    }

    #[must_use]
    pub fn config(&self) -> &SignerConfig {
        &self.config
    }

    /// HMAC-SHA256 of `data` under the API key, as lowercase hex.
    ///
    /// ```
    /// use lnurl::{ApiKey, KeyEncoding, Signer, SignerConfig};
    /// let api_key = ApiKey::new(
    ///     "5d4aeb462a",
    ///     "ef9901bebc801518e7d862c2edaedd3acd86ec132fb3bd5ac0013c9a5ba478db",
    ///     KeyEncoding::Hex,
    /// );
    /// let signer = Signer::new(SignerConfig::new(api_key, "https://localhost:3000/lnurl")).unwrap();
    /// assert_eq!(
    ///     signer.create_signature("sign arbitrary data string"),
    ///     "3dbc16c2c5cd51797211316a5257ad151dafd05347da58da9ca2319a7a669277"
    /// );
    /// ```
    #[must_use]
    pub fn create_signature(&self, data: &str) -> String {
        let mut engine = hmac::HmacEngine::<sha256::Hash>::new(&self.secret);
        engine.input(data.as_bytes());
        hex::encode(hmac::Hmac::<sha256::Hash>::from_engine(engine).to_byte_array())
    }

    /// Replaces any `signature` in `query` with one computed over the rest of
    /// it in canonical form.
    pub fn sign_query(&self, query: &mut Query) {
        query.remove(KEY_SIGNATURE);
        let payload = query::stringify(query);
        tracing::trace!(payload_len = payload.len(), "signing query");
        let signature = self.create_signature(&payload);
        query.insert(KEY_SIGNATURE.into(), signature);
    }

    /// Signs `query` and, if configured, shortens it. Shortening comes last
    /// so the signature always covers the long form.
    #[must_use]
    pub fn create_query(&self, mut query: Query) -> Query {
        self.sign_query(&mut query);
        if self.config.shorten {
            query::shorten(&query)
        } else {
            query
        }
    }

    /// Signs an arbitrary query and appends it to the callback URL. No
    /// validation is done on the parameters.
    ///
    /// With shortening on, a key that equals an abbreviation (`s`, `n`, `t`,
    /// ...) collides with the abbreviated reserved key and its value is lost,
    /// so the resulting URL does not verify. Use
    /// [`query::is_reserved_key`] to screen keys when that matters.
    #[must_use]
    pub fn create_url(&self, query: Query) -> String {
        let query = self.create_query(query);
        alloc::format!("{}?{}", self.config.callback_url, query::stringify(&query))
    }

    /// Builds the signed callback URL of a withdraw request.
    ///
    /// # Errors
    ///
    /// Fails, before anything is signed, if `nonce` is empty, if the
    /// withdrawable range is negative, non-finite or inverted, or if a custom
    /// parameter uses a reserved key.
    pub fn create_withdraw_url(
        &self,
        params: &WithdrawParams,
        nonce: &str,
    ) -> Result<String, Error> {
        if nonce.is_empty() {
            return Err(Error::MissingNonce);
        }
        let (min, max) = params.withdrawable.render()?;

        let mut query = Query::new();
        query.insert(KEY_ID.into(), self.config.api_key.id.clone());
        query.insert(KEY_TAG.into(), TAG_WITHDRAW_REQUEST.into());
        query.insert(KEY_NONCE.into(), nonce.into());
        query.insert(KEY_MIN_WITHDRAWABLE.into(), min);
        query.insert(KEY_MAX_WITHDRAWABLE.into(), max);
        query.insert(KEY_DEFAULT_DESCRIPTION.into(), params.default_description.clone());
        if matches!(params.withdrawable, Withdrawable::Fiat { .. })
            && !self.config.fiat_currency.is_empty()
        {
            query.insert(KEY_FIAT_CURRENCY.into(), self.config.fiat_currency.clone());
        }
        for (key, value) in &params.custom {
            if query::is_reserved_key(key) {
                return Err(Error::ReservedKey(key.clone()));
            }
            query.insert(key.clone(), value.clone());
        }
        Ok(self.create_url(query))
    }

    /// Checks the signature of a received query. A query carrying
    /// `signature` is checked as given; one carrying only the abbreviated
    /// `s` is expanded first.
    #[must_use]
    pub fn verify_query(&self, query: &Query) -> bool {
        let mut query = if query.contains_key(KEY_SIGNATURE) {
            query.clone()
        } else {
            query::expand(query)
        };
        let Some(signature) = query.remove(KEY_SIGNATURE) else {
            return false;
        };
        let expected = self.create_signature(&query::stringify(&query));
        // fixed_time_eq panics on a length mismatch
        expected.len() == signature.len()
            && bitcoin_hashes::cmp::fixed_time_eq(
                expected.as_bytes(),
                signature.to_ascii_lowercase().as_bytes(),
            )
    }
}

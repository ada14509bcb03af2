/// Human-readable part of every encoded LNURL.
pub const HRP: &str = "lnurl";

/// Separates the human-readable part from the data part.
pub const SEPARATOR: char = '1';

/// The bech32 alphabet, indexed by 5-bit value.
pub const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Number of 5-bit groups in a bech32 checksum.
pub const CHECKSUM_LENGTH: usize = 6;

/// Generator coefficients of the bech32 BCH code.
pub const GENERATOR: [u32; 5] = [
    0x3b6a_57b2,
    0x2650_8e6d,
    0x1ea1_19fa,
    0x3d42_33dd,
    0x2a14_62b3,
];

pub const KEY_ID: &str = "id";
pub const KEY_NONCE: &str = "nonce";
pub const KEY_SIGNATURE: &str = "signature";
pub const KEY_TAG: &str = "tag";
pub const KEY_MIN_WITHDRAWABLE: &str = "minWithdrawable";
pub const KEY_MAX_WITHDRAWABLE: &str = "maxWithdrawable";
pub const KEY_DEFAULT_DESCRIPTION: &str = "defaultDescription";
pub const KEY_FIAT_CURRENCY: &str = "fiatCurrency";

pub const TAG_WITHDRAW_REQUEST: &str = "withdrawRequest";

/// Abbreviations applied to query keys when shortening is enabled. Both sides
/// of every entry are reserved and cannot be used as custom parameters.
pub static SHORT_KEYS: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "id" => "id",
    "nonce" => "n",
    "signature" => "s",
    "tag" => "t",
    "minWithdrawable" => "pn",
    "maxWithdrawable" => "px",
    "defaultDescription" => "pd",
    "fiatCurrency" => "f",
};

/// Abbreviations applied to the value of the `tag` key.
pub static SHORT_TAGS: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "withdrawRequest" => "w",
};

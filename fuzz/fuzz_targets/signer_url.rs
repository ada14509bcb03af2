use honggfuzz::fuzz;

use lnurl::{query, ApiKey, KeyEncoding, Signer, SignerConfig, WithdrawParams};

fn main() {
    let api_key = ApiKey::new("fuzz", "00112233445566778899aabbccddeeff", KeyEncoding::Hex);
    let config = SignerConfig::new(api_key, "https://localhost/lnurl").with_shorten(true);
    let signer = Signer::new(config).unwrap();
    loop {
        fuzz!(|data: &str| {
            let middle = (0..=data.len() / 2)
                .rev()
                .find(|&i| data.is_char_boundary(i))
                .unwrap_or(0);
            let (nonce, description) = data.split_at(middle);
            let params = WithdrawParams::msat(1, 2).with_description(description);
            if let Ok(url) = signer.create_withdraw_url(&params, nonce) {
                let received = query::parse(url.split_once('?').unwrap().1);
                assert!(signer.verify_query(&received));
            }
        });
    }
}

use qrcode::QrCode;

use std::io::Write;

use lnurl::{ApiKey, KeyEncoding, Signer, SignerConfig, WithdrawParams};

/// Prints a fresh withdraw link as a QR code every second.
///
/// Usage: `cargo run --example qr -- <callback-url> <key-id> <hex-key>`
fn main() {
    let mut args = std::env::args().skip(1);
    let callback_url = args.next().unwrap_or_else(|| "https://localhost:3000/lnurl".into());
    let id = args.next().unwrap_or_else(|| "5d4aeb462a".into());
    let key = args.next().unwrap_or_else(|| {
        "ef9901bebc801518e7d862c2edaedd3acd86ec132fb3bd5ac0013c9a5ba478db".into()
    });
    let config = SignerConfig::new(ApiKey::new(id, key, KeyEncoding::Hex), callback_url)
        .with_shorten(true);
    let signer = Signer::new(config).unwrap();

    let mut stdout = std::io::stdout();
    for counter in 0u64.. {
        let nonce = format!("demo{counter}");
        let url = signer
            .create_withdraw_url(&WithdrawParams::msat(1000, 100_000), &nonce)
            .unwrap();
        let link = lnurl::encode_upper(url.as_bytes());
        let code = QrCode::new(&link).unwrap();
        let string = code
            .render::<char>()
            .quiet_zone(false)
            .module_dimensions(2, 1)
            .build();
        stdout.write_all(format!("{string}\n").as_bytes()).unwrap();
        stdout
            .write_all(format!("{url}\n{link}\n\n\n\n").as_bytes())
            .unwrap();
        stdout.flush().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1000));
    }
}

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lnurl::{ApiKey, KeyEncoding, Signer, SignerConfig, WithdrawParams};

const URL: &str =
    "https://service.com/api?q=3fc3645b439ce8e7f2553a69e5267081d96dcd340693afabe04be7b0ccd178df";

fn criterion_benchmark(c: &mut Criterion) {
    let encoded = lnurl::encode(URL.as_bytes());
    c.bench_function("encode url", |b| b.iter(|| lnurl::encode(black_box(URL.as_bytes()))));
    c.bench_function("decode url", |b| b.iter(|| lnurl::decode(black_box(&encoded))));

    let api_key = ApiKey::new(
        "5d4aeb462a",
        "ef9901bebc801518e7d862c2edaedd3acd86ec132fb3bd5ac0013c9a5ba478db",
        KeyEncoding::Hex,
    );
    let signer = Signer::new(SignerConfig::new(api_key, "https://localhost:3000/lnurl")).unwrap();
    let params = WithdrawParams::msat(40000, 60000);
    c.bench_function("create withdraw url", |b| {
        b.iter(|| signer.create_withdraw_url(black_box(&params), black_box("test_withdraw")))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

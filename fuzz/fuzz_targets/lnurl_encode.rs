use honggfuzz::fuzz;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            let encoded = lnurl::encode(data);
            assert_eq!(lnurl::decode(&encoded).unwrap(), data);
            assert_eq!(lnurl::decode(&encoded.to_ascii_uppercase()).unwrap(), data);
        });
    }
}

//! Address codec properties and decoder robustness

use proptest::prelude::*;
use tn3270r::addressing::{decode_address, encode_12bit_address, encode_address};
use tn3270r::datastream::decode_inbound;
use tn3270r::Cp037;

#[test]
fn roundtrip_every_address() {
    for addr in 0u16..16384 {
        let [b1, b2] = encode_address(addr);
        assert_eq!(decode_address(b1, b2), addr, "address {}", addr);
    }
}

#[test]
fn twelve_bit_form_roundtrips_below_4096() {
    for addr in 0u16..4096 {
        let [b1, b2] = encode_12bit_address(addr);
        assert_eq!(decode_address(b1, b2), addr, "address {}", addr);
    }
}

#[test]
fn golden_encodings() {
    assert_eq!(encode_address(0), [0x40, 0x40]);
    assert_eq!(encode_address(79), [0xC1, 0x4F]);
    assert_eq!(encode_address(1919), [0x5D, 0x7F]);
    assert_eq!(encode_address(16383), [0x3F, 0xFF]);
}

proptest! {
    #[test]
    fn decode_never_panics_on_arbitrary_bytes(b1: u8, b2: u8) {
        let _ = decode_address(b1, b2);
    }

    #[test]
    fn decoder_never_panics_on_arbitrary_streams(data in proptest::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode_inbound(&data, &Cp037);
    }

    #[test]
    fn decoded_addresses_fit_fourteen_bits(b1: u8, b2: u8) {
        prop_assert!(decode_address(b1, b2) < 16384);
    }
}

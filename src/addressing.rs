//! 3270 buffer address codec
//!
//! A buffer address is a linear cell position encoded in two bytes. Two
//! forms exist on the wire:
//!
//! - 12-bit form: each byte carries 6 address bits through the fixed
//!   64-symbol address alphabet (the low 6 bits are the value, the top 2
//!   bits make the byte a printable EBCDIC character).
//! - 14-bit form: the raw address split 6/8 across the two bytes, with
//!   the top two bits of the first byte zero.
//!
//! The two forms are distinguishable on decode: every alphabet symbol
//! has at least one of its top two bits set, so a first byte with both
//! top bits clear can only be the 14-bit form.

use crate::error::DatastreamError;

/// The 64-symbol 3270 address alphabet, indexed by 6-bit value.
pub const ADDRESS_TABLE: [u8; 64] = [
    0x40, 0xC1, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6, 0xC7, 0xC8, 0xC9, 0x4A, 0x4B, 0x4C, 0x4D, 0x4E,
    0x4F, 0x50, 0xD1, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6, 0xD7, 0xD8, 0xD9, 0x5A, 0x5B, 0x5C, 0x5D,
    0x5E, 0x5F, 0x60, 0x61, 0xE2, 0xE3, 0xE4, 0xE5, 0xE6, 0xE7, 0xE8, 0xE9, 0x6A, 0x6B, 0x6C,
    0x6D, 0x6E, 0x6F, 0xF0, 0xF1, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7, 0xF8, 0xF9, 0x7A, 0x7B,
    0x7C, 0x7D, 0x7E, 0x7F,
];

/// Decode a 2-byte buffer address, auto-detecting the form.
pub fn decode_address(b1: u8, b2: u8) -> u16 {
    if (b1 & 0xC0) == 0x00 {
        // 14-bit raw form: 6 high bits + 8 low bits
        (((b1 & 0x3F) as u16) << 8) | b2 as u16
    } else {
        // 12-bit alphabet form: low 6 bits of each byte
        (((b1 & 0x3F) as u16) << 6) | (b2 & 0x3F) as u16
    }
}

/// Decode a buffer address from a byte slice at `pos`, consuming two
/// bytes. Errors if fewer than two bytes remain.
pub fn decode_address_at(data: &[u8], pos: usize) -> Result<u16, DatastreamError> {
    if pos + 1 >= data.len() {
        return Err(DatastreamError::AddressTerminatedEarly);
    }
    Ok(decode_address(data[pos], data[pos + 1]))
}

/// Encode an address in the 12-bit alphabet form. The address must be
/// below 4096; higher addresses need `encode_14bit_address`.
pub fn encode_12bit_address(addr: u16) -> [u8; 2] {
    [
        ADDRESS_TABLE[((addr >> 6) & 0x3F) as usize],
        ADDRESS_TABLE[(addr & 0x3F) as usize],
    ]
}

/// Encode an address in the 14-bit raw form.
pub fn encode_14bit_address(addr: u16) -> [u8; 2] {
    [((addr >> 8) & 0x3F) as u8, (addr & 0xFF) as u8]
}

/// Encode an address, picking the 12-bit form when it fits and the
/// 14-bit form otherwise. Addresses are 14 bits at most; higher bits
/// are masked off.
pub fn encode_address(addr: u16) -> [u8; 2] {
    let addr = addr & 0x3FFF;
    if addr < 0x1000 {
        encode_12bit_address(addr)
    } else {
        encode_14bit_address(addr)
    }
}

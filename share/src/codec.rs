// Fixed width integer and hex helpers.
//
// Cell data and script args on CKB mix both byte orders: token amounts in cell
// data are little endian u128, molecule length headers are little endian u32,
// while the order lock stores its price as a big endian u128.

use core::convert::TryInto;
use core::result::Result;

use crate::error::Error;

pub const U8_LEN: usize = 1;
pub const U32_LEN: usize = 4;
pub const U128_LEN: usize = 16;

pub fn check_args_len(actual: usize, expected: usize) -> Result<(), Error> {
    if actual < expected {
        return Err(Error::LengthNotEnough { expected, actual });
    }
    Ok(())
}

pub fn decode_u32_le(data: &[u8]) -> Result<u32, Error> {
    check_args_len(data.len(), U32_LEN)?;
    let mut buf = [0u8; U32_LEN];
    buf.copy_from_slice(&data[..U32_LEN]);
    Ok(u32::from_le_bytes(buf))
}

/// Reads the first 16 bytes. Trailing bytes (e.g. xUDT extension data) are ignored.
pub fn decode_u128_le(data: &[u8]) -> Result<u128, Error> {
    check_args_len(data.len(), U128_LEN)?;
    let buf: [u8; U128_LEN] = data[..U128_LEN]
        .try_into()
        .map_err(|_| Error::WrongDataLengthOrFormat)?;
    Ok(u128::from_le_bytes(buf))
}

pub fn decode_u128_be(data: &[u8]) -> Result<u128, Error> {
    check_args_len(data.len(), U128_LEN)?;
    let buf: [u8; U128_LEN] = data[..U128_LEN]
        .try_into()
        .map_err(|_| Error::WrongDataLengthOrFormat)?;
    Ok(u128::from_be_bytes(buf))
}

pub fn encode_u128_le(value: u128) -> [u8; U128_LEN] {
    value.to_le_bytes()
}

pub fn encode_u128_be(value: u128) -> [u8; U128_LEN] {
    value.to_be_bytes()
}

pub fn remove_0x(hex: &str) -> &str {
    hex.strip_prefix("0x").unwrap_or(hex)
}

/// Accepts hex with or without the `0x` prefix. `0x` alone decodes to empty bytes.
pub fn hex_to_bytes(hex: &str) -> Result<Vec<u8>, Error> {
    Ok(hex::decode(remove_0x(hex))?)
}

pub fn bytes_to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

// Order lock args
//
// molecule(owner_lock) | setup: u8 | total_value: u128 big endian
//
// The owner lock is a molecule table, its first 4 bytes (LE u32) give its
// full length, which is where the setup byte starts.

use std::convert::TryFrom;

use ckb_types::{bytes::Bytes, packed::Script, prelude::*};
use share::cell::OrderMode;
use share::{decode_u128_be, decode_u32_le, encode_u128_be, U128_LEN, U8_LEN};

use crate::error::{Error, Result};

pub const ORDER_ARGS_MIN_LEN: usize = 66;

#[derive(Debug, Clone)]
pub struct OrderArgs {
    pub owner_lock:  Script,
    pub setup:       u8,
    /// CKB the owner receives, in shannons.
    pub total_value: u128,
}

impl OrderArgs {
    pub fn new(owner_lock: Script, setup: u8, total_value: u128) -> Self {
        OrderArgs {
            owner_lock,
            setup,
            total_value,
        }
    }

    pub fn to_bytes(&self) -> Bytes {
        let lock = self.owner_lock.as_slice();
        let mut buf = Vec::with_capacity(lock.len() + U8_LEN + U128_LEN);
        buf.extend_from_slice(lock);
        buf.push(self.setup);
        buf.extend_from_slice(&encode_u128_be(self.total_value));
        Bytes::from(buf)
    }

    pub fn to_hex(&self) -> String {
        share::bytes_to_hex(&self.to_bytes())
    }

    pub fn from_slice(data: &[u8]) -> Result<OrderArgs> {
        if data.len() < ORDER_ARGS_MIN_LEN {
            return Err(Error::MalformedArgs(format!(
                "order args must be at least {} bytes, got {}",
                ORDER_ARGS_MIN_LEN,
                data.len()
            )));
        }

        let lock_len = decode_u32_le(data)? as usize;
        let end = lock_len
            .checked_add(U8_LEN + U128_LEN)
            .filter(|end| *end <= data.len())
            .ok_or_else(|| {
                Error::MalformedArgs(format!(
                    "owner lock of {} bytes does not fit in {} bytes of args",
                    lock_len,
                    data.len()
                ))
            })?;

        let owner_lock = Script::from_slice(&data[..lock_len])?;
        let setup = data[lock_len];
        let total_value = decode_u128_be(&data[lock_len + U8_LEN..end])?;

        Ok(OrderArgs {
            owner_lock,
            setup,
            total_value,
        })
    }

    pub fn from_hex(hex: &str) -> Result<OrderArgs> {
        OrderArgs::from_slice(&share::hex_to_bytes(hex)?)
    }

    pub fn mode(&self) -> Result<OrderMode> {
        Ok(OrderMode::try_from(self.setup)?)
    }
}

impl PartialEq for OrderArgs {
    fn eq(&self, other: &OrderArgs) -> bool {
        self.owner_lock.as_slice() == other.owner_lock.as_slice()
            && self.setup == other.setup
            && self.total_value == other.total_value
    }
}

impl Eq for OrderArgs {}

use core::cmp::{Eq, PartialEq};
use core::convert::TryFrom;
use core::result::Result;

use crate::codec::{check_args_len, decode_u128_le, U128_LEN};
use crate::error::Error;

const UDT_CELL_DATA_LEN: usize = U128_LEN;

/// The `setup` byte of an order lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderMode {
    Udt,
    Nft,
}

impl TryFrom<u8> for OrderMode {
    type Error = Error;

    fn try_from(input: u8) -> Result<OrderMode, Error> {
        match input {
            0 => Ok(OrderMode::Udt),
            4 => Ok(OrderMode::Nft),
            _ => Err(Error::UnknownOrderSetup(input)),
        }
    }
}

impl From<OrderMode> for u8 {
    fn from(mode: OrderMode) -> u8 {
        match mode {
            OrderMode::Udt => 0,
            OrderMode::Nft => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdtCellData {
    pub amount: u128,
}

impl UdtCellData {
    pub fn from_raw(cell_raw_data: &[u8]) -> Result<UdtCellData, Error> {
        check_args_len(cell_raw_data.len(), UDT_CELL_DATA_LEN)?;
        let amount = decode_u128_le(&cell_raw_data[..16])?;

        Ok(UdtCellData { amount })
    }

    /// Empty or short data counts as zero tokens.
    pub fn amount_or_zero(cell_raw_data: &[u8]) -> u128 {
        UdtCellData::from_raw(cell_raw_data)
            .map(|data| data.amount)
            .unwrap_or(0)
    }
}

// Occupied capacity of the cells the builders create.
//
// Every `*_min_capacity` adds one extra byte (1 CKB) on top of the occupied
// bytes so the owner can later pay a fee out of the cell.

use ckb_types::{core::TransactionView, packed::Script, prelude::*};

use crate::cell::CellView;
use crate::constants::{CKB_UNIT, ORDER_SETUP_NFT};
use crate::network::NetworkConfig;
use crate::order::args::OrderArgs;

// code_hash + hash_type
const SCRIPT_BASE_BYTES: u64 = 33;
const CAPACITY_BYTES: u64 = 8;
const UDT_AMOUNT_BYTES: u64 = 16;
const DEFAULT_TYPE_ARGS_BYTES: u64 = 32;
const FEE_RESERVE_BYTES: u64 = 1;

fn args_len(script: &Script) -> u64 {
    script.args().raw_data().len() as u64
}

pub fn empty_cell_occupied_bytes(lock: &Script) -> u64 {
    SCRIPT_BASE_BYTES + args_len(lock) + CAPACITY_BYTES
}

pub fn empty_cell_min_capacity(lock: &Script) -> u64 {
    (empty_cell_occupied_bytes(lock) + FEE_RESERVE_BYTES) * CKB_UNIT
}

/// A missing type script is sized as one with 32 bytes of args.
pub fn udt_cell_occupied_bytes(lock: &Script, udt_type: Option<&Script>) -> u64 {
    let type_args = udt_type.map(args_len).unwrap_or(DEFAULT_TYPE_ARGS_BYTES);
    SCRIPT_BASE_BYTES + args_len(lock) + SCRIPT_BASE_BYTES + type_args + CAPACITY_BYTES + UDT_AMOUNT_BYTES
}

pub fn udt_cell_min_capacity(lock: &Script, udt_type: Option<&Script>) -> u64 {
    (udt_cell_occupied_bytes(lock, udt_type) + FEE_RESERVE_BYTES) * CKB_UNIT
}

/// Size of `cell` once it is moved under `lock`.
pub fn nft_cell_occupied_bytes(lock: &Script, cell: CellView) -> u64 {
    let mut size = SCRIPT_BASE_BYTES + args_len(lock) + CAPACITY_BYTES + cell.data().len() as u64;
    if let Some(type_script) = cell.type_script() {
        size += SCRIPT_BASE_BYTES + args_len(&type_script);
    }
    size
}

pub fn nft_cell_min_capacity(lock: &Script, cell: CellView) -> u64 {
    (nft_cell_occupied_bytes(lock, cell) + FEE_RESERVE_BYTES) * CKB_UNIT
}

/// `tx_size * fee_rate / 1000`, rounded up.
pub fn transaction_fee(tx_size: usize, fee_rate: u64) -> u64 {
    let product = tx_size as u128 * fee_rate as u128;
    ((product + 999) / 1000) as u64
}

/// Size the transaction takes in a block: its serialization plus the 4 byte
/// offset in the block's transaction vector.
pub fn transaction_size(tx: &TransactionView) -> usize {
    tx.data().as_slice().len() + 4
}

/// Extra capacity an NFT needs once it sits in an order cell, compared with
/// holding it under the buyer lock (the seller lock when `buyer` is unset).
pub fn nft_maker_list_package(seller: &Script, buyer: Option<&Script>) -> u64 {
    let buyer_args = buyer.map(args_len).unwrap_or_else(|| args_len(seller));
    // the setup and price do not change the size
    let order_args = OrderArgs::new(seller.clone(), ORDER_SETUP_NFT, 0);
    let order_args_len = order_args.to_bytes().len() as u64;
    order_args_len.saturating_sub(buyer_args) * CKB_UNIT
}

/// Capacity of the order cell listing tokens of `asset_type` for `seller`.
pub fn udt_maker_list_package(seller: &Script, asset_type: Option<&Script>) -> u64 {
    let order_args = OrderArgs::new(seller.clone(), ORDER_SETUP_NFT, 0);
    // the order lock is the same size on every network
    let order_lock = NetworkConfig::testnet().dex_lock_script(order_args.to_bytes());
    udt_cell_min_capacity(&order_lock, asset_type)
}

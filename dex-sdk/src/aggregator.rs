// JoyID subkey unlock oracle port.
//
// A JoyID account can sign with a subkey registered in its CoTA cell. The
// aggregator service proves the registration with an SMT entry that goes into
// the `output_type` field of the signing witness.

use async_trait::async_trait;
use ckb_types::{packed::Script, prelude::*};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::constants::SUBKEY_ALG_INDEX_SECP256R1;
use crate::error::{Error, Result};

pub const GENERATE_SUBKEY_UNLOCK_SMT: &str = "generate_subkey_unlock_smt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubkeyUnlockReq {
    /// 0x hex of the serialized lock script
    pub lock_script: String,
    pub pubkey_hash: String,
    pub alg_index:   u16,
}

impl SubkeyUnlockReq {
    pub fn new(lock: &Script, pubkey: &str) -> Result<Self> {
        let pubkey = share::hex_to_bytes(pubkey)?;
        Ok(SubkeyUnlockReq {
            lock_script: share::bytes_to_hex(lock.as_slice()),
            pubkey_hash: share::bytes_to_hex(&share::hash::blake160(&pubkey)),
            alg_index:   SUBKEY_ALG_INDEX_SECP256R1,
        })
    }

    /// JSON-RPC request body for the aggregator.
    pub fn rpc_payload(&self, id: u64) -> Result<Value> {
        Ok(json!({
            "id": id,
            "jsonrpc": "2.0",
            "method": GENERATE_SUBKEY_UNLOCK_SMT,
            "params": serde_json::to_value(self)?,
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubkeyUnlockResp {
    pub unlock_entry: String,
    pub block_number: u64,
}

impl SubkeyUnlockResp {
    pub fn unlock_entry_bytes(&self) -> Result<Vec<u8>> {
        share::hex_to_bytes(&self.unlock_entry).map_err(Error::from)
    }
}

#[async_trait]
pub trait UnlockOracle: Send + Sync {
    async fn generate_subkey_unlock_smt(&self, req: &SubkeyUnlockReq) -> Result<SubkeyUnlockResp>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyType {
    MainKey,
    SubKey,
}

/// What the JoyID wallet returns on connect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectData {
    pub pubkey:   String,
    pub key_type: KeyType,
}

/// Set when the acting party signs with JoyID.
#[derive(Clone, Copy)]
pub struct JoyIdConfig<'a> {
    pub aggregator:   &'a dyn UnlockOracle,
    pub connect_data: &'a ConnectData,
}

impl<'a> JoyIdConfig<'a> {
    pub fn is_subkey(&self) -> bool {
        self.connect_data.key_type == KeyType::SubKey
    }
}

// Cell source port.
//
// The builders only talk to the chain through `CellSource`. An implementation
// usually wraps a CKB node and indexer RPC client; any transport error must be
// reported as `Error::SourceUnavailable`.

use async_trait::async_trait;
use ckb_types::{
    packed::{CellOutput, OutPoint, Script, Transaction},
    prelude::*,
    H256,
};
use serde_json::{json, Value};
use std::convert::TryFrom;

use crate::cell::{script_eq, IndexerCell, LiveCell};
use crate::error::Result;
use crate::network::HashType;

/// Indexer page size used by `get_cells`.
pub const SEARCH_LIMIT: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptType {
    Lock,
    Type,
}

#[derive(Debug, Clone)]
pub enum SearchFilter {
    /// Cells whose type script equals this one.
    Script(Script),
    /// Cells without type script and without data.
    EmptyData,
}

#[derive(Debug, Clone)]
pub struct SearchKey {
    pub script:      Script,
    pub script_type: ScriptType,
    pub filter:      Option<SearchFilter>,
}

impl SearchKey {
    pub fn empty_cells(lock: &Script) -> Self {
        SearchKey {
            script:      lock.clone(),
            script_type: ScriptType::Lock,
            filter:      Some(SearchFilter::EmptyData),
        }
    }

    pub fn lock_and_type(lock: &Script, type_script: &Script) -> Self {
        SearchKey {
            script:      lock.clone(),
            script_type: ScriptType::Lock,
            filter:      Some(SearchFilter::Script(type_script.clone())),
        }
    }

    pub fn by_type(type_script: &Script) -> Self {
        SearchKey {
            script:      type_script.clone(),
            script_type: ScriptType::Type,
            filter:      None,
        }
    }

    /// `params` of an indexer `get_cells` request.
    pub fn to_json(&self) -> Value {
        let mut key = json!({
            "script": script_json(&self.script),
            "script_type": match self.script_type {
                ScriptType::Lock => "lock",
                ScriptType::Type => "type",
            },
            "script_search_mode": "exact",
        });
        match &self.filter {
            Some(SearchFilter::Script(type_script)) => {
                key["filter"] = json!({ "script": script_json(type_script) });
            }
            Some(SearchFilter::EmptyData) => {
                key["filter"] = json!({
                    "script": Value::Null,
                    "output_data_len_range": ["0x0", "0x1"],
                });
            }
            None => {}
        }
        json!([key, "asc", format!("{:#x}", SEARCH_LIMIT)])
    }

    /// Evaluates the key against a cell the way the indexer does.
    pub fn matches(&self, output: &CellOutput, data: &[u8]) -> bool {
        let type_script = output.type_().to_opt();
        let primary = match self.script_type {
            ScriptType::Lock => script_eq(&output.lock(), &self.script),
            ScriptType::Type => type_script
                .as_ref()
                .map(|script| script_eq(script, &self.script))
                .unwrap_or(false),
        };
        if !primary {
            return false;
        }
        match &self.filter {
            None => true,
            Some(SearchFilter::Script(expected)) => type_script
                .as_ref()
                .map(|script| script_eq(script, expected))
                .unwrap_or(false),
            Some(SearchFilter::EmptyData) => type_script.is_none() && data.is_empty(),
        }
    }
}

pub fn script_json(script: &Script) -> Value {
    let hash_type = HashType::try_from(script.hash_type())
        .map(|hash_type| hash_type.as_str())
        .unwrap_or("data");
    json!({
        "code_hash": share::bytes_to_hex(script.code_hash().as_slice()),
        "hash_type": hash_type,
        "args": share::bytes_to_hex(&script.args().raw_data()),
    })
}

#[async_trait]
pub trait CellSource: Send + Sync {
    /// Live cells matching `key`, oldest first.
    async fn get_cells(&self, key: &SearchKey) -> Result<Vec<IndexerCell>>;

    /// Total capacity of the live cells locked by `lock`.
    async fn get_cells_capacity(&self, lock: &Script) -> Result<u64>;

    /// `None` when the cell is unknown or already spent.
    async fn get_live_cell(&self, out_point: &OutPoint) -> Result<Option<LiveCell>>;

    async fn send_transaction(&self, tx: &Transaction) -> Result<H256>;
}

pub mod args;
pub mod batch_maker;
pub mod cancel;
pub mod helper;
pub mod maker;
pub mod taker;

pub use args::OrderArgs;
pub use batch_maker::build_batch_maker_tx;
pub use cancel::build_cancel_tx;
pub use maker::build_maker_tx;
pub use taker::build_taker_tx;

use ckb_types::{
    core::TransactionView,
    packed::{OutPoint, Script},
};
use serde::{Deserialize, Serialize};

use crate::aggregator::JoyIdConfig;
use crate::constants::{DEFAULT_FEE_RATE, MAX_FEE, ORDER_SETUP_NFT, ORDER_SETUP_UDT};
use crate::network::{NetworkConfig, ScriptConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Asset {
    Xudt,
    Sudt,
    Spore,
}

impl Default for Asset {
    fn default() -> Self {
        Asset::Xudt
    }
}

impl Asset {
    pub fn is_udt(self) -> bool {
        matches!(self, Asset::Xudt | Asset::Sudt)
    }

    pub fn requires_cobuild(self) -> bool {
        self == Asset::Spore
    }

    /// The order lock `setup` byte for this asset class.
    pub fn setup(self) -> u8 {
        if self.is_udt() {
            ORDER_SETUP_UDT
        } else {
            ORDER_SETUP_NFT
        }
    }

    pub fn script_config(self, config: &NetworkConfig) -> &ScriptConfig {
        match self {
            Asset::Xudt => &config.xudt_type,
            Asset::Sudt => &config.sudt_type,
            Asset::Spore => &config.spore_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfig {
    /// shannons per 1000 bytes
    pub fee_rate: u64,
    /// A requested fee equal to this value asks the builder to estimate the fee.
    pub max_fee:  u64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        FeeConfig {
            fee_rate: DEFAULT_FEE_RATE,
            max_fee:  MAX_FEE,
        }
    }
}

/// Options shared by every builder.
#[derive(Clone, Copy, Default)]
pub struct BaseParams<'a> {
    /// Fixed fee in shannons, estimated when unset.
    pub fee:                   Option<u64>,
    pub fee_config:            FeeConfig,
    /// Witness allowance for non JoyID signers.
    pub estimate_witness_size: Option<usize>,
    pub joyid:                 Option<JoyIdConfig<'a>>,
    pub asset:                 Asset,
    pub exclude_pool_tx:       bool,
    /// Replaces the builtin config of the address network.
    pub network_config:        Option<&'a NetworkConfig>,
}

impl<'a> BaseParams<'a> {
    pub fn requested_fee(&self) -> u64 {
        self.fee.unwrap_or(self.fee_config.max_fee)
    }
}

#[derive(Clone)]
pub struct MakerParams<'a> {
    pub base:        BaseParams<'a>,
    pub seller:      &'a str,
    /// Shannons the seller receives.
    pub total_value: u128,
    /// Token amount to list, ignored for NFTs.
    pub list_amount: u128,
    /// Token or NFT type script.
    pub asset_type:  Script,
}

#[derive(Debug, Clone)]
pub struct NftListing {
    pub total_value: u128,
    pub asset_type:  Script,
}

#[derive(Clone)]
pub struct BatchMakerParams<'a> {
    pub base:   BaseParams<'a>,
    pub seller: &'a str,
    pub nfts:   Vec<NftListing>,
}

#[derive(Clone)]
pub struct TakerParams<'a> {
    pub base:             BaseParams<'a>,
    pub buyer:            &'a str,
    pub order_out_points: Vec<OutPoint>,
}

#[derive(Clone)]
pub struct CancelParams<'a> {
    pub base:             BaseParams<'a>,
    pub seller:           &'a str,
    pub order_out_points: Vec<OutPoint>,
}

#[derive(Debug, Clone)]
pub struct MakerResult {
    pub tx:            TransactionView,
    /// Capacity locked in the order cell on top of the asset itself.
    pub list_package:  u64,
    pub tx_fee:        u64,
    /// Witness the seller signs.
    pub witness_index: usize,
}

#[derive(Debug, Clone)]
pub struct TakerResult {
    pub tx:            TransactionView,
    pub tx_fee:        u64,
    pub witness_index: usize,
}

pub type CancelResult = TakerResult;

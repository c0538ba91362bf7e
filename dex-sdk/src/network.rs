// Deployed script records for each CKB network.
//
// A `NetworkConfig` bundles every script the order builders reference: the
// JoyID lock, the CoTA registry type, the order (dex) lock and the asset type
// scripts, each with the cell dep that carries its code.

use std::convert::TryFrom;
use std::str::FromStr;

use ckb_types::{
    bytes::Bytes,
    core::{DepType as CoreDepType, ScriptHashType},
    packed::{Byte, CellDep, OutPoint, Script},
    prelude::*,
    H256,
};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::constants::{MAINNET_PREFIX, TESTNET_PREFIX};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    pub fn from_hrp(hrp: &str) -> Result<Network> {
        match hrp {
            MAINNET_PREFIX => Ok(Network::Mainnet),
            TESTNET_PREFIX => Ok(Network::Testnet),
            _ => Err(Error::InvalidAddress(format!("unknown prefix {}", hrp))),
        }
    }

    pub fn hrp(self) -> &'static str {
        match self {
            Network::Mainnet => MAINNET_PREFIX,
            Network::Testnet => TESTNET_PREFIX,
        }
    }

    pub fn is_mainnet(self) -> bool {
        self == Network::Mainnet
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashType {
    Data,
    Type,
    Data1,
    Data2,
}

impl HashType {
    pub fn as_str(self) -> &'static str {
        match self {
            HashType::Data => "data",
            HashType::Type => "type",
            HashType::Data1 => "data1",
            HashType::Data2 => "data2",
        }
    }
}

impl From<HashType> for ScriptHashType {
    fn from(hash_type: HashType) -> ScriptHashType {
        match hash_type {
            HashType::Data => ScriptHashType::Data,
            HashType::Type => ScriptHashType::Type,
            HashType::Data1 => ScriptHashType::Data1,
            HashType::Data2 => ScriptHashType::Data2,
        }
    }
}

impl TryFrom<u8> for HashType {
    type Error = Error;

    fn try_from(input: u8) -> Result<HashType> {
        match input {
            0 => Ok(HashType::Data),
            1 => Ok(HashType::Type),
            2 => Ok(HashType::Data1),
            4 => Ok(HashType::Data2),
            _ => Err(Error::MalformedArgs(format!("unknown script hash type {}", input))),
        }
    }
}

impl TryFrom<Byte> for HashType {
    type Error = Error;

    fn try_from(byte: Byte) -> Result<HashType> {
        let type_num: u8 = byte.into();
        HashType::try_from(type_num)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepType {
    Code,
    DepGroup,
}

impl From<DepType> for CoreDepType {
    fn from(dep_type: DepType) -> CoreDepType {
        match dep_type {
            DepType::Code => CoreDepType::Code,
            DepType::DepGroup => CoreDepType::DepGroup,
        }
    }
}

/// Code hash and hash type of a deployed script. Args are filled per use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptInfo {
    #[serde(with = "hex_h256")]
    pub code_hash: H256,
    pub hash_type: HashType,
}

impl ScriptInfo {
    pub fn script(&self, args: Bytes) -> Script {
        Script::new_builder()
            .code_hash(self.code_hash.pack())
            .hash_type(ScriptHashType::from(self.hash_type).into())
            .args(args.pack())
            .build()
    }

    /// Whether `script` runs this code, regardless of its args.
    pub fn matches(&self, script: &Script) -> bool {
        script.code_hash().as_slice() == self.code_hash.as_bytes()
            && HashType::try_from(script.hash_type()).ok() == Some(self.hash_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellDepInfo {
    #[serde(with = "hex_h256")]
    pub tx_hash:  H256,
    pub index:    u32,
    pub dep_type: DepType,
}

impl CellDepInfo {
    pub fn cell_dep(&self) -> CellDep {
        let out_point = OutPoint::new_builder()
            .tx_hash(self.tx_hash.pack())
            .index(self.index.pack())
            .build();
        CellDep::new_builder()
            .out_point(out_point)
            .dep_type(CoreDepType::from(self.dep_type).into())
            .build()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptConfig {
    pub script:   ScriptInfo,
    pub cell_dep: CellDepInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub network:    Network,
    pub joyid_lock: ScriptConfig,
    pub cota_type:  ScriptConfig,
    pub dex_lock:   ScriptConfig,
    pub xudt_type:  ScriptConfig,
    pub sudt_type:  ScriptConfig,
    pub spore_type: ScriptConfig,
}

impl NetworkConfig {
    pub fn from_json(json: &str) -> Result<NetworkConfig> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn mainnet() -> &'static NetworkConfig {
        &MAINNET
    }

    pub fn testnet() -> &'static NetworkConfig {
        &TESTNET
    }

    pub fn of(network: Network) -> &'static NetworkConfig {
        match network {
            Network::Mainnet => NetworkConfig::mainnet(),
            Network::Testnet => NetworkConfig::testnet(),
        }
    }

    pub fn dex_lock_script(&self, args: Bytes) -> Script {
        self.dex_lock.script.script(args)
    }

    /// The CoTA registry type script, its args are always empty.
    pub fn cota_type_script(&self) -> Script {
        self.cota_type.script.script(Bytes::new())
    }
}

fn h256(hex: &str) -> H256 {
    // only called with the literals below
    H256::from_str(hex).expect("builtin hash literal")
}

fn script_config(
    code_hash: &str,
    hash_type: HashType,
    tx_hash: &str,
    index: u32,
    dep_type: DepType,
) -> ScriptConfig {
    ScriptConfig {
        script:   ScriptInfo {
            code_hash: h256(code_hash),
            hash_type,
        },
        cell_dep: CellDepInfo {
            tx_hash: h256(tx_hash),
            index,
            dep_type,
        },
    }
}

lazy_static! {
    static ref TESTNET: NetworkConfig = NetworkConfig {
        network:    Network::Testnet,
        joyid_lock: script_config(
            "d23761b364210735c19c60561d213fb3beae2fd6172743719eff6920e020baac",
            HashType::Type,
            "4dcf3f3b09efac8995d6cbee87c5345e812d310094651e0c3d9a730f32dc9263",
            0,
            DepType::DepGroup,
        ),
        cota_type:  script_config(
            "89cd8003a0eaf8e65e0c31525b7d1d5c1becefd2ea75bb4cff87810ae37764d8",
            HashType::Type,
            "636a786001f87cb615acfcf408be0f9a1f077001f0bbc75ca54eadfe7e221713",
            0,
            DepType::DepGroup,
        ),
        dex_lock:   script_config(
            "493510d54e815611a643af97b5ac93bfbb45ddc2aae0f2dceffaf3408b4fcfcd",
            HashType::Type,
            "70accc6114f425fc7cc0b25a8cfc435580b6dc6c529b26ecd36be6056b76661c",
            0,
            DepType::Code,
        ),
        xudt_type:  script_config(
            "25c29dc317811a6f6f3985a7a9ebc4838bd388d19d0feeecf0bcd60f6c0975bb",
            HashType::Type,
            "bf6fb538763efec2a70a6a3dcb7242787087e1030c4e7d86585bc63a9d337f5f",
            0,
            DepType::Code,
        ),
        sudt_type:  script_config(
            "c5e5dcf215925f7ef4dfaf5f4b4f105bc321c02776d6e7d52a1db3fcd9d011a4",
            HashType::Type,
            "e12877ebd2c3c364dc46c5c992bcfaf4fee33fa13eebdf82c591fc9825aab769",
            0,
            DepType::Code,
        ),
        spore_type: script_config(
            "5e063b4c0e7abeaa6a428df3b693521a3050934cf3b0ae97a800d1bc31449398",
            HashType::Data1,
            "06995b9fc19461a2bf9933e57b69af47a20bf0a5bc6c0ffcb85567a2c733f0a1",
            0,
            DepType::Code,
        ),
    };
    static ref MAINNET: NetworkConfig = NetworkConfig {
        network:    Network::Mainnet,
        joyid_lock: script_config(
            "d00c84f0ec8fd441c38bc3f87a371f547190f2fcff88e642bc5bf54b9e318323",
            HashType::Type,
            "f05188e5f3a6767fc4687faf45ba5f1a6e25d3ada6129dae8722cb282f262493",
            0,
            DepType::DepGroup,
        ),
        cota_type:  script_config(
            "1122a4fb54697cf2e6e3a96c9d80fd398a936559b90954c6e88eb7ba0cf652df",
            HashType::Type,
            "abaa25237554f0d6c586dc010e7e85e6870bcfd9fb8773257ecacfbe1fd738a0",
            0,
            DepType::DepGroup,
        ),
        dex_lock:   script_config(
            "493510d54e815611a643af97b5ac93bfbb45ddc2aae0f2dceffaf3408b4fcfcd",
            HashType::Type,
            "9305b2af4567255bfa7df7c9e9ebb531b26ce8b6779ffe01d51416d8bc620613",
            0,
            DepType::Code,
        ),
        xudt_type:  script_config(
            "50bd8d6680b8b9cf98b73f3c08faf8b2a21914311954118ad6609be6e78a1b95",
            HashType::Data1,
            "c07844ce21b38e4b071dd0e1ee3b0e27afd8d7532491327f39b786343f558ab7",
            0,
            DepType::Code,
        ),
        sudt_type:  script_config(
            "5e7a36a77e68eecc013dfa2fe6a23f3b6c344b04005808694ae6dd45eea4cfd5",
            HashType::Type,
            "c7813f6a415144643970c2e88e0bb6ca6a8edc5dd7c1022746f628284a9936d5",
            0,
            DepType::Code,
        ),
        spore_type: script_config(
            "4a4dce1df3dffff7f8b2cd7dff7303df3b6150c9788cb75dcf6747247132b9f5",
            HashType::Data1,
            "96b198fb5ddbd1eed57ed667068f1f1e55d07907b4c0dbd38675a69ea1b69824",
            0,
            DepType::Code,
        ),
    };
}

mod hex_h256 {
    use ckb_types::H256;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(hash: &H256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&share::bytes_to_hex(hash.as_bytes()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<H256, D::Error> {
        let hex = String::deserialize(deserializer)?;
        let bytes = share::hex_to_bytes(&hex).map_err(D::Error::custom)?;
        H256::from_slice(&bytes).map_err(|_| D::Error::custom("expected 32 bytes"))
    }
}

// CKB address codec.
//
// Payload formats (first byte):
//   0x00 full:       code_hash(32) | hash_type(1) | args, bech32m
//   0x01 short:      code_index(1) | args, bech32
//   0x02 full data:  code_hash(32) | args, bech32 (deprecated)
//   0x04 full type:  code_hash(32) | args, bech32 (deprecated)

use std::convert::TryFrom;
use std::str::FromStr;

use bech32::{FromBase32, ToBase32, Variant};
use ckb_types::{bytes::Bytes, packed::Script, prelude::*, H256};

use crate::error::{Error, Result};
use crate::network::{HashType, Network, ScriptInfo};

const FULL_FORMAT: u8 = 0x00;
const SHORT_FORMAT: u8 = 0x01;
const FULL_DATA_FORMAT: u8 = 0x02;
const FULL_TYPE_FORMAT: u8 = 0x04;

const SECP256K1_BLAKE160_SIGHASH_ALL: &str =
    "9bd7e06f3ecf4be0f2fcd2188b23f1b9fcc88e5d4b65a8637b17723bbda3cce8";
const SECP256K1_BLAKE160_MULTISIG_ALL: &str =
    "5c5069eb0857efc65e1bca0c07df34c31663b3622fd3876c876320fc9634e2a8";
const ANYONE_CAN_PAY_MAINNET: &str =
    "d369597ff47f29fbc0d47d2e3775370d1250b85140c670e4718af712983a2354";
const ANYONE_CAN_PAY_TESTNET: &str =
    "3419a1c09eb2567f6552ee7a8ecffd64155cffe0f1796e6e61ec088d740c1356";

const CODE_HASH_LEN: usize = 32;

fn invalid<E: ToString>(err: E) -> Error {
    Error::InvalidAddress(err.to_string())
}

fn short_code_hash(code_index: u8, network: Network) -> Result<H256> {
    let hex = match (code_index, network) {
        (0x00, _) => SECP256K1_BLAKE160_SIGHASH_ALL,
        (0x01, _) => SECP256K1_BLAKE160_MULTISIG_ALL,
        (0x02, Network::Mainnet) => ANYONE_CAN_PAY_MAINNET,
        (0x02, Network::Testnet) => ANYONE_CAN_PAY_TESTNET,
        _ => return Err(invalid(format!("unknown short code index {}", code_index))),
    };
    H256::from_str(hex).map_err(|_| invalid("bad builtin code hash"))
}

fn build_script(code_hash: &[u8], hash_type: HashType, args: &[u8]) -> Result<Script> {
    let code_hash = H256::from_slice(code_hash).map_err(|_| invalid("code hash must be 32 bytes"))?;
    Ok(ScriptInfo {
        code_hash,
        hash_type,
    }
    .script(Bytes::from(args.to_vec())))
}

/// Parses an address into its network and lock script.
pub fn parse_address(address: &str) -> Result<(Network, Script)> {
    let (hrp, data, variant) = bech32::decode(address).map_err(invalid)?;
    let network = Network::from_hrp(&hrp)?;
    let payload = Vec::<u8>::from_base32(&data).map_err(invalid)?;
    if payload.is_empty() {
        return Err(invalid("empty payload"));
    }

    let body = &payload[1..];
    let script = match payload[0] {
        FULL_FORMAT => {
            if variant != Variant::Bech32m {
                return Err(invalid("full format address must use bech32m"));
            }
            if body.len() < CODE_HASH_LEN + 1 {
                return Err(invalid("full format payload too short"));
            }
            let hash_type = HashType::try_from(body[CODE_HASH_LEN]).map_err(invalid)?;
            build_script(&body[..CODE_HASH_LEN], hash_type, &body[CODE_HASH_LEN + 1..])?
        }
        SHORT_FORMAT => {
            if variant != Variant::Bech32 {
                return Err(invalid("short format address must use bech32"));
            }
            if body.is_empty() {
                return Err(invalid("short format payload too short"));
            }
            let code_hash = short_code_hash(body[0], network)?;
            build_script(code_hash.as_bytes(), HashType::Type, &body[1..])?
        }
        FULL_DATA_FORMAT | FULL_TYPE_FORMAT => {
            if variant != Variant::Bech32 {
                return Err(invalid("deprecated full format address must use bech32"));
            }
            if body.len() < CODE_HASH_LEN {
                return Err(invalid("full format payload too short"));
            }
            let hash_type = if payload[0] == FULL_DATA_FORMAT {
                HashType::Data
            } else {
                HashType::Type
            };
            build_script(&body[..CODE_HASH_LEN], hash_type, &body[CODE_HASH_LEN..])?
        }
        other => return Err(invalid(format!("unknown address format {:#04x}", other))),
    };
    Ok((network, script))
}

pub fn address_to_script(address: &str) -> Result<Script> {
    parse_address(address).map(|(_, script)| script)
}

/// Encodes `script` as a full format address.
pub fn script_to_address(script: &Script, network: Network) -> Result<String> {
    let hash_type: u8 = script.hash_type().into();
    let mut payload = Vec::with_capacity(1 + CODE_HASH_LEN + 1 + script.args().raw_data().len());
    payload.push(FULL_FORMAT);
    payload.extend_from_slice(script.code_hash().as_slice());
    payload.push(hash_type);
    payload.extend_from_slice(&script.args().raw_data());
    bech32::encode(network.hrp(), payload.to_base32(), Variant::Bech32m).map_err(invalid)
}

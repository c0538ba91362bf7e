/// Shannons per CKB.
pub const CKB_UNIT: u64 = 1_0000_0000;

/// Fee requested by builders when the caller leaves the fee to estimation.
/// The change output is shrunk once the real fee is known.
pub const MAX_FEE: u64 = 2000_0000;

/// Default minimum change left by the collector, 63 CKB.
pub const MIN_CAPACITY: u64 = 63 * CKB_UNIT;

/// shannons per 1000 bytes
pub const DEFAULT_FEE_RATE: u64 = 1100;

// secp256r1 signature, pubkey and webauthn payload of a JoyID witness
pub const JOYID_ESTIMATED_WITNESS_SIZE: usize = 129 + 1000;

// WitnessArgs with a 65 byte secp256k1 signature in the lock field
pub const DEFAULT_ESTIMATED_WITNESS_SIZE: usize = 85;

pub const MAX_QUEUE_CAPACITY: usize = 50;

pub const ORDER_SETUP_UDT: u8 = 0;
pub const ORDER_SETUP_NFT: u8 = 4;

/// Algorithm index the JoyID aggregator expects for secp256r1 subkeys.
pub const SUBKEY_ALG_INDEX_SECP256R1: u16 = 1;

pub const MAINNET_PREFIX: &str = "ckb";
pub const TESTNET_PREFIX: &str = "ckt";

use super::*;
use dex_sdk::address::{address_to_script, parse_address, script_to_address};
use dex_sdk::network::{HashType, Network};
use std::convert::TryFrom;

#[test]
fn test_parse_joyid_address() {
    let (network, lock) = parse_address(SELLER_ADDRESS).unwrap();

    assert_eq!(network, Network::Testnet);
    assert!(NetworkConfig::testnet().joyid_lock.script.matches(&lock));
    assert_eq!(HashType::try_from(lock.hash_type()).unwrap(), HashType::Type);
    assert_eq!(
        share::bytes_to_hex(&lock.args().raw_data()),
        "0x0001f21be6c96d2103946d37a1ee882011f7530a92a7"
    );
}

#[test]
fn test_encode_full_address() {
    assert_eq!(script_to_address(&SELLER_LOCK, Network::Testnet).unwrap(), SELLER_ADDRESS);
    assert_eq!(
        script_to_address(&SELLER_LOCK, Network::Mainnet).unwrap(),
        "ckb1qrfrwcdnvssswdwpn3s9v8fp87emat306ctjwsm3nmlkjg8qyza2cqgqq8ephekfd5ss89rdx7s7azpqz8m4xz5j5uuumjry"
    );
    assert_eq!(script_to_address(&BUYER_LOCK, Network::Testnet).unwrap(), BUYER_ADDRESS);
}

#[test]
fn test_parse_short_address() {
    let lock = address_to_script(SECP_SHORT_ADDRESS).unwrap();

    assert_eq!(
        share::bytes_to_hex(lock.code_hash().as_slice()),
        "0x9bd7e06f3ecf4be0f2fcd2188b23f1b9fcc88e5d4b65a8637b17723bbda3cce8"
    );
    assert_eq!(HashType::try_from(lock.hash_type()).unwrap(), HashType::Type);
    assert_eq!(
        share::bytes_to_hex(&lock.args().raw_data()),
        "0xb9fe0ce2acf0ed01a2d11aa6723a75c662d0f9de"
    );
    // same lock in full format
    assert!(script_eq(&lock, &address_to_script(SECP_FULL_ADDRESS).unwrap()));
    assert_eq!(script_to_address(&lock, Network::Testnet).unwrap(), SECP_FULL_ADDRESS);
}

#[test]
fn test_network_from_prefix() {
    assert_eq!(parse_address(SELLER_ADDRESS).unwrap().0, Network::Testnet);
    let (network, _) = parse_address(
        "ckb1qrfrwcdnvssswdwpn3s9v8fp87emat306ctjwsm3nmlkjg8qyza2cqgqq8ephekfd5ss89rdx7s7azpqz8m4xz5j5uuumjry",
    )
    .unwrap();
    assert_eq!(network, Network::Mainnet);
    assert_eq!(Network::from_hrp("ckt").unwrap(), Network::Testnet);
    assert!(matches!(Network::from_hrp("bc"), Err(Error::InvalidAddress(_))));
    assert_eq!(Network::Testnet.hrp(), "ckt");
    assert!(Network::Mainnet.is_mainnet());
}

#[test]
fn test_parse_invalid_address() {
    assert!(matches!(parse_address("ckt1invalid"), Err(Error::InvalidAddress(_))));
    assert!(matches!(parse_address(""), Err(Error::InvalidAddress(_))));

    // valid checksum, unknown prefix
    let foreign = SELLER_ADDRESS.replacen("ckt", "bc", 1);
    assert!(parse_address(&foreign).is_err());

    // a flipped character breaks the checksum
    let mut broken = SELLER_ADDRESS.to_owned();
    broken.pop();
    broken.push('q');
    assert!(matches!(parse_address(&broken), Err(Error::InvalidAddress(_))));
}

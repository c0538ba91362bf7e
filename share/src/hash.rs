use ckb_hash::new_blake2b;

pub const BLAKE160_LEN: usize = 20;

pub fn blake2b_256(message: &[u8]) -> [u8; 32] {
    let mut blake2b = new_blake2b();
    blake2b.update(message);
    let mut hash = [0u8; 32];
    blake2b.finalize(&mut hash);
    hash
}

// The first 20 bytes of the ckb-default-hash digest
pub fn blake160(message: &[u8]) -> [u8; BLAKE160_LEN] {
    let mut buf = [0u8; BLAKE160_LEN];
    buf.copy_from_slice(&blake2b_256(message)[..BLAKE160_LEN]);
    buf
}

use super::*;
use dex_sdk::cell::CellView;
use dex_sdk::cobuild::{generate_spore_cobuild, transfer_spore_action};

fn read_u32(data: &[u8], at: usize) -> usize {
    share::decode_u32_le(&data[at..at + 4]).unwrap() as usize
}

fn spore_cell(lock: &Script, id: u8) -> LiveCell {
    let spore = SporeCell::new_with_dec(300, 8, id, 40);
    LiveCell {
        output: CellOutput::new_builder()
            .capacity(spore.capacity.pack())
            .lock(lock.clone())
            .type_(Some(spore.type_script()).pack())
            .build(),
        data:   Some(spore.content),
    }
}

fn moved_to(cell: &LiveCell, lock: &Script) -> CellOutput {
    cell.output.clone().as_builder().lock(lock.clone()).build()
}

#[test]
fn test_spore_cobuild_layout() {
    let input = spore_cell(&SELLER_LOCK, 7);
    let output = moved_to(&input, &BUYER_LOCK);

    let witness = generate_spore_cobuild(&[CellView::Live(&input)], &[output]).unwrap();

    // WitnessLayout::SighashAll
    assert_eq!(&witness[..4], &[0x01, 0x00, 0x00, 0xff]);
    let sighash_all = &witness[4..];
    assert_eq!(read_u32(sighash_all, 0), sighash_all.len());
    let message_offset = read_u32(sighash_all, 4);
    let seal_offset = read_u32(sighash_all, 8);
    assert_eq!(message_offset, 12);
    // empty seal
    assert_eq!(&sighash_all[seal_offset..], &[0, 0, 0, 0]);

    let message = &sighash_all[message_offset..seal_offset];
    assert_eq!(read_u32(message, 0), message.len());
    let actions = &message[read_u32(message, 4)..];
    assert_eq!(read_u32(actions, 0), actions.len());
    // one action
    assert_eq!(read_u32(actions, 4), 8);

    let action = &actions[8..];
    assert_eq!(read_u32(action, 4), 16);
    let script_info_hash = &action[16..48];
    let script_hash = &action[48..80];
    let action_data = &action[84..];
    assert_eq!(read_u32(action, 80), action_data.len());

    let spore_type = input.output.type_().to_opt().unwrap();
    assert_eq!(script_hash, spore_type.calc_script_hash().as_slice());
    assert_eq!(script_info_hash, &share::hash::blake2b_256(action_data)[..]);

    // SporeAction::TransferSpore
    assert_eq!(&action_data[..4], &[1, 0, 0, 0]);
    let transfer = &action_data[4..];
    let from_offset = read_u32(transfer, 8);
    let to_offset = read_u32(transfer, 12);
    assert_eq!(&transfer[16..48], &[7u8; 32]);
    assert_eq!(&transfer[from_offset..from_offset + 4], &[0, 0, 0, 0]);
    assert_eq!(&transfer[from_offset + 4..to_offset], SELLER_LOCK.as_slice());
    assert_eq!(&transfer[to_offset + 4..], BUYER_LOCK.as_slice());
}

#[test]
fn test_spore_cobuild_action_per_cell() {
    let first = spore_cell(&SELLER_LOCK, 1);
    let second = spore_cell(&SELLER_LOCK, 2);
    let outputs = vec![moved_to(&first, &BUYER_LOCK), moved_to(&second, &BUYER_LOCK)];

    let witness = generate_spore_cobuild(&[CellView::Live(&first), CellView::Live(&second)], &outputs).unwrap();

    let sighash_all = &witness[4..];
    let message = &sighash_all[12..read_u32(sighash_all, 8)];
    let actions = &message[8..];
    // header with two offsets
    assert_eq!(read_u32(actions, 4), 12);
    let single = generate_spore_cobuild(&[CellView::Live(&first)], &outputs[..1]).unwrap();
    assert!(witness.len() > single.len());
}

#[test]
fn test_spore_cobuild_without_actions() {
    let witness = generate_spore_cobuild(&[], &[]).unwrap();

    assert_eq!(
        witness.to_vec(),
        hex::decode("010000ff1c0000000c000000180000000c000000080000000400000000000000").unwrap()
    );
}

#[test]
fn test_spore_cobuild_length_mismatch() {
    let input = spore_cell(&SELLER_LOCK, 1);

    let err = generate_spore_cobuild(&[CellView::Live(&input)], &[]).unwrap_err();
    assert_eq!(err, Error::CoBuildLengthMismatch { inputs: 1, outputs: 0 });
}

#[test]
fn test_spore_cobuild_requires_type_script() {
    let input = LiveCell {
        output: CellOutput::new_builder()
            .capacity((100 * CKB).pack())
            .lock(SELLER_LOCK.clone())
            .build(),
        data:   None,
    };
    let output = moved_to(&input, &BUYER_LOCK);

    let err = generate_spore_cobuild(&[CellView::Live(&input)], &[output]).unwrap_err();
    assert!(matches!(err, Error::MissingTypeOrData(_)));
}

#[test]
fn test_transfer_spore_action_id_length() {
    let err = transfer_spore_action(&[1u8; 20], &SELLER_LOCK, &BUYER_LOCK).unwrap_err();
    assert!(matches!(err, Error::MissingTypeOrData(_)));

    let action = transfer_spore_action(&[1u8; 32], &SELLER_LOCK, &BUYER_LOCK).unwrap();
    // union id + table header + id + two script addresses
    assert_eq!(
        action.len(),
        4 + 16 + 32 + 2 * (4 + SELLER_LOCK.as_slice().len())
    );
}

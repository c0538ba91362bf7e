// Spore co-build witness.
//
// WitnessLayout::SighashAll {
//     message: Message { actions: [Action { script_info_hash, script_hash, data }] },
//     seal:    Bytes,
// }
//
// where each Action carries a packed SporeAction::TransferSpore
// { spore_id, from: Address::Script, to: Address::Script }.

use ckb_types::{
    bytes::Bytes,
    packed::{self, CellOutput, Script},
    prelude::*,
};
use molecule::pack_number;

use crate::cell::CellView;
use crate::error::{Error, Result};

const WITNESS_LAYOUT_SIGHASH_ALL: u32 = 0xFF00_0001;
const SPORE_ACTION_TRANSFER_SPORE: u32 = 1;
const ADDRESS_SCRIPT: u32 = 0;
const SPORE_ID_LEN: usize = 32;

// Table and dynvec share one layout: total size, item offsets, items.
fn pack_table(fields: &[&[u8]]) -> Vec<u8> {
    let header_len = 4 + 4 * fields.len();
    let total_len = header_len + fields.iter().map(|field| field.len()).sum::<usize>();
    let mut buf = Vec::with_capacity(total_len);
    buf.extend_from_slice(&pack_number(total_len as u32));
    let mut offset = header_len;
    for field in fields {
        buf.extend_from_slice(&pack_number(offset as u32));
        offset += field.len();
    }
    for field in fields {
        buf.extend_from_slice(field);
    }
    buf
}

fn pack_union(id: u32, item: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4 + item.len());
    buf.extend_from_slice(&pack_number(id));
    buf.extend_from_slice(item);
    buf
}

fn pack_address(lock: &Script) -> Vec<u8> {
    pack_union(ADDRESS_SCRIPT, lock.as_slice())
}

/// Packed `SporeAction::TransferSpore`.
pub fn transfer_spore_action(spore_id: &[u8], from: &Script, to: &Script) -> Result<Vec<u8>> {
    if spore_id.len() != SPORE_ID_LEN {
        return Err(Error::MissingTypeOrData(format!(
            "spore id must be {} bytes, got {}",
            SPORE_ID_LEN,
            spore_id.len()
        )));
    }
    let transfer = pack_table(&[spore_id, &pack_address(from), &pack_address(to)]);
    Ok(pack_union(SPORE_ACTION_TRANSFER_SPORE, &transfer))
}

/// Packed co-build `Action` for one spore moving from `input` to `output`.
pub fn spore_transfer(input: CellView, output: &CellOutput) -> Result<Vec<u8>> {
    let spore_type = input
        .type_script()
        .ok_or_else(|| Error::MissingTypeOrData("Spore cell must have type script".to_owned()))?;
    let spore_id = spore_type.args().raw_data();
    let action_data = transfer_spore_action(&spore_id, &input.lock(), &output.lock())?;

    let script_info_hash = share::hash::blake2b_256(&action_data);
    let script_hash = spore_type.calc_script_hash();
    let data: packed::Bytes = action_data.as_slice().pack();
    Ok(pack_table(&[&script_info_hash, script_hash.as_slice(), data.as_slice()]))
}

pub fn generate_spore_cobuild(inputs: &[CellView], outputs: &[CellOutput]) -> Result<Bytes> {
    if inputs.len() != outputs.len() {
        return Err(Error::CoBuildLengthMismatch {
            inputs:  inputs.len(),
            outputs: outputs.len(),
        });
    }
    let actions = inputs
        .iter()
        .zip(outputs)
        .map(|(input, output)| spore_transfer(*input, output))
        .collect::<Result<Vec<_>>>()?;
    let action_refs: Vec<&[u8]> = actions.iter().map(|action| &action[..]).collect();

    let action_vec = pack_table(&action_refs);
    let message = pack_table(&[&action_vec]);
    let seal = packed::Bytes::default();
    let sighash_all = pack_table(&[&message, seal.as_slice()]);
    Ok(Bytes::from(pack_union(WITNESS_LAYOUT_SIGHASH_ALL, &sighash_all)))
}

// Maker: lists tokens or one NFT under the order lock.
//
// UDT  inputs:  [empty cells], token cells
//      outputs: order cell, [token change], CKB change
// NFT  inputs:  empty cells, nft cell
//      outputs: order cell, CKB change (+ spore co-build witness)

use ckb_types::bytes::Bytes;
use log::info;

use super::helper::{apply_joyid, cell_output, change_capacity, finalize, Party, TxDraft};
use super::{args::OrderArgs, MakerParams, MakerResult};
use crate::capacity::{
    empty_cell_min_capacity, nft_cell_min_capacity, nft_maker_list_package, udt_cell_min_capacity,
};
use crate::cell::{CellView, IndexerCell};
use crate::cobuild::generate_spore_cobuild;
use crate::collector::{CollectConfig, Collector};
use crate::constants::CKB_UNIT;
use crate::error::{Error, Result};
use crate::source::{CellSource, SearchKey};

const SIGNING_WITNESS_INDEX: usize = 0;

pub(crate) fn need_ckb_message(need_capacity: u64, min_capacity: u64) -> String {
    let need_ckb = (need_capacity + min_capacity + CKB_UNIT) / CKB_UNIT;
    format!(
        "At least {} free CKB (refundable) is required to place a sell order.",
        need_ckb
    )
}

/// First NFT cell the collector has not handed out yet.
pub(crate) fn pick_nft_cell<'c, S: CellSource>(
    collector: &Collector<S>,
    nft_cells: &'c [IndexerCell],
    exclude_pool_tx: bool,
) -> Result<&'c IndexerCell> {
    nft_cells
        .iter()
        .find(|cell| !exclude_pool_tx || !collector.is_in_queue(&cell.out_point))
        .ok_or_else(|| Error::NoAssetCells("The address has no NFT cells".to_owned()))
}

pub async fn build_maker_tx<S: CellSource>(
    collector: &mut Collector<S>,
    params: &MakerParams<'_>,
) -> Result<MakerResult> {
    let base = &params.base;
    let mut tx_fee = base.requested_fee();
    let party = Party::resolve(params.seller, base.network_config)?;
    let seller_lock = &party.lock;
    let asset_type = &params.asset_type;

    let empty_cells = collector.get_cells(&SearchKey::empty_cells(seller_lock)).await?;
    if empty_cells.is_empty() {
        return Err(Error::NoFreeCells);
    }

    let order_args = OrderArgs::new(seller_lock.clone(), base.asset.setup(), params.total_value);
    let order_lock = party.order_lock(&order_args);
    let min_capacity = empty_cell_min_capacity(seller_lock);

    let mut draft = TxDraft::default();
    let change;
    let list_package;
    let mut cobuild = None;
    let mut nft_out_point = None;

    if base.asset.is_udt() {
        let udt_cells = collector
            .get_cells(&SearchKey::lock_and_type(seller_lock, asset_type))
            .await?;
        if udt_cells.is_empty() {
            return Err(Error::NoAssetCells("The address has no UDT cells".to_owned()));
        }
        let udt = collector.collect_udt_inputs(&udt_cells, params.list_amount, base.exclude_pool_tx)?;

        let order_capacity = udt_cell_min_capacity(&order_lock, Some(asset_type));
        let udt_change_capacity = if udt.amount > params.list_amount {
            udt_cell_min_capacity(seller_lock, Some(asset_type))
        } else {
            0
        };
        let outputs_capacity = order_capacity + udt_change_capacity;

        let mut inputs_capacity = udt.capacity;
        if udt.capacity < outputs_capacity + min_capacity + tx_fee {
            let config = CollectConfig {
                min_change_capacity: Some(min_capacity),
                err_msg:             Some(need_ckb_message(order_capacity, min_capacity)),
                exclude_pool_tx:     base.exclude_pool_tx,
            };
            let need_capacity = outputs_capacity.saturating_sub(udt.capacity);
            let empty = collector.collect_inputs(&empty_cells, need_capacity, tx_fee, &config)?;
            draft.inputs.extend(empty.inputs);
            inputs_capacity += empty.capacity;
        }
        draft.inputs.extend(udt.inputs);

        draft.push_output(
            cell_output(&order_lock, Some(asset_type.clone()), order_capacity),
            Bytes::from(share::encode_u128_le(params.list_amount).to_vec()),
        );
        if udt_change_capacity > 0 {
            draft.push_output(
                cell_output(seller_lock, Some(asset_type.clone()), udt_change_capacity),
                Bytes::from(share::encode_u128_le(udt.amount - params.list_amount).to_vec()),
            );
        }
        change = change_capacity(inputs_capacity, outputs_capacity + tx_fee);
        draft.push_change(seller_lock, change);
        list_package = order_capacity;
    } else {
        let nft_cells = collector
            .get_cells(&SearchKey::lock_and_type(seller_lock, asset_type))
            .await?;
        let nft_cell = pick_nft_cell(collector, &nft_cells, base.exclude_pool_tx)?.clone();

        let order_capacity = nft_cell_min_capacity(&order_lock, CellView::Indexer(&nft_cell));
        let nft_capacity = nft_cell.capacity();
        let need_capacity = order_capacity.saturating_sub(nft_capacity);
        let config = CollectConfig {
            min_change_capacity: Some(min_capacity),
            err_msg:             Some(need_ckb_message(need_capacity, min_capacity)),
            exclude_pool_tx:     base.exclude_pool_tx,
        };
        let empty = collector.collect_inputs(&empty_cells, need_capacity, tx_fee, &config)?;
        nft_out_point = Some(nft_cell.out_point.clone());

        draft.inputs.extend(empty.inputs);
        draft.inputs.push(nft_cell.input());
        let order_output = cell_output(&order_lock, nft_cell.output.type_().to_opt(), order_capacity);
        draft.push_output(order_output.clone(), nft_cell.output_data.clone());

        change = change_capacity(empty.capacity + nft_capacity, order_capacity + tx_fee);
        draft.push_change(seller_lock, change);

        if base.asset.requires_cobuild() {
            cobuild = Some(generate_spore_cobuild(&[CellView::Indexer(&nft_cell)], &[order_output])?);
        }
        list_package = nft_maker_list_package(seller_lock, None);
    }

    draft
        .cell_deps
        .push(base.asset.script_config(party.config).cell_dep.cell_dep());
    draft.set_placeholder_witnesses(SIGNING_WITNESS_INDEX);
    if let Some(cobuild) = cobuild {
        draft.witnesses.push(cobuild);
    }
    apply_joyid(collector, base.joyid.as_ref(), &party, &mut draft, SIGNING_WITNESS_INDEX).await?;

    let (tx, fee) = finalize(draft, change, tx_fee, base)?;
    tx_fee = fee;
    collector.reserve(nft_out_point.iter());
    info!(
        "maker tx {:#x}: {} inputs, {} outputs, fee {} shannons",
        tx.hash(),
        tx.inputs().len(),
        tx.outputs().len(),
        tx_fee
    );

    Ok(MakerResult {
        tx,
        list_package,
        tx_fee,
        witness_index: SIGNING_WITNESS_INDEX,
    })
}

// Cancel: the owner takes listed assets back.
//
// inputs:  order cells, empty cells of the seller
// outputs: tokens merged by type or each NFT, back to the seller,
//          CKB change (+ spore co-build witness)

use ckb_types::{bytes::Bytes, packed::CellInput, prelude::*};
use log::info;

use super::helper::{apply_joyid, cell_output, change_capacity, clean_up_udt_outputs, finalize, Party, TxDraft};
use super::{args::OrderArgs, CancelParams, CancelResult};
use crate::capacity::{empty_cell_min_capacity, nft_cell_min_capacity};
use crate::cell::{script_eq, CellView, LiveCell};
use crate::cobuild::generate_spore_cobuild;
use crate::collector::{serialize_out_point, CollectConfig, Collector};
use crate::error::{Error, Result};
use crate::source::{CellSource, SearchKey};

pub async fn build_cancel_tx<S: CellSource>(
    collector: &mut Collector<S>,
    params: &CancelParams<'_>,
) -> Result<CancelResult> {
    let base = &params.base;
    let tx_fee = base.requested_fee();
    let party = Party::resolve(params.seller, base.network_config)?;
    let seller_lock = &party.lock;

    let empty_cells = collector.get_cells(&SearchKey::empty_cells(seller_lock)).await?;
    if empty_cells.is_empty() {
        return Err(Error::NoFreeCells);
    }

    let mut order_cells: Vec<LiveCell> = Vec::with_capacity(params.order_out_points.len());
    for out_point in &params.order_out_points {
        let cell = collector.get_live_cell(out_point).await?.ok_or_else(|| {
            Error::LiveCellNotFound("The asset cell specified by the out point has been spent".to_owned())
        })?;
        let lock = cell.output.lock();
        if !party.config.dex_lock.script.matches(&lock) {
            return Err(Error::NotOrderCell(serialize_out_point(out_point)));
        }
        let order_args = OrderArgs::from_slice(&lock.args().raw_data())?;
        if !script_eq(&order_args.owner_lock, seller_lock) {
            return Err(Error::OwnershipMismatch);
        }
        if cell.output.type_().is_none() || cell.data.is_none() {
            return Err(Error::MissingTypeOrData(
                "The asset cell specified by the out point must have type script".to_owned(),
            ));
        }
        order_cells.push(cell);
    }
    let order_inputs_capacity: u64 = order_cells.iter().map(LiveCell::capacity).sum();

    // fee plus a fresh change cell, the order cells pay for the returned assets
    let config = CollectConfig {
        min_change_capacity: Some(0),
        err_msg:             Some("Insufficient CKB available balance to pay transaction fee".to_owned()),
        exclude_pool_tx:     base.exclude_pool_tx,
    };
    let empty = collector.collect_inputs(
        &empty_cells,
        empty_cell_min_capacity(seller_lock),
        tx_fee,
        &config,
    )?;

    let mut draft = TxDraft::default();
    let order_count = params.order_out_points.len();
    draft.inputs.extend(
        params
            .order_out_points
            .iter()
            .map(|out_point| CellInput::new(out_point.clone(), 0)),
    );
    draft.inputs.extend(empty.inputs);

    let mut cobuild = None;
    if base.asset.is_udt() {
        let udt = clean_up_udt_outputs(&order_cells, seller_lock)?;
        draft.outputs.extend(udt.outputs);
        draft.outputs_data.extend(udt.outputs_data);
    } else {
        for cell in &order_cells {
            let nft_capacity = nft_cell_min_capacity(seller_lock, CellView::Live(cell));
            let output = cell_output(seller_lock, cell.output.type_().to_opt(), nft_capacity);
            draft.push_output(output, cell.data.clone().unwrap_or_else(Bytes::new));
        }
        if base.asset.requires_cobuild() {
            let order_views: Vec<CellView> = order_cells.iter().map(CellView::Live).collect();
            cobuild = Some(generate_spore_cobuild(&order_views, &draft.outputs)?);
        }
    }
    let outputs_capacity: u64 = draft
        .outputs
        .iter()
        .map(|output| -> u64 { output.capacity().unpack() })
        .sum();
    let change = change_capacity(
        empty.capacity + order_inputs_capacity,
        outputs_capacity + tx_fee,
    );
    draft.push_change(seller_lock, change);

    draft.cell_deps.push(party.config.dex_lock.cell_dep.cell_dep());
    draft
        .cell_deps
        .push(base.asset.script_config(party.config).cell_dep.cell_dep());

    // the seller signs the first of its own inputs
    let witness_index = order_count;
    draft.set_placeholder_witnesses(witness_index);
    if let Some(cobuild) = cobuild {
        draft.witnesses.push(cobuild);
    }
    apply_joyid(collector, base.joyid.as_ref(), &party, &mut draft, witness_index).await?;

    let (tx, tx_fee) = finalize(draft, change, tx_fee, base)?;
    collector.reserve(params.order_out_points.iter());
    info!(
        "cancel tx {:#x}: {} orders, fee {} shannons",
        tx.hash(),
        order_count,
        tx_fee
    );

    Ok(CancelResult {
        tx,
        tx_fee,
        witness_index,
    })
}

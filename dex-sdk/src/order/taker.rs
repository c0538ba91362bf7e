// Taker: fills one or more orders.
//
// inputs:  order cells, empty cells of the buyer
// outputs: one payment per order to its owner, the assets to the buyer,
//          CKB change (+ spore co-build witness)

use ckb_types::{bytes::Bytes, packed::CellInput, prelude::*};
use log::info;

use super::helper::{
    apply_joyid, cell_output, change_capacity, clean_up_udt_outputs, finalize, match_order_outputs,
    Party, TxDraft,
};
use super::{args::OrderArgs, TakerParams, TakerResult};
use crate::capacity::{empty_cell_min_capacity, nft_cell_min_capacity};
use crate::cell::{CellView, LiveCell};
use crate::cobuild::generate_spore_cobuild;
use crate::collector::{serialize_out_point, CollectConfig, Collector};
use crate::error::{Error, Result};
use crate::source::{CellSource, SearchKey};

pub async fn build_taker_tx<S: CellSource>(
    collector: &mut Collector<S>,
    params: &TakerParams<'_>,
) -> Result<TakerResult> {
    let base = &params.base;
    let tx_fee = base.requested_fee();
    let party = Party::resolve(params.buyer, base.network_config)?;
    let buyer_lock = &party.lock;

    let empty_cells = collector.get_cells(&SearchKey::empty_cells(buyer_lock)).await?;
    if empty_cells.is_empty() {
        return Err(Error::NoFreeCells);
    }

    let mut order_cells: Vec<LiveCell> = Vec::with_capacity(params.order_out_points.len());
    for out_point in &params.order_out_points {
        let cell = collector.get_live_cell(out_point).await?.ok_or_else(|| {
            Error::LiveCellNotFound(format!(
                "The order cell {} has been spent",
                serialize_out_point(out_point)
            ))
        })?;
        let lock = cell.output.lock();
        if !party.config.dex_lock.script.matches(&lock) {
            return Err(Error::NotOrderCell(serialize_out_point(out_point)));
        }
        let order_args = OrderArgs::from_slice(&lock.args().raw_data())?;
        if order_args.setup != base.asset.setup() {
            return Err(Error::UnsupportedAsset(format!(
                "order setup {} does not match {:?}",
                order_args.setup, base.asset
            )));
        }
        if cell.output.type_().is_none() || cell.data.is_none() {
            return Err(Error::MissingTypeOrData(
                "The order cell must have type script and data".to_owned(),
            ));
        }
        order_cells.push(cell);
    }
    let order_inputs_capacity: u64 = order_cells.iter().map(LiveCell::capacity).sum();

    let mut draft = TxDraft::default();
    let payments = match_order_outputs(&order_cells, base.asset.is_udt())?;
    let total_value = payments.sum_total_value;
    draft.outputs.extend(payments.outputs);
    draft.outputs_data.extend(payments.outputs_data);

    // Token orders pay the order capacity back to the owner on top of the
    // price, NFT orders spend it on the buyer's NFT cells.
    let mut nft_outputs = Vec::new();
    if base.asset.is_udt() {
        let udt = clean_up_udt_outputs(&order_cells, buyer_lock)?;
        draft.outputs.extend(udt.outputs);
        draft.outputs_data.extend(udt.outputs_data);
    } else {
        for cell in &order_cells {
            let nft_capacity = nft_cell_min_capacity(buyer_lock, CellView::Live(cell));
            let output = cell_output(buyer_lock, cell.output.type_().to_opt(), nft_capacity);
            nft_outputs.push(output.clone());
            draft.push_output(output, cell.data.clone().unwrap_or_else(Bytes::new));
        }
    }
    let outputs_capacity: u64 = draft
        .outputs
        .iter()
        .map(|output| -> u64 { output.capacity().unpack() })
        .sum();
    let need_capacity = outputs_capacity.saturating_sub(order_inputs_capacity);

    let config = CollectConfig {
        min_change_capacity: Some(empty_cell_min_capacity(buyer_lock)),
        err_msg:             None,
        exclude_pool_tx:     base.exclude_pool_tx,
    };
    let empty = collector.collect_inputs(&empty_cells, need_capacity, tx_fee, &config)?;

    let order_count = params.order_out_points.len();
    draft.inputs.extend(
        params
            .order_out_points
            .iter()
            .map(|out_point| CellInput::new(out_point.clone(), 0)),
    );
    draft.inputs.extend(empty.inputs);

    let change = change_capacity(
        empty.capacity + order_inputs_capacity,
        outputs_capacity + tx_fee,
    );
    draft.push_change(buyer_lock, change);

    draft
        .cell_deps
        .push(base.asset.script_config(party.config).cell_dep.cell_dep());
    draft.cell_deps.push(party.config.dex_lock.cell_dep.cell_dep());

    // the buyer signs the first of its own inputs
    let witness_index = order_count;
    draft.set_placeholder_witnesses(witness_index);
    if base.asset.requires_cobuild() {
        let order_views: Vec<CellView> = order_cells.iter().map(CellView::Live).collect();
        draft
            .witnesses
            .push(generate_spore_cobuild(&order_views, &nft_outputs)?);
    }
    apply_joyid(collector, base.joyid.as_ref(), &party, &mut draft, witness_index).await?;

    let (tx, tx_fee) = finalize(draft, change, tx_fee, base)?;
    collector.reserve(params.order_out_points.iter());
    info!(
        "taker tx {:#x}: {} orders for {} shannons, fee {} shannons",
        tx.hash(),
        order_count,
        total_value,
        tx_fee
    );

    Ok(TakerResult {
        tx,
        tx_fee,
        witness_index,
    })
}

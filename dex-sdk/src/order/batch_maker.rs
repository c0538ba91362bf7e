// Batch maker: lists several NFTs of one seller in a single transaction.
//
// inputs:  empty cells, nft cells
// outputs: one order cell per nft, CKB change (+ spore co-build witness)

use ckb_types::{packed::Script, prelude::*};
use log::info;

use super::helper::{apply_joyid, cell_output, change_capacity, finalize, Party, TxDraft};
use super::maker::{need_ckb_message, pick_nft_cell};
use super::{args::OrderArgs, BatchMakerParams, MakerResult};
use crate::capacity::{empty_cell_min_capacity, nft_cell_min_capacity, nft_maker_list_package};
use crate::cell::{CellView, IndexerCell};
use crate::cobuild::generate_spore_cobuild;
use crate::collector::{CollectConfig, Collector};
use crate::error::{Error, Result};
use crate::source::{CellSource, SearchKey};

const SIGNING_WITNESS_INDEX: usize = 0;

struct Listing {
    nft_cell:       IndexerCell,
    order_capacity: u64,
    order_lock:     Script,
}

pub async fn build_batch_maker_tx<S: CellSource>(
    collector: &mut Collector<S>,
    params: &BatchMakerParams<'_>,
) -> Result<MakerResult> {
    let base = &params.base;
    let tx_fee = base.requested_fee();
    let party = Party::resolve(params.seller, base.network_config)?;
    let seller_lock = &party.lock;

    let empty_cells = collector.get_cells(&SearchKey::empty_cells(seller_lock)).await?;
    if empty_cells.is_empty() {
        return Err(Error::NoFreeCells);
    }
    if base.asset.is_udt() {
        return Err(Error::UnsupportedAsset("Only support NFT asset".to_owned()));
    }
    let min_capacity = empty_cell_min_capacity(seller_lock);

    let mut listings: Vec<Listing> = Vec::with_capacity(params.nfts.len());
    let mut need_capacity: u64 = 0;
    for nft in &params.nfts {
        let order_args = OrderArgs::new(seller_lock.clone(), base.asset.setup(), nft.total_value);
        let order_lock = party.order_lock(&order_args);

        let nft_cells = collector
            .get_cells(&SearchKey::lock_and_type(seller_lock, &nft.asset_type))
            .await?;
        let candidates: Vec<IndexerCell> = nft_cells
            .into_iter()
            .filter(|cell| {
                !listings
                    .iter()
                    .any(|listing| listing.nft_cell.out_point.as_slice() == cell.out_point.as_slice())
            })
            .collect();
        let nft_cell = pick_nft_cell(collector, &candidates, base.exclude_pool_tx)?.clone();

        let order_capacity = nft_cell_min_capacity(&order_lock, CellView::Indexer(&nft_cell));
        need_capacity += order_capacity.saturating_sub(nft_cell.capacity());
        listings.push(Listing {
            nft_cell,
            order_capacity,
            order_lock,
        });
    }

    let config = CollectConfig {
        min_change_capacity: Some(min_capacity),
        err_msg:             Some(need_ckb_message(need_capacity, min_capacity)),
        exclude_pool_tx:     base.exclude_pool_tx,
    };
    let empty = collector.collect_inputs(&empty_cells, need_capacity, tx_fee, &config)?;

    let mut draft = TxDraft::default();
    draft.inputs.extend(empty.inputs);
    let mut nft_capacity: u64 = 0;
    let mut order_capacity: u64 = 0;
    for listing in &listings {
        draft.inputs.push(listing.nft_cell.input());
        let order_output = cell_output(
            &listing.order_lock,
            listing.nft_cell.output.type_().to_opt(),
            listing.order_capacity,
        );
        draft.push_output(order_output, listing.nft_cell.output_data.clone());
        nft_capacity += listing.nft_cell.capacity();
        order_capacity += listing.order_capacity;
    }

    let cobuild = if base.asset.requires_cobuild() {
        let nft_views: Vec<CellView> = listings
            .iter()
            .map(|listing| CellView::Indexer(&listing.nft_cell))
            .collect();
        Some(generate_spore_cobuild(&nft_views, &draft.outputs)?)
    } else {
        None
    };

    let change = change_capacity(empty.capacity + nft_capacity, order_capacity + tx_fee);
    draft.push_change(seller_lock, change);

    draft
        .cell_deps
        .push(base.asset.script_config(party.config).cell_dep.cell_dep());
    draft.set_placeholder_witnesses(SIGNING_WITNESS_INDEX);
    if let Some(cobuild) = cobuild {
        draft.witnesses.push(cobuild);
    }
    apply_joyid(collector, base.joyid.as_ref(), &party, &mut draft, SIGNING_WITNESS_INDEX).await?;

    let (tx, tx_fee) = finalize(draft, change, tx_fee, base)?;
    collector.reserve(listings.iter().map(|listing| &listing.nft_cell.out_point));
    info!(
        "batch maker tx {:#x}: {} nfts, fee {} shannons",
        tx.hash(),
        listings.len(),
        tx_fee
    );

    Ok(MakerResult {
        tx,
        list_package: nft_maker_list_package(seller_lock, None),
        tx_fee,
        witness_index: SIGNING_WITNESS_INDEX,
    })
}

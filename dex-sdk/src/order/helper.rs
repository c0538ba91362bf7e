use std::convert::TryFrom;

use ckb_types::{
    bytes::Bytes,
    core::{DepType, TransactionBuilder, TransactionView},
    packed::{CellDep, CellInput, CellOutput, Script, WitnessArgs},
    prelude::*,
};
use log::debug;
use share::cell::UdtCellData;

use super::{args::OrderArgs, BaseParams};
use crate::address::parse_address;
use crate::aggregator::{JoyIdConfig, SubkeyUnlockReq};
use crate::capacity::{transaction_fee, transaction_size, udt_cell_min_capacity};
use crate::cell::{script_eq, LiveCell};
use crate::collector::Collector;
use crate::constants::{DEFAULT_ESTIMATED_WITNESS_SIZE, JOYID_ESTIMATED_WITNESS_SIZE};
use crate::error::{Error, Result};
use crate::network::{Network, NetworkConfig};
use crate::source::{CellSource, SearchKey};

/// The acting address resolved to its lock and network scripts.
pub struct Party<'a> {
    pub network: Network,
    pub lock:    Script,
    pub config:  &'a NetworkConfig,
}

impl<'a> Party<'a> {
    pub fn resolve(address: &str, config: Option<&'a NetworkConfig>) -> Result<Party<'a>> {
        let (network, lock) = parse_address(address)?;
        let config = config.unwrap_or_else(|| NetworkConfig::of(network));
        Ok(Party {
            network,
            lock,
            config,
        })
    }

    pub fn order_lock(&self, args: &OrderArgs) -> Script {
        self.config.dex_lock_script(args.to_bytes())
    }
}

/// Transaction parts collected by a builder before assembly.
#[derive(Debug, Default)]
pub struct TxDraft {
    pub cell_deps:    Vec<CellDep>,
    pub inputs:       Vec<CellInput>,
    pub outputs:      Vec<CellOutput>,
    pub outputs_data: Vec<Bytes>,
    pub witnesses:    Vec<Bytes>,
}

impl TxDraft {
    pub fn push_output(&mut self, output: CellOutput, data: Bytes) {
        self.outputs.push(output);
        self.outputs_data.push(data);
    }

    /// Pushes a cell without type script and data.
    pub fn push_change(&mut self, lock: &Script, capacity: u64) {
        let output = CellOutput::new_builder()
            .lock(lock.clone())
            .capacity(capacity.pack())
            .build();
        self.push_output(output, Bytes::new());
    }

    /// One witness per input, an empty `WitnessArgs` at `witness_index`.
    pub fn set_placeholder_witnesses(&mut self, witness_index: usize) {
        self.witnesses = (0..self.inputs.len())
            .map(|index| {
                if index == witness_index {
                    WitnessArgs::new_builder().build().as_bytes()
                } else {
                    Bytes::new()
                }
            })
            .collect();
    }

    pub fn build(&self) -> TransactionView {
        TransactionBuilder::default()
            .version(0u32.pack())
            .cell_deps(self.cell_deps.clone())
            .inputs(self.inputs.clone())
            .outputs(self.outputs.clone())
            .outputs_data(self.outputs_data.iter().map(|data| data.pack()))
            .witnesses(self.witnesses.iter().map(|witness| witness.pack()))
            .build()
    }

    fn set_last_output_capacity(&mut self, capacity: u64) {
        if let Some(last) = self.outputs.last_mut() {
            *last = last.clone().as_builder().capacity(capacity.pack()).build();
        }
    }
}

pub fn cell_output(lock: &Script, type_script: Option<Script>, capacity: u64) -> CellOutput {
    CellOutput::new_builder()
        .lock(lock.clone())
        .type_(type_script.pack())
        .capacity(capacity.pack())
        .build()
}

/// `total - spent`. The collector already guaranteed enough capacity, so a
/// shortfall means a builder miscounted its outputs.
pub fn change_capacity(total: u64, spent: u64) -> u64 {
    assert!(
        total >= spent,
        "inputs capacity {} cannot cover outputs and fee {}",
        total,
        spent
    );
    total - spent
}

/// Adds the JoyID lock dep and, for subkey signers, the unlock entry and CoTA cell dep.
pub async fn apply_joyid<S: CellSource>(
    collector: &Collector<S>,
    joyid: Option<&JoyIdConfig<'_>>,
    party: &Party<'_>,
    draft: &mut TxDraft,
    witness_index: usize,
) -> Result<()> {
    let joyid = match joyid {
        Some(joyid) => joyid,
        None => return Ok(()),
    };
    draft.cell_deps.push(party.config.joyid_lock.cell_dep.cell_dep());
    if !joyid.is_subkey() {
        return Ok(());
    }

    let req = SubkeyUnlockReq::new(&party.lock, &joyid.connect_data.pubkey)?;
    let resp = joyid.aggregator.generate_subkey_unlock_smt(&req).await?;
    debug!("subkey unlock entry at block {}", resp.block_number);
    let unlock_entry = Bytes::from(resp.unlock_entry_bytes()?);
    let witness = WitnessArgs::new_builder()
        .output_type(Some(unlock_entry).pack())
        .build();
    if let Some(slot) = draft.witnesses.get_mut(witness_index) {
        *slot = witness.as_bytes();
    }

    let cota_type = party.config.cota_type_script();
    let cota_cells = collector
        .get_cells(&SearchKey::lock_and_type(&party.lock, &cota_type))
        .await?;
    let cota_cell = cota_cells.first().ok_or(Error::NoUnlockProofCell)?;
    let cota_dep = CellDep::new_builder()
        .out_point(cota_cell.out_point.clone())
        .dep_type(DepType::Code.into())
        .build();
    draft.cell_deps.insert(0, cota_dep);
    Ok(())
}

/// Builds the transaction. When the requested fee is the estimation sentinel,
/// measures the draft, computes the real fee and returns the difference to the
/// last output (the change cell).
pub fn finalize(mut draft: TxDraft, change: u64, fee: u64, base: &BaseParams) -> Result<(TransactionView, u64)> {
    let tx = draft.build();
    if fee != base.fee_config.max_fee {
        return Ok((tx, fee));
    }

    let witness_size = if base.joyid.is_some() {
        JOYID_ESTIMATED_WITNESS_SIZE
    } else {
        base.estimate_witness_size.unwrap_or(DEFAULT_ESTIMATED_WITNESS_SIZE)
    };
    let tx_size = transaction_size(&tx) + witness_size;
    let tx_fee = transaction_fee(tx_size, base.fee_config.fee_rate);
    let estimated_change = change
        .checked_add(base.fee_config.max_fee)
        .and_then(|capacity| capacity.checked_sub(tx_fee))
        .ok_or_else(|| {
            Error::InsufficientCapacity("Insufficient CKB available balance to pay transaction fee".to_owned())
        })?;
    debug!("tx size {} bytes, fee {} shannons", tx_size, tx_fee);

    draft.set_last_output_capacity(estimated_change);
    Ok((draft.build(), tx_fee))
}

pub struct UdtOutputs {
    pub outputs:      Vec<CellOutput>,
    pub outputs_data: Vec<Bytes>,
}

/// One token cell for `lock` per distinct type script, holding the summed
/// amount of the order cells with that type. Types keep first-seen order.
pub fn clean_up_udt_outputs(order_cells: &[LiveCell], lock: &Script) -> Result<UdtOutputs> {
    let mut groups: Vec<(Script, u128)> = Vec::new();
    for cell in order_cells {
        let udt_type = cell.output.type_().to_opt().ok_or_else(|| {
            Error::MissingTypeOrData("The asset cell specified by the out point must have type script".to_owned())
        })?;
        let data = cell.data.as_ref().map(|data| &data[..]).unwrap_or(&[]);
        let amount = UdtCellData::from_raw(data)?.amount;
        match groups.iter_mut().find(|(script, _)| script_eq(script, &udt_type)) {
            Some((_, sum)) => {
                *sum = sum.checked_add(amount).ok_or_else(|| {
                    Error::InsufficientTokenBalance("UDT amount overflow".to_owned())
                })?
            }
            None => groups.push((udt_type, amount)),
        }
    }

    let mut outputs = UdtOutputs {
        outputs:      Vec::with_capacity(groups.len()),
        outputs_data: Vec::with_capacity(groups.len()),
    };
    for (udt_type, amount) in groups {
        let capacity = udt_cell_min_capacity(lock, Some(&udt_type));
        outputs.outputs.push(cell_output(lock, Some(udt_type), capacity));
        outputs
            .outputs_data
            .push(Bytes::from(share::encode_u128_le(amount).to_vec()));
    }
    Ok(outputs)
}

pub struct OrderPayments {
    pub outputs:         Vec<CellOutput>,
    pub outputs_data:    Vec<Bytes>,
    /// Sum of the order prices, without the returned order capacity.
    pub sum_total_value: u64,
}

/// One payment cell per order to its owner lock. Token orders also return the
/// order cell capacity to the owner, NFT prices already include it.
pub fn match_order_outputs(order_cells: &[LiveCell], include_order_capacity: bool) -> Result<OrderPayments> {
    let mut payments = OrderPayments {
        outputs:         Vec::with_capacity(order_cells.len()),
        outputs_data:    Vec::with_capacity(order_cells.len()),
        sum_total_value: 0,
    };
    for cell in order_cells {
        let order_args = OrderArgs::from_slice(&cell.output.lock().args().raw_data())?;
        let total_value = u64::try_from(order_args.total_value)
            .map_err(|_| Error::MalformedArgs(format!("total value {} overflows u64", order_args.total_value)))?;
        let mut pay_capacity = total_value;
        if include_order_capacity {
            pay_capacity = pay_capacity
                .checked_add(cell.capacity())
                .ok_or_else(|| Error::MalformedArgs("payment overflows u64".to_owned()))?;
        }
        payments.sum_total_value = payments
            .sum_total_value
            .checked_add(total_value)
            .ok_or_else(|| Error::MalformedArgs("total value overflows u64".to_owned()))?;
        payments
            .outputs
            .push(cell_output(&order_args.owner_lock, None, pay_capacity));
        payments.outputs_data.push(Bytes::new());
    }
    Ok(payments)
}

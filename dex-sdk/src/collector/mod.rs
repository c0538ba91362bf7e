mod queue;

pub use queue::{deserialize_out_point, deserialize_out_points, serialize_out_point, PendingQueue};

use ckb_types::{
    packed::{CellInput, OutPoint, Script, Transaction},
    H256,
};
use log::{debug, warn};

use crate::cell::{IndexerCell, LiveCell};
use crate::constants::{CKB_UNIT, MIN_CAPACITY};
use crate::error::{Error, Result};
use crate::source::{CellSource, SearchKey};

fn insufficient_ckb_message(target: u64) -> String {
    let need_ckb = target / CKB_UNIT + u64::from(target % CKB_UNIT != 0);
    format!("Insufficient free CKB balance, at least {} CKB is required", need_ckb)
}

#[derive(Debug, Clone, Default)]
pub struct CollectConfig {
    /// Capacity that must be left over for a change cell, `MIN_CAPACITY` when unset.
    pub min_change_capacity: Option<u64>,
    pub err_msg:             Option<String>,
    /// Skip cells that are still in the pending queue.
    pub exclude_pool_tx:     bool,
}

#[derive(Debug, Clone)]
pub struct CollectResult {
    pub inputs:   Vec<CellInput>,
    pub capacity: u64,
}

#[derive(Debug, Clone)]
pub struct CollectUdtResult {
    pub inputs:   Vec<CellInput>,
    pub capacity: u64,
    pub amount:   u128,
}

/// Picks inputs from a `CellSource` and remembers what it picked.
pub struct Collector<S> {
    source: S,
    queue:  PendingQueue,
}

impl<S: CellSource> Collector<S> {
    pub fn new(source: S) -> Self {
        Collector::with_queue(source, PendingQueue::new())
    }

    pub fn with_queue(source: S, queue: PendingQueue) -> Self {
        Collector { source, queue }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn queue(&self) -> &PendingQueue {
        &self.queue
    }

    pub async fn get_cells(&self, key: &SearchKey) -> Result<Vec<IndexerCell>> {
        self.source.get_cells(key).await
    }

    pub async fn get_capacity(&self, lock: &Script) -> Result<u64> {
        self.source.get_cells_capacity(lock).await
    }

    pub async fn get_live_cell(&self, out_point: &OutPoint) -> Result<Option<LiveCell>> {
        self.source.get_live_cell(out_point).await
    }

    pub async fn send_transaction(&self, tx: &Transaction) -> Result<H256> {
        self.source.send_transaction(tx).await
    }

    /// Greedy first-fit: takes cells in the given order until their capacity
    /// covers `need_capacity + fee` plus the minimum change.
    pub fn collect_inputs(
        &mut self,
        cells: &[IndexerCell],
        need_capacity: u64,
        fee: u64,
        config: &CollectConfig,
    ) -> Result<CollectResult> {
        let min_change = config.min_change_capacity.unwrap_or(MIN_CAPACITY);
        let target = need_capacity.saturating_add(min_change).saturating_add(fee);

        let mut inputs = Vec::new();
        let mut out_points = Vec::new();
        let mut sum: u64 = 0;
        for cell in cells {
            if config.exclude_pool_tx && self.queue.contains(&cell.out_point) {
                debug!("skip pending cell {}", serialize_out_point(&cell.out_point));
                continue;
            }
            inputs.push(cell.input());
            out_points.push(cell.out_point.clone());
            sum = sum.saturating_add(cell.capacity());
            if sum >= target {
                break;
            }
        }
        if sum < target {
            let message = config
                .err_msg
                .clone()
                .unwrap_or_else(|| insufficient_ckb_message(target));
            warn!("collected {} of {} shannons", sum, target);
            return Err(Error::InsufficientCapacity(message));
        }

        self.queue.extend(out_points.iter());
        debug!("collected {} inputs with {} shannons", inputs.len(), sum);
        Ok(CollectResult {
            inputs,
            capacity: sum,
        })
    }

    /// Same walk as `collect_inputs`, stopping on the token amount instead.
    pub fn collect_udt_inputs(
        &mut self,
        cells: &[IndexerCell],
        need_amount: u128,
        exclude_pool_tx: bool,
    ) -> Result<CollectUdtResult> {
        let mut inputs = Vec::new();
        let mut out_points = Vec::new();
        let mut capacity: u64 = 0;
        let mut amount: u128 = 0;
        for cell in cells {
            if exclude_pool_tx && self.queue.contains(&cell.out_point) {
                debug!("skip pending cell {}", serialize_out_point(&cell.out_point));
                continue;
            }
            inputs.push(cell.input());
            out_points.push(cell.out_point.clone());
            capacity = capacity.saturating_add(cell.capacity());
            amount = amount.saturating_add(share::cell::UdtCellData::amount_or_zero(&cell.output_data));
            if amount >= need_amount {
                break;
            }
        }
        if amount < need_amount {
            warn!("collected {} of {} tokens", amount, need_amount);
            return Err(Error::InsufficientTokenBalance(format!(
                "Insufficient UDT balance, at least {} is required",
                need_amount
            )));
        }

        self.queue.extend(out_points.iter());
        Ok(CollectUdtResult {
            inputs,
            capacity,
            amount,
        })
    }

    /// Puts OutPoints spent outside the collector into the queue.
    pub fn reserve<'a, I: IntoIterator<Item = &'a OutPoint>>(&mut self, out_points: I) {
        self.queue.extend(out_points);
    }

    pub fn is_in_queue(&self, out_point: &OutPoint) -> bool {
        self.queue.contains(out_point)
    }

    pub fn clear_queue(&mut self) {
        self.queue.clear();
    }
}

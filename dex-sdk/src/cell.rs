use ckb_types::{
    bytes::Bytes,
    packed::{CellInput, CellOutput, OutPoint, Script},
    prelude::*,
};

/// A cell as returned by the indexer `get_cells` call.
#[derive(Debug, Clone)]
pub struct IndexerCell {
    pub block_number: u64,
    pub out_point:    OutPoint,
    pub output:       CellOutput,
    pub output_data:  Bytes,
    pub tx_index:     u32,
}

impl IndexerCell {
    pub fn input(&self) -> CellInput {
        CellInput::new(self.out_point.clone(), 0)
    }

    pub fn capacity(&self) -> u64 {
        self.output.capacity().unpack()
    }
}

/// A cell as returned by the node `get_live_cell` call with data.
#[derive(Debug, Clone)]
pub struct LiveCell {
    pub output: CellOutput,
    pub data:   Option<Bytes>,
}

impl LiveCell {
    pub fn capacity(&self) -> u64 {
        self.output.capacity().unpack()
    }
}

/// Either kind of cell, read through one set of accessors.
#[derive(Debug, Clone, Copy)]
pub enum CellView<'a> {
    Indexer(&'a IndexerCell),
    Live(&'a LiveCell),
}

impl<'a> CellView<'a> {
    pub fn output(&self) -> &'a CellOutput {
        match *self {
            CellView::Indexer(cell) => &cell.output,
            CellView::Live(cell) => &cell.output,
        }
    }

    /// Missing live cell data reads as empty.
    pub fn data(&self) -> &'a [u8] {
        match *self {
            CellView::Indexer(cell) => &cell.output_data,
            CellView::Live(cell) => cell.data.as_ref().map(|data| &data[..]).unwrap_or(&[]),
        }
    }

    pub fn capacity(&self) -> u64 {
        self.output().capacity().unpack()
    }

    pub fn lock(&self) -> Script {
        self.output().lock()
    }

    pub fn type_script(&self) -> Option<Script> {
        self.output().type_().to_opt()
    }
}

impl<'a> From<&'a IndexerCell> for CellView<'a> {
    fn from(cell: &'a IndexerCell) -> Self {
        CellView::Indexer(cell)
    }
}

impl<'a> From<&'a LiveCell> for CellView<'a> {
    fn from(cell: &'a LiveCell) -> Self {
        CellView::Live(cell)
    }
}

pub fn script_eq(a: &Script, b: &Script) -> bool {
    a.as_slice() == b.as_slice()
}

//! Transaction builders for the CKB order book.
//!
//! Builders return unsigned transactions. Chain access goes through
//! [`source::CellSource`], JoyID subkey proofs through [`aggregator::UnlockOracle`].

pub mod address;
pub mod aggregator;
pub mod capacity;
pub mod cell;
pub mod cobuild;
pub mod collector;
pub mod constants;
pub mod error;
pub mod network;
pub mod order;
pub mod source;

pub use error::{Error, Result};

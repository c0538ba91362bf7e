pub mod cell;
pub mod codec;
pub mod error;
pub mod hash;

pub use codec::*;

//! # Stateline Serde
//! Bit-level reading & writing of the fixed-size values replicated by
//! stateline.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod bit_reader;
mod bit_writer;
mod error;
mod impls;
mod serde;

pub use bit_reader::BitReader;
pub use bit_writer::{BitWrite, BitWriter};
pub use error::SerdeErr;
pub use serde::{ConstBitLength, Serde};

//! Low-level on-the-wire primitives and helpers for the discovery protocol.
//!
//! This module defines the big-endian integer formats and the bounded byte
//! array helpers used by the packet codec.

mod ints;
mod primitives;

pub use ints::{U16BE, U32BE, U64BE};
pub use primitives::{read_bytes, read_u8, skip_bytes, write_u8};

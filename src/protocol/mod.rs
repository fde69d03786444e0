//! Versioned on-wire packet format for discovery announcements.
//!
//! # Packet layout
//!
//! Two versions are in circulation. Both start with the same two bytes, a
//! version byte followed by a packet type byte, so the version can be
//! selected before the rest of the layout is known. All multi-byte integers
//! are unsigned big-endian.
//!
//! V1 (current):
//!
//! ```text
//! u8  version = 1
//! u8  packet_type
//! u32 application_id
//! u32 peer_id
//! u64 snapshot_index
//! u16 user_data_size   (<= 4096)
//! ..  user_data
//! ```
//!
//! V0 (legacy) widens the user-data envelope to a u32 size capped at 32768
//! and appends a length-prefixed padding block whose content is ignored.

pub mod constants;
pub mod packet;
pub mod types;
mod version;

pub use packet::{parse, serialize, Packet, PacketType};
pub use version::ProtocolVersion;

//! LAN peer discovery over UDP broadcast and multicast.
//!
//! This crate provides high-level types for announcing an application
//! instance on the local network and tracking the instances announced by
//! others:
//! - [`Peer`] owns the announcement/receive loops and the discovered-peer
//!   table
//! - [`PeerParameters`] configures transports, roles, timing and identity
//!   policy
//! - [`DiscoveredPeer`] is a snapshot of one tracked remote instance
//! - [`protocol`] implements the versioned on-wire packet format
//!
//! ## Features
//!
//! - UDP broadcast and/or IPv4 multicast announcements
//! - Application scoping through a 32-bit application id
//! - Per-peer user data ordered by a per-sender snapshot index
//! - Liveness eviction with a configurable TTL
//! - Graceful departure packets on shutdown

pub mod compare;
pub mod endpoint;
pub mod error;
pub mod peer;
pub mod protocol;

pub use compare::{same_endpoint, same_list};
pub use endpoint::Endpoint;
pub use error::{DiscoveryError, Result};
pub use peer::{DiscoveredPeer, Peer, PeerParameters, SamePeerMode};
pub use protocol::{Packet, PacketType, ProtocolVersion};

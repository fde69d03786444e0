//! Same-peer equivalence on endpoints and on discovered-peer lists.
//!
//! Consumers use [`same_list`] to debounce display updates: two snapshots
//! that are `same` under the configured mode describe the same set of
//! peers, so there is nothing new to show.

use crate::endpoint::Endpoint;
use crate::peer::{DiscoveredPeer, SamePeerMode};

/// Whether two endpoints belong to the same peer under the given mode.
pub fn same_endpoint(mode: SamePeerMode, a: Endpoint, b: Endpoint) -> bool {
    match mode {
        SamePeerMode::Ip => a.ip == b.ip,
        SamePeerMode::IpAndPort => a.ip == b.ip && a.port == b.port,
    }
}

/// Whether two discovered-peer lists describe the same set of peers.
///
/// Set equivalence on endpoints under the given mode: every endpoint in one
/// list must have at least one counterpart in the other. User data is not
/// considered.
pub fn same_list(mode: SamePeerMode, lhs: &[DiscoveredPeer], rhs: &[DiscoveredPeer]) -> bool {
    let covered = |from: &[DiscoveredPeer], by: &[DiscoveredPeer]| {
        from.iter().all(|peer| {
            by.iter()
                .any(|other| same_endpoint(mode, peer.endpoint, other.endpoint))
        })
    };

    covered(lhs, rhs) && covered(rhs, lhs)
}

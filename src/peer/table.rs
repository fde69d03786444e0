//! The table of peers discovered so far.

use crate::compare::same_endpoint;
use crate::endpoint::Endpoint;
use crate::peer::SamePeerMode;
use crate::protocol::Packet;

/// A snapshot of one remote application instance seen on the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredPeer {
    /// Where the peer's announcements come from.
    pub endpoint: Endpoint,
    /// User data from the announcement with the highest snapshot index
    /// observed so far.
    pub user_data: Vec<u8>,
    /// Highest snapshot index observed from this peer.
    pub last_received_snapshot: u64,
    /// Local monotonic clock, in milliseconds, at the last accepted
    /// announcement.
    pub last_updated_ms: i64,
}

/// Discovered peers in insertion order, at most one entry per same-peer
/// identity.
///
/// The peer runtime mutates the table under its mutex; all operations here
/// are plain single-threaded list manipulation.
#[derive(Debug, Default)]
pub(crate) struct PeerTable {
    entries: Vec<DiscoveredPeer>,
}

impl PeerTable {
    /// Records an `IAmHere` announcement from `from`.
    ///
    /// A previously unseen identity is appended. For a known identity the
    /// liveness stamp is always refreshed, while user data moves only
    /// forward: a packet whose snapshot index is not strictly greater than
    /// the recorded one leaves the data untouched.
    pub(crate) fn upsert_iamhere(
        &mut self,
        now_ms: i64,
        from: Endpoint,
        packet: &Packet,
        mode: SamePeerMode,
    ) {
        match self
            .entries
            .iter_mut()
            .find(|entry| same_endpoint(mode, entry.endpoint, from))
        {
            None => self.entries.push(DiscoveredPeer {
                endpoint: from,
                user_data: packet.user_data.clone(),
                last_received_snapshot: packet.snapshot_index,
                last_updated_ms: now_ms,
            }),
            Some(entry) => {
                if packet.snapshot_index > entry.last_received_snapshot {
                    entry.user_data = packet.user_data.clone();
                    entry.last_received_snapshot = packet.snapshot_index;
                }
                entry.last_updated_ms = now_ms;
            }
        }
    }

    /// Removes the first entry matching `from`, if any.
    pub(crate) fn remove_iamoutofhere(&mut self, from: Endpoint, mode: SamePeerMode) {
        if let Some(position) = self
            .entries
            .iter()
            .position(|entry| same_endpoint(mode, entry.endpoint, from))
        {
            self.entries.remove(position);
        }
    }

    /// Drops every entry that has been silent for longer than the TTL.
    pub(crate) fn evict_idle(&mut self, now_ms: i64, ttl_ms: i64) {
        self.entries
            .retain(|entry| now_ms - entry.last_updated_ms <= ttl_ms);
    }

    /// Copy of the table preserving insertion order.
    pub(crate) fn snapshot(&self) -> Vec<DiscoveredPeer> {
        self.entries.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PacketType;
    use std::net::Ipv4Addr;

    fn endpoint(last_octet: u8, port: u16) -> Endpoint {
        Endpoint::new(Ipv4Addr::new(10, 0, 0, last_octet), port)
    }

    fn announcement(snapshot_index: u64, user_data: &[u8]) -> Packet {
        Packet {
            packet_type: PacketType::IAmHere,
            application_id: 1,
            peer_id: 77,
            snapshot_index,
            user_data: user_data.to_vec(),
        }
    }

    #[test]
    fn upsert_appends_unseen_identity() {
        let mut table = PeerTable::default();
        table.upsert_iamhere(100, endpoint(1, 5000), &announcement(1, b"a"), SamePeerMode::IpAndPort);
        table.upsert_iamhere(101, endpoint(2, 5000), &announcement(1, b"b"), SamePeerMode::IpAndPort);

        let snapshot = table.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].endpoint, endpoint(1, 5000));
        assert_eq!(snapshot[1].endpoint, endpoint(2, 5000));
        assert_eq!(snapshot[0].user_data, b"a");
        assert_eq!(snapshot[0].last_updated_ms, 100);
    }

    #[test]
    fn snapshot_index_moves_user_data_forward_only() {
        let mut table = PeerTable::default();
        let from = endpoint(1, 5000);
        table.upsert_iamhere(100, from, &announcement(5, b"v1"), SamePeerMode::IpAndPort);

        // Stale announcement: liveness refreshed, data untouched.
        table.upsert_iamhere(200, from, &announcement(3, b"old"), SamePeerMode::IpAndPort);
        let snapshot = table.snapshot();
        assert_eq!(snapshot[0].user_data, b"v1");
        assert_eq!(snapshot[0].last_received_snapshot, 5);
        assert_eq!(snapshot[0].last_updated_ms, 200);

        // Equal index is idempotent.
        table.upsert_iamhere(300, from, &announcement(5, b"dup"), SamePeerMode::IpAndPort);
        assert_eq!(table.snapshot()[0].user_data, b"v1");

        // Strictly greater index wins.
        table.upsert_iamhere(400, from, &announcement(6, b"v2"), SamePeerMode::IpAndPort);
        let snapshot = table.snapshot();
        assert_eq!(snapshot[0].user_data, b"v2");
        assert_eq!(snapshot[0].last_received_snapshot, 6);
    }

    #[test]
    fn ip_mode_collapses_instances_on_one_host() {
        let mut table = PeerTable::default();
        table.upsert_iamhere(100, endpoint(1, 5000), &announcement(1, b"a"), SamePeerMode::Ip);
        table.upsert_iamhere(101, endpoint(1, 6000), &announcement(2, b"b"), SamePeerMode::Ip);

        let snapshot = table.snapshot();
        assert_eq!(snapshot.len(), 1);
        // Last writer by snapshot index wins.
        assert_eq!(snapshot[0].user_data, b"b");
    }

    #[test]
    fn ip_and_port_mode_keeps_instances_apart() {
        let mut table = PeerTable::default();
        table.upsert_iamhere(100, endpoint(1, 5000), &announcement(1, b"a"), SamePeerMode::IpAndPort);
        table.upsert_iamhere(101, endpoint(1, 6000), &announcement(2, b"b"), SamePeerMode::IpAndPort);
        assert_eq!(table.snapshot().len(), 2);
    }

    #[test]
    fn remove_drops_matching_entry() {
        let mut table = PeerTable::default();
        table.upsert_iamhere(100, endpoint(1, 5000), &announcement(1, b"a"), SamePeerMode::IpAndPort);
        table.upsert_iamhere(101, endpoint(2, 5000), &announcement(1, b"b"), SamePeerMode::IpAndPort);

        table.remove_iamoutofhere(endpoint(1, 5000), SamePeerMode::IpAndPort);
        let snapshot = table.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].endpoint, endpoint(2, 5000));

        // Removing an unknown endpoint is a no-op.
        table.remove_iamoutofhere(endpoint(9, 5000), SamePeerMode::IpAndPort);
        assert_eq!(table.snapshot().len(), 1);
    }

    #[test]
    fn evict_removes_only_idle_entries() {
        let mut table = PeerTable::default();
        table.upsert_iamhere(100, endpoint(1, 5000), &announcement(1, b"a"), SamePeerMode::IpAndPort);
        table.upsert_iamhere(900, endpoint(2, 5000), &announcement(1, b"b"), SamePeerMode::IpAndPort);

        table.evict_idle(1000, 500);
        let snapshot = table.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].endpoint, endpoint(2, 5000));

        // Exactly at the TTL boundary an entry survives.
        table.evict_idle(1400, 500);
        assert_eq!(table.snapshot().len(), 1);
        table.evict_idle(1401, 500);
        assert!(table.snapshot().is_empty());
    }
}

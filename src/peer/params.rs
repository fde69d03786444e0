use std::net::Ipv4Addr;
use std::time::Duration;

use crate::protocol::ProtocolVersion;

/// Policy selecting whether two endpoints are treated as the same
/// discovered peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamePeerMode {
    /// Compare addresses only. Two application instances on the same host
    /// collapse into a single table entry; their user data converges on the
    /// last writer by snapshot index.
    Ip,
    /// Compare addresses and ports.
    IpAndPort,
}

/// Configuration for [`Peer::start`].
///
/// [`Peer::start`]: crate::peer::Peer::start
#[derive(Debug, Clone)]
pub struct PeerParameters {
    /// Scope id. Packets carrying another id are dropped.
    pub application_id: u32,

    /// UDP port bound for receiving and used as the destination for
    /// announcements.
    pub port: u16,

    /// Emit periodic `IAmHere` announcements.
    pub can_be_discovered: bool,

    /// Bind the receive socket and track announcements from others.
    pub can_discover: bool,

    /// Keep packets whose peer id equals our own session id. Off by
    /// default so a peer does not discover itself through the loopback of
    /// its own broadcasts.
    pub discover_self: bool,

    /// Address announcements to the limited broadcast address.
    pub can_use_broadcast: bool,

    /// Address announcements to `multicast_group_address`; the receive
    /// socket joins that group. When broadcast is also enabled, multicast
    /// wins and a single datagram is sent per version per tick.
    pub can_use_multicast: bool,

    /// IPv4 multicast group, used only when `can_use_multicast` is set.
    pub multicast_group_address: Ipv4Addr,

    /// Period between `IAmHere` emissions.
    pub send_timeout: Duration,

    /// Maximum silence before a discovered peer is evicted; also the
    /// period of the eviction sweep.
    pub discovered_peer_ttl: Duration,

    /// Lowest protocol version emitted and accepted.
    pub min_supported_protocol_version: ProtocolVersion,

    /// Highest protocol version emitted and accepted.
    pub max_supported_protocol_version: ProtocolVersion,

    /// Identity policy for the discovered-peer table.
    pub same_peer_mode: SamePeerMode,
}

impl Default for PeerParameters {
    fn default() -> Self {
        Self {
            application_id: 0,
            port: 0,
            can_be_discovered: false,
            can_discover: false,
            discover_self: false,
            can_use_broadcast: true,
            can_use_multicast: false,
            multicast_group_address: Ipv4Addr::UNSPECIFIED,
            send_timeout: Duration::from_millis(5000),
            discovered_peer_ttl: Duration::from_millis(10000),
            min_supported_protocol_version: ProtocolVersion::CURRENT,
            max_supported_protocol_version: ProtocolVersion::CURRENT,
            same_peer_mode: SamePeerMode::IpAndPort,
        }
    }
}

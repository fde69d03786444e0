use std::io;
use thiserror::Error;

/// Errors related to the discovery protocol and peer runtime.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Neither broadcast nor multicast transport is allowed by the
    /// configuration.
    #[error("peer can't use broadcast and can't use multicast")]
    TransportDisabled,

    /// The configuration enables neither discovering nor being discovered.
    #[error("peer can't discover and can't be discovered")]
    RoleDisabled,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Packet carries a protocol version this build does not recognize.
    #[error("unknown protocol version")]
    UnknownVersion,

    /// Packet type byte outside the known set.
    #[error("unknown packet type: {0}")]
    UnknownPacketType(u8),

    /// User data does not fit the selected protocol version.
    #[error("user data too large: {0} bytes exceeds the version limit of {1}")]
    UserDataTooLarge(usize, usize),

    /// Structurally invalid packet bytes.
    #[error("malformed packet: {0}")]
    MalformedPacket(String),
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;

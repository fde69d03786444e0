//! Constants for the discovery protocol.

/// Maximum user data size accepted by the V0 layout.
pub const MAX_USER_DATA_SIZE_V0: usize = 32768;

/// Maximum padding size accepted by the V0 layout.
pub const MAX_PADDING_SIZE_V0: usize = 32768;

/// Maximum user data size accepted by the V1 layout.
pub const MAX_USER_DATA_SIZE_V1: usize = 4096;

/// Receive buffer size. Larger than any well-formed packet of either
/// version.
pub const MAX_PACKET_SIZE: usize = 65536;

//! Discovery packet and its serialization for each protocol version.

use std::io::Cursor;

use crate::error::{DiscoveryError, Result};
use crate::protocol::constants::{
    MAX_PADDING_SIZE_V0, MAX_USER_DATA_SIZE_V0, MAX_USER_DATA_SIZE_V1,
};
use crate::protocol::types::{read_bytes, read_u8, skip_bytes, write_u8, U16BE, U32BE, U64BE};
use crate::protocol::ProtocolVersion;

/// Kinds of discovery packets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketType {
    /// Periodic presence announcement.
    IAmHere = 0,
    /// Farewell emitted during graceful shutdown.
    IAmOutOfHere = 1,
    /// Any type byte this build does not understand.
    Unknown = 255,
}

impl PacketType {
    /// Maps a wire type byte to a known packet type.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => PacketType::IAmHere,
            1 => PacketType::IAmOutOfHere,
            _ => PacketType::Unknown,
        }
    }
}

/// A discovery packet, independent of the wire version used to carry it.
///
/// `peer_id` and `snapshot_index` identify and order the sender's
/// announcements; they are fixed once the packet is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub packet_type: PacketType,
    /// Scope id. Receivers drop packets carrying a foreign id.
    pub application_id: u32,
    /// Sender's random session id.
    pub peer_id: u32,
    /// Monotonically increasing per emitting peer.
    pub snapshot_index: u64,
    pub user_data: Vec<u8>,
}

/// Encodes a packet into the wire layout of the requested version.
///
/// Fails when the version or the packet type is [`Unknown`], or when the
/// user data exceeds the version-specific cap. On V0 the padding block is
/// emitted with zero length.
///
/// [`Unknown`]: ProtocolVersion::Unknown
pub fn serialize(packet: &Packet, version: ProtocolVersion) -> Result<Vec<u8>> {
    if packet.packet_type == PacketType::Unknown {
        return Err(DiscoveryError::UnknownPacketType(packet.packet_type as u8));
    }

    match version {
        ProtocolVersion::V0 => serialize_v0(packet),
        ProtocolVersion::V1 => serialize_v1(packet),
        ProtocolVersion::Unknown => Err(DiscoveryError::UnknownVersion),
    }
}

/// Decodes a packet, detecting the wire version from the first byte.
///
/// Any structural violation is an error: an unrecognized version or type
/// byte, truncation, a length field over the version cap or past the end of
/// the input, or trailing bytes after the layout is exhausted. Declared
/// sizes are validated before any allocation. Receivers treat every error
/// from this function as "not a discovery packet" and drop the datagram
/// silently.
pub fn parse(data: &[u8]) -> Result<(Packet, ProtocolVersion)> {
    let mut cursor = Cursor::new(data);

    let version = ProtocolVersion::from_byte(read_u8(&mut cursor)?);
    let packet = match version {
        ProtocolVersion::V0 => parse_v0(&mut cursor)?,
        ProtocolVersion::V1 => parse_v1(&mut cursor)?,
        ProtocolVersion::Unknown => return Err(DiscoveryError::UnknownVersion),
    };

    let consumed = cursor.position() as usize;
    if consumed < data.len() {
        return Err(DiscoveryError::MalformedPacket(format!(
            "{} trailing bytes after packet",
            data.len() - consumed
        )));
    }

    Ok((packet, version))
}

fn serialize_v0(packet: &Packet) -> Result<Vec<u8>> {
    if packet.user_data.len() > MAX_USER_DATA_SIZE_V0 {
        return Err(DiscoveryError::UserDataTooLarge(
            packet.user_data.len(),
            MAX_USER_DATA_SIZE_V0,
        ));
    }

    let mut out = Vec::with_capacity(26 + packet.user_data.len());
    write_u8(&mut out, ProtocolVersion::V0 as u8)?;
    write_u8(&mut out, packet.packet_type as u8)?;
    U32BE(packet.application_id).write(&mut out)?;
    U32BE(packet.peer_id).write(&mut out)?;
    U64BE(packet.snapshot_index).write(&mut out)?;
    U32BE(packet.user_data.len() as u32).write(&mut out)?;
    out.extend_from_slice(&packet.user_data);
    // Zero-length padding block.
    U32BE(0).write(&mut out)?;
    Ok(out)
}

fn serialize_v1(packet: &Packet) -> Result<Vec<u8>> {
    if packet.user_data.len() > MAX_USER_DATA_SIZE_V1 {
        return Err(DiscoveryError::UserDataTooLarge(
            packet.user_data.len(),
            MAX_USER_DATA_SIZE_V1,
        ));
    }

    let mut out = Vec::with_capacity(20 + packet.user_data.len());
    write_u8(&mut out, ProtocolVersion::V1 as u8)?;
    write_u8(&mut out, packet.packet_type as u8)?;
    U32BE(packet.application_id).write(&mut out)?;
    U32BE(packet.peer_id).write(&mut out)?;
    U64BE(packet.snapshot_index).write(&mut out)?;
    U16BE(packet.user_data.len() as u16).write(&mut out)?;
    out.extend_from_slice(&packet.user_data);
    Ok(out)
}

fn parse_v0(cursor: &mut Cursor<&[u8]>) -> Result<Packet> {
    let packet_type = parse_packet_type(cursor)?;
    let application_id = U32BE::read(cursor)?.0;
    let peer_id = U32BE::read(cursor)?.0;
    let snapshot_index = U64BE::read(cursor)?.0;

    let user_data_size = U32BE::read(cursor)?.0 as usize;
    let user_data = read_bytes(cursor, user_data_size, MAX_USER_DATA_SIZE_V0)?;

    let padding_size = U32BE::read(cursor)?.0 as usize;
    skip_bytes(cursor, padding_size, MAX_PADDING_SIZE_V0)?;

    Ok(Packet {
        packet_type,
        application_id,
        peer_id,
        snapshot_index,
        user_data,
    })
}

fn parse_v1(cursor: &mut Cursor<&[u8]>) -> Result<Packet> {
    let packet_type = parse_packet_type(cursor)?;
    let application_id = U32BE::read(cursor)?.0;
    let peer_id = U32BE::read(cursor)?.0;
    let snapshot_index = U64BE::read(cursor)?.0;

    let user_data_size = U16BE::read(cursor)?.0 as usize;
    let user_data = read_bytes(cursor, user_data_size, MAX_USER_DATA_SIZE_V1)?;

    Ok(Packet {
        packet_type,
        application_id,
        peer_id,
        snapshot_index,
        user_data,
    })
}

fn parse_packet_type(cursor: &mut Cursor<&[u8]>) -> Result<PacketType> {
    let byte = read_u8(cursor)?;
    match PacketType::from_byte(byte) {
        PacketType::Unknown => Err(DiscoveryError::UnknownPacketType(byte)),
        packet_type => Ok(packet_type),
    }
}

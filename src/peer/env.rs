//! Shared runtime environment of a started peer and its two loops.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};
use std::sync::{Mutex, MutexGuard, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

use socket2::{Domain, Protocol, Socket, Type};

use crate::endpoint::Endpoint;
use crate::error::{DiscoveryError, Result};
use crate::peer::table::{DiscoveredPeer, PeerTable};
use crate::peer::PeerParameters;
use crate::protocol::constants::MAX_PACKET_SIZE;
use crate::protocol::{self, Packet, PacketType, ProtocolVersion};

/// How long a blocking `recv_from` may sit before the receiver rechecks the
/// exit flag.
const RECV_POLL_TIMEOUT: Duration = Duration::from_millis(1000);

/// Fields shared between the caller and both loops, all guarded by one
/// mutex.
struct SharedState {
    exit: bool,
    user_data: Vec<u8>,
    peers: PeerTable,
}

/// Everything a running peer owns: parameters, session id, sockets, and
/// the shared state. Threads hold it through an `Arc`; the sockets close
/// when the last reference drops.
pub(crate) struct PeerEnv {
    params: PeerParameters,
    peer_id: u32,
    send_socket: UdpSocket,
    binding_socket: Option<UdpSocket>,
    state: Mutex<SharedState>,
}

impl PeerEnv {
    /// Validates the configuration and allocates the sockets. On any
    /// failure the partially created sockets are dropped and the peer
    /// stays stopped.
    pub(crate) fn start(params: PeerParameters, user_data: Vec<u8>) -> Result<Self> {
        if !params.can_use_broadcast && !params.can_use_multicast {
            tracing::error!("discovery peer can't use broadcast and can't use multicast");
            return Err(DiscoveryError::TransportDisabled);
        }

        if !params.can_discover && !params.can_be_discovered {
            tracing::error!("discovery peer can't discover and can't be discovered");
            return Err(DiscoveryError::RoleDisabled);
        }

        let send_socket = match make_send_socket() {
            Ok(socket) => socket,
            Err(error) => {
                tracing::error!("discovery peer can't create socket: {error}");
                return Err(error.into());
            }
        };

        let binding_socket = if params.can_discover {
            match make_binding_socket(&params) {
                Ok(socket) => Some(socket),
                Err(error) => {
                    tracing::error!("discovery peer can't bind socket: {error}");
                    return Err(error.into());
                }
            }
        } else {
            None
        };

        Ok(Self {
            params,
            peer_id: rand::random(),
            send_socket,
            binding_socket,
            state: Mutex::new(SharedState {
                exit: false,
                user_data,
                peers: PeerTable::default(),
            }),
        })
    }

    pub(crate) fn set_user_data(&self, user_data: Vec<u8>) {
        self.lock_state().user_data = user_data;
    }

    pub(crate) fn list_discovered(&self) -> Vec<DiscoveredPeer> {
        self.lock_state().peers.snapshot()
    }

    pub(crate) fn request_exit(&self) {
        self.lock_state().exit = true;
    }

    /// Periodic announcement and eviction loop.
    ///
    /// On exit, one farewell packet per supported version is transmitted
    /// before the thread returns.
    pub(crate) fn sender_loop(&self) {
        let send_period_ms = duration_ms(self.params.send_timeout);
        let ttl_ms = duration_ms(self.params.discovered_peer_ttl);

        let mut packet_index: u64 = 0;
        let mut last_send_ms: i64 = 0;
        let mut last_evict_ms: i64 = 0;

        loop {
            if self.lock_state().exit {
                for version in self.supported_versions() {
                    self.emit(&mut packet_index, version, PacketType::IAmOutOfHere);
                }
                return;
            }

            let now_ms = now_millis();
            let mut sleep_ms = None;

            if self.params.can_be_discovered {
                let (fire, wait_ms) = is_right_time(last_send_ms, now_ms, send_period_ms);
                if fire {
                    for version in self.supported_versions() {
                        self.emit(&mut packet_index, version, PacketType::IAmHere);
                    }
                    last_send_ms = now_ms;
                }
                sleep_ms = Some(wait_ms);
            }

            if self.params.can_discover {
                let (fire, wait_ms) = is_right_time(last_evict_ms, now_ms, ttl_ms);
                if fire {
                    self.lock_state().peers.evict_idle(now_ms, ttl_ms);
                    last_evict_ms = now_ms;
                }
                sleep_ms = Some(match sleep_ms {
                    Some(current) => current.min(wait_ms),
                    None => wait_ms,
                });
            }

            let sleep_ms = sleep_ms.unwrap_or(send_period_ms).max(0);
            thread::sleep(Duration::from_millis(sleep_ms as u64));
        }
    }

    /// Blocking receive loop. Wakes at least once per
    /// [`RECV_POLL_TIMEOUT`] to observe the exit flag.
    pub(crate) fn receiver_loop(&self) {
        let Some(socket) = self.binding_socket.as_ref() else {
            return;
        };

        let mut buffer = vec![0u8; MAX_PACKET_SIZE];
        loop {
            let received = socket.recv_from(&mut buffer);

            if self.lock_state().exit {
                return;
            }

            // Timeouts and transient receive errors both fall through to
            // the next blocking read.
            let Ok((length, source)) = received else {
                continue;
            };
            if length == 0 {
                continue;
            }
            let SocketAddr::V4(from) = source else {
                continue;
            };

            self.process_datagram(now_millis(), Endpoint::from(from), &buffer[..length]);
        }
    }

    fn process_datagram(&self, now_ms: i64, from: Endpoint, data: &[u8]) {
        let Ok((packet, version)) = protocol::parse(data) else {
            return;
        };
        if !self.admits(&packet, version) {
            return;
        }

        let mut state = self.lock_state();
        match packet.packet_type {
            PacketType::IAmHere => {
                state
                    .peers
                    .upsert_iamhere(now_ms, from, &packet, self.params.same_peer_mode);
            }
            PacketType::IAmOutOfHere => {
                state
                    .peers
                    .remove_iamoutofhere(from, self.params.same_peer_mode);
            }
            PacketType::Unknown => {}
        }
    }

    fn admits(&self, packet: &Packet, version: ProtocolVersion) -> bool {
        if version < self.params.min_supported_protocol_version
            || version > self.params.max_supported_protocol_version
        {
            return false;
        }
        if packet.application_id != self.params.application_id {
            return false;
        }
        if !self.params.discover_self && packet.peer_id == self.peer_id {
            return false;
        }
        true
    }

    /// Builds and transmits one packet. The packet index is consumed even
    /// when serialization skips the version; the shared user data is
    /// snapshotted by value so the lock is not held across the send.
    fn emit(&self, packet_index: &mut u64, version: ProtocolVersion, packet_type: PacketType) {
        let user_data = self.lock_state().user_data.clone();

        let packet = Packet {
            packet_type,
            application_id: self.params.application_id,
            peer_id: self.peer_id,
            snapshot_index: *packet_index,
            user_data,
        };
        *packet_index += 1;

        let bytes = match protocol::serialize(&packet, version) {
            Ok(bytes) => bytes,
            Err(_) => return,
        };

        // Send errors are absorbed; the next tick retries.
        let _ = self.send_socket.send_to(&bytes, self.destination());
    }

    fn destination(&self) -> SocketAddrV4 {
        // Multicast wins when both transports are enabled.
        if self.params.can_use_multicast {
            SocketAddrV4::new(self.params.multicast_group_address, self.params.port)
        } else {
            SocketAddrV4::new(Ipv4Addr::BROADCAST, self.params.port)
        }
    }

    fn supported_versions(&self) -> impl Iterator<Item = ProtocolVersion> {
        let min = self.params.min_supported_protocol_version as u8;
        let max = self.params.max_supported_protocol_version as u8;
        (min..=max).map(ProtocolVersion::from_byte)
    }

    fn lock_state(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn make_send_socket() -> std::io::Result<UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_broadcast(true)?;
    socket.bind(&SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)).into())?;
    Ok(socket.into())
}

fn make_binding_socket(params: &PeerParameters) -> std::io::Result<UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;

    // Several peers on one host share the port; reuse failures are
    // tolerated like the group join below.
    let _ = socket.set_reuse_address(true);
    #[cfg(unix)]
    let _ = socket.set_reuse_port(true);

    if params.can_use_multicast {
        let _ = socket.join_multicast_v4(&params.multicast_group_address, &Ipv4Addr::UNSPECIFIED);
    }

    socket.bind(&SocketAddr::from((Ipv4Addr::UNSPECIFIED, params.port)).into())?;
    socket.set_read_timeout(Some(RECV_POLL_TIMEOUT))?;
    Ok(socket.into())
}

fn duration_ms(duration: Duration) -> i64 {
    duration.as_millis() as i64
}

/// Milliseconds on a process-local monotonic clock. Strictly positive: 0
/// is reserved as the "never fired" sentinel in the scheduling state.
fn now_millis() -> i64 {
    static CLOCK_START: OnceLock<Instant> = OnceLock::new();
    CLOCK_START.get_or_init(Instant::now).elapsed().as_millis() as i64 + 1
}

/// Self-correcting periodic schedule.
///
/// Fires on the first call (`last_ms == 0`), then whenever a full period
/// has passed. When firing late, the returned wait is shortened so the
/// schedule never falls more than one period behind. Returns whether to
/// fire now and how long to wait for the next slot.
fn is_right_time(last_ms: i64, now_ms: i64, period_ms: i64) -> (bool, i64) {
    if last_ms == 0 {
        return (true, period_ms);
    }

    let passed_ms = now_ms - last_ms;
    if passed_ms >= period_ms {
        return (true, period_ms - (passed_ms - period_ms));
    }

    (false, period_ms - passed_ms)
}

//! The discovery peer runtime.
//!
//! A started [`Peer`] owns up to two OS threads sharing one environment:
//! a sender that announces presence and sweeps idle entries, and a
//! receiver that decodes incoming datagrams and maintains the
//! discovered-peer table. Shutdown is cooperative through an exit flag;
//! the sender transmits farewell packets before its thread returns.

mod env;
mod params;
mod table;

pub use params::{PeerParameters, SamePeerMode};
pub use table::DiscoveredPeer;

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::error::Result;
use env::PeerEnv;

/// A LAN discovery peer.
///
/// Created stopped; [`start`] allocates sockets and spawns the loops,
/// [`stop`] and [`stop_and_wait`] shut them down. Dropping a running peer
/// behaves like [`stop`].
///
/// [`start`]: Peer::start
/// [`stop`]: Peer::stop
/// [`stop_and_wait`]: Peer::stop_and_wait
#[derive(Default)]
pub struct Peer {
    env: Option<Arc<PeerEnv>>,
    sender: Option<JoinHandle<()>>,
    receiver: Option<JoinHandle<()>>,
}

impl Peer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the peer with the given configuration and initial user data.
    ///
    /// A running peer is restarted: the previous instance is stopped
    /// first. On error the peer remains stopped and no sockets are
    /// retained.
    pub fn start(
        &mut self,
        parameters: PeerParameters,
        initial_user_data: impl Into<Vec<u8>>,
    ) -> Result<()> {
        self.stop();

        let can_discover = parameters.can_discover;
        let env = Arc::new(PeerEnv::start(parameters, initial_user_data.into())?);

        let sender_env = Arc::clone(&env);
        self.sender = Some(thread::spawn(move || sender_env.sender_loop()));

        if can_discover {
            let receiver_env = Arc::clone(&env);
            self.receiver = Some(thread::spawn(move || receiver_env.receiver_loop()));
        }

        self.env = Some(env);
        Ok(())
    }

    /// Replaces the user data carried by subsequent announcements. A no-op
    /// while the peer is stopped.
    pub fn set_user_data(&self, user_data: impl Into<Vec<u8>>) {
        if let Some(env) = &self.env {
            env.set_user_data(user_data.into());
        }
    }

    /// Snapshot of the discovered-peer table in insertion order. Empty
    /// while the peer is stopped.
    pub fn list_discovered(&self) -> Vec<DiscoveredPeer> {
        match &self.env {
            Some(env) => env.list_discovered(),
            None => Vec::new(),
        }
    }

    /// Stops the peer without blocking. The loops observe the exit flag on
    /// their own schedule and the detached threads finish in the
    /// background, farewell packets included.
    pub fn stop(&mut self) {
        if let Some(env) = self.env.take() {
            env.request_exit();
        }
        self.sender.take();
        self.receiver.take();
    }

    /// Stops the peer and joins both threads, so the farewell packets have
    /// been handed to the socket by the time this returns.
    pub fn stop_and_wait(&mut self) {
        if let Some(env) = self.env.take() {
            env.request_exit();
        }
        if let Some(handle) = self.sender.take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.receiver.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Peer {
    fn drop(&mut self) {
        self.stop();
    }
}

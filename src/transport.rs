//! A minimal byte-oriented channel standing in for the real L2CAP socket,
//! which is an external collaborator out of scope for this crate.

use bytes::Bytes;
use thiserror::Error;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Lower bound on the negotiated inbound MTU for an ACL-U channel.
pub const MIN_MTU: u16 = 48;
pub const DEFAULT_MTU: u16 = 672;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport is closed")]
    Closed,
}

/// A single AVCTP-level transport: one direction delivers whole inbound
/// PDUs, the other accepts whole outbound PDUs for the peer to receive.
pub struct Transport {
    receiver: UnboundedReceiver<Bytes>,
    sender: UnboundedSender<Bytes>,
    pub mtu: u16,
}

impl Transport {
    pub fn new(receiver: UnboundedReceiver<Bytes>, sender: UnboundedSender<Bytes>, mtu: u16) -> Self {
        Self { receiver, sender, mtu }
    }

    pub async fn read(&mut self) -> Option<Bytes> {
        self.receiver.recv().await
    }

    pub fn send(&self, data: Bytes) -> Result<(), TransportError> {
        self.sender.send(data).map_err(|_| TransportError::Closed)
    }

    pub fn close(&mut self) {
        self.receiver.close();
    }
}

/// Builds a connected pair of transports for tests: writes to one side's
/// `sender` arrive as reads on the other's `receiver`, identified by their
/// paired construction order (`(local, remote)`).
#[cfg(test)]
pub fn loopback_pair(mtu: u16) -> (Transport, UnboundedSender<Bytes>, UnboundedReceiver<Bytes>) {
    let (to_local_tx, to_local_rx) = tokio::sync::mpsc::unbounded_channel();
    let (from_local_tx, from_local_rx) = tokio::sync::mpsc::unbounded_channel();
    (Transport::new(to_local_rx, from_local_tx, mtu), to_local_tx, from_local_rx)
}

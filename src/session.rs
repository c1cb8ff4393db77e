//! The per-peer AVCTP connection: state machine, I/O pump, and outbound
//! passthrough.

use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

use crate::avc::{CommandCode, PassThroughOp, Subunit};
use crate::codec::{decode_frame, encode_frame, CommandResponse, Frame, PacketType, AV_REMOTE_SVCLASS_ID};
use crate::dispatcher::{dispatch, DispatchContext, Outcome};
use crate::keysink::{KeySink, KeySinkFactory, NullKeySink};
use crate::player::PlayerFacade;
use crate::quirks::Quirks;
use crate::transport::Transport;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session is not connected")]
    NotConnected,
    #[error("peer did not advertise the target role")]
    NotSupported,
    #[error("transport write failed")]
    TransportClosed,
}

/// A request to send an outbound passthrough command, issued by whatever
/// owns the IPC-facing `VolumeUp`/`VolumeDown` methods.
pub struct OutboundPassThrough {
    pub op: PassThroughOp,
    pub reply: oneshot::Sender<Result<(), SessionError>>,
}

pub struct Session {
    state: SessionState,
    transport: Option<Transport>,
    keysink: Option<Box<dyn KeySink>>,
    quirks: Quirks,
    is_target: bool,
    next_transaction: u8,
    player: Arc<PlayerFacade>,
}

impl Session {
    pub fn new(player: Arc<PlayerFacade>) -> Self {
        Self {
            state: SessionState::Disconnected,
            transport: None,
            keysink: None,
            quirks: Quirks::none(),
            is_target: false,
            next_transaction: 0,
            player,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Binds an accepted inbound transport. Refused if this session already
    /// owns one.
    pub fn accept_transport(&mut self, transport: Transport, device_name: &str, is_target: bool) -> Result<(), SessionError> {
        if self.transport.is_some() {
            warn!("refusing second inbound transport for an already-occupied session");
            return Err(SessionError::NotConnected);
        }
        self.transport = Some(transport);
        self.quirks = Quirks::for_device_name(device_name);
        self.is_target = is_target;
        self.state = SessionState::Connecting;
        Ok(())
    }

    /// Called once the authorization hook (owned by the Listener) has
    /// approved the connection.
    pub fn enter_connected(&mut self, keysink_factory: &dyn KeySinkFactory) {
        self.keysink = match keysink_factory.open() {
            Ok(sink) => Some(sink),
            Err(err) => {
                warn!("failed to open key sink, deliveries will be silently dropped: {}", err);
                Some(Box::new(NullKeySink))
            }
        };
        self.state = SessionState::Connected;
        self.player.set_connected(true);
        info!("session connected");
    }

    pub fn disconnect(&mut self) {
        if let Some(mut sink) = self.keysink.take() {
            sink.close();
        }
        if let Some(mut transport) = self.transport.take() {
            transport.close();
        }
        if self.state == SessionState::Connected {
            self.player.set_connected(false);
        }
        self.state = SessionState::Disconnected;
        info!("session disconnected");
    }

    /// Reads, dispatches and replies to frames until the transport closes.
    /// Runs on the single-threaded event loop; cancel-safe via the owning
    /// `select!` arm.
    pub async fn run(&mut self) {
        loop {
            let Some(transport) = self.transport.as_mut() else { break };
            match transport.read().await {
                Some(bytes) => self.handle_inbound(bytes),
                None => {
                    self.disconnect();
                    break;
                }
            }
        }
    }

    fn handle_inbound(&mut self, bytes: Bytes) {
        let frame = match decode_frame(bytes) {
            Ok(frame) => frame,
            Err(err) => {
                warn!("dropping malformed frame: {}", err);
                return;
            }
        };
        let keysink: &mut dyn KeySink = match self.keysink.as_deref_mut() {
            Some(sink) => sink,
            None => return,
        };
        let ctx = DispatchContext { player: &self.player, quirks: &self.quirks };
        match dispatch(&ctx, keysink, &frame) {
            Outcome::Response(response) => self.send_frame(&response),
            Outcome::Drop => {}
        }
    }

    fn send_frame(&self, frame: &Frame) {
        if let Some(transport) = self.transport.as_ref() {
            if let Err(err) = transport.send(encode_frame(frame)) {
                warn!("failed to send response: {:?}", err);
            }
        }
    }

    fn next_transaction(&mut self) -> u8 {
        let id = self.next_transaction;
        self.next_transaction = (self.next_transaction + 1) % 16;
        id
    }

    /// Sends a press followed by a release for `op`, as two Single AVCTP
    /// frames with consecutive (mod 16) transaction ids. Only valid for a
    /// Connected session whose peer advertised the Target role.
    pub fn send_passthrough(&mut self, op: PassThroughOp) -> Result<(), SessionError> {
        if self.state != SessionState::Connected {
            return Err(SessionError::NotConnected);
        }
        if !self.is_target {
            return Err(SessionError::NotSupported);
        }
        for pressed in [true, false] {
            let operand = if pressed { op.0 } else { op.0 | 0x80 };
            let frame = Frame {
                transaction: self.next_transaction(),
                packet_type: PacketType::Single,
                cr: CommandResponse::Command,
                ipid: false,
                pid: AV_REMOTE_SVCLASS_ID,
                code: CommandCode::Control,
                subunit: Subunit::PANEL,
                opcode: crate::avc::Opcode::PASS_THROUGH,
                operands: Bytes::copy_from_slice(&[operand, 0x00]),
            };
            let bytes = encode_frame(&frame);
            self.transport
                .as_ref()
                .ok_or(SessionError::NotConnected)?
                .send(bytes)
                .map_err(|_| SessionError::TransportClosed)?;
        }
        Ok(())
    }

    /// Thin wrapper over `send_passthrough` for the IPC-facing `VolumeUp`
    /// method.
    pub fn volume_up(&mut self) -> Result<(), SessionError> {
        self.send_passthrough(PassThroughOp::VOLUME_UP)
    }

    /// Thin wrapper over `send_passthrough` for the IPC-facing `VolumeDown`
    /// method.
    pub fn volume_down(&mut self) -> Result<(), SessionError> {
        self.send_passthrough(PassThroughOp::VOLUME_DOWN)
    }

    /// Serves outbound passthrough requests arriving from the IPC surface
    /// alongside the inbound read loop.
    pub async fn run_with_commands(&mut self, mut commands: mpsc::UnboundedReceiver<OutboundPassThrough>) {
        loop {
            let Some(transport) = self.transport.as_mut() else { break };
            tokio::select! {
                inbound = transport.read() => match inbound {
                    Some(bytes) => self.handle_inbound(bytes),
                    None => {
                        self.disconnect();
                        break;
                    }
                },
                cmd = commands.recv() => match cmd {
                    Some(OutboundPassThrough { op, reply }) => {
                        let _ = reply.send(self.send_passthrough(op));
                    }
                    None => {}
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;

    use super::*;
    use crate::transport::loopback_pair;

    struct AlwaysOpens;
    impl KeySinkFactory for AlwaysOpens {
        fn open(&self) -> Result<Box<dyn KeySink>, crate::keysink::KeySinkError> {
            Ok(Box::new(NullKeySink))
        }
    }

    #[tokio::test]
    async fn connect_dispatch_disconnect_lifecycle() {
        let player = Arc::new(PlayerFacade::new());
        let mut session = Session::new(player.clone());
        let (transport, to_session, mut from_session) = loopback_pair(672);
        session.accept_transport(transport, "Generic Headset", false).unwrap();
        assert_eq!(session.state(), SessionState::Connecting);
        session.enter_connected(&AlwaysOpens);
        assert_eq!(session.state(), SessionState::Connected);
        assert!(player.snapshot().capabilities.is_empty()); // sanity: facade reachable

        to_session.send(Bytes::from_static(&[0x00, 0x11, 0x0E, 0x00, 0x48, 0x7C, 0x44, 0x00])).unwrap();
        let inbound = session.transport.as_mut().unwrap().read().await.unwrap();
        session.handle_inbound(inbound);
        let response = from_session.recv().await.unwrap();
        assert_eq!(response[3] & 0x0F, CommandCode::Accepted as u8);

        drop(to_session);
        session.disconnect();
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[test]
    fn outbound_passthrough_requires_connected_target() {
        let player = Arc::new(PlayerFacade::new());
        let mut session = Session::new(player);
        assert!(matches!(session.send_passthrough(PassThroughOp::VOLUME_UP), Err(SessionError::NotConnected)));
    }

    #[test]
    fn volume_wrappers_delegate_to_send_passthrough() {
        let player = Arc::new(PlayerFacade::new());
        let mut session = Session::new(player);
        assert!(matches!(session.volume_up(), Err(SessionError::NotConnected)));
        assert!(matches!(session.volume_down(), Err(SessionError::NotConnected)));
    }

    #[test]
    fn second_inbound_transport_is_refused() {
        let player = Arc::new(PlayerFacade::new());
        let mut session = Session::new(player);
        let (t1, _tx1, _rx1) = loopback_pair(672);
        let (t2, _tx2, _rx2) = loopback_pair(672);
        session.accept_transport(t1, "A", false).unwrap();
        assert!(session.accept_transport(t2, "A", false).is_err());
    }
}

//! Accepts inbound connections on the well-known PSM, gates them via an
//! authorization hook, and hands approved ones to a `Session`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{info, warn};

use crate::keysink::KeySinkFactory;
use crate::player::PlayerFacade;
use crate::session::Session;
use crate::transport::Transport;

pub const AVCTP_PSM: u16 = 0x0017;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AuthorizationDenied;

/// Approves or denies an inbound connection from a given peer name. Boxed
/// future rather than `async fn` in a trait, so this has no dependency
/// beyond what is already in the stack.
pub trait Authorizer: Send + Sync {
    fn authorize<'a>(&'a self, peer_name: &'a str) -> Pin<Box<dyn Future<Output = Result<(), AuthorizationDenied>> + Send + 'a>>;
}

/// Accepts a fresh inbound transport for a peer that is not already bound to
/// an existing, occupied `Session`, authorizes it, and connects it.
pub async fn accept(
    session: &mut Session,
    transport: Transport,
    peer_name: &str,
    is_target: bool,
    authorizer: &dyn Authorizer,
    keysink_factory: &dyn KeySinkFactory,
) {
    if let Err(err) = session.accept_transport(transport, peer_name, is_target) {
        warn!("rejecting inbound connection from {}: {}", peer_name, err);
        return;
    }
    match authorizer.authorize(peer_name).await {
        Ok(()) => {
            session.enter_connected(keysink_factory);
            info!("accepted and authorized connection from {}", peer_name);
        }
        Err(AuthorizationDenied) => {
            warn!("authorization denied for {}", peer_name);
            session.disconnect();
        }
    }
}

/// Owns the set of active sessions and the shared player facade they all
/// read from and mutate.
pub struct Listener {
    pub player: Arc<PlayerFacade>,
    pub authorizer: Arc<dyn Authorizer>,
    pub keysink_factory: Arc<dyn KeySinkFactory>,
}

impl Listener {
    pub fn new(player: Arc<PlayerFacade>, authorizer: Arc<dyn Authorizer>, keysink_factory: Arc<dyn KeySinkFactory>) -> Self {
        Self { player, authorizer, keysink_factory }
    }

    pub fn new_session(&self) -> Session {
        Session::new(self.player.clone())
    }
}

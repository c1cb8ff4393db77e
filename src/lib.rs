//! AVRCP target/controller core: AVCTP framing, the AVRCP Metadata Transfer
//! PDU set, and the per-connection session state machine that arbitrates
//! them. L2CAP transport, SDP registration, peer authorization and the
//! virtual input device are external collaborators; this crate defines
//! their contracts (`transport`, `Authorizer`, `KeySinkFactory`) without
//! implementing them.

pub mod avc;
pub mod codec;
pub mod config;
pub mod dispatcher;
pub mod keysink;
pub mod listener;
pub mod player;
pub mod quirks;
pub mod sdp;
pub mod session;
pub mod transport;

pub use config::Config;
pub use dispatcher::{dispatch, DispatchContext, Outcome};
pub use keysink::{KeySink, KeySinkFactory, KeyCode};
pub use listener::{AuthorizationDenied, Authorizer, Listener};
pub use player::PlayerFacade;
pub use session::{Session, SessionError, SessionState};

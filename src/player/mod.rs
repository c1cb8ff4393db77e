//! The player facade: the single mutable record of what the local media
//! player is doing, shared between the dispatcher (which reads and mutates
//! it on behalf of the remote peer) and whatever owns the IPC-facing surface
//! (which reads it and mutates it on behalf of the local application).

use std::sync::{Arc, Weak};

use bitflags::bitflags;
use parking_lot::Mutex;

bitflags! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Capabilities: u8 {
        const CAN_REPEAT  = 1 << 0;
        const CAN_LOOP    = 1 << 1;
        const CAN_SHUFFLE = 1 << 2;
        const CAN_SCAN    = 1 << 3;
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayState {
    Stopped,
    Playing,
    Paused,
    FwdSeek,
    RevSeek,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    pub capabilities: Capabilities,
    pub play_state: PlayState,
    pub repeat: bool,
    pub shuffle: bool,
    pub endless: bool,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub number: Option<String>,
    pub genre: Option<String>,
    pub total_length_ms: u32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            capabilities: Capabilities::empty(),
            play_state: PlayState::Stopped,
            repeat: false,
            shuffle: false,
            endless: false,
            title: None,
            artist: None,
            album: None,
            number: None,
            genre: None,
            total_length_ms: 0,
        }
    }
}

/// One accepted mutation of the facade, delivered to every live subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyChanged {
    Connected(bool),
    Capabilities(Capabilities),
    PlayState(PlayState),
    Repeat(bool),
    Shuffle(bool),
    Endless(bool),
    Title(Option<String>),
    Artist(Option<String>),
    Album(Option<String>),
    Number(Option<String>),
    Genre(Option<String>),
    TotalLengthMs(u32),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RepeatValue {
    Off,
    Single,
    Group,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShuffleValue {
    Off,
    Group,
}

/// A settable player attribute, as requested by `SET_PLAYER_SETTING_VALUE`
/// or the IPC `SetProperty` method.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SettingField {
    Repeat(RepeatValue),
    Shuffle(ShuffleValue),
    Scan,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("capability not advertised by the current player")]
    CapabilityMissing,
    #[error("value outside the attribute's domain")]
    InvalidValue,
}

struct Observer {
    alive: Weak<()>,
    callback: Box<dyn Fn(&PropertyChanged) + Send>,
}

/// A handle returned by `subscribe`. Dropping it unsubscribes the observer;
/// cleanup happens lazily on the next mutation rather than through a
/// globally indexed id counter.
pub struct Subscription(#[allow(dead_code)] Arc<()>);

#[derive(Default)]
struct Inner {
    state: PlayerState,
    observers: Vec<Observer>,
}

#[derive(Default)]
pub struct PlayerFacade(Mutex<Inner>);

impl PlayerFacade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> PlayerState {
        self.0.lock().state.clone()
    }

    pub fn subscribe(&self, callback: impl Fn(&PropertyChanged) + Send + 'static) -> Subscription {
        let token = Arc::new(());
        self.0.lock().observers.push(Observer { alive: Arc::downgrade(&token), callback: Box::new(callback) });
        Subscription(token)
    }

    fn notify(inner: &mut Inner, change: PropertyChanged) {
        inner.observers.retain(|observer| {
            let alive = observer.alive.upgrade().is_some();
            if alive {
                (observer.callback)(&change);
            }
            alive
        });
    }

    pub fn set_capabilities(&self, capabilities: Capabilities) {
        let mut inner = self.0.lock();
        inner.state.capabilities = capabilities;
        Self::notify(&mut inner, PropertyChanged::Capabilities(capabilities));
    }

    pub fn set_play_state(&self, play_state: PlayState) {
        let mut inner = self.0.lock();
        inner.state.play_state = play_state;
        Self::notify(&mut inner, PropertyChanged::PlayState(play_state));
    }

    pub fn set_metadata(&self, title: Option<String>, artist: Option<String>, album: Option<String>, number: Option<String>, genre: Option<String>, total_length_ms: u32) {
        let mut inner = self.0.lock();
        inner.state.title = title.clone();
        inner.state.artist = artist.clone();
        inner.state.album = album.clone();
        inner.state.number = number.clone();
        inner.state.genre = genre.clone();
        inner.state.total_length_ms = total_length_ms;
        Self::notify(&mut inner, PropertyChanged::Title(title));
        Self::notify(&mut inner, PropertyChanged::Artist(artist));
        Self::notify(&mut inner, PropertyChanged::Album(album));
        Self::notify(&mut inner, PropertyChanged::Number(number));
        Self::notify(&mut inner, PropertyChanged::Genre(genre));
        Self::notify(&mut inner, PropertyChanged::TotalLengthMs(total_length_ms));
    }

    /// Applies a single setting requested by the remote peer or the local
    /// IPC surface, enforcing the capability gate and the repeat/endless
    /// mutual-exclusion invariant.
    pub fn set(&self, field: SettingField) -> Result<(), RejectReason> {
        let mut inner = self.0.lock();
        let caps = inner.state.capabilities;
        match field {
            SettingField::Repeat(value) => {
                if !(caps.contains(Capabilities::CAN_REPEAT) || caps.contains(Capabilities::CAN_LOOP)) {
                    return Err(RejectReason::CapabilityMissing);
                }
                let (repeat, endless) = match value {
                    RepeatValue::Off => (false, false),
                    RepeatValue::Single if caps.contains(Capabilities::CAN_REPEAT) => (true, false),
                    RepeatValue::Group if caps.contains(Capabilities::CAN_LOOP) => (false, true),
                    _ => return Err(RejectReason::CapabilityMissing),
                };
                inner.state.repeat = repeat;
                inner.state.endless = endless;
                Self::notify(&mut inner, PropertyChanged::Repeat(repeat));
                Self::notify(&mut inner, PropertyChanged::Endless(endless));
                Ok(())
            }
            SettingField::Shuffle(value) => {
                if !caps.contains(Capabilities::CAN_SHUFFLE) {
                    return Err(RejectReason::CapabilityMissing);
                }
                let shuffle = match value {
                    ShuffleValue::Off => false,
                    ShuffleValue::Group => true,
                };
                inner.state.shuffle = shuffle;
                Self::notify(&mut inner, PropertyChanged::Shuffle(shuffle));
                Ok(())
            }
            SettingField::Scan => {
                if !caps.contains(Capabilities::CAN_SCAN) {
                    return Err(RejectReason::CapabilityMissing);
                }
                // Accepted syntactically; there is no scan state to mutate.
                Ok(())
            }
        }
    }

    pub fn set_connected(&self, connected: bool) {
        let mut inner = self.0.lock();
        Self::notify(&mut inner, PropertyChanged::Connected(connected));
    }
}

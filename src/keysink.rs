//! The host-side input layer that panel passthrough commands are translated
//! into, and the static key mapping table used to do the translation.

use crate::avc::PassThroughOp;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum KeyCode {
    PlayCd,
    StopCd,
    PauseCd,
    NextSong,
    PreviousSong,
    Rewind,
    FastForward,
}

/// Static AVRCP opcode -> host key code table.
pub fn key_for_opcode(op: PassThroughOp) -> Option<KeyCode> {
    match op {
        PassThroughOp::PLAY => Some(KeyCode::PlayCd),
        PassThroughOp::STOP => Some(KeyCode::StopCd),
        PassThroughOp::PAUSE => Some(KeyCode::PauseCd),
        PassThroughOp::FORWARD => Some(KeyCode::NextSong),
        PassThroughOp::BACKWARD => Some(KeyCode::PreviousSong),
        PassThroughOp::REWIND => Some(KeyCode::Rewind),
        PassThroughOp::FAST_FORWARD => Some(KeyCode::FastForward),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error)]
#[error("failed to open key sink: {0}")]
pub struct KeySinkError(pub String);

/// An opaque host input sink. Implementations own the real device handle
/// (e.g. a uinput node); `deliver` must be safe to call from the session's
/// I/O task.
pub trait KeySink: Send {
    fn deliver(&mut self, key: KeyCode, pressed: bool);

    fn close(&mut self) {}
}

/// Used when a sink failed to open: swallows every event silently, per the
/// contract that a failed open degrades to a no-op rather than tearing the
/// session down.
pub struct NullKeySink;

impl KeySink for NullKeySink {
    fn deliver(&mut self, _key: KeyCode, _pressed: bool) {}
}

/// Supplied by the embedding application; opens a concrete `KeySink` for a
/// newly Connected session.
pub trait KeySinkFactory: Send + Sync {
    fn open(&self) -> Result<Box<dyn KeySink>, KeySinkError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_mapping_matches_known_table() {
        assert_eq!(key_for_opcode(PassThroughOp::PLAY), Some(KeyCode::PlayCd));
        assert_eq!(key_for_opcode(PassThroughOp::STOP), Some(KeyCode::StopCd));
        assert_eq!(key_for_opcode(PassThroughOp::PAUSE), Some(KeyCode::PauseCd));
        assert_eq!(key_for_opcode(PassThroughOp::FORWARD), Some(KeyCode::NextSong));
        assert_eq!(key_for_opcode(PassThroughOp::BACKWARD), Some(KeyCode::PreviousSong));
        assert_eq!(key_for_opcode(PassThroughOp::REWIND), Some(KeyCode::Rewind));
        assert_eq!(key_for_opcode(PassThroughOp::FAST_FORWARD), Some(KeyCode::FastForward));
        assert_eq!(key_for_opcode(PassThroughOp::VOLUME_UP), None);
    }
}

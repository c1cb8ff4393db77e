//! Per-device workarounds for AVRCP controllers that don't send a proper
//! press/release pair for panel passthrough.

use std::collections::HashMap;

use bitflags::bitflags;

use crate::avc::PassThroughOp;

bitflags! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct QuirkFlags: u8 {
        /// The peer never sends the release (state=1) follow-up for this
        /// opcode; synthesize press+release from a single press.
        const NO_RELEASE = 1 << 0;
    }
}

#[derive(Debug, Clone, Default)]
pub struct Quirks(HashMap<PassThroughOp, QuirkFlags>);

impl Quirks {
    pub fn none() -> Self {
        Self::default()
    }

    /// Seed table matched against the peer's reported device name.
    pub fn for_device_name(name: &str) -> Self {
        let mut quirks = HashMap::new();
        if name == "Nokia CK-20W" {
            for op in [PassThroughOp::FORWARD, PassThroughOp::BACKWARD, PassThroughOp::PLAY, PassThroughOp::PAUSE] {
                quirks.insert(op, QuirkFlags::NO_RELEASE);
            }
        }
        Self(quirks)
    }

    pub fn get(&self, op: PassThroughOp) -> QuirkFlags {
        self.0.get(&op).copied().unwrap_or(QuirkFlags::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nokia_ck_20w_quirk_set() {
        let quirks = Quirks::for_device_name("Nokia CK-20W");
        assert!(quirks.get(PassThroughOp::PLAY).contains(QuirkFlags::NO_RELEASE));
        assert!(quirks.get(PassThroughOp::PAUSE).contains(QuirkFlags::NO_RELEASE));
        assert!(quirks.get(PassThroughOp::FORWARD).contains(QuirkFlags::NO_RELEASE));
        assert!(quirks.get(PassThroughOp::BACKWARD).contains(QuirkFlags::NO_RELEASE));
        assert!(quirks.get(PassThroughOp::STOP).is_empty());
    }

    #[test]
    fn unknown_device_has_no_quirks() {
        let quirks = Quirks::for_device_name("Some Other Headset");
        assert!(quirks.get(PassThroughOp::PLAY).is_empty());
    }
}

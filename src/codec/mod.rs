//! AVCTP + AVRCP frame codec.
//!
//! Wire layouts are bit-exact and endian-sensitive; every field is read and
//! written with explicit shifts/masks via `instructor`'s bitfield support, not
//! host bit-field layout.

pub mod metadata;

use bytes::{Bytes, BytesMut};
use instructor::{Buffer, BufferMut, Exstruct, Instruct};
use thiserror::Error;

use crate::avc::{AvcHeader, CommandCode, Opcode, Subunit};

pub const AV_REMOTE_SVCLASS_ID: u16 = 0x110E;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Instruct, Exstruct)]
#[repr(u8)]
pub enum PacketType {
    Single = 0b00,
    Start = 0b01,
    Continue = 0b10,
    End = 0b11,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Instruct, Exstruct)]
#[repr(u8)]
pub enum CommandResponse {
    Command = 0,
    Response = 1,
}

// ([AVCTP] Section 6.1) transaction(4) | packet_type(2) | cr(1) | ipid(1), pid(16, BE)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Instruct, Exstruct)]
#[instructor(endian = "big")]
struct AvctpHeader {
    #[instructor(bitfield(u8))]
    #[instructor(bits(4..8))]
    transaction: u8,
    #[instructor(bits(2..4))]
    packet_type: PacketType,
    #[instructor(bits(1..2))]
    cr: CommandResponse,
    #[instructor(bits(0..1))]
    ipid: u8,
    pid: u16,
}

/// A fully parsed AVCTP+AVRCP frame, as seen by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub transaction: u8,
    pub packet_type: PacketType,
    pub cr: CommandResponse,
    pub ipid: bool,
    pub pid: u16,
    pub code: CommandCode,
    pub subunit: Subunit,
    pub opcode: Opcode,
    pub operands: Bytes,
}

impl Frame {
    pub fn is_response(&self) -> bool {
        matches!(self.cr, CommandResponse::Response)
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("frame shorter than the minimum 6-byte AVCTP+AVRCP header")]
    TooShort,
    #[error("unexpected profile id 0x{0:04X}")]
    BadPid(u16),
    #[error("malformed frame: {0:?}")]
    BadOpcode(instructor::Error),
}

impl From<instructor::Error> for DecodeError {
    fn from(err: instructor::Error) -> Self {
        DecodeError::BadOpcode(err)
    }
}

pub fn decode_frame(mut bytes: Bytes) -> Result<Frame, DecodeError> {
    if bytes.len() < 6 {
        return Err(DecodeError::TooShort);
    }
    let AvctpHeader { transaction, packet_type, cr, ipid, pid } = bytes.read()?;
    let AvcHeader { code, subunit, opcode } = bytes.read()?;
    Ok(Frame {
        transaction,
        packet_type,
        cr,
        ipid: ipid != 0,
        pid,
        code,
        subunit,
        opcode,
        operands: bytes,
    })
}

pub fn encode_frame(frame: &Frame) -> Bytes {
    let mut buffer = BytesMut::with_capacity(6 + frame.operands.len());
    buffer.write(AvctpHeader {
        transaction: frame.transaction,
        packet_type: frame.packet_type,
        cr: frame.cr,
        ipid: frame.ipid as u8,
        pid: frame.pid,
    });
    buffer.write(AvcHeader {
        code: frame.code,
        subunit: frame.subunit,
        opcode: frame.opcode,
    });
    buffer.extend_from_slice(&frame.operands);
    buffer.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avc::SubunitType;

    #[test]
    fn frame_roundtrip() {
        let bytes = Bytes::from_static(&[0x00, 0x11, 0x0E, 0x03, 0x48, 0x30, 0xAB, 0xCD]);
        let frame = decode_frame(bytes.clone()).unwrap();
        assert_eq!(frame.pid, AV_REMOTE_SVCLASS_ID);
        assert_eq!(frame.subunit, Subunit::PANEL);
        assert_eq!(&encode_frame(&frame)[..], &bytes[..]);
    }

    #[test]
    fn too_short_is_rejected() {
        let bytes = Bytes::from_static(&[0x02, 0x11, 0x0E]);
        assert!(matches!(decode_frame(bytes), Err(DecodeError::TooShort)));
    }

    #[test]
    fn unit_info_query_roundtrip() {
        // scenario (b): UNITINFO query
        let bytes = Bytes::from_static(&[0x00, 0x11, 0x0E, 0x01, 0x48, 0x30, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
        let frame = decode_frame(bytes).unwrap();
        assert_eq!(frame.code, CommandCode::Status);
        assert_eq!(frame.subunit.ty, SubunitType::PANEL);
        assert_eq!(frame.opcode, Opcode::UNIT_INFO);
    }
}

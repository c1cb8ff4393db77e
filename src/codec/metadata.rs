//! The AVRCP Metadata Transfer PDU layer nested inside a vendor-dependent
//! AV/C frame: a 3-byte BT-SIG company id, followed by a PDU header
//! (pdu_id, packet_type, reserved, parameter_length) and a pdu-specific body.

use bytes::{Bytes, BytesMut};
use instructor::{BigEndian, Buffer, BufferMut, Error, Exstruct, Instruct};

use crate::codec::{DecodeError, PacketType};

pub const BLUETOOTH_SIG_COMPANY_ID: u32 = 0x00_19_58;

/// 24-bit big-endian company id. Written out by hand: extracting the three
/// bytes with a mask but no shift is a classic bug in this corner of AVRCP
/// stacks (the value of the low two bytes is masked but the shift to bring
/// the high byte down is skipped), so this is deliberately explicit.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CompanyId(pub u32);

impl Exstruct<BigEndian> for CompanyId {
    fn read_from_buffer<B: Buffer>(buffer: &mut B) -> Result<Self, Error> {
        let mut bytes = [0u8; 3];
        buffer.try_copy_to_slice(&mut bytes)?;
        Ok(CompanyId(u32::from(bytes[0]) << 16 | u32::from(bytes[1]) << 8 | u32::from(bytes[2])))
    }
}

impl Instruct<BigEndian> for CompanyId {
    fn write_to_buffer<B: BufferMut>(&self, buffer: &mut B) {
        let id = self.0;
        buffer.write_be(((id >> 16) & 0xFF) as u8);
        buffer.write_be(((id >> 8) & 0xFF) as u8);
        buffer.write_be((id & 0xFF) as u8);
    }
}

/// A wire-level PDU id byte. Open domain: an unrecognized pdu_id is not a
/// decode failure, it is a PDU the dispatcher rejects with `InvalidCommand`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Pdu(pub u8);

impl Pdu {
    pub const GET_CAPABILITIES: Pdu = Pdu(0x10);
    pub const LIST_PLAYER_SETTING_ATTRIBUTES: Pdu = Pdu(0x11);
    pub const LIST_PLAYER_SETTING_VALUES: Pdu = Pdu(0x12);
    pub const GET_CURRENT_PLAYER_SETTING_VALUE: Pdu = Pdu(0x13);
    pub const SET_PLAYER_SETTING_VALUE: Pdu = Pdu(0x14);
    pub const GET_PLAYER_SETTING_ATTRIBUTE_TEXT: Pdu = Pdu(0x15);
    pub const GET_PLAYER_SETTING_VALUE_TEXT: Pdu = Pdu(0x16);
    pub const INFORM_DISPLAYABLE_CHARSET: Pdu = Pdu(0x17);
    pub const INFORM_BATT_STATUS_OF_CT: Pdu = Pdu(0x18);
    pub const GET_ELEMENT_ATTRIBUTES: Pdu = Pdu(0x20);
    pub const GET_PLAY_STATUS: Pdu = Pdu(0x30);
}

impl Exstruct<BigEndian> for Pdu {
    fn read_from_buffer<B: Buffer>(buffer: &mut B) -> Result<Self, Error> {
        Ok(Pdu(buffer.read_be()?))
    }
}

impl Instruct<BigEndian> for Pdu {
    fn write_to_buffer<B: BufferMut>(&self, buffer: &mut B) {
        buffer.write_be(self.0);
    }
}

// ([AVRCP] Section 6.3) pdu(8) | packet_type(2) | reserved(6), parameter_length(16, BE)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Instruct, Exstruct)]
#[instructor(endian = "big")]
struct MetadataHeader {
    pdu: Pdu,
    #[instructor(bitfield(u8))]
    #[instructor(bits(0..2))]
    packet_type: PacketType,
    parameter_length: u16,
}

#[derive(Debug, Clone)]
pub struct MetadataPdu {
    pub pdu: Pdu,
    pub packet_type: PacketType,
    pub body: Bytes,
}

pub fn decode_metadata(mut operands: Bytes) -> Result<(CompanyId, MetadataPdu), DecodeError> {
    let company: CompanyId = operands.read_be()?;
    let MetadataHeader { pdu, packet_type, parameter_length } = operands.read()?;
    let parameter_length = parameter_length as usize;
    if operands.len() < parameter_length {
        return Err(DecodeError::TooShort);
    }
    let body = operands.split_to(parameter_length);
    Ok((company, MetadataPdu { pdu, packet_type, body }))
}

pub fn encode_metadata(pdu: Pdu, body: Bytes) -> Bytes {
    let mut buffer = BytesMut::with_capacity(7 + body.len());
    buffer.write_be(CompanyId(BLUETOOTH_SIG_COMPANY_ID));
    buffer.write(MetadataHeader {
        pdu,
        packet_type: PacketType::Single,
        parameter_length: body.len() as u16,
    });
    buffer.extend_from_slice(&body);
    buffer.freeze()
}

use instructor::{BigEndian, Buffer, BufferMut, Error, Exstruct, Instruct};

// ([AVC] Section 7.1)
#[derive(Debug, Copy, Clone, Eq, PartialEq, Instruct, Exstruct)]
#[instructor(endian = "big")]
pub struct AvcHeader {
    #[instructor(bitfield(u8))]
    #[instructor(bits(0..4))]
    pub code: CommandCode,
    pub subunit: Subunit,
    pub opcode: Opcode,
}

// ([AVC] Section 7.3.1 / 7.3.2)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Instruct, Exstruct)]
#[repr(u8)]
pub enum CommandCode {
    Control = 0x00,
    Status = 0x01,
    SpecificInquiry = 0x02,
    Notify = 0x03,
    GeneralInquiry = 0x04,

    NotImplemented = 0x08,
    Accepted = 0x09,
    Rejected = 0x0A,
    InTransition = 0x0B,
    Implemented = 0x0C,
    Changed = 0x0D,
    Interim = 0x0F,
}

// ([AVC] Table 7.4) - a wire-level 5-bit subunit_type field. Open domain like
// `Opcode`: the original stack never validates this byte at decode time, it
// only ever compares it for equality against `SUBUNIT_PANEL`, so an
// unrecognized value must still reach the dispatcher's classification ladder
// (e.g. UNITINFO/SUBUNITINFO answer the fixed Stable reply regardless of it)
// instead of failing to decode.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SubunitType(pub u8);

impl SubunitType {
    pub const MONITOR: SubunitType = SubunitType(0x00);
    pub const AUDIO: SubunitType = SubunitType(0x01);
    pub const TUNER: SubunitType = SubunitType(0x05);
    pub const PANEL: SubunitType = SubunitType(0x09);
    pub const VENDOR_UNIQUE: SubunitType = SubunitType(0x1C);
    pub const UNIT: SubunitType = SubunitType(0x1F);
}

/// A wire-level AV/C opcode byte. Unlike `CommandCode`, this is an open
/// domain: unrecognized opcodes are not malformed frames, they fall through
/// to the dispatcher's final "any other command" branch.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Opcode(pub u8);

impl Opcode {
    pub const VENDOR_DEPENDENT: Opcode = Opcode(0x00);
    pub const UNIT_INFO: Opcode = Opcode(0x30);
    pub const SUBUNIT_INFO: Opcode = Opcode(0x31);
    pub const PASS_THROUGH: Opcode = Opcode(0x7C);
}

impl Exstruct<BigEndian> for Opcode {
    fn read_from_buffer<B: Buffer>(buffer: &mut B) -> Result<Self, Error> {
        Ok(Opcode(buffer.read_be()?))
    }
}

impl Instruct<BigEndian> for Opcode {
    fn write_to_buffer<B: BufferMut>(&self, buffer: &mut B) {
        buffer.write_be(self.0);
    }
}

// ([AVC Panel] Table 9.21) - key codes relevant to panel passthrough.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PassThroughOp(pub u8);

impl PassThroughOp {
    pub const VOLUME_UP: PassThroughOp = PassThroughOp(0x41);
    pub const VOLUME_DOWN: PassThroughOp = PassThroughOp(0x42);
    pub const PLAY: PassThroughOp = PassThroughOp(0x44);
    pub const STOP: PassThroughOp = PassThroughOp(0x45);
    pub const PAUSE: PassThroughOp = PassThroughOp(0x46);
    pub const REWIND: PassThroughOp = PassThroughOp(0x48);
    pub const FAST_FORWARD: PassThroughOp = PassThroughOp(0x49);
    pub const FORWARD: PassThroughOp = PassThroughOp(0x4B);
    pub const BACKWARD: PassThroughOp = PassThroughOp(0x4C);
}

// ([AVC] Section 7.3.4) - id is just the 3-bit field, no extension bytes:
// this profile only ever addresses subunit id 0. Hand-written rather than
// a derived bitfield struct, since `SubunitType` is an open byte newtype
// and not an enum the bitfield derive can validate.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Subunit {
    pub ty: SubunitType,
    pub id: u8,
}

impl Subunit {
    pub const PANEL: Subunit = Subunit { ty: SubunitType::PANEL, id: 0 };
    pub const UNIT: Subunit = Subunit { ty: SubunitType::UNIT, id: 7 };
}

impl Exstruct<BigEndian> for Subunit {
    fn read_from_buffer<B: Buffer>(buffer: &mut B) -> Result<Self, Error> {
        let byte: u8 = buffer.read_be()?;
        Ok(Self { ty: SubunitType(byte >> 3), id: byte & 0x07 })
    }
}

impl Instruct<BigEndian> for Subunit {
    fn write_to_buffer<B: BufferMut>(&self, buffer: &mut B) {
        buffer.write_be((self.ty.0 << 3) | (self.id & 0x07));
    }
}

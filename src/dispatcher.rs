//! The classification ladder and PDU handlers: the part of the system that
//! decides, for every inbound AV/C frame, what (if anything) goes back on
//! the wire, and what side effects (key events, player mutations) it causes.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::{debug, trace, warn};

use crate::avc::{CommandCode, Opcode, PassThroughOp, SubunitType};
use crate::codec::metadata::{decode_metadata, encode_metadata, BLUETOOTH_SIG_COMPANY_ID, Pdu};
use crate::codec::{CommandResponse, Frame, PacketType, AV_REMOTE_SVCLASS_ID};
use crate::keysink::{key_for_opcode, KeySink};
use crate::player::{Capabilities, PlayState, PlayerFacade, RepeatValue, SettingField, ShuffleValue};
use crate::quirks::{QuirkFlags, Quirks};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorCode {
    InvalidCommand = 0x00,
    InvalidParameter = 0x01,
    ParameterNotFound = 0x02,
    InternalError = 0x03,
}

pub enum Outcome {
    Response(Frame),
    Drop,
}

/// Read-only context the dispatcher needs beyond the frame itself.
pub struct DispatchContext<'a> {
    pub player: &'a PlayerFacade,
    pub quirks: &'a Quirks,
}

pub fn dispatch(ctx: &DispatchContext, keysink: &mut dyn KeySink, frame: &Frame) -> Outcome {
    // 1. no fragmentation/reassembly support.
    if frame.packet_type != PacketType::Single {
        return Outcome::Response(not_implemented(frame));
    }
    // 2. wrong profile id.
    if frame.pid != AV_REMOTE_SVCLASS_ID {
        let mut response = reject(frame, None);
        response.ipid = true;
        return Outcome::Response(response);
    }
    // 3. this is a reply to something we sent; absorb it.
    if frame.is_response() {
        return Outcome::Drop;
    }
    // 4. panel passthrough.
    if frame.code == CommandCode::Control && frame.subunit.ty == SubunitType::PANEL && frame.opcode == Opcode::PASS_THROUGH {
        let operands = panel_passthrough(&frame.operands, ctx.quirks, keysink);
        return Outcome::Response(respond(frame, CommandCode::Accepted, operands));
    }
    // 5. UNITINFO / SUBUNITINFO.
    if frame.code == CommandCode::Status && frame.opcode == Opcode::UNIT_INFO {
        let operands = Bytes::from_static(&[0x07, SubunitType::PANEL.0 << 3, 0xFF, 0xFF, 0xFF, 0xFF]);
        return Outcome::Response(respond(frame, CommandCode::Implemented, operands));
    }
    if frame.code == CommandCode::Status && frame.opcode == Opcode::SUBUNIT_INFO {
        let operands = Bytes::from_static(&[0x00, SubunitType::PANEL.0 << 3, 0xFF, 0xFF, 0xFF]);
        return Outcome::Response(respond(frame, CommandCode::Implemented, operands));
    }
    // 6. vendor-dependent metadata transfer.
    if (frame.code == CommandCode::Status || frame.code == CommandCode::Control)
        && frame.subunit.ty == SubunitType::PANEL
        && frame.opcode == Opcode::VENDOR_DEPENDENT
        && frame.operands.len() >= 3
    {
        return Outcome::Response(metadata_dispatch(ctx, frame));
    }
    // 7. anything else.
    Outcome::Response(reject(frame, None))
}

fn respond(frame: &Frame, code: CommandCode, operands: Bytes) -> Frame {
    Frame {
        transaction: frame.transaction,
        packet_type: PacketType::Single,
        cr: CommandResponse::Response,
        ipid: false,
        pid: frame.pid,
        code,
        subunit: frame.subunit,
        opcode: frame.opcode,
        operands,
    }
}

fn reject(frame: &Frame, operands: Option<Bytes>) -> Frame {
    respond(frame, CommandCode::Rejected, operands.unwrap_or_default())
}

fn not_implemented(frame: &Frame) -> Frame {
    respond(frame, CommandCode::NotImplemented, Bytes::new())
}

/// operands[0] = state(1b) << 7 | opcode(7b). Unknown opcodes are logged and
/// ignored; the peer still sees Accepted, per AVRCP panel semantics.
fn panel_passthrough(operands: &[u8], quirks: &Quirks, keysink: &mut dyn KeySink) -> Bytes {
    let Some(&first) = operands.first() else {
        return Bytes::copy_from_slice(operands);
    };
    let pressed = (first & 0x80) == 0;
    let op = PassThroughOp(first & 0x7F);

    let Some(key) = key_for_opcode(op) else {
        debug!("unsupported passthrough opcode 0x{:02X}", op.0);
        return Bytes::copy_from_slice(operands);
    };

    if quirks.get(op).contains(QuirkFlags::NO_RELEASE) {
        if pressed {
            keysink.deliver(key, true);
            keysink.deliver(key, false);
        }
        // the quirked peer's own release message (if any) is ignored.
    } else {
        keysink.deliver(key, pressed);
    }
    Bytes::copy_from_slice(operands)
}

fn metadata_dispatch(ctx: &DispatchContext, frame: &Frame) -> Frame {
    let (company, pdu) = match decode_metadata(frame.operands.clone()) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!("malformed metadata pdu: {}", err);
            return reject(frame, None);
        }
    };
    if company.0 != BLUETOOTH_SIG_COMPANY_ID {
        return not_implemented(frame);
    }

    trace!(pdu = pdu.pdu.0, "dispatching metadata pdu");
    let (code, body) = match pdu.pdu {
        Pdu::GET_CAPABILITIES => get_capabilities(&pdu.body),
        Pdu::LIST_PLAYER_SETTING_ATTRIBUTES => list_player_setting_attributes(ctx),
        Pdu::LIST_PLAYER_SETTING_VALUES => list_player_setting_values(ctx, &pdu.body),
        Pdu::GET_CURRENT_PLAYER_SETTING_VALUE => get_current_player_setting_value(ctx, &pdu.body),
        Pdu::SET_PLAYER_SETTING_VALUE => set_player_setting_value(ctx, &pdu.body),
        Pdu::GET_ELEMENT_ATTRIBUTES => get_element_attributes(ctx, &pdu.body),
        Pdu::GET_PLAY_STATUS => get_play_status(ctx),
        Pdu::GET_PLAYER_SETTING_ATTRIBUTE_TEXT
        | Pdu::GET_PLAYER_SETTING_VALUE_TEXT
        | Pdu::INFORM_DISPLAYABLE_CHARSET
        | Pdu::INFORM_BATT_STATUS_OF_CT => (CommandCode::NotImplemented, Bytes::new()),
        other => {
            debug!("unknown metadata pdu 0x{:02X}", other.0);
            (CommandCode::Rejected, error_body(ErrorCode::InvalidCommand))
        }
    };
    respond(frame, code, encode_metadata(pdu.pdu, body))
}

fn error_body(code: ErrorCode) -> Bytes {
    Bytes::copy_from_slice(&[code as u8])
}

const CAP_COMPANY_ID: u8 = 0x02;
const CAP_EVENTS_SUPPORTED: u8 = 0x03;
const EVENT_PLAYBACK_STATUS_CHANGED: u8 = 0x01;
const EVENT_TRACK_CHANGED: u8 = 0x02;
const EVENT_TRACK_REACHED_END: u8 = 0x03;

fn get_capabilities(body: &[u8]) -> (CommandCode, Bytes) {
    let Some(&cap_id) = body.first() else {
        return (CommandCode::Rejected, error_body(ErrorCode::InvalidParameter));
    };
    let mut out = BytesMut::new();
    match cap_id {
        CAP_COMPANY_ID => {
            out.put_u8(cap_id);
            out.put_u8(1);
            out.put_u8(0x00);
            out.put_u8(0x19);
            out.put_u8(0x58);
            (CommandCode::Implemented, out.freeze())
        }
        CAP_EVENTS_SUPPORTED => {
            out.put_u8(cap_id);
            out.put_u8(3);
            out.put_u8(EVENT_PLAYBACK_STATUS_CHANGED);
            out.put_u8(EVENT_TRACK_CHANGED);
            out.put_u8(EVENT_TRACK_REACHED_END);
            (CommandCode::Implemented, out.freeze())
        }
        _ => (CommandCode::Rejected, error_body(ErrorCode::InvalidParameter)),
    }
}

const ATTR_REPEAT: u8 = 0x02;
const ATTR_SHUFFLE: u8 = 0x03;
const ATTR_SCAN: u8 = 0x04;

fn list_player_setting_attributes(ctx: &DispatchContext) -> (CommandCode, Bytes) {
    let caps = ctx.player.snapshot().capabilities;
    let mut attrs = Vec::new();
    if caps.intersects(Capabilities::CAN_REPEAT | Capabilities::CAN_LOOP) {
        attrs.push(ATTR_REPEAT);
    }
    if caps.contains(Capabilities::CAN_SHUFFLE) {
        attrs.push(ATTR_SHUFFLE);
    }
    if caps.contains(Capabilities::CAN_SCAN) {
        attrs.push(ATTR_SCAN);
    }
    let mut out = BytesMut::with_capacity(1 + attrs.len());
    out.put_u8(attrs.len() as u8);
    out.extend_from_slice(&attrs);
    (CommandCode::Implemented, out.freeze())
}

fn list_player_setting_values(ctx: &DispatchContext, body: &[u8]) -> (CommandCode, Bytes) {
    let Some(&attr) = body.first() else {
        return (CommandCode::Rejected, error_body(ErrorCode::InvalidParameter));
    };
    let caps = ctx.player.snapshot().capabilities;
    let values: Vec<u8> = match attr {
        ATTR_REPEAT if caps.intersects(Capabilities::CAN_REPEAT | Capabilities::CAN_LOOP) => {
            let mut v = vec![0x01]; // Off
            if caps.contains(Capabilities::CAN_REPEAT) {
                v.push(0x02); // Single
            }
            if caps.contains(Capabilities::CAN_LOOP) {
                v.push(0x03); // Group
            }
            v
        }
        ATTR_SHUFFLE if caps.contains(Capabilities::CAN_SHUFFLE) => vec![0x01, 0x03],
        ATTR_SCAN if caps.contains(Capabilities::CAN_SCAN) => vec![0x01, 0x03],
        _ => return (CommandCode::Rejected, error_body(ErrorCode::InvalidParameter)),
    };
    // Fixed: count is the number of following value bytes, not one less.
    let mut out = BytesMut::with_capacity(1 + values.len());
    out.put_u8(values.len() as u8);
    out.extend_from_slice(&values);
    (CommandCode::Implemented, out.freeze())
}

fn get_current_player_setting_value(ctx: &DispatchContext, body: &[u8]) -> (CommandCode, Bytes) {
    let mut body = Bytes::copy_from_slice(body);
    if body.is_empty() {
        return (CommandCode::Rejected, error_body(ErrorCode::InvalidParameter));
    }
    let count = body.get_u8();
    let state = ctx.player.snapshot();
    let mut pairs = Vec::new();
    for _ in 0..count {
        if body.is_empty() {
            return (CommandCode::Rejected, error_body(ErrorCode::InvalidParameter));
        }
        let attr = body.get_u8();
        let value = match attr {
            ATTR_REPEAT => {
                if state.repeat {
                    0x02
                } else if state.endless {
                    0x03
                } else {
                    0x01
                }
            }
            ATTR_SHUFFLE => if state.shuffle { 0x03 } else { 0x01 },
            ATTR_SCAN => 0x01,
            _ => return (CommandCode::Rejected, error_body(ErrorCode::InvalidParameter)),
        };
        pairs.push((attr, value));
    }
    let mut out = BytesMut::with_capacity(1 + pairs.len() * 2);
    out.put_u8(pairs.len() as u8);
    for (attr, value) in pairs {
        out.put_u8(attr);
        out.put_u8(value);
    }
    (CommandCode::Implemented, out.freeze())
}

fn set_player_setting_value(ctx: &DispatchContext, body: &[u8]) -> (CommandCode, Bytes) {
    let mut body = Bytes::copy_from_slice(body);
    if body.is_empty() {
        return (CommandCode::Rejected, error_body(ErrorCode::InvalidParameter));
    }
    let count = body.get_u8();
    // Fixed: exclusive range, the source's off-by-one reads one pair too many.
    for _ in 0..count {
        if body.remaining() < 2 {
            return (CommandCode::Rejected, error_body(ErrorCode::InvalidParameter));
        }
        let attr = body.get_u8();
        let value = body.get_u8();
        let field = match (attr, value) {
            (ATTR_REPEAT, 0x01) => SettingField::Repeat(RepeatValue::Off),
            (ATTR_REPEAT, 0x02) => SettingField::Repeat(RepeatValue::Single),
            (ATTR_REPEAT, 0x03) => SettingField::Repeat(RepeatValue::Group),
            (ATTR_SHUFFLE, 0x01) => SettingField::Shuffle(ShuffleValue::Off),
            (ATTR_SHUFFLE, 0x03) => SettingField::Shuffle(ShuffleValue::Group),
            (ATTR_SCAN, _) => SettingField::Scan,
            _ => return (CommandCode::Rejected, error_body(ErrorCode::InvalidParameter)),
        };
        if ctx.player.set(field).is_err() {
            return (CommandCode::Rejected, error_body(ErrorCode::InvalidParameter));
        }
    }
    (CommandCode::Accepted, Bytes::new())
}

const ATTR_TITLE: u32 = 0x01;
const ATTR_ARTIST: u32 = 0x02;
const ATTR_ALBUM: u32 = 0x03;
const ATTR_TRACK_NUMBER: u32 = 0x04;
const ATTR_TOTAL_TRACKS: u32 = 0x05;
const ATTR_GENRE: u32 = 0x06;
const ATTR_PLAYING_TIME: u32 = 0x07;
const CHARSET_UTF8: u16 = 0x6A;

fn get_element_attributes(ctx: &DispatchContext, body: &[u8]) -> (CommandCode, Bytes) {
    let mut body = Bytes::copy_from_slice(body);
    if body.remaining() < 9 {
        return (CommandCode::Rejected, error_body(ErrorCode::InvalidParameter));
    }
    let element = body.get_u64();
    if element != 0 {
        return (CommandCode::Rejected, error_body(ErrorCode::InvalidParameter));
    }
    let count = body.get_u8();
    let state = ctx.player.snapshot();
    let mut out = BytesMut::new();
    let mut emitted = 0u8;
    for _ in 0..count {
        if body.remaining() < 4 {
            return (CommandCode::Rejected, error_body(ErrorCode::InvalidParameter));
        }
        let attr = body.get_u32();
        let value: Option<String> = match attr {
            ATTR_TITLE => state.title.clone(),
            ATTR_ARTIST => state.artist.clone(),
            ATTR_ALBUM => state.album.clone(),
            ATTR_TRACK_NUMBER => state.number.clone(),
            ATTR_TOTAL_TRACKS => None,
            ATTR_GENRE => state.genre.clone(),
            ATTR_PLAYING_TIME => Some(state.total_length_ms.to_string()),
            _ => return (CommandCode::Rejected, error_body(ErrorCode::InvalidParameter)),
        };
        let value = value.unwrap_or_default();
        out.put_u32(attr);
        out.put_u16(CHARSET_UTF8);
        // Fixed: the real string length and bytes are appended, not a zero length.
        out.put_u16(value.len() as u16);
        out.extend_from_slice(value.as_bytes());
        emitted += 1;
    }
    let mut final_out = BytesMut::with_capacity(1 + out.len());
    final_out.put_u8(emitted);
    final_out.extend_from_slice(&out);
    (CommandCode::Implemented, final_out.freeze())
}

fn get_play_status(ctx: &DispatchContext) -> (CommandCode, Bytes) {
    // Fixed: this is an independent PDU, it must not fall through from
    // GET_ELEMENT_ATTRIBUTES.
    let state = ctx.player.snapshot();
    let status: u8 = match state.play_state {
        PlayState::Stopped => 0x00,
        PlayState::Playing => 0x01,
        PlayState::Paused => 0x02,
        PlayState::FwdSeek => 0x03,
        PlayState::RevSeek => 0x04,
        PlayState::Error => 0xFF,
    };
    let mut out = BytesMut::with_capacity(9);
    out.put_u32(state.total_length_ms);
    out.put_u32(0xFFFF_FFFF); // position unknown at this layer
    out.put_u8(status);
    (CommandCode::Implemented, out.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode_frame;
    use crate::keysink::{KeyCode, NullKeySink};
    use crate::player::PlayerFacade;

    struct RecordingSink(Vec<(KeyCode, bool)>);
    impl KeySink for RecordingSink {
        fn deliver(&mut self, key: KeyCode, pressed: bool) {
            self.0.push((key, pressed));
        }
    }

    fn ctx(player: &PlayerFacade, quirks: &Quirks) -> DispatchContext<'_> {
        DispatchContext { player, quirks }
    }

    #[test]
    fn short_frame_drop() {
        // scenario (a): handled at the codec layer, decode_frame fails.
        let bytes = Bytes::from_static(&[0x02, 0x11, 0x0E]);
        assert!(decode_frame(bytes).is_err());
    }

    #[test]
    fn unit_info_query() {
        // scenario (b)
        let bytes = Bytes::from_static(&[0x00, 0x11, 0x0E, 0x01, 0x48, 0x30, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
        let frame = decode_frame(bytes).unwrap();
        let player = PlayerFacade::new();
        let quirks = Quirks::none();
        let mut sink = NullKeySink;
        match dispatch(&ctx(&player, &quirks), &mut sink, &frame) {
            Outcome::Response(resp) => {
                assert_eq!(resp.code, CommandCode::Implemented);
                assert_eq!(&resp.operands[..2], &[0x07, 0x48]);
            }
            Outcome::Drop => panic!("expected a response"),
        }
    }

    #[test]
    fn unit_info_query_with_unrecognized_subunit_type_still_answers() {
        // a subunit_type byte outside this profile's own constant set (here
        // 0x03, "Disc" in the full AV/C table) must still decode and reach
        // the dispatcher rather than being dropped as malformed.
        let bytes = Bytes::from_static(&[0x00, 0x11, 0x0E, 0x01, 0x18, 0x30, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
        let frame = decode_frame(bytes).unwrap();
        assert_eq!(frame.subunit.ty, crate::avc::SubunitType(0x03));
        let player = PlayerFacade::new();
        let quirks = Quirks::none();
        let mut sink = NullKeySink;
        match dispatch(&ctx(&player, &quirks), &mut sink, &frame) {
            Outcome::Response(resp) => assert_eq!(resp.code, CommandCode::Implemented),
            Outcome::Drop => panic!("expected a response"),
        }
    }

    #[test]
    fn panel_play_press_delivers_key() {
        // scenario (c)
        let bytes = Bytes::from_static(&[0x00, 0x11, 0x0E, 0x00, 0x48, 0x7C, 0x44, 0x00]);
        let frame = decode_frame(bytes).unwrap();
        let player = PlayerFacade::new();
        let quirks = Quirks::none();
        let mut sink = RecordingSink(Vec::new());
        match dispatch(&ctx(&player, &quirks), &mut sink, &frame) {
            Outcome::Response(resp) => assert_eq!(resp.code, CommandCode::Accepted),
            Outcome::Drop => panic!("expected a response"),
        }
        assert_eq!(sink.0, vec![(KeyCode::PlayCd, true)]);
    }

    #[test]
    fn quirked_device_synthesizes_release() {
        // scenario (d)
        let bytes = Bytes::from_static(&[0x00, 0x11, 0x0E, 0x00, 0x48, 0x7C, 0x44, 0x00]);
        let frame = decode_frame(bytes).unwrap();
        let player = PlayerFacade::new();
        let quirks = Quirks::for_device_name("Nokia CK-20W");
        let mut sink = RecordingSink(Vec::new());
        dispatch(&ctx(&player, &quirks), &mut sink, &frame);
        assert_eq!(sink.0, vec![(KeyCode::PlayCd, true), (KeyCode::PlayCd, false)]);
    }

    #[test]
    fn get_capabilities_events_supported() {
        // scenario (e)
        let body = Bytes::from_static(&[0x00, 0x19, 0x58, 0x10, 0x00, 0x00, 0x01, 0x03]);
        let bytes = [&[0x00, 0x11, 0x0E, 0x01, 0x48, 0x00][..], &body[..]].concat();
        let frame = decode_frame(Bytes::from(bytes)).unwrap();
        let player = PlayerFacade::new();
        let quirks = Quirks::none();
        let mut sink = NullKeySink;
        match dispatch(&ctx(&player, &quirks), &mut sink, &frame) {
            Outcome::Response(resp) => {
                assert_eq!(resp.code, CommandCode::Implemented);
                assert_eq!(&resp.operands[7..], &[0x03, 0x03, 0x01, 0x02, 0x03]);
            }
            Outcome::Drop => panic!("expected a response"),
        }
    }

    #[test]
    fn set_repeat_all_rejected() {
        // scenario (f)
        let player = PlayerFacade::new();
        player.set_capabilities(Capabilities::CAN_REPEAT);
        let quirks = Quirks::none();
        let body = [0x01u8, ATTR_REPEAT, 0x04 /* All: unrepresentable */];
        let (code, resp_body) = set_player_setting_value(&ctx(&player, &quirks), &body);
        assert_eq!(code, CommandCode::Rejected);
        assert_eq!(&resp_body[..], &[ErrorCode::InvalidParameter as u8]);
        assert!(!player.snapshot().repeat);
        assert!(!player.snapshot().endless);
    }

    #[test]
    fn wrong_pid_is_rejected_with_ipid() {
        let bytes = Bytes::from_static(&[0x00, 0x11, 0x0F, 0x00, 0x48, 0x7C, 0x44, 0x00]);
        let frame = decode_frame(bytes).unwrap();
        let player = PlayerFacade::new();
        let quirks = Quirks::none();
        let mut sink = NullKeySink;
        match dispatch(&ctx(&player, &quirks), &mut sink, &frame) {
            Outcome::Response(resp) => {
                assert!(resp.ipid);
                assert_eq!(resp.code, CommandCode::Rejected);
            }
            Outcome::Drop => panic!("expected a response"),
        }
    }

    #[test]
    fn response_frames_are_dropped() {
        let bytes = Bytes::from_static(&[0x02, 0x11, 0x0E, 0x09, 0x48, 0x7C, 0x44, 0x00]);
        let frame = decode_frame(bytes).unwrap();
        let player = PlayerFacade::new();
        let quirks = Quirks::none();
        let mut sink = NullKeySink;
        assert!(matches!(dispatch(&ctx(&player, &quirks), &mut sink, &frame), Outcome::Drop));
    }

    #[test]
    fn non_single_packet_is_not_implemented() {
        let bytes = Bytes::from_static(&[0x04, 0x11, 0x0E, 0x00, 0x48, 0x7C, 0x44, 0x00]);
        let frame = decode_frame(bytes).unwrap();
        assert_eq!(frame.packet_type, PacketType::Start);
        let player = PlayerFacade::new();
        let quirks = Quirks::none();
        let mut sink = NullKeySink;
        match dispatch(&ctx(&player, &quirks), &mut sink, &frame) {
            Outcome::Response(resp) => assert_eq!(resp.code, CommandCode::NotImplemented),
            Outcome::Drop => panic!("expected a response"),
        }
    }

    #[test]
    fn set_repeat_single_then_get_current_reflects_it() {
        // invariant 4
        let player = PlayerFacade::new();
        player.set_capabilities(Capabilities::CAN_REPEAT);
        let quirks = Quirks::none();

        let (code, _) = set_player_setting_value(&ctx(&player, &quirks), &[0x01, ATTR_REPEAT, 0x02]);
        assert_eq!(code, CommandCode::Accepted);
        assert!(player.snapshot().repeat);
        assert!(!player.snapshot().endless);

        let (code, body) = get_current_player_setting_value(&ctx(&player, &quirks), &[0x01, ATTR_REPEAT]);
        assert_eq!(code, CommandCode::Implemented);
        assert_eq!(&body[..], &[0x01, ATTR_REPEAT, 0x02]);
    }

    #[test]
    fn capability_gates_listed_attributes() {
        // invariant 3
        let player = PlayerFacade::new();
        let quirks = Quirks::none();
        player.set_capabilities(Capabilities::CAN_SHUFFLE);
        let (_, body) = list_player_setting_attributes(&ctx(&player, &quirks));
        assert_eq!(&body[..], &[0x01, ATTR_SHUFFLE]);

        player.set_capabilities(Capabilities::CAN_REPEAT | Capabilities::CAN_SCAN);
        let (_, body) = list_player_setting_attributes(&ctx(&player, &quirks));
        assert_eq!(&body[..], &[0x02, ATTR_REPEAT, ATTR_SCAN]);
    }
}

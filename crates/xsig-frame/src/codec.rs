use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Malformed, Result};
use crate::token::{SignalValue, Token, TokenKind};

/// Wire size of a digital frame.
pub const DIGITAL_FRAME_SIZE: usize = 2;

/// Wire size of an analog frame.
pub const ANALOG_FRAME_SIZE: usize = 4;

/// Bytes a serial frame adds around its payload: header, index, terminator.
pub const SERIAL_FRAME_OVERHEAD: usize = 3;

/// Terminates every serial frame. Never valid inside a serial payload.
pub const SERIAL_TERMINATOR: u8 = 0xFF;

/// Highest digital join: 5 header bits + 7 index bits.
pub const MAX_DIGITAL_JOIN: u16 = 4096;

/// Highest analog join: 3 header bits + 7 index bits.
pub const MAX_ANALOG_JOIN: u16 = 1024;

/// Highest serial join: 3 header bits + 7 index bits.
pub const MAX_SERIAL_JOIN: u16 = 1024;

/// Default limit on a single serial payload: 64 KiB.
pub const DEFAULT_MAX_SERIAL_LEN: usize = 64 * 1024;

const DIGITAL_TAG: u8 = 0x80;
const DIGITAL_MASK: u8 = 0xC0;
const DIGITAL_LOW: u8 = 0x20;
const ANALOG_TAG: u8 = 0xC0;
const ANALOG_MASK: u8 = 0xC8;
const SERIAL_TAG: u8 = 0xC8;
const SERIAL_MASK: u8 = 0xF8;

/// Configuration for the token codec.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Maximum serial payload size in bytes. Default: 64 KiB.
    pub max_serial_len: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_serial_len: DEFAULT_MAX_SERIAL_LEN,
        }
    }
}

/// Highest join a frame of `kind` can address. Joins start at 1.
pub fn max_join(kind: TokenKind) -> u16 {
    match kind {
        TokenKind::Digital => MAX_DIGITAL_JOIN,
        TokenKind::Analog => MAX_ANALOG_JOIN,
        TokenKind::Serial => MAX_SERIAL_JOIN,
    }
}

/// The number of bytes `token` occupies on the wire.
pub fn encoded_len(token: &Token) -> usize {
    match token.value() {
        SignalValue::Digital(_) => DIGITAL_FRAME_SIZE,
        SignalValue::Analog(_) => ANALOG_FRAME_SIZE,
        SignalValue::Serial(text) => text.chars().count() + SERIAL_FRAME_OVERHEAD,
    }
}

/// Encode a token into a fresh buffer.
pub fn encode(token: &Token, offset: i32) -> Result<Bytes> {
    let mut dst = BytesMut::with_capacity(encoded_len(token));
    encode_token(token, offset, &mut dst)?;
    Ok(dst.freeze())
}

/// Encode a token, shifting its join by `offset`, and append it to `dst`.
///
/// Wire format (join bits `j` carry `join - 1`):
/// ```text
/// digital  10Vjjjjj 0jjjjjjj                       V = 0 when high
/// analog   11aa0jjj 0jjjjjjj 0aaaaaaa 0aaaaaaa
/// serial   11001jjj 0jjjjjjj <payload ...> 0xFF
/// ```
///
/// Nothing is appended when an error is returned.
pub fn encode_token(token: &Token, offset: i32, dst: &mut BytesMut) -> Result<()> {
    let join = wire_join(token, offset)?;
    let join_high = (join >> 7) as u8;
    let join_low = (join & 0x7F) as u8;

    match token.value() {
        SignalValue::Digital(value) => {
            let level = if *value { 0 } else { DIGITAL_LOW };
            dst.reserve(DIGITAL_FRAME_SIZE);
            dst.put_u8(DIGITAL_TAG | level | (join_high & 0x1F));
            dst.put_u8(join_low);
        }
        SignalValue::Analog(value) => {
            let value = *value;
            dst.reserve(ANALOG_FRAME_SIZE);
            dst.put_u8(ANALOG_TAG | ((value >> 10) as u8 & 0x30) | (join_high & 0x07));
            dst.put_u8(join_low);
            dst.put_u8((value >> 7) as u8 & 0x7F);
            dst.put_u8(value as u8 & 0x7F);
        }
        SignalValue::Serial(text) => {
            if let Some(ch) = text.chars().find(|ch| !is_serial_char(*ch)) {
                return Err(FrameError::InvalidSerialChar {
                    index: token.index(),
                    ch,
                });
            }
            dst.reserve(encoded_len(token));
            dst.put_u8(SERIAL_TAG | (join_high & 0x07));
            dst.put_u8(join_low);
            for ch in text.chars() {
                dst.put_u8(ch as u8);
            }
            dst.put_u8(SERIAL_TERMINATOR);
        }
    }
    Ok(())
}

/// Decode exactly one frame from the start of `src`.
///
/// Returns the token and the number of bytes it occupied. Input that ends
/// before the frame is complete is a `MalformedFrame` error.
pub fn decode(src: &[u8]) -> Result<(Token, usize)> {
    decode_with_config(src, &CodecConfig::default())
}

/// Like [`decode`], with an explicit serial payload limit.
pub fn decode_with_config(src: &[u8], config: &CodecConfig) -> Result<(Token, usize)> {
    match parse_frame(src, config)? {
        Some(decoded) => Ok(decoded),
        None => Err(incomplete(src).into()),
    }
}

/// Decode a token from a streaming buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer.
pub fn decode_token(src: &mut BytesMut, config: &CodecConfig) -> Result<Option<Token>> {
    match parse_frame(src, config)? {
        Some((token, consumed)) => {
            src.advance(consumed);
            Ok(Some(token))
        }
        None => Ok(None),
    }
}

/// Shift a decoded token's join back by `offset`, inverting an encode-time offset.
pub fn remove_offset(token: Token, offset: i32) -> Result<Token> {
    if offset == 0 {
        return Ok(token);
    }
    let shifted = i64::from(token.index()) - i64::from(offset);
    let index = u16::try_from(shifted).map_err(|_| FrameError::IndexOutOfRange {
        kind: token.kind(),
        index: token.index(),
        offset,
        max: u16::MAX,
    })?;
    Ok(Token::new(index, token.into_value()))
}

/// Whether `ch` can travel in a serial payload.
pub fn is_serial_char(ch: char) -> bool {
    (ch as u32) < u32::from(SERIAL_TERMINATOR)
}

/// Describe why `src` does not hold a complete frame.
pub(crate) fn incomplete(src: &[u8]) -> Malformed {
    let Some(&header) = src.first() else {
        return Malformed::Empty;
    };
    let available = src.len();
    match header_kind(header) {
        Some(TokenKind::Digital) => Malformed::Truncated {
            kind: TokenKind::Digital,
            needed: DIGITAL_FRAME_SIZE,
            available,
        },
        Some(TokenKind::Analog) => Malformed::Truncated {
            kind: TokenKind::Analog,
            needed: ANALOG_FRAME_SIZE,
            available,
        },
        Some(TokenKind::Serial) if available < 2 => Malformed::Truncated {
            kind: TokenKind::Serial,
            needed: SERIAL_FRAME_OVERHEAD,
            available,
        },
        Some(TokenKind::Serial) => Malformed::MissingTerminator { available },
        None => Malformed::UnknownHeader(header),
    }
}

/// Parse one frame without consuming it. `Ok(None)` means more bytes are needed.
pub(crate) fn parse_frame(src: &[u8], config: &CodecConfig) -> Result<Option<(Token, usize)>> {
    let Some(&header) = src.first() else {
        return Ok(None);
    };

    let kind = header_kind(header).ok_or(Malformed::UnknownHeader(header))?;
    match kind {
        TokenKind::Digital => {
            if src.len() < DIGITAL_FRAME_SIZE {
                return Ok(None);
            }
            check_seven_bit(&src[..DIGITAL_FRAME_SIZE])?;
            let join = (u16::from(header & 0x1F) << 7) | u16::from(src[1]);
            let value = header & DIGITAL_LOW == 0;
            Ok(Some((Token::digital(join + 1, value), DIGITAL_FRAME_SIZE)))
        }
        TokenKind::Analog => {
            if src.len() < ANALOG_FRAME_SIZE {
                return Ok(None);
            }
            check_seven_bit(&src[..ANALOG_FRAME_SIZE])?;
            let join = (u16::from(header & 0x07) << 7) | u16::from(src[1]);
            let value = (u16::from(header & 0x30) << 10)
                | (u16::from(src[2]) << 7)
                | u16::from(src[3]);
            Ok(Some((Token::analog(join + 1, value), ANALOG_FRAME_SIZE)))
        }
        TokenKind::Serial => {
            if src.len() < 2 {
                return Ok(None);
            }
            check_seven_bit(&src[..2])?;
            let join = (u16::from(header & 0x07) << 7) | u16::from(src[1]);
            let body = &src[2..];
            let Some(len) = body.iter().position(|&b| b == SERIAL_TERMINATOR) else {
                if body.len() > config.max_serial_len {
                    return Err(Malformed::SerialTooLong {
                        max: config.max_serial_len,
                    }
                    .into());
                }
                return Ok(None);
            };
            if len > config.max_serial_len {
                return Err(Malformed::SerialTooLong {
                    max: config.max_serial_len,
                }
                .into());
            }
            let text: String = body[..len].iter().map(|&b| char::from(b)).collect();
            Ok(Some((Token::serial(join + 1, text), len + SERIAL_FRAME_OVERHEAD)))
        }
    }
}

fn header_kind(header: u8) -> Option<TokenKind> {
    if header & DIGITAL_MASK == DIGITAL_TAG {
        Some(TokenKind::Digital)
    } else if header & ANALOG_MASK == ANALOG_TAG {
        Some(TokenKind::Analog)
    } else if header & SERIAL_MASK == SERIAL_TAG {
        Some(TokenKind::Serial)
    } else {
        None
    }
}

/// All bytes after the header must be 7-bit.
fn check_seven_bit(frame: &[u8]) -> Result<()> {
    match frame.iter().skip(1).position(|&b| b & 0x80 != 0) {
        Some(pos) => Err(Malformed::HighBitSet {
            byte: frame[pos + 1],
            position: pos + 1,
        }
        .into()),
        None => Ok(()),
    }
}

fn wire_join(token: &Token, offset: i32) -> Result<u16> {
    let kind = token.kind();
    let max = max_join(kind);
    let join = i64::from(token.index()) + i64::from(offset);
    if join < 1 || join > i64::from(max) {
        return Err(FrameError::IndexOutOfRange {
            kind,
            index: token.index(),
            offset,
            max,
        });
    }
    Ok((join - 1) as u16)
}

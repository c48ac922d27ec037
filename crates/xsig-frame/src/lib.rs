//! XSig signal tokens and their line framing.
//!
//! Every signal update is a [`Token`]: a join number plus a digital, analog
//! or serial value. On the wire each token is one self-delimiting frame:
//! - Digital: 2 bytes, level bit and 12-bit join
//! - Analog: 4 bytes, 10-bit join and 16-bit value
//! - Serial: 10-bit join, ISO-8859-1 payload, `0xFF` terminator
//!
//! The header byte always has its high bit set and every other fixed-frame
//! byte has it clear, so a reader can tell where frames start.

#[cfg(feature = "async")]
pub mod async_codec;
pub mod codec;
pub mod command;
pub mod error;
pub mod reader;
pub mod token;
pub mod writer;

#[cfg(feature = "async")]
pub use async_codec::XSigCodec;
pub use codec::{
    decode, decode_token, decode_with_config, encode, encode_token, encoded_len, max_join,
    remove_offset, CodecConfig, ANALOG_FRAME_SIZE, DEFAULT_MAX_SERIAL_LEN, DIGITAL_FRAME_SIZE,
    MAX_ANALOG_JOIN, MAX_DIGITAL_JOIN, MAX_SERIAL_JOIN, SERIAL_FRAME_OVERHEAD, SERIAL_TERMINATOR,
};
pub use command::{Command, CLEAR_OUTPUTS, SEND_STATUS};
pub use error::{FrameError, Malformed, Result};
pub use reader::{TokenReader, Tokens};
pub use token::{SignalValue, Token, TokenKind};
pub use writer::TokenWriter;

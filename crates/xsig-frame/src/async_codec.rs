use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{decode_token, encode_token, incomplete, remove_offset, CodecConfig};
use crate::command::Command;
use crate::error::{FrameError, Result};
use crate::token::Token;

/// `tokio_util` codec for XSig token streams.
///
/// The same offset is added when encoding and subtracted when decoding.
#[derive(Debug, Clone, Default)]
pub struct XSigCodec {
    config: CodecConfig,
    offset: i32,
}

impl XSigCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self { config, offset: 0 }
    }

    /// Set the join offset applied in both directions.
    pub fn with_offset(mut self, offset: i32) -> Self {
        self.offset = offset;
        self
    }
}

impl Decoder for XSigCodec {
    type Item = Token;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Token>> {
        match decode_token(src, &self.config)? {
            Some(token) => remove_offset(token, self.offset).map(Some),
            None => Ok(None),
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Token>> {
        if let Some(token) = self.decode(src)? {
            return Ok(Some(token));
        }
        if src.is_empty() {
            return Ok(None);
        }
        let reason = incomplete(src);
        src.clear();
        Err(FrameError::MalformedFrame(reason))
    }
}

impl Encoder<Token> for XSigCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Token, dst: &mut BytesMut) -> Result<()> {
        encode_token(&item, self.offset, dst)
    }
}

impl Encoder<Command> for XSigCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Command, dst: &mut BytesMut) -> Result<()> {
        dst.put_u8(item.byte());
        Ok(())
    }
}

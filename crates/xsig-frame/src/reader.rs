use std::io::{ErrorKind, Read};

use bytes::BytesMut;
use tracing::{debug, trace, warn};

use crate::codec::{decode_token, incomplete, remove_offset, CodecConfig};
use crate::error::{FrameError, Result};
use crate::token::Token;

const INITIAL_BUFFER_CAPACITY: usize = 1024;
const READ_CHUNK_SIZE: usize = 1024;

/// Reads tokens from any `Read` source.
///
/// Handles partial reads internally: callers always get complete tokens,
/// and a frame cut off by end-of-input is reported as `MalformedFrame`.
///
/// The source is read ahead in chunks, so its position (as seen through
/// [`get_mut`](Self::get_mut) or [`into_inner`](Self::into_inner)) is usually
/// past the last token returned rather than on a frame boundary.
pub struct TokenReader<T> {
    inner: T,
    buf: BytesMut,
    config: CodecConfig,
    offset: i32,
    eof: bool,
}

impl<T: Read> TokenReader<T> {
    /// Create a new token reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, CodecConfig::default())
    }

    /// Create a new token reader with explicit configuration.
    pub fn with_config(inner: T, config: CodecConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
            offset: 0,
            eof: false,
        }
    }

    /// Subtract `offset` from every decoded join.
    ///
    /// Use the offset the stream was written with to recover local joins.
    pub fn set_offset(&mut self, offset: i32) {
        self.offset = offset;
    }

    /// Read the next complete token (blocking).
    ///
    /// Returns `Ok(None)` at a clean end of input, and
    /// `Err(FrameError::MalformedFrame)` if input ends inside a frame.
    pub fn read_token(&mut self) -> Result<Option<Token>> {
        loop {
            match decode_token(&mut self.buf, &self.config) {
                Ok(Some(token)) => {
                    trace!(%token, "decoded token");
                    return remove_offset(token, self.offset).map(Some);
                }
                Ok(None) => {}
                Err(FrameError::MalformedFrame(reason)) => {
                    warn!(%reason, buffered = self.buf.len(), "malformed frame in input");
                    return Err(FrameError::MalformedFrame(reason));
                }
                Err(err) => return Err(err),
            }

            if self.eof {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                let reason = incomplete(&self.buf);
                warn!(%reason, remaining = self.buf.len(), "input ended mid-frame");
                // Leave nothing behind so a retry reports a clean end.
                self.buf.clear();
                return Err(FrameError::MalformedFrame(reason));
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                debug!(buffered = self.buf.len(), "end of input");
                self.eof = true;
                continue;
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// A lazy iterator over the remaining tokens.
    ///
    /// Yields `Err` at most once and then stops; tokens yielded before the
    /// error are complete and valid.
    pub fn tokens(&mut self) -> Tokens<'_, T> {
        Tokens {
            reader: self,
            done: false,
        }
    }

    /// Borrow the underlying source.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying source.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner source.
    ///
    /// Bytes already buffered but not yet decoded are dropped.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update the serial payload limit for subsequent decoding.
    pub fn set_max_serial_len(&mut self, max_serial_len: usize) {
        self.config.max_serial_len = max_serial_len;
    }

    /// Current token reader configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}

/// Iterator returned by [`TokenReader::tokens`].
pub struct Tokens<'a, T> {
    reader: &'a mut TokenReader<T>,
    done: bool,
}

impl<T: Read> Iterator for Tokens<'_, T> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<T: Read> std::iter::FusedIterator for Tokens<'_, T> {}

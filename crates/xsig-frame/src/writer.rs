use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use tracing::{debug, trace};

use crate::codec::encode_token;
use crate::command::Command;
use crate::error::{FrameError, Result};
use crate::token::Token;

const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// Writes encoded tokens to any `Write` sink.
///
/// The writer owns the sink for the length of a session and flushes after
/// every call, including calls that fail part way, so dropping it or taking
/// the sink back with [`TokenWriter::finish`] never strands buffered bytes.
pub struct TokenWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> TokenWriter<T> {
    /// Create a new token writer.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Encode and write one token, shifting its join by `offset`.
    ///
    /// An encode failure writes nothing.
    pub fn write_token(&mut self, token: &Token, offset: i32) -> Result<()> {
        let result = self.encode_and_write(token, offset);
        self.finish_call(result)
    }

    /// Encode and write tokens in order, all shifted by the same `offset`.
    ///
    /// Returns the number of tokens written. On failure, tokens before the
    /// failing one have been written and flushed; the failing token has not.
    pub fn write_tokens<'a, I>(&mut self, tokens: I, offset: i32) -> Result<usize>
    where
        I: IntoIterator<Item = &'a Token>,
    {
        let mut written = 0usize;
        let mut result = Ok(());
        for token in tokens {
            result = self.encode_and_write(token, offset);
            if result.is_err() {
                break;
            }
            written += 1;
        }
        debug!(count = written, offset, "wrote token batch");
        self.finish_call(result).map(|()| written)
    }

    /// Write a single-byte control command.
    pub fn write_command(&mut self, command: Command) -> Result<()> {
        debug!(command = command.name(), "writing control command");
        let result = self.write_all_retrying(&[command.byte()]);
        self.finish_call(result)
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Flush and hand back the sink, ending the session.
    pub fn finish(mut self) -> Result<T> {
        self.flush()?;
        Ok(self.inner)
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying sink.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner sink without flushing.
    pub fn into_inner(self) -> T {
        self.inner
    }

    fn encode_and_write(&mut self, token: &Token, offset: i32) -> Result<()> {
        self.buf.clear();
        encode_token(token, offset, &mut self.buf)?;
        trace!(%token, offset, size = self.buf.len(), "encoded token");

        let frame = std::mem::take(&mut self.buf);
        let result = self.write_all_retrying(&frame);
        self.buf = frame;
        result
    }

    fn write_all_retrying(&mut self, bytes: &[u8]) -> Result<()> {
        let mut written = 0usize;
        while written < bytes.len() {
            match self.inner.write(&bytes[written..]) {
                Ok(0) => return Err(FrameError::Io(std::io::Error::from(ErrorKind::WriteZero))),
                Ok(n) => written += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
        Ok(())
    }

    /// Flush regardless of outcome; the call's own error wins over a flush error.
    fn finish_call(&mut self, result: Result<()>) -> Result<()> {
        let flushed = self.flush();
        result.and(flushed)
    }
}

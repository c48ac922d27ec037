use crate::token::TokenKind;

/// Errors that can occur during token encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The join after applying the offset is outside the range the frame can carry.
    #[error("{kind} join {index} with offset {offset} is out of range (limit {max})")]
    IndexOutOfRange {
        kind: TokenKind,
        index: u16,
        offset: i32,
        max: u16,
    },

    /// A serial value contains a character with no single-byte representation
    /// that is distinct from the frame terminator.
    #[error("serial join {index} contains unencodable character {ch:?}")]
    InvalidSerialChar { index: u16, ch: char },

    /// The byte stream does not contain a valid frame at the current position.
    #[error("malformed frame: {0}")]
    MalformedFrame(Malformed),

    /// An I/O error occurred while reading or writing tokens.
    #[error("token I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a frame could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Malformed {
    /// The header byte does not carry a known kind tag.
    #[error("unrecognized header byte 0x{0:02X}")]
    UnknownHeader(u8),

    /// Input ended before a fixed-size frame was complete.
    #[error("truncated {kind} frame ({available} of {needed} bytes)")]
    Truncated {
        kind: TokenKind,
        needed: usize,
        available: usize,
    },

    /// Input ended before a serial frame's terminator.
    #[error("serial frame missing terminator after {available} bytes")]
    MissingTerminator { available: usize },

    /// A byte that must be 7-bit has its high bit set.
    #[error("byte 0x{byte:02X} at frame offset {position} has its high bit set")]
    HighBitSet { byte: u8, position: usize },

    /// There were no bytes to decode.
    #[error("no bytes to decode")]
    Empty,

    /// A serial payload grew past the configured limit without a terminator.
    #[error("serial payload exceeds {max} bytes")]
    SerialTooLong { max: usize },
}

impl From<Malformed> for FrameError {
    fn from(reason: Malformed) -> Self {
        FrameError::MalformedFrame(reason)
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;

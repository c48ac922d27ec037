use xsig_frame::FrameError;

/// Errors that can occur while mapping objects to and from tokens.
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    /// Token-level encode/decode error.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// A required argument was not supplied.
    #[error("missing required argument: {0}")]
    InvalidArgument(&'static str),

    /// The target type rejected the token sequence.
    #[error("deserialize failed: {0}")]
    Deserialize(String),

    /// Text holds a character the selected encoding cannot represent.
    #[error("character {ch:?} is not representable in {encoding}")]
    Unencodable { ch: char, encoding: &'static str },
}

pub type Result<T> = std::result::Result<T, SerializeError>;

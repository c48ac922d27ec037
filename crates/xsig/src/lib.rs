//! XSig signal token encoding, decoding, and object mapping.
//!
//! XSig packs digital, analog and serial join updates into a compact byte
//! stream so a whole set of signals can travel over one serial line.
//!
//! # Crate Structure
//!
//! - [`frame`]: Tokens, the frame codec, and streaming reader/writer
//! - [`serialize`]: Mapping application types to token sequences, text rendering

/// Re-export frame types.
pub mod frame {
    pub use xsig_frame::*;
}

/// Re-export serializer types.
pub mod serialize {
    pub use xsig_serialize::*;
}

pub use xsig_frame::{Token, TokenKind, TokenReader, TokenWriter};
pub use xsig_serialize::{TextEncoding, XSigSerializer};

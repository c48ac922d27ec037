//! Object mapping for XSig token streams.
//!
//! An [`XSigSerializer`] turns an application type into a flat token list and
//! back. The stream helpers layer that mapping over the frame codec so an
//! object can go straight to bytes, a `Write` sink, or text.

pub mod error;
pub mod serializer;
pub mod stream;
pub mod text;

pub use error::{Result, SerializeError};
pub use serializer::{SelfDeserialize, SelfSerialize, SelfSerializer, XSigSerializer};
pub use stream::{from_stream, to_bytes, tokens_to_bytes, write_to_stream};
pub use text::{
    parse_text, render_analog, render_bytes, render_digital, render_object, render_serial,
    render_token, render_tokens, TextEncoding, LATIN1_CODEPAGE,
};

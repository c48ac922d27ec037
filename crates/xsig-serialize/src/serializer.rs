use bytes::Bytes;
use xsig_frame::Token;

use crate::error::Result;
use crate::stream::tokens_to_bytes;

/// Maps values of `T` to and from a flat token sequence.
///
/// Implementations hold no per-object state: the output of `serialize`
/// depends only on the object passed in.
pub trait XSigSerializer<T> {
    /// Describe `obj` as tokens. An object with nothing to report returns an
    /// empty vector.
    fn serialize(&self, obj: &T) -> Vec<Token>;

    /// Rebuild an object from tokens.
    ///
    /// Tokens at joins the type does not know may be ignored, but known
    /// tokens must be applied in the order given.
    fn deserialize(&self, tokens: Vec<Token>) -> Result<T>;

    /// Encode `obj` with every join shifted by `offset`.
    ///
    /// Returns an empty buffer when `serialize` yields no tokens.
    fn to_bytes(&self, obj: &T, offset: i32) -> Result<Bytes> {
        tokens_to_bytes(&self.serialize(obj), offset)
    }
}

/// A type that can describe itself as tokens.
pub trait SelfSerialize {
    fn to_tokens(&self) -> Vec<Token>;

    /// Encode `self` with every join shifted by `offset`.
    fn to_xsig_bytes(&self, offset: i32) -> Result<Bytes> {
        tokens_to_bytes(&self.to_tokens(), offset)
    }
}

/// A type that can be built from tokens.
///
/// This is a constructor: it never reads from an existing instance.
pub trait SelfDeserialize: Sized {
    fn from_tokens(tokens: Vec<Token>) -> Result<Self>;
}

/// Serializer for types that implement [`SelfSerialize`] and [`SelfDeserialize`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfSerializer;

impl<T> XSigSerializer<T> for SelfSerializer
where
    T: SelfSerialize + SelfDeserialize,
{
    fn serialize(&self, obj: &T) -> Vec<Token> {
        obj.to_tokens()
    }

    fn deserialize(&self, tokens: Vec<Token>) -> Result<T> {
        T::from_tokens(tokens)
    }
}

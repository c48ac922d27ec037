use std::io::{Read, Write};

use bytes::{Bytes, BytesMut};
use tracing::debug;
use xsig_frame::{encode_token, encoded_len, Token, TokenReader, TokenWriter};

use crate::error::{Result, SerializeError};
use crate::serializer::XSigSerializer;

/// Encode tokens in order into one buffer, all shifted by `offset`.
pub fn tokens_to_bytes<'a, I>(tokens: I, offset: i32) -> Result<Bytes>
where
    I: IntoIterator<Item = &'a Token>,
{
    let tokens = tokens.into_iter();
    let mut dst = BytesMut::with_capacity(tokens.size_hint().0 * 4);
    for token in tokens {
        dst.reserve(encoded_len(token));
        encode_token(token, offset, &mut dst)?;
    }
    Ok(dst.freeze())
}

/// Encode an object through `serializer`.
///
/// `serializer` is optional so callers that look serializers up at runtime
/// can pass the lookup result straight through; `None` is `InvalidArgument`.
pub fn to_bytes<T, S>(serializer: Option<&S>, obj: &T, offset: i32) -> Result<Bytes>
where
    S: XSigSerializer<T> + ?Sized,
{
    let serializer = serializer.ok_or(SerializeError::InvalidArgument("serializer"))?;
    serializer.to_bytes(obj, offset)
}

/// Decode every remaining token from `reader` and hand them to `serializer`.
pub fn from_stream<T, S, R>(reader: &mut TokenReader<R>, serializer: &S) -> Result<T>
where
    S: XSigSerializer<T> + ?Sized,
    R: Read,
{
    let tokens = reader
        .tokens()
        .collect::<xsig_frame::Result<Vec<Token>>>()?;
    debug!(count = tokens.len(), "deserializing token stream");
    serializer.deserialize(tokens)
}

/// Serialize `obj` and write its tokens to `writer`.
///
/// Returns the number of tokens written.
pub fn write_to_stream<T, S, W>(
    writer: &mut TokenWriter<W>,
    obj: Option<&T>,
    serializer: Option<&S>,
    offset: i32,
) -> Result<usize>
where
    S: XSigSerializer<T> + ?Sized,
    W: Write,
{
    let obj = obj.ok_or(SerializeError::InvalidArgument("obj"))?;
    let serializer = serializer.ok_or(SerializeError::InvalidArgument("serializer"))?;
    let tokens = serializer.serialize(obj);
    Ok(writer.write_tokens(&tokens, offset)?)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use xsig_frame::{FrameError, Malformed};

    use super::*;
    use crate::serializer::tests::{Silent, Zone, ZoneSerializer};

    fn zone() -> Zone {
        Zone {
            power: true,
            level: 1000,
            scene: "OK".into(),
        }
    }

    #[test]
    fn to_bytes_requires_serializer() {
        let err = to_bytes::<Zone, ZoneSerializer>(None, &zone(), 0).unwrap_err();
        assert!(matches!(err, SerializeError::InvalidArgument("serializer")));
    }

    #[test]
    fn to_bytes_through_trait_object() {
        let serializer: Box<dyn XSigSerializer<Zone>> = Box::new(ZoneSerializer);
        let bytes = to_bytes(Some(serializer.as_ref()), &zone(), 0).unwrap();
        assert_eq!(bytes, ZoneSerializer.to_bytes(&zone(), 0).unwrap());
    }

    #[test]
    fn to_bytes_empty_object() {
        let bytes = to_bytes(Some(&Silent), &zone(), 0).unwrap();
        assert_eq!(bytes.len(), 0);
    }

    #[test]
    fn tokens_to_bytes_propagates_range_errors() {
        let err = tokens_to_bytes(&[Token::digital(1, true), Token::analog(1024, 0)], 1)
            .unwrap_err();
        assert!(matches!(
            err,
            SerializeError::Frame(FrameError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn write_then_read_object() {
        let mut writer = TokenWriter::new(Cursor::new(Vec::<u8>::new()));
        let count = write_to_stream(&mut writer, Some(&zone()), Some(&ZoneSerializer), 0).unwrap();
        assert_eq!(count, 3);

        let bytes = writer.finish().unwrap().into_inner();
        let mut reader = TokenReader::new(bytes.as_slice());
        let back = from_stream(&mut reader, &ZoneSerializer).unwrap();
        assert_eq!(back, zone());
    }

    #[test]
    fn write_then_read_with_offset() {
        let mut writer = TokenWriter::new(Cursor::new(Vec::<u8>::new()));
        write_to_stream(&mut writer, Some(&zone()), Some(&ZoneSerializer), 40).unwrap();

        let bytes = writer.finish().unwrap().into_inner();
        let mut reader = TokenReader::new(bytes.as_slice());
        reader.set_offset(40);
        assert_eq!(from_stream(&mut reader, &ZoneSerializer).unwrap(), zone());
    }

    #[test]
    fn write_to_stream_requires_arguments() {
        let mut writer = TokenWriter::new(Cursor::new(Vec::<u8>::new()));

        let err = write_to_stream::<Zone, ZoneSerializer, _>(&mut writer, None, Some(&ZoneSerializer), 0)
            .unwrap_err();
        assert!(matches!(err, SerializeError::InvalidArgument("obj")));

        let err = write_to_stream::<Zone, ZoneSerializer, _>(&mut writer, Some(&zone()), None, 0)
            .unwrap_err();
        assert!(matches!(err, SerializeError::InvalidArgument("serializer")));

        assert!(writer.finish().unwrap().into_inner().is_empty());
    }

    #[test]
    fn from_stream_reports_truncation() {
        let mut bytes = ZoneSerializer.to_bytes(&zone(), 0).unwrap().to_vec();
        bytes.pop();

        let mut reader = TokenReader::new(bytes.as_slice());
        let err = from_stream(&mut reader, &ZoneSerializer).unwrap_err();
        assert!(matches!(
            err,
            SerializeError::Frame(FrameError::MalformedFrame(Malformed::MissingTerminator { .. }))
        ));
    }
}

//! Render tokens and encoded streams as text.
//!
//! Some transports only carry strings. A single-byte encoding maps every
//! wire byte to exactly one character, so the text form round-trips back to
//! the same bytes.

use std::fmt;

use xsig_frame::{Token, TokenReader};

use crate::error::{Result, SerializeError};
use crate::serializer::XSigSerializer;
use crate::stream::tokens_to_bytes;

/// Codepage identifier for ISO-8859-1.
pub const LATIN1_CODEPAGE: u32 = 28591;

/// Single-byte text encoding used to carry frames as strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextEncoding {
    /// ISO-8859-1: byte `n` is `U+00nn`.
    #[default]
    Latin1,
}

impl TextEncoding {
    /// Numeric codepage identifier.
    pub fn codepage(self) -> u32 {
        match self {
            TextEncoding::Latin1 => LATIN1_CODEPAGE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Latin1 => "ISO-8859-1",
        }
    }

    /// Map bytes to text, one character per byte.
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
        }
    }

    /// Map text back to bytes, one byte per character.
    pub fn encode(self, text: &str) -> Result<Vec<u8>> {
        match self {
            TextEncoding::Latin1 => text
                .chars()
                .map(|ch| {
                    u8::try_from(ch).map_err(|_| SerializeError::Unencodable {
                        ch,
                        encoding: self.name(),
                    })
                })
                .collect(),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Render one token. `None` renders as the empty string.
pub fn render_token(token: Option<&Token>, encoding: TextEncoding) -> Result<String> {
    match token {
        Some(token) => render_tokens(std::iter::once(token), encoding),
        None => Ok(String::new()),
    }
}

/// Render tokens in order. An empty sequence renders as the empty string.
pub fn render_tokens<'a, I>(tokens: I, encoding: TextEncoding) -> Result<String>
where
    I: IntoIterator<Item = &'a Token>,
{
    let bytes = tokens_to_bytes(tokens, 0)?;
    Ok(encoding.decode(&bytes))
}

/// Render an already-encoded byte stream.
pub fn render_bytes(bytes: &[u8], encoding: TextEncoding) -> String {
    encoding.decode(bytes)
}

/// Render a serial value at `index`.
pub fn render_serial(value: &str, index: u16, encoding: TextEncoding) -> Result<String> {
    render_token(Some(&Token::serial(index, value)), encoding)
}

/// Render an analog value at `index`.
pub fn render_analog(value: u16, index: u16, encoding: TextEncoding) -> Result<String> {
    render_token(Some(&Token::analog(index, value)), encoding)
}

/// Render a digital value at `index`.
pub fn render_digital(value: bool, index: u16, encoding: TextEncoding) -> Result<String> {
    render_token(Some(&Token::digital(index, value)), encoding)
}

/// Render an object through `serializer`, shifting joins by `offset`.
///
/// An object that serializes to no tokens renders as the empty string.
pub fn render_object<T, S>(
    serializer: &S,
    obj: &T,
    offset: i32,
    encoding: TextEncoding,
) -> Result<String>
where
    S: XSigSerializer<T> + ?Sized,
{
    let bytes = serializer.to_bytes(obj, offset)?;
    Ok(encoding.decode(&bytes))
}

/// Parse rendered text back into tokens.
pub fn parse_text(text: &str, encoding: TextEncoding) -> Result<Vec<Token>> {
    let bytes = encoding.encode(text)?;
    let mut reader = TokenReader::new(bytes.as_slice());
    let tokens = reader
        .tokens()
        .collect::<xsig_frame::Result<Vec<Token>>>()?;
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::tests::{Silent, Zone, ZoneSerializer};

    #[test]
    fn codepage_is_latin1() {
        assert_eq!(TextEncoding::default().codepage(), 28591);
        assert_eq!(TextEncoding::Latin1.to_string(), "ISO-8859-1");
    }

    #[test]
    fn absent_or_empty_renders_empty() {
        let enc = TextEncoding::Latin1;
        assert_eq!(render_token(None, enc).unwrap(), "");
        assert_eq!(render_tokens(&[], enc).unwrap(), "");
        assert_eq!(render_tokens(Vec::<Token>::new().iter(), enc).unwrap(), "");
        assert_eq!(render_bytes(&[], enc), "");
        assert_eq!(
            render_object(&Silent, &Zone::default(), 0, enc).unwrap(),
            ""
        );
    }

    #[test]
    fn render_digital_matches_wire() {
        let text = render_digital(true, 1, TextEncoding::Latin1).unwrap();
        assert_eq!(text, "\u{80}\u{0}");
    }

    #[test]
    fn scalar_renderers_match_token_rendering() {
        let enc = TextEncoding::Latin1;
        assert_eq!(
            render_serial("OK", 2, enc).unwrap(),
            render_token(Some(&Token::serial(2, "OK")), enc).unwrap()
        );
        assert_eq!(
            render_analog(1000, 5, enc).unwrap(),
            render_token(Some(&Token::analog(5, 1000)), enc).unwrap()
        );
        assert_eq!(
            render_digital(false, 9, enc).unwrap(),
            render_token(Some(&Token::digital(9, false)), enc).unwrap()
        );
    }

    #[test]
    fn one_char_per_byte() {
        let text = render_serial("OK", 2, TextEncoding::Latin1).unwrap();
        assert_eq!(text.chars().count(), 5);
        assert_eq!(TextEncoding::Latin1.encode(&text).unwrap(), vec![0xC8, 0x01, b'O', b'K', 0xFF]);
    }

    #[test]
    fn rendered_object_parses_back() {
        let zone = Zone {
            power: false,
            level: 42,
            scene: "Caf\u{e9}".into(),
        };
        let text = render_object(&ZoneSerializer, &zone, 0, TextEncoding::Latin1).unwrap();
        let tokens = parse_text(&text, TextEncoding::Latin1).unwrap();
        assert_eq!(tokens, ZoneSerializer.serialize(&zone));
    }

    #[test]
    fn encode_rejects_wide_chars() {
        let err = TextEncoding::Latin1.encode("\u{20ac}").unwrap_err();
        assert!(matches!(err, SerializeError::Unencodable { ch: '\u{20ac}', .. }));
    }

    #[test]
    fn render_propagates_range_errors() {
        let err = render_analog(1, 2000, TextEncoding::Latin1).unwrap_err();
        assert!(matches!(err, SerializeError::Frame(_)));
    }
}

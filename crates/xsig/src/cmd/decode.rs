use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use tracing::{debug, info};
use xsig_frame::{CodecConfig, TokenReader};
use xsig_serialize::TextEncoding;

use crate::cmd::{DecodeArgs, InputFormat};
use crate::exit::{frame_error, io_error, serialize_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{OutputFormat, TokenPrinter};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let source = open_input(args.file.as_deref(), args.input)?;
    let config = CodecConfig {
        max_serial_len: args.max_serial_len,
    };
    let mut reader = TokenReader::with_config(source, config);
    reader.set_offset(args.offset);

    let mut printer = TokenPrinter::new(format);
    let mut count = 0usize;
    let mut failure = None;
    for result in reader.tokens() {
        match result {
            Ok(token) => {
                printer.push(&token);
                count += 1;
            }
            Err(err) => failure = Some(err),
        }
    }
    printer.finish();

    if let Some(err) = failure {
        return Err(frame_error(
            &format!("decode failed after {count} tokens"),
            err,
        ));
    }
    info!(tokens = count, "decoded stream");
    Ok(SUCCESS)
}

fn open_input(path: Option<&Path>, input: InputFormat) -> CliResult<Box<dyn Read>> {
    let raw: Box<dyn Read> = match path {
        Some(path) if path != Path::new("-") => {
            debug!(?path, "reading input file");
            let file = File::open(path)
                .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
            Box::new(file)
        }
        _ => Box::new(std::io::stdin().lock()),
    };

    match input {
        InputFormat::Raw => Ok(raw),
        InputFormat::Hex => {
            let text = read_text(raw)?;
            Ok(Box::new(Cursor::new(parse_hex(&text)?)))
        }
        InputFormat::Text => {
            let text = read_text(raw)?;
            let bytes = TextEncoding::Latin1
                .encode(&text)
                .map_err(|err| serialize_error("invalid text input", err))?;
            Ok(Box::new(Cursor::new(bytes)))
        }
    }
}

fn read_text(mut source: Box<dyn Read>) -> CliResult<String> {
    let mut text = String::new();
    source
        .read_to_string(&mut text)
        .map_err(|err| io_error("failed reading input", err))?;
    Ok(text)
}

/// Parse hex digit pairs, ignoring whitespace.
fn parse_hex(text: &str) -> CliResult<Vec<u8>> {
    let digits: Vec<u8> = text.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if digits.len() % 2 != 0 {
        return Err(CliError::new(
            DATA_INVALID,
            "hex input has an odd number of digits",
        ));
    }
    digits
        .chunks(2)
        .map(|pair| {
            Some(pair)
                .filter(|pair| pair.iter().all(u8::is_ascii_hexdigit))
                .and_then(|pair| std::str::from_utf8(pair).ok())
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| {
                    CliError::new(
                        DATA_INVALID,
                        format!("invalid hex byte {:?}", String::from_utf8_lossy(pair)),
                    )
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_ignores_whitespace() {
        assert_eq!(
            parse_hex("C8 01 4f 4b\nFF").unwrap(),
            vec![0xC8, 0x01, 0x4F, 0x4B, 0xFF]
        );
        assert!(parse_hex("").unwrap().is_empty());
    }

    #[test]
    fn parse_hex_rejects_bad_input() {
        assert_eq!(parse_hex("ABC").unwrap_err().code, DATA_INVALID);
        assert_eq!(parse_hex("ZZ").unwrap_err().code, DATA_INVALID);
        assert_eq!(parse_hex("+F").unwrap_err().code, DATA_INVALID);
        assert_eq!(parse_hex("-1").unwrap_err().code, DATA_INVALID);
        assert_eq!(parse_hex("80 +0").unwrap_err().code, DATA_INVALID);
    }
}

use tracing::info;
use xsig_frame::{Command, Token, TokenWriter};
use xsig_serialize::{render_bytes, TextEncoding};

use crate::cmd::EncodeArgs;
use crate::exit::{frame_error, CliResult, SUCCESS};
use crate::output::{print_encoded, print_raw, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let mut writer = TokenWriter::new(Vec::<u8>::new());

    if args.clear {
        writer
            .write_command(Command::ClearOutputs)
            .map_err(|err| frame_error("encode failed", err))?;
    }
    writer
        .write_tokens(&args.tokens, args.offset)
        .map_err(|err| frame_error("encode failed", err))?;
    if args.status {
        writer
            .write_command(Command::SendStatus)
            .map_err(|err| frame_error("encode failed", err))?;
    }
    let bytes = writer
        .finish()
        .map_err(|err| frame_error("encode failed", err))?;

    info!(
        tokens = args.tokens.len(),
        bytes = bytes.len(),
        offset = args.offset,
        "encoded stream"
    );

    if args.text {
        // No trailing newline: 0x0A is a valid final byte.
        print_raw(render_bytes(&bytes, TextEncoding::Latin1).as_bytes());
    } else {
        print_encoded(&args.tokens, &bytes, args.offset, format);
    }
    Ok(SUCCESS)
}

/// Parse `KIND:JOIN=VALUE`, where KIND is `d`/`digital`, `a`/`analog` or `s`/`serial`.
pub fn parse_token(arg: &str) -> Result<Token, String> {
    let (kind, rest) = arg
        .split_once(':')
        .ok_or_else(|| format!("expected KIND:JOIN=VALUE, got {arg:?}"))?;
    let (join, value) = rest
        .split_once('=')
        .ok_or_else(|| format!("expected KIND:JOIN=VALUE, got {arg:?}"))?;
    let join: u16 = join
        .trim()
        .parse()
        .map_err(|_| format!("invalid join {join:?}"))?;

    match kind.trim().to_ascii_lowercase().as_str() {
        "d" | "digital" => parse_level(value).map(|v| Token::digital(join, v)),
        "a" | "analog" => value
            .trim()
            .parse()
            .map(|v| Token::analog(join, v))
            .map_err(|_| format!("invalid analog value {value:?} (0..=65535)")),
        "s" | "serial" => Ok(Token::serial(join, value)),
        other => Err(format!("unknown token kind {other:?} (use d, a or s)")),
    }
}

fn parse_level(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "high" => Ok(true),
        "0" | "false" | "off" | "low" => Ok(false),
        _ => Err(format!("invalid digital value {value:?} (use 1 or 0)")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_kind() {
        assert_eq!(parse_token("d:1=1").unwrap(), Token::digital(1, true));
        assert_eq!(parse_token("digital:7=off").unwrap(), Token::digital(7, false));
        assert_eq!(parse_token("a:5=1000").unwrap(), Token::analog(5, 1000));
        assert_eq!(parse_token("s:2=OK").unwrap(), Token::serial(2, "OK"));
    }

    #[test]
    fn serial_value_keeps_separators_and_spaces() {
        assert_eq!(
            parse_token("s:3=a=b: c").unwrap(),
            Token::serial(3, "a=b: c")
        );
        assert_eq!(parse_token("s:3=").unwrap(), Token::serial(3, ""));
    }

    #[test]
    fn rejects_bad_specs() {
        assert!(parse_token("d1=1").is_err());
        assert!(parse_token("d:1").is_err());
        assert!(parse_token("x:1=1").is_err());
        assert!(parse_token("a:1=70000").is_err());
        assert!(parse_token("d:1=maybe").is_err());
        assert!(parse_token("a:-1=1").is_err());
    }
}

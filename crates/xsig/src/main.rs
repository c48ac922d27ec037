mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "xsig", version, about = "XSig signal stream encoder/decoder")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr). XSIG_LOG directives refine it.
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xsig_frame::Token;

    #[test]
    fn parses_encode_tokens_in_order() {
        let cli = Cli::try_parse_from([
            "xsig", "encode", "s:2=OK", "d:1=1", "a:5=1000", "--offset", "10",
        ])
        .expect("encode args should parse");

        let Command::Encode(args) = cli.command else {
            panic!("expected encode");
        };
        assert_eq!(
            args.tokens,
            vec![
                Token::serial(2, "OK"),
                Token::digital(1, true),
                Token::analog(5, 1000)
            ]
        );
        assert_eq!(args.offset, 10);
    }

    #[test]
    fn accepts_negative_offset() {
        let cli = Cli::try_parse_from(["xsig", "decode", "--offset", "-4"])
            .expect("negative offset should parse");
        let Command::Decode(args) = cli.command else {
            panic!("expected decode");
        };
        assert_eq!(args.offset, -4);
    }

    #[test]
    fn rejects_malformed_token_spec() {
        let err = Cli::try_parse_from(["xsig", "encode", "q:1=1"])
            .expect_err("unknown kind should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn parses_decode_input_format() {
        let cli = Cli::try_parse_from(["xsig", "decode", "--input", "hex", "wire.txt"])
            .expect("decode args should parse");
        let Command::Decode(args) = cli.command else {
            panic!("expected decode");
        };
        assert_eq!(args.input, cmd::InputFormat::Hex);
        assert_eq!(args.file.as_deref(), Some(std::path::Path::new("wire.txt")));
    }
}

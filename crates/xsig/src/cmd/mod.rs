use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use xsig_frame::{Token, DEFAULT_MAX_SERIAL_LEN};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode tokens into an XSig byte stream.
    Encode(EncodeArgs),
    /// Decode an XSig byte stream and print its tokens.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Tokens as KIND:JOIN=VALUE, e.g. d:1=1 a:5=1000 s:2=OK.
    #[arg(value_name = "TOKEN", value_parser = encode::parse_token)]
    pub tokens: Vec<Token>,
    /// Join offset added to every token.
    #[arg(long, env = "XSIG_OFFSET", default_value_t = 0, allow_hyphen_values = true)]
    pub offset: i32,
    /// Prefix the stream with a clear-outputs command.
    #[arg(long)]
    pub clear: bool,
    /// Append a send-status request.
    #[arg(long)]
    pub status: bool,
    /// Print the stream as ISO-8859-1 text instead of using --format.
    #[arg(long)]
    pub text: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// Binary XSig bytes.
    Raw,
    /// Hex digits, whitespace ignored.
    Hex,
    /// UTF-8 text holding the ISO-8859-1 rendering of the stream.
    Text,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Input file. Reads stdin when omitted or "-".
    pub file: Option<PathBuf>,
    /// How the input is written.
    #[arg(long, value_enum, default_value = "raw")]
    pub input: InputFormat,
    /// Join offset the stream was encoded with.
    #[arg(long, env = "XSIG_OFFSET", default_value_t = 0, allow_hyphen_values = true)]
    pub offset: i32,
    /// Longest serial payload accepted, in bytes.
    #[arg(long, env = "XSIG_MAX_SERIAL_LEN", default_value_t = DEFAULT_MAX_SERIAL_LEN)]
    pub max_serial_len: usize,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

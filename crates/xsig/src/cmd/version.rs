use xsig_frame::{MAX_ANALOG_JOIN, MAX_DIGITAL_JOIN, MAX_SERIAL_JOIN};
use xsig_serialize::TextEncoding;

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("xsig {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    let encoding = TextEncoding::default();
    println!("name: xsig");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("XSIG_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!("features: async={}, cli=true", cfg!(feature = "async"));
    println!(
        "joins: digital=1..{MAX_DIGITAL_JOIN}, analog=1..{MAX_ANALOG_JOIN}, serial=1..{MAX_SERIAL_JOIN}"
    );
    println!("text_encoding: {} (codepage {})", encoding, encoding.codepage());

    Ok(SUCCESS)
}

use std::fmt;
use std::io;

use xsig_frame::FrameError;
use xsig_serialize::SerializeError;

// Exit codes follow the sysexits-style ranges used across our CLIs.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound | io::ErrorKind::BrokenPipe => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::IndexOutOfRange { .. } | FrameError::InvalidSerialChar { .. } => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
        FrameError::MalformedFrame(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
    }
}

pub fn serialize_error(context: &str, err: SerializeError) -> CliError {
    match err {
        SerializeError::Frame(err) => frame_error(context, err),
        SerializeError::InvalidArgument(_) => CliError::new(USAGE, format!("{context}: {err}")),
        SerializeError::Unencodable { .. } | SerializeError::Deserialize(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use xsig_frame::{Malformed, TokenKind};

    use super::*;

    #[test]
    fn malformed_input_is_data_invalid() {
        let err = frame_error(
            "decode failed",
            FrameError::MalformedFrame(Malformed::UnknownHeader(0xD8)),
        );
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.starts_with("decode failed: malformed frame"));
    }

    #[test]
    fn out_of_range_join_is_usage() {
        let err = frame_error(
            "encode failed",
            FrameError::IndexOutOfRange {
                kind: TokenKind::Analog,
                index: 1025,
                offset: 0,
                max: 1024,
            },
        );
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn nested_io_error_maps_by_kind() {
        let err = serialize_error(
            "write failed",
            SerializeError::Frame(FrameError::Io(io::Error::from(
                io::ErrorKind::PermissionDenied,
            ))),
        );
        assert_eq!(err.code, PERMISSION_DENIED);
    }
}

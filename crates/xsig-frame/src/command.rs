//! Single-byte host commands.
//!
//! These share the line with token frames but carry no join or value, so
//! the decoder reports them as unrecognized headers.

/// Force every device output to zero.
pub const CLEAR_OUTPUTS: u8 = 0xFC;

/// Ask the device to re-transmit digitals, analogs and permanent serials.
pub const SEND_STATUS: u8 = 0xFD;

/// A host-to-device control command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ClearOutputs,
    SendStatus,
}

impl Command {
    /// The command's wire byte.
    pub fn byte(self) -> u8 {
        match self {
            Command::ClearOutputs => CLEAR_OUTPUTS,
            Command::SendStatus => SEND_STATUS,
        }
    }

    /// Returns a human-readable name for the command.
    pub fn name(self) -> &'static str {
        match self {
            Command::ClearOutputs => "CLEAR_OUTPUTS",
            Command::SendStatus => "SEND_STATUS",
        }
    }
}

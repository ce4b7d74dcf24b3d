//! Serial command errors
//!
//! None of these are fatal: the offending line is dropped and the robot carries on.
//! The `Display` text is what gets written back to the operator.

use heapless::String;
use thiserror::Error;

use crate::protocol::CommandWord;

/// Longest unknown command word kept for the diagnostic
pub const UNKNOWN_WORD_LEN: usize = 16;

/// Why a serial line produced no command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// The command word is not one of STOP, SPEED, COLOR, STATUS
    #[error("Unknown command: {0}")]
    UnknownCommand(String<UNKNOWN_WORD_LEN>),
    /// Known command with the wrong number of arguments
    #[error("Usage: {}", .0.usage())]
    Usage(CommandWord),
    /// An argument is not an integer
    #[error("Invalid number. Usage: {}", .0.usage())]
    InvalidArgument(CommandWord),
    /// The line contains bytes that are not valid UTF-8
    #[error("Line is not valid text")]
    NotUtf8,
    /// The line filled the buffer before its terminator arrived
    #[error("Line too long, discarded")]
    Overflow,
}

impl CommandError {
    /// Builds an unknown-command error, truncating overly long words
    pub fn unknown(word: &str) -> Self {
        let mut kept = String::new();
        for c in word.chars() {
            if kept.push(c).is_err() {
                break;
            }
        }
        Self::UnknownCommand(kept)
    }

    /// Usage problems are answered on the serial line, everything else is only logged
    pub fn wants_reply(&self) -> bool {
        matches!(self, Self::Usage(_) | Self::InvalidArgument(_))
    }
}

//! Serial override protocol
//!
//! Bytes arrive one at a time from the UART. [`CommandProtocol`] collects them into
//! newline-terminated lines and parses each completed line into a [`Command`].
//!
//! # Data loss policy
//! - A line that fills the buffer before its terminator is dropped
//! - A malformed line is dropped; the reason is kept for [`CommandProtocol::take_error`]

pub mod command;
pub mod status;

pub use command::{parse_line, Command, CommandWord};
pub use status::StatusReport;

use heapless::Vec;

use crate::config::LINE_BUFFER_SIZE;
use crate::error::CommandError;

/// Line terminator
pub const TERMINATOR: u8 = b'\n';

/// Non-blocking byte input, typically the command UART
pub trait ByteSource {
    /// Returns the next byte if one is already available, never waits
    fn read_byte(&mut self) -> Option<u8>;
}

/// Incremental line assembler and parser
#[derive(Debug, Default)]
pub struct CommandProtocol {
    buffer: Vec<u8, LINE_BUFFER_SIZE>,
    last_error: Option<CommandError>,
}

impl CommandProtocol {
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            last_error: None,
        }
    }

    /// Appends one byte and returns a command once a full line has been parsed
    pub fn feed(&mut self, byte: u8) -> Option<Command> {
        if byte == TERMINATOR {
            let parsed = parse_line(&self.buffer);
            self.buffer.clear();
            return match parsed {
                Ok(command) => {
                    if let Some(command) = command {
                        debug!("command received: {}", command);
                    }
                    command
                }
                Err(error) => {
                    warn!("command rejected: {}", error);
                    self.last_error = Some(error);
                    None
                }
            };
        }

        // push cannot fail: the buffer is emptied as soon as it becomes full
        let _ = self.buffer.push(byte);
        if self.buffer.is_full() {
            warn!("line exceeds {} bytes, discarded", LINE_BUFFER_SIZE);
            self.buffer.clear();
            self.last_error = Some(CommandError::Overflow);
        }
        None
    }

    /// Takes the reason the most recent line was rejected, if any
    pub fn take_error(&mut self) -> Option<CommandError> {
        self.last_error.take()
    }

    #[cfg(test)]
    fn pending(&self) -> &[u8] {
        &self.buffer
    }
}

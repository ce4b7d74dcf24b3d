//! Operator commands and line parsing
//!
//! ```text
//! STOP
//! SPEED <left> <right>
//! COLOR <red> <green> <blue>
//! STATUS
//! ```
//!
//! Words are case-insensitive, tokens are separated by any ASCII whitespace.

use heapless::Vec;

use crate::config::CMD_MAX_ARGS;
use crate::error::CommandError;

/// One parsed operator command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Stop both wheels
    Stop,
    /// Drive the wheels at the given signed speeds (left, right)
    SetSpeed(i32, i32),
    /// Show the given indicator color (red, green, blue)
    SetColor(u8, u8, u8),
    /// Report sensor, battery and actuator state
    Status,
}

/// Writes the command as it goes over the wire, without the terminator
impl core::fmt::Display for Command {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Stop => f.write_str("STOP"),
            Self::SetSpeed(left, right) => write!(f, "SPEED {} {}", left, right),
            Self::SetColor(r, g, b) => write!(f, "COLOR {} {} {}", r, g, b),
            Self::Status => f.write_str("STATUS"),
        }
    }
}

/// Recognized command words, used for usage diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandWord {
    Stop,
    Speed,
    Color,
    Status,
}

impl CommandWord {
    fn parse(word: &str) -> Option<Self> {
        [
            ("STOP", Self::Stop),
            ("SPEED", Self::Speed),
            ("COLOR", Self::Color),
            ("STATUS", Self::Status),
        ]
        .into_iter()
        .find(|(name, _)| word.eq_ignore_ascii_case(name))
        .map(|(_, known)| known)
    }

    /// Number of arguments the command takes
    pub fn arity(self) -> usize {
        match self {
            Self::Stop | Self::Status => 0,
            Self::Speed => 2,
            Self::Color => 3,
        }
    }

    /// Expected syntax, shown to the operator on malformed input
    pub fn usage(self) -> &'static str {
        match self {
            Self::Stop => "STOP",
            Self::Speed => "SPEED <left> <right>",
            Self::Color => "COLOR <red> <green> <blue>",
            Self::Status => "STATUS",
        }
    }
}

/// Parses one line without its terminator.
///
/// Blank lines give `Ok(None)`. Tokens past [`CMD_MAX_ARGS`] arguments are dropped before
/// the argument count is checked.
pub fn parse_line(line: &[u8]) -> Result<Option<Command>, CommandError> {
    let line = core::str::from_utf8(line).map_err(|_| CommandError::NotUtf8)?;
    let mut tokens = line.split_ascii_whitespace();

    let Some(word) = tokens.next() else {
        return Ok(None);
    };
    let known = CommandWord::parse(word).ok_or_else(|| CommandError::unknown(word))?;

    let args: Vec<&str, CMD_MAX_ARGS> = tokens.take(CMD_MAX_ARGS).collect();
    if args.len() != known.arity() {
        return Err(CommandError::Usage(known));
    }

    let number = |token: &str| {
        token
            .parse::<i32>()
            .map_err(|_| CommandError::InvalidArgument(known))
    };
    let channel = |token: &str| number(token).map(|value| value.clamp(0, 255) as u8);

    let command = match known {
        CommandWord::Stop => Command::Stop,
        CommandWord::Status => Command::Status,
        CommandWord::Speed => Command::SetSpeed(number(args[0])?, number(args[1])?),
        CommandWord::Color => {
            Command::SetColor(channel(args[0])?, channel(args[1])?, channel(args[2])?)
        }
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_commands_parse_back() {
        for command in [
            Command::Stop,
            Command::SetSpeed(-467, 38),
            Command::SetColor(0, 128, 255),
            Command::Status,
        ] {
            let line = command.to_string();
            assert_eq!(parse_line(line.as_bytes()), Ok(Some(command)));
        }
    }

    #[test]
    fn parses_every_command() {
        assert_eq!(parse_line(b"STOP"), Ok(Some(Command::Stop)));
        assert_eq!(parse_line(b"STATUS"), Ok(Some(Command::Status)));
        assert_eq!(
            parse_line(b"SPEED 100 -50"),
            Ok(Some(Command::SetSpeed(100, -50)))
        );
        assert_eq!(
            parse_line(b"COLOR 255 0 128"),
            Ok(Some(Command::SetColor(255, 0, 128)))
        );
    }

    #[test]
    fn words_are_case_insensitive() {
        assert_eq!(parse_line(b"stop"), Ok(Some(Command::Stop)));
        assert_eq!(parse_line(b"Speed 1 2"), Ok(Some(Command::SetSpeed(1, 2))));
    }

    #[test]
    fn tolerates_extra_whitespace_and_carriage_return() {
        assert_eq!(
            parse_line(b"  SPEED\t10   20 \r"),
            Ok(Some(Command::SetSpeed(10, 20)))
        );
    }

    #[test]
    fn blank_line_is_not_a_command() {
        assert_eq!(parse_line(b""), Ok(None));
        assert_eq!(parse_line(b"   \r"), Ok(None));
    }

    #[test]
    fn wrong_argument_count_reports_usage() {
        assert_eq!(
            parse_line(b"SPEED 100"),
            Err(CommandError::Usage(CommandWord::Speed))
        );
        assert_eq!(
            parse_line(b"COLOR 1 2 3 4"),
            Err(CommandError::Usage(CommandWord::Color))
        );
        assert_eq!(
            parse_line(b"STOP now"),
            Err(CommandError::Usage(CommandWord::Stop))
        );
    }

    #[test]
    fn excess_tokens_are_dropped_before_counting() {
        // ten arguments are cut to eight, still the wrong count for SPEED
        assert_eq!(
            parse_line(b"SPEED 1 2 3 4 5 6 7 8 9 10"),
            Err(CommandError::Usage(CommandWord::Speed))
        );
    }

    #[test]
    fn non_numeric_argument_is_rejected() {
        assert_eq!(
            parse_line(b"SPEED fast 10"),
            Err(CommandError::InvalidArgument(CommandWord::Speed))
        );
    }

    #[test]
    fn color_channels_saturate() {
        assert_eq!(
            parse_line(b"COLOR 300 -5 64"),
            Ok(Some(Command::SetColor(255, 0, 64)))
        );
    }

    #[test]
    fn unknown_word_is_kept_for_the_diagnostic() {
        assert_eq!(
            parse_line(b"JUMP 3"),
            Err(CommandError::unknown("JUMP"))
        );
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        assert_eq!(parse_line(&[0xff, 0xfe]), Err(CommandError::NotUtf8));
    }

    #[test]
    fn usage_text_matches_protocol() {
        assert_eq!(
            CommandError::Usage(CommandWord::Speed).to_string(),
            "Usage: SPEED <left> <right>"
        );
        assert_eq!(
            CommandError::Usage(CommandWord::Color).to_string(),
            "Usage: COLOR <red> <green> <blue>"
        );
    }
}

use hand_cricket::tournament::models::{MAX_CHOICE, MIN_CHOICE};
use std::fmt;

/// Commands understood by the client prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Pay the entry fee and join the tournament
    Register,
    /// Show a hand
    Play(u8),
    /// Leaderboard as the action text
    Leaderboard,
    /// Tournament summary
    Status,
    /// Own statistics
    Stats,
    /// End the tournament (administrator only)
    End,
    Help,
    Quit,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Hand is not a number from 1 to 6.
    InvalidHand(String),
    /// Play command missing its hand.
    PlayMissingHand,
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHand(value) => write!(
                f,
                "Invalid hand '{}'. Must be a number from {} to {} (e.g., 'play 4')",
                value, MIN_CHOICE, MAX_CHOICE
            ),
            Self::PlayMissingHand => {
                write!(f, "Play requires a hand (e.g., 'play 4')")
            }
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Type 'help' to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Prompt help text
pub const COMMAND_HELP: &str = "\
Commands:
  register        Join the tournament
  play N | N      Show a hand from 1 to 6
  leaderboard     Show the best scores
  status          Show the tournament summary
  stats           Show your statistics
  end             End the tournament (administrator)
  help            Show this help
  quit            Leave
";

/// Parse a command string into a [`Command`].
///
/// # Examples
///
/// ```
/// use hc_client::commands::{parse_command, Command};
///
/// assert_eq!(parse_command("register"), Ok(Command::Register));
/// assert_eq!(parse_command("play 4"), Ok(Command::Play(4)));
/// assert_eq!(parse_command("6"), Ok(Command::Play(6)));
/// assert!(parse_command("play 7").is_err());
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim().to_ascii_lowercase();

    match trimmed.as_str() {
        "register" | "join" => return Ok(Command::Register),
        "leaderboard" | "lb" => return Ok(Command::Leaderboard),
        "status" => return Ok(Command::Status),
        "stats" | "me" => return Ok(Command::Stats),
        "end" => return Ok(Command::End),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" | "q" => return Ok(Command::Quit),
        "play" => return Err(ParseError::PlayMissingHand),
        _ => {}
    }

    let parts: Vec<&str> = trimmed.split_ascii_whitespace().collect();
    match parts.as_slice() {
        ["play", hand] => parse_hand(hand),
        [hand] if hand.chars().all(|c| c.is_ascii_digit()) => parse_hand(hand),
        _ => Err(ParseError::UnrecognizedCommand(input.trim().to_string())),
    }
}

fn parse_hand(value: &str) -> Result<Command, ParseError> {
    value
        .parse::<u8>()
        .ok()
        .filter(|hand| (MIN_CHOICE..=MAX_CHOICE).contains(hand))
        .map(Command::Play)
        .ok_or_else(|| ParseError::InvalidHand(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_word_commands() {
        assert_eq!(parse_command("register"), Ok(Command::Register));
        assert_eq!(parse_command("  Leaderboard "), Ok(Command::Leaderboard));
        assert_eq!(parse_command("status"), Ok(Command::Status));
        assert_eq!(parse_command("stats"), Ok(Command::Stats));
        assert_eq!(parse_command("end"), Ok(Command::End));
        assert_eq!(parse_command("quit"), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_play() {
        assert_eq!(parse_command("play 1"), Ok(Command::Play(1)));
        assert_eq!(parse_command("play   6"), Ok(Command::Play(6)));
        assert_eq!(parse_command("PLAY 2"), Ok(Command::Play(2)));
        assert_eq!(parse_command("3"), Ok(Command::Play(3)));
    }

    #[test]
    fn test_parse_play_out_of_range() {
        assert_eq!(
            parse_command("play 0"),
            Err(ParseError::InvalidHand("0".to_string()))
        );
        assert_eq!(
            parse_command("9"),
            Err(ParseError::InvalidHand("9".to_string()))
        );
        assert_eq!(
            parse_command("play six"),
            Err(ParseError::InvalidHand("six".to_string()))
        );
    }

    #[test]
    fn test_parse_play_missing_hand() {
        assert_eq!(parse_command("play"), Err(ParseError::PlayMissingHand));
    }

    #[test]
    fn test_unrecognized() {
        let err = parse_command("bowl").unwrap_err();
        assert_eq!(err, ParseError::UnrecognizedCommand("bowl".to_string()));
        assert!(err.to_string().contains("help"));
    }
}

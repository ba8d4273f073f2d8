/// Chat command parsing (`!play never gonna give you up`)
use chorus_playback::Command;
use thiserror::Error;

/// Prefix every chat command starts with
pub const PREFIX: char = '!';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("Empty command")]
    Empty,

    #[error("Commands start with '!'")]
    MissingPrefix,

    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Usage: !play <url or search terms>")]
    MissingQuery,
}

/// Parse one chat line into a playback command
///
/// Command names are case-insensitive; everything after `!play` is the query.
pub fn parse(text: &str) -> Result<Command, CommandParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CommandParseError::Empty);
    }

    let body = text
        .strip_prefix(PREFIX)
        .ok_or(CommandParseError::MissingPrefix)?;
    let (name, rest) = match body.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (body, ""),
    };

    match name.to_lowercase().as_str() {
        "join" => Ok(Command::Join),
        "leave" => Ok(Command::Leave),
        "play" if rest.is_empty() => Err(CommandParseError::MissingQuery),
        "play" => Ok(Command::Play(rest.to_string())),
        "pause" => Ok(Command::Pause),
        "resume" => Ok(Command::Resume),
        "skip" => Ok(Command::Skip),
        "prev" | "previous" => Ok(Command::Previous),
        "queue" => Ok(Command::ListQueue),
        "" => Err(CommandParseError::Empty),
        other => Err(CommandParseError::Unknown(other.to_string())),
    }
}

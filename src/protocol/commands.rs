//! Module `commands`
//!
//! Classifies the command token of a decoded line.

/// A command recognized by the server.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Command<'a> {
    Slave,
    Admin,
    Vote,
    Clients,
    Move,
    Stop,
    Reset,
    /// Anything else; from a slave addressing the server this is a vote value.
    Other(&'a str),
}

impl Command<'_> {
    /// Commands relayed verbatim to every client.
    pub fn is_control(&self) -> bool {
        matches!(self, Command::Move | Command::Stop | Command::Reset)
    }
}

/// Maps a command token to a `Command`. Matching is case sensitive.
pub fn parse_command(token: &str) -> Command<'_> {
    match token {
        "slave" => Command::Slave,
        "admin" => Command::Admin,
        "vote" => Command::Vote,
        "clients" => Command::Clients,
        "move" => Command::Move,
        "stop" => Command::Stop,
        "reset" => Command::Reset,
        other => Command::Other(other),
    }
}

/// Parses a vote submission. Only integers in `0..=255` are votes.
pub fn parse_vote(token: &str) -> Option<u8> {
    token.parse::<u8>().ok()
}

//! Control protocol implementation
//!
//! Handles line decoding, command classification, dispatch and the fixed
//! server responses.

pub mod commands;
pub mod handlers;
pub mod message;
pub mod responses;

pub use commands::{Command, parse_command, parse_vote};
pub use handlers::handle_line;
pub use message::{Message, encode, strip_terminator};

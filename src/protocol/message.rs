//! Line codec
//!
//! Every protocol line has the shape `[<target>] <command> <rest>`.

/// A decoded client line, borrowing from the raw input.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Message<'a> {
    pub target: &'a str,
    pub command: &'a str,
    pub rest: &'a str,
}

impl<'a> Message<'a> {
    /// Parses a line with its terminator already stripped.
    ///
    /// Returns `None` unless both a non-empty bracketed target and a command
    /// token are present.
    pub fn parse(line: &'a str) -> Option<Self> {
        let after_open = line.strip_prefix('[')?;
        let close = after_open.find(']')?;
        let target = &after_open[..close];
        if target.is_empty() {
            return None;
        }

        let tail = after_open[close + 1..].trim_start();
        let mut parts = tail.splitn(2, char::is_whitespace);
        let command = parts.next().filter(|c| !c.is_empty())?;
        let rest = parts.next().unwrap_or("").trim_start();

        Some(Self {
            target,
            command,
            rest,
        })
    }
}

/// Removes up to two trailing `\r` / `\n` characters.
pub fn strip_terminator(raw: &str) -> &str {
    let mut line = raw;
    for _ in 0..2 {
        match line.strip_suffix(['\r', '\n']) {
            Some(shorter) => line = shorter,
            None => break,
        }
    }
    line
}

/// Encodes an outbound line.
pub fn encode(target: &str, body: &str) -> String {
    format!("[{}] {}\n", target, body)
}

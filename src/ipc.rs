use strum::{Display, EnumString};

pub const SOCKET_PATH: &str = "/tmp/orbit.sock";

/// One line on the control socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum IpcCommand {
    Show,
    Hide,
    Toggle,
}

impl IpcCommand {
    /// Parses a trimmed line, `None` for anything unknown.
    pub fn parse_line(line: &str) -> Option<Self> {
        line.trim().parse().ok()
    }
}

//! Command set accepted by the vehicle's `car` endpoint

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::controls::ControlId;

/// Name of a vehicle command, as sent in `execute` and echoed back in `command`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandName {
    ForwardStart,
    BackStart,
    LeftStart,
    RightStart,
    ForwardStop,
    BackStop,
    LeftStop,
    RightStop,
    Stop,
    Auto,
    Speed,
    /// Anything the firmware echoes that this panel does not know about
    #[serde(other)]
    Unknown,
}

impl CommandName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ForwardStart => "forward_start",
            Self::BackStart => "back_start",
            Self::LeftStart => "left_start",
            Self::RightStart => "right_start",
            Self::ForwardStop => "forward_stop",
            Self::BackStop => "back_stop",
            Self::LeftStop => "left_stop",
            Self::RightStop => "right_stop",
            Self::Stop => "stop",
            Self::Auto => "auto",
            Self::Speed => "speed",
            Self::Unknown => "unknown",
        }
    }

    /// Whether an echo of this command ends an action and warrants a status poll
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::ForwardStop
                | Self::BackStop
                | Self::Stop
                | Self::Speed
                | Self::LeftStop
                | Self::RightStop
                | Self::Auto
        )
    }

    /// The `_stop` command that cancels a `_start` echo
    pub fn stop_follow_up(&self) -> Option<Command> {
        match self {
            Self::ForwardStart => Some(Command::ForwardStop),
            Self::BackStart => Some(Command::BackStop),
            Self::LeftStart => Some(Command::LeftStop),
            Self::RightStart => Some(Command::RightStop),
            _ => None,
        }
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command with its optional value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ForwardStart,
    BackStart,
    LeftStart,
    RightStart,
    ForwardStop,
    BackStop,
    LeftStop,
    RightStop,
    Stop,
    /// Engage or release autonomous driving
    Auto(bool),
    /// Set the throttle (1-255)
    Speed(u8),
}

impl Command {
    /// Every command in the closed set, with representative values
    pub const ALL: [Command; 11] = [
        Command::ForwardStart,
        Command::BackStart,
        Command::LeftStart,
        Command::RightStart,
        Command::ForwardStop,
        Command::BackStop,
        Command::LeftStop,
        Command::RightStop,
        Command::Stop,
        Command::Auto(true),
        Command::Speed(128),
    ];

    pub fn name(&self) -> CommandName {
        match self {
            Self::ForwardStart => CommandName::ForwardStart,
            Self::BackStart => CommandName::BackStart,
            Self::LeftStart => CommandName::LeftStart,
            Self::RightStart => CommandName::RightStart,
            Self::ForwardStop => CommandName::ForwardStop,
            Self::BackStop => CommandName::BackStop,
            Self::LeftStop => CommandName::LeftStop,
            Self::RightStop => CommandName::RightStop,
            Self::Stop => CommandName::Stop,
            Self::Auto(_) => CommandName::Auto,
            Self::Speed(_) => CommandName::Speed,
        }
    }

    /// Panel control that issues this command
    pub fn control(&self) -> ControlId {
        match self {
            Self::ForwardStart | Self::ForwardStop => ControlId::Forward,
            Self::BackStart | Self::BackStop => ControlId::Back,
            Self::LeftStart | Self::LeftStop => ControlId::Left,
            Self::RightStart | Self::RightStop => ControlId::Right,
            Self::Stop => ControlId::Stop,
            Self::Auto(_) => ControlId::Auto,
            Self::Speed(_) => ControlId::Speed,
        }
    }

    /// Parse a value-less command from its wire name
    pub fn from_name(name: &str) -> Option<Self> {
        let command = match name {
            "forward_start" => Self::ForwardStart,
            "back_start" => Self::BackStart,
            "left_start" => Self::LeftStart,
            "right_start" => Self::RightStart,
            "forward_stop" => Self::ForwardStop,
            "back_stop" => Self::BackStop,
            "left_stop" => Self::LeftStop,
            "right_stop" => Self::RightStop,
            "stop" => Self::Stop,
            _ => return None,
        };
        Some(command)
    }

    /// Build the JSON body posted to `car`
    pub fn to_request(&self) -> CommandRequest {
        let value = match self {
            Self::Auto(on) => Some(serde_json::Value::Bool(*on)),
            Self::Speed(speed) => Some(serde_json::Value::from(*speed)),
            _ => None,
        };
        CommandRequest {
            execute: self.name(),
            value,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto(on) => write!(f, "auto({})", on),
            Self::Speed(speed) => write!(f, "speed({})", speed),
            other => f.write_str(other.name().as_str()),
        }
    }
}

/// Body of `POST car`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub execute: CommandName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

/// Reply of `POST car`: the command the vehicle actually executed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandReply {
    pub command: CommandName,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_without_value_omits_it() {
        let body = serde_json::to_string(&Command::ForwardStart.to_request()).unwrap();
        assert_eq!(body, r#"{"execute":"forward_start"}"#);
    }

    #[test]
    fn test_request_with_values() {
        let auto = serde_json::to_value(Command::Auto(false).to_request()).unwrap();
        assert_eq!(auto, serde_json::json!({"execute": "auto", "value": false}));

        let speed = serde_json::to_value(Command::Speed(200).to_request()).unwrap();
        assert_eq!(speed, serde_json::json!({"execute": "speed", "value": 200}));
    }

    #[test]
    fn test_execute_matches_name_for_all_commands() {
        for command in Command::ALL {
            let body = serde_json::to_value(command.to_request()).unwrap();
            assert_eq!(body["execute"], command.name().as_str());
        }
    }

    #[test]
    fn test_reply_parsing() {
        let reply: CommandReply = serde_json::from_str(r#"{"command": "back_stop"}"#).unwrap();
        assert_eq!(reply.command, CommandName::BackStop);

        let reply: CommandReply = serde_json::from_str(r#"{"command": "beep"}"#).unwrap();
        assert_eq!(reply.command, CommandName::Unknown);
    }

    #[test]
    fn test_terminal_and_follow_up() {
        assert!(CommandName::Speed.is_terminal());
        assert!(CommandName::Auto.is_terminal());
        assert!(!CommandName::ForwardStart.is_terminal());
        assert!(!CommandName::Unknown.is_terminal());

        assert_eq!(CommandName::LeftStart.stop_follow_up(), Some(Command::LeftStop));
        assert_eq!(CommandName::BackStart.stop_follow_up(), Some(Command::BackStop));
        assert_eq!(CommandName::Stop.stop_follow_up(), None);
    }

    #[test]
    fn test_issuing_control() {
        assert_eq!(Command::BackStop.control(), ControlId::Back);
        assert_eq!(Command::RightStart.control(), ControlId::Right);
        assert_eq!(Command::Speed(3).control(), ControlId::Speed);
        assert_eq!(Command::Auto(false).control(), ControlId::Auto);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Command::from_name("right_stop"), Some(Command::RightStop));
        assert_eq!(Command::from_name("auto"), None);
        assert_eq!(Command::from_name("fly"), None);
    }
}

//! Parsing of interactive panel input lines

use carpanel_core::{Command, UploadTarget, SPEED_MAX, SPEED_MIN};
use std::path::PathBuf;
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  forward_start | back_start | left_start | right_start
  forward_stop  | back_stop  | left_stop  | right_stop  | stop
  w / s / a / d / x      forward, back, left, right start and stop
  auto on|off            toggle autonomous driving
  speed <1-255>          set the throttle
  status                 poll the vehicle and print its status
  upload html|image [path]
                         also accepts the control and picker ids
                         (uploadhtml, uploadbin, newhtmlfile, newbinfile)
  reload                 drop local state and sync again
  help | quit";

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Command(Command),
    Status,
    Upload {
        target: UploadTarget,
        path: Option<PathBuf>,
    },
    Reload,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    #[error("Unknown command `{0}`, type `help` for a list")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("Speed must be between {min} and {max}, got `{got}`")]
    Speed { min: u8, max: u8, got: String },
}

/// Parse a line; blank lines yield `None`
pub fn parse_line(line: &str) -> Result<Option<Action>, InputError> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();

    let action = match word {
        "w" => Action::Command(Command::ForwardStart),
        "s" => Action::Command(Command::BackStart),
        "a" => Action::Command(Command::LeftStart),
        "d" => Action::Command(Command::RightStart),
        "x" => Action::Command(Command::Stop),
        "auto" => match arg {
            Some("on") => Action::Command(Command::Auto(true)),
            Some("off") => Action::Command(Command::Auto(false)),
            _ => return Err(InputError::Usage("auto on|off")),
        },
        "speed" => {
            let raw = arg.ok_or(InputError::Usage("speed <1-255>"))?;
            let speed = raw
                .parse::<u8>()
                .ok()
                .filter(|s| (SPEED_MIN..=SPEED_MAX).contains(s))
                .ok_or_else(|| InputError::Speed {
                    min: SPEED_MIN,
                    max: SPEED_MAX,
                    got: raw.to_string(),
                })?;
            Action::Command(Command::Speed(speed))
        }
        "status" => Action::Status,
        "upload" => {
            let target = match arg {
                Some("html") => UploadTarget::Html,
                Some("image") | Some("bin") => UploadTarget::Image,
                Some(id) => UploadTarget::from_control_id(id)
                    .or_else(|_| UploadTarget::from_picker_id(id))
                    .map_err(|_| InputError::Usage("upload html|image [path]"))?,
                None => return Err(InputError::Usage("upload html|image [path]")),
            };
            Action::Upload {
                target,
                path: words.next().map(PathBuf::from),
            }
        }
        "reload" => Action::Reload,
        "help" | "?" => Action::Help,
        "quit" | "exit" | "q" => Action::Quit,
        other => Action::Command(
            Command::from_name(other).ok_or_else(|| InputError::Unknown(other.to_string()))?,
        ),
    };

    Ok(Some(action))
}

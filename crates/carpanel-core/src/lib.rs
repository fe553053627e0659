//! carpanel core - vehicle state, command set and control reflection
//!
//! This crate holds the I/O-free part of the panel:
//! - The closed command set and its JSON wire form
//! - The vehicle status payload and the mirrored session state
//! - The pure reflector from state to control enablement
//! - Shadow speed ramp arithmetic and upload destinations

pub mod command;
pub mod controls;
pub mod error;
pub mod speed;
pub mod state;
pub mod upload;

pub use command::{Command, CommandName, CommandReply, CommandRequest};
pub use controls::{reflect, AutoToggle, Capabilities, ControlId, ControlView};
pub use error::PanelError;
pub use speed::{Ramp, DEFAULT_RAMP_STEP, SPEED_MAX, SPEED_MIN};
pub use state::{CarStatus, VehicleState, STRAIGHT_TURN};
pub use upload::{UploadTarget, UPLOADING_TEXT};

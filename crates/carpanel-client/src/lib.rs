//! carpanel client - talks to the vehicle and keeps the panel in sync
//!
//! This crate provides the I/O half of the panel:
//! - `VehicleApi`, the seam to the vehicle's HTTP endpoints, and `HttpVehicle`
//! - `Panel`, which dispatches commands, polls status and uploads files
//! - `SpeedAnimator`, the cancellable readout ramp
//! - `Surface`, the trait a frontend implements to show the panel

pub mod animator;
pub mod panel;
pub mod surface;
pub mod transport;

pub use animator::{SpeedAnimator, DEFAULT_TICK};
pub use panel::{Panel, PanelOptions};
pub use surface::Surface;
pub use transport::{HttpVehicle, VehicleApi, CAR_PATH, DEFAULT_TIMEOUT, STATUS_PATH};

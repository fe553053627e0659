//! Where the panel renders its state

use carpanel_core::{ControlView, UploadTarget};

/// Output side of the panel: controls, readout and alerts
///
/// Implementations are called from the animator task as well as from
/// command and poll futures, so they must be cheap and non-blocking.
pub trait Surface: Send + Sync {
    /// Update the numeric speed readout and the slider position
    fn show_speed(&self, speed: u8);

    /// Apply control enablement and the auto label
    fn render(&self, view: &ControlView);

    /// Show a modal message to the user
    fn alert(&self, message: &str);

    /// Show the chosen file name next to the target's file picker
    fn set_file_name(&self, target: UploadTarget, file_name: &str);

    /// Mark an upload as running (control disabled, progress text shown) or finished
    fn set_uploading(&self, target: UploadTarget, uploading: bool);
}

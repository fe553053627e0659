//! Reflection of mirrored vehicle state into panel controls

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::state::VehicleState;

/// Label of the auto toggle while autonomous driving is engaged
pub const AUTO_ON_LABEL: &str = "Auto On";
/// Label of the auto toggle while driving manually
pub const AUTO_OFF_LABEL: &str = "Auto Off";

/// Identity of a panel control, named after the page element it drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlId {
    /// Speed slider
    Speed,
    /// Numeric speed readout
    SpeedReadout,
    /// Autonomous mode toggle
    Auto,
    Forward,
    Left,
    Stop,
    Right,
    Back,
    /// Upload section toggle
    Upload,
    UploadHtml,
    UploadBin,
    NewHtmlFile,
    NewBinFile,
    /// Upload progress text
    Uploading,
}

impl ControlId {
    /// Controls whose enablement the reflector decides
    pub const INTERACTIVE: [ControlId; 12] = [
        ControlId::Speed,
        ControlId::Auto,
        ControlId::Forward,
        ControlId::Left,
        ControlId::Stop,
        ControlId::Right,
        ControlId::Back,
        ControlId::Upload,
        ControlId::UploadHtml,
        ControlId::UploadBin,
        ControlId::NewHtmlFile,
        ControlId::NewBinFile,
    ];

    /// Element id in the panel markup
    pub fn dom_id(&self) -> &'static str {
        match self {
            Self::Speed => "speed",
            Self::SpeedReadout => "val_speed",
            Self::Auto => "auto",
            Self::Forward => "btn_forward",
            Self::Left => "btn_left",
            Self::Stop => "btn_stop",
            Self::Right => "btn_right",
            Self::Back => "btn_back",
            Self::Upload => "btn_upload",
            Self::UploadHtml => "uploadhtml",
            Self::UploadBin => "uploadbin",
            Self::NewHtmlFile => "newhtmlfile",
            Self::NewBinFile => "newbinfile",
            Self::Uploading => "uploading",
        }
    }

    pub fn from_dom_id(id: &str) -> Option<Self> {
        Self::INTERACTIVE
            .into_iter()
            .chain([Self::SpeedReadout, Self::Uploading])
            .find(|control| control.dom_id() == id)
    }

    fn is_upload(&self) -> bool {
        matches!(
            self,
            Self::Upload | Self::UploadHtml | Self::UploadBin | Self::NewHtmlFile | Self::NewBinFile
        )
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dom_id())
    }
}

/// What the connected vehicle firmware supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Firmware understands the `auto` command and reports `auto` in its status
    pub autonomous: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self { autonomous: true }
    }
}

/// Rendered state of every control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlView {
    pub speed: bool,
    pub forward: bool,
    pub left: bool,
    pub stop: bool,
    pub right: bool,
    pub back: bool,
    pub upload: bool,
    /// `None` when the panel has no auto toggle
    pub auto: Option<AutoToggle>,
}

/// Auto toggle state; the label doubles as the error slot when no driver answers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoToggle {
    pub enabled: bool,
    pub label: String,
}

impl ControlView {
    /// Whether the given control accepts input
    pub fn is_enabled(&self, control: ControlId) -> bool {
        match control {
            ControlId::Speed => self.speed,
            ControlId::Forward => self.forward,
            ControlId::Left => self.left,
            ControlId::Stop => self.stop,
            ControlId::Right => self.right,
            ControlId::Back => self.back,
            ControlId::Auto => self.auto.as_ref().is_some_and(|a| a.enabled),
            id if id.is_upload() => self.upload,
            _ => false,
        }
    }

    /// Interactive controls currently enabled
    pub fn enabled_controls(&self) -> Vec<ControlId> {
        ControlId::INTERACTIVE
            .into_iter()
            .filter(|control| self.is_enabled(*control))
            .collect()
    }

    pub fn auto_label(&self) -> Option<&str> {
        self.auto.as_ref().map(|a| a.label.as_str())
    }
}

/// Compute control enablement and labels from the mirrored state
///
/// `error` is the summary of the last failed poll and only matters while
/// `state.driver_not_found` is set.
pub fn reflect(state: &VehicleState, caps: &Capabilities, error: Option<&str>) -> ControlView {
    if state.driver_not_found {
        return ControlView {
            speed: false,
            forward: false,
            left: false,
            stop: false,
            right: false,
            back: false,
            upload: false,
            auto: caps.autonomous.then(|| AutoToggle {
                enabled: false,
                label: error.unwrap_or("Driver not found").to_string(),
            }),
        };
    }

    let auto = caps.autonomous && state.auto;
    let stopped = state.stop;

    ControlView {
        speed: !auto && !stopped,
        forward: !auto,
        left: !auto && !stopped,
        stop: true,
        right: !auto && !stopped,
        back: !auto,
        upload: stopped,
        auto: caps.autonomous.then(|| AutoToggle {
            enabled: true,
            label: if state.auto { AUTO_ON_LABEL } else { AUTO_OFF_LABEL }.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moving() -> VehicleState {
        VehicleState {
            forward: true,
            stop: false,
            speed: 100,
            ..VehicleState::default()
        }
    }

    #[test]
    fn test_dom_ids_round_trip() {
        for control in ControlId::INTERACTIVE {
            assert_eq!(ControlId::from_dom_id(control.dom_id()), Some(control));
        }
        assert_eq!(ControlId::from_dom_id("val_speed"), Some(ControlId::SpeedReadout));
        assert_eq!(ControlId::from_dom_id("btn_jump"), None);
    }

    #[test]
    fn test_moving_manual() {
        let view = reflect(&moving(), &Capabilities::default(), None);
        assert!(view.speed);
        assert!(view.left && view.right && view.forward && view.back && view.stop);
        assert!(!view.upload);
        assert_eq!(view.auto_label(), Some(AUTO_OFF_LABEL));
        assert!(view.is_enabled(ControlId::Auto));
    }

    #[test]
    fn test_auto_disables_directional_and_speed() {
        let state = VehicleState {
            auto: true,
            ..moving()
        };
        let view = reflect(&state, &Capabilities::default(), None);
        for control in [
            ControlId::Speed,
            ControlId::Forward,
            ControlId::Left,
            ControlId::Right,
            ControlId::Back,
        ] {
            assert!(!view.is_enabled(control), "{} should be disabled", control);
        }
        assert!(view.is_enabled(ControlId::Stop));
        assert_eq!(view.auto_label(), Some(AUTO_ON_LABEL));
    }

    #[test]
    fn test_stopped_disables_speed_and_turn_enables_upload() {
        let view = reflect(&VehicleState::default(), &Capabilities::default(), None);
        assert!(!view.speed);
        assert!(!view.left);
        assert!(!view.right);
        assert!(view.forward);
        assert!(view.upload);
        assert!(view.is_enabled(ControlId::UploadHtml));
        assert!(view.is_enabled(ControlId::NewBinFile));
    }

    #[test]
    fn test_no_driver_disables_everything() {
        let mut state = moving();
        state.mark_driver_lost(1);
        let view = reflect(&state, &Capabilities::default(), Some("vehicle offline"));
        assert!(view.enabled_controls().is_empty());
        assert_eq!(view.auto_label(), Some("vehicle offline"));
    }

    #[test]
    fn test_legacy_panel_has_no_auto_toggle() {
        let caps = Capabilities { autonomous: false };
        let state = VehicleState {
            auto: true,
            ..moving()
        };
        let view = reflect(&state, &caps, None);
        assert!(view.auto.is_none());
        // auto is ignored without the capability
        assert!(view.forward);
        assert!(view.speed);
    }
}

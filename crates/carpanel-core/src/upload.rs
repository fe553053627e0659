//! Upload destinations on the vehicle

use std::fmt;

use crate::controls::ControlId;
use crate::error::PanelError;

/// Progress text shown while a file is being sent
pub const UPLOADING_TEXT: &str = "Uploading! Please wait.";

/// What kind of file is uploaded, which selects the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadTarget {
    /// Web panel assets, stored on the vehicle's filesystem
    Html,
    /// Firmware image, written to the next OTA partition
    Image,
}

impl UploadTarget {
    /// Resolve the target from the control that triggered the upload
    pub fn from_control_id(id: &str) -> Result<Self, PanelError> {
        match ControlId::from_dom_id(id) {
            Some(ControlId::UploadHtml) => Ok(Self::Html),
            Some(ControlId::UploadBin) => Ok(Self::Image),
            _ => Err(PanelError::UnknownControl(id.to_string())),
        }
    }

    /// Resolve the target from the file picker that selected the file
    pub fn from_picker_id(id: &str) -> Result<Self, PanelError> {
        match ControlId::from_dom_id(id) {
            Some(ControlId::NewHtmlFile) => Ok(Self::Html),
            Some(ControlId::NewBinFile) => Ok(Self::Image),
            _ => Err(PanelError::UnknownControl(id.to_string())),
        }
    }

    /// Button that starts the upload
    pub fn control(&self) -> ControlId {
        match self {
            Self::Html => ControlId::UploadHtml,
            Self::Image => ControlId::UploadBin,
        }
    }

    /// File picker paired with the button
    pub fn picker(&self) -> ControlId {
        match self {
            Self::Html => ControlId::NewHtmlFile,
            Self::Image => ControlId::NewBinFile,
        }
    }

    /// Path segment under `/upload/`
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Image => "image",
        }
    }

    /// Endpoint path for a file name, e.g. `/upload/html/index.html`
    pub fn path_for(&self, file_name: &str) -> String {
        format!("/upload/{}/{}", self.kind(), file_name)
    }
}

impl fmt::Display for UploadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_from_control() {
        assert_eq!(UploadTarget::from_control_id("uploadhtml").unwrap(), UploadTarget::Html);
        assert_eq!(UploadTarget::from_control_id("uploadbin").unwrap(), UploadTarget::Image);
        assert_eq!(
            UploadTarget::from_control_id("btn_stop"),
            Err(PanelError::UnknownControl("btn_stop".to_string()))
        );
    }

    #[test]
    fn test_target_from_picker() {
        assert_eq!(UploadTarget::from_picker_id("newbinfile").unwrap(), UploadTarget::Image);
        assert_eq!(UploadTarget::Image.picker(), ControlId::NewBinFile);
        assert!(UploadTarget::from_picker_id("uploadbin").is_err());
    }

    #[test]
    fn test_upload_paths() {
        assert_eq!(UploadTarget::Html.path_for("index.html"), "/upload/html/index.html");
        assert_eq!(UploadTarget::Image.path_for("car.bin"), "/upload/image/car.bin");
    }
}

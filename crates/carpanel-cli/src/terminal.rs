//! Terminal rendering of the panel

use carpanel_client::Surface;
use carpanel_core::{CarStatus, ControlView, UploadTarget, UPLOADING_TEXT};
use chrono::Local;
use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Text surface writing to any `Write` sink (stdout in the binary)
pub struct TerminalSurface<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    fn out(&self) -> MutexGuard<'_, W> {
        self.out.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Print a full status report
    pub fn show_status(&self, status: &CarStatus) {
        let mut out = self.out();
        let motion = match (status.forward, status.back, status.stop) {
            (_, _, true) => "stopped",
            (true, _, _) => "forward",
            (_, true, _) => "back",
            _ => "idle",
        };
        let _ = write!(
            out,
            "\n{} | speed {} | turn {} | auto {}",
            motion,
            status.speed,
            status.turn,
            if status.auto { "on" } else { "off" }
        );
        if let (Some(left), Some(right)) = (status.speed_left, status.speed_right) {
            let _ = write!(out, " | motors {}/{}", left, right);
        }
        let _ = writeln!(out);
        let _ = out.flush();
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> Surface for TerminalSurface<W> {
    fn show_speed(&self, speed: u8) {
        let mut out = self.out();
        let _ = write!(out, "\rspeed {:>3}", speed);
        let _ = out.flush();
    }

    fn render(&self, view: &ControlView) {
        let mut out = self.out();
        let enabled: Vec<&str> = view
            .enabled_controls()
            .iter()
            .map(|control| control.dom_id())
            .collect();
        let controls = if enabled.is_empty() {
            "none".to_string()
        } else {
            enabled.join(" ")
        };
        let _ = write!(out, "\n[{}]", controls);
        if let Some(label) = view.auto_label() {
            let _ = write!(out, " {}", label);
        }
        let _ = writeln!(out);
        let _ = out.flush();
    }

    fn alert(&self, message: &str) {
        let mut out = self.out();
        let _ = writeln!(out, "\n{} ! {}", Local::now().format("%H:%M:%S"), message);
        let _ = out.flush();
    }

    fn set_file_name(&self, target: UploadTarget, file_name: &str) {
        let mut out = self.out();
        let _ = writeln!(out, "\n{}: {}", target.picker(), file_name);
        let _ = out.flush();
    }

    fn set_uploading(&self, target: UploadTarget, uploading: bool) {
        let mut out = self.out();
        if uploading {
            let _ = writeln!(out, "\n{} ({})", UPLOADING_TEXT, target);
        } else {
            let _ = writeln!(out, "\nUpload ({}) done", target);
        }
        let _ = out.flush();
    }
}

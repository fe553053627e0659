//! The control panel: command dispatch, status sync and uploads
//!
//! The panel owns the mirrored vehicle state. Commands and polls can run as
//! independent tasks against a shared `Arc<Panel>`; the state lock is never
//! held across a network exchange, so overlapping commands update the local
//! flags in whatever order their steps run.

use carpanel_core::{
    reflect, CarStatus, Capabilities, Command, CommandName, ControlId, ControlView, PanelError,
    Ramp, UploadTarget, VehicleState, DEFAULT_RAMP_STEP,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::animator::{SpeedAnimator, DEFAULT_TICK};
use crate::surface::Surface;
use crate::transport::VehicleApi;

/// Panel tuning
#[derive(Debug, Clone)]
pub struct PanelOptions {
    pub capabilities: Capabilities,
    /// Tick period of the speed readout animation
    pub animation_tick: Duration,
    /// Readout change per tick
    pub ramp_step: u8,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            capabilities: Capabilities::default(),
            animation_tick: DEFAULT_TICK,
            ramp_step: DEFAULT_RAMP_STEP,
        }
    }
}

/// Mirrored state plus the error text of the last failed poll
#[derive(Debug, Default)]
struct Session {
    vehicle: VehicleState,
    error: Option<String>,
}

/// Remote control panel for one vehicle
pub struct Panel<A> {
    api: A,
    surface: Arc<dyn Surface>,
    capabilities: Capabilities,
    session: RwLock<Session>,
    animator: SpeedAnimator,
    poll_seq: AtomicU64,
}

impl<A: VehicleApi> Panel<A> {
    pub fn new(api: A, surface: Arc<dyn Surface>, options: PanelOptions) -> Self {
        let animator = SpeedAnimator::new(surface.clone(), options.animation_tick, options.ramp_step);
        Self {
            api,
            surface,
            capabilities: options.capabilities,
            session: RwLock::new(Session::default()),
            animator,
            poll_seq: AtomicU64::new(0),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Snapshot of the mirrored state
    pub async fn state(&self) -> VehicleState {
        self.session.read().await.vehicle.clone()
    }

    /// Control view for the current state
    pub async fn view(&self) -> ControlView {
        let session = self.session.read().await;
        reflect(&session.vehicle, &self.capabilities, session.error.as_deref())
    }

    /// Speed currently shown on the readout
    pub fn displayed_speed(&self) -> u8 {
        self.animator.current()
    }

    /// Direction of the readout animation, if one is running
    pub fn ramp(&self) -> Option<Ramp> {
        self.animator.ramp()
    }

    /// Initial sync on startup
    pub async fn init(&self) -> Result<Option<CarStatus>, PanelError> {
        info!(autonomous = self.capabilities.autonomous, "Initializing panel");
        self.refresh_status().await
    }

    /// Drop all local state and sync again from scratch
    pub async fn reload(&self) -> Result<Option<CarStatus>, PanelError> {
        self.animator.stop();
        {
            let mut session = self.session.write().await;
            let seq = session.vehicle.status_seq;
            session.vehicle = VehicleState {
                status_seq: seq,
                ..VehicleState::default()
            };
            session.error = None;
        }
        debug!("Panel reloaded");
        self.refresh_status().await
    }

    /// Send a command and handle the vehicle's echo
    ///
    /// Commands from a disabled control are refused. Failures are alerted on
    /// the surface and returned. On success the name of the last command the
    /// vehicle echoed is returned, which is the stop follow-up when one had
    /// to be sent.
    pub async fn dispatch(&self, command: Command) -> Result<CommandName, PanelError> {
        if matches!(command, Command::Auto(_)) && !self.capabilities.autonomous {
            let err = PanelError::Unsupported("Autonomous mode");
            self.raise(&err);
            return Err(err);
        }
        self.ensure_enabled(command.control()).await?;

        let mut next = Some(command);
        let mut echoed = command.name();

        // follow-up stops are sent on the panel's behalf and skip the enablement check
        while let Some(command) = next.take() {
            self.anticipate(command).await;

            info!(command = %command, "Sending command");
            let request = command.to_request();
            let reply = match self.api.send_command(&request).await {
                Ok(reply) => reply,
                Err(err) => {
                    self.raise(&err);
                    return Err(err);
                }
            };
            echoed = reply.command;
            info!(command = %echoed, "Vehicle executed command");

            let (follow_up, terminal) = {
                let mut session = self.session.write().await;
                let follow_up = if session.vehicle.command_stop {
                    echoed.stop_follow_up()
                } else {
                    None
                };
                let terminal = echoed.is_terminal();
                if terminal {
                    session.vehicle.command_stop = true;
                }
                (follow_up, terminal)
            };

            if terminal {
                // poll failures are reflected on the surface, not on the command
                let _ = self.refresh_status().await;
            }

            if let Some(stop) = follow_up {
                debug!(echo = %echoed, follow_up = %stop, "Stop requested while starting");
            }
            next = follow_up;
        }

        Ok(echoed)
    }

    /// Local flag updates made before a command is sent
    async fn anticipate(&self, command: Command) {
        let mut session = self.session.write().await;
        let vehicle = &mut session.vehicle;

        let ramp = match command {
            Command::ForwardStart | Command::BackStart => {
                vehicle.command_stop = false;
                let reversing = match command {
                    Command::ForwardStart => vehicle.back,
                    _ => vehicle.forward,
                };
                if vehicle.stop {
                    vehicle.stop = false;
                    Some(Ramp::Accelerate)
                } else if !reversing {
                    vehicle.is_straight().then_some(Ramp::Accelerate)
                } else {
                    Some(Ramp::Decelerate)
                }
            }
            Command::LeftStart | Command::RightStart => {
                vehicle.command_stop = false;
                None
            }
            Command::ForwardStop | Command::BackStop | Command::Auto(_) => {
                self.animator.stop();
                None
            }
            Command::Stop => {
                self.animator.stop();
                vehicle.stop = true;
                None
            }
            Command::Speed(speed) => {
                self.animator.set(speed);
                self.surface.show_speed(speed);
                None
            }
            Command::LeftStop | Command::RightStop => None,
        };

        if let Some(ramp) = ramp {
            self.animator.start(ramp);
        }
    }

    /// Poll the vehicle and reconcile the mirrored state
    ///
    /// A reply to a poll issued before one that was already applied is
    /// discarded and yields `Ok(None)`. Otherwise the applied status or the
    /// poll error is returned.
    pub async fn refresh_status(&self) -> Result<Option<CarStatus>, PanelError> {
        let seq = self.poll_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.api.fetch_status().await;

        let mut session = self.session.write().await;
        if session.vehicle.is_stale(seq) {
            debug!(
                seq,
                applied = session.vehicle.status_seq,
                "Discarding stale status reply"
            );
            return Ok(None);
        }

        match &result {
            Ok(status) => {
                session.vehicle.apply_status(status, seq);
                session.error = None;
                self.animator.set(status.speed);
                self.surface.show_speed(status.speed);
            }
            Err(err) => {
                warn!(error = %err, "Vehicle status unavailable");
                session.vehicle.mark_driver_lost(seq);
                session.error = Some(err.summary());
                self.animator.set(0);
                self.surface.show_speed(0);
                if !self.capabilities.autonomous {
                    // no auto label to carry the message
                    self.surface.alert(&err.to_string());
                }
            }
        }

        let view = reflect(&session.vehicle, &self.capabilities, session.error.as_deref());
        drop(session);
        self.surface.render(&view);

        result.map(Some)
    }

    /// Upload a file to the vehicle, then reload
    ///
    /// Uploads are refused while the vehicle moves. With no file selected the
    /// user is alerted and nothing else happens.
    pub async fn upload(&self, target: UploadTarget, file: Option<&Path>) -> Result<String, PanelError> {
        self.ensure_enabled(target.control()).await?;

        let Some(path) = file else {
            let err = PanelError::NoFileSelected;
            self.raise(&err);
            return Err(err);
        };

        self.surface.set_uploading(target, true);
        let result = self.send_file(target, path).await;
        match &result {
            Ok(reply) => {
                info!(kind = %target, reply = %reply, "Upload finished");
                self.surface.alert(reply);
            }
            Err(err) => self.raise(err),
        }
        self.surface.set_uploading(target, false);

        let _ = self.reload().await;
        result
    }

    async fn send_file(&self, target: UploadTarget, path: &Path) -> Result<String, PanelError> {
        let file_name = match path.file_name() {
            None => return Err(PanelError::NoFileSelected),
            Some(name) => name.to_str().ok_or_else(|| PanelError::Io {
                path: path.display().to_string(),
                message: "file name is not valid UTF-8".to_string(),
            })?,
        };
        self.surface.set_file_name(target, file_name);

        let body = tokio::fs::read(path).await.map_err(|e| PanelError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        self.api.upload(target, file_name, body).await
    }

    /// Refuse input from a control the current view has disabled
    async fn ensure_enabled(&self, control: ControlId) -> Result<(), PanelError> {
        if self.view().await.is_enabled(control) {
            return Ok(());
        }
        let err = PanelError::Disabled(control);
        self.raise(&err);
        Err(err)
    }

    fn raise(&self, err: &PanelError) {
        warn!(error = %err, "Alert");
        self.surface.alert(&err.to_string());
    }
}

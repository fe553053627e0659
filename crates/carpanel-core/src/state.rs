//! Vehicle status as reported by `car_status`, and the panel's mirror of it

use serde::{Deserialize, Deserializer, Serialize};
use tracing::trace;

/// Turn angle meaning "straight ahead"
pub const STRAIGHT_TURN: i32 = 90;

/// Payload of `GET car_status`
///
/// The firmware encodes the motion flags as `0`/`1` numbers, newer builds add
/// `auto` as a JSON bool. Both encodings are accepted for every flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarStatus {
    #[serde(deserialize_with = "flag")]
    pub forward: bool,
    #[serde(deserialize_with = "flag")]
    pub back: bool,
    #[serde(default = "straight")]
    pub turn: i32,
    #[serde(deserialize_with = "flag")]
    pub stop: bool,
    #[serde(default, deserialize_with = "flag")]
    pub auto: bool,
    #[serde(deserialize_with = "speed")]
    pub speed: u8,
    /// Per-motor speed, reported for diagnostics only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_left: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_right: Option<i32>,
}

fn straight() -> i32 {
    STRAIGHT_TURN
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Bool(bool),
    Number(f64),
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match FlagRepr::deserialize(deserializer)? {
        FlagRepr::Bool(b) => b,
        FlagRepr::Number(n) => n != 0.0,
    })
}

fn speed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let raw = f64::deserialize(deserializer)?;
    Ok(raw.round().clamp(0.0, 255.0) as u8)
}

/// Mirrored vehicle state owned by one panel session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleState {
    pub forward: bool,
    pub back: bool,
    pub turn: i32,
    pub stop: bool,
    pub auto: bool,
    /// Authoritative throttle value
    pub speed: u8,
    /// Set when the last status poll failed
    pub driver_not_found: bool,
    /// Gates the automatic `_stop` follow-up for an in-flight `_start`
    pub command_stop: bool,
    /// Ticket of the last status poll applied to this state
    pub status_seq: u64,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self {
            forward: false,
            back: false,
            turn: STRAIGHT_TURN,
            stop: true,
            auto: false,
            speed: 0,
            driver_not_found: false,
            command_stop: false,
            status_seq: 0,
        }
    }
}

impl VehicleState {
    /// Overwrite the mirrored fields with a successful poll result
    pub fn apply_status(&mut self, status: &CarStatus, seq: u64) {
        trace!(seq, ?status, "Applying vehicle status");
        self.forward = status.forward;
        self.back = status.back;
        self.turn = status.turn;
        self.stop = status.stop;
        self.auto = status.auto;
        self.speed = status.speed;
        self.driver_not_found = false;
        self.status_seq = seq;
    }

    /// Reset to defaults after a failed poll, keeping the poll ticket
    pub fn mark_driver_lost(&mut self, seq: u64) {
        *self = Self {
            driver_not_found: true,
            status_seq: seq,
            ..Self::default()
        };
    }

    /// Whether a poll issued with `seq` is older than what is already applied
    pub fn is_stale(&self, seq: u64) -> bool {
        seq < self.status_seq
    }

    pub fn is_straight(&self) -> bool {
        self.turn == STRAIGHT_TURN
    }
}

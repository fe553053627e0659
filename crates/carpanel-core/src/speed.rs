//! Shadow speed ramp arithmetic

/// Lowest throttle value the vehicle accepts
pub const SPEED_MIN: u8 = 1;
/// Highest throttle value the vehicle accepts
pub const SPEED_MAX: u8 = 255;
/// Default change of the shadow speed per animation tick
pub const DEFAULT_RAMP_STEP: u8 = 2;

/// Direction of a speed ramp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ramp {
    Accelerate,
    Decelerate,
}

impl Ramp {
    /// Next shadow value, always within `SPEED_MIN..=SPEED_MAX`
    pub fn step(&self, current: u8, step: u8) -> u8 {
        let next = match self {
            Ramp::Accelerate => current.saturating_add(step),
            Ramp::Decelerate => current.saturating_sub(step),
        };
        next.clamp(SPEED_MIN, SPEED_MAX)
    }
}

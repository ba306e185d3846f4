use std::time::Duration;

use serde::Serialize;

use super::GravityConfig;

/// Delay between two gravity steps at `level`.
///
/// Starts at `base_ms` on level 1, shrinks by `step_ms` per level and never
/// goes below `min_ms`. With the default config that is 500 ms on level 1
/// and the 100 ms floor from level 9 on.
#[must_use]
pub fn gravity_interval(level: usize, config: &GravityConfig) -> Duration {
    let steps = u64::try_from(level.saturating_sub(1)).unwrap_or(u64::MAX);
    let millis = config
        .base_ms
        .saturating_sub(steps.saturating_mul(config.step_ms))
        .max(config.min_ms);
    Duration::from_millis(millis)
}

/// A gravity step the collaborator should deliver back after `delay`.
///
/// Every armed tick carries its own serial. Only the most recently armed
/// tick can fire, and only once; pausing, resetting and game over retire it
/// without arming a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GravityTick {
    serial: u64,
    delay: Duration,
}

impl GravityTick {
    #[must_use]
    pub const fn serial(&self) -> u64 {
        self.serial
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

/// Serial bookkeeping for gravity ticks.
///
/// At most one tick is outstanding at a time.
#[derive(Debug, Clone, Default)]
pub(crate) struct GravityTimer {
    serial: u64,
    armed: bool,
}

impl GravityTimer {
    /// Arms a fresh tick unless one is already outstanding.
    pub(crate) fn arm(&mut self, delay: Duration) -> Option<GravityTick> {
        if self.armed {
            return None;
        }
        self.serial = self.serial.wrapping_add(1);
        self.armed = true;
        Some(GravityTick {
            serial: self.serial,
            delay,
        })
    }

    /// Makes the outstanding tick stale.
    pub(crate) fn invalidate(&mut self) {
        self.serial = self.serial.wrapping_add(1);
        self.armed = false;
    }

    /// Consumes `tick` if it is the outstanding one.
    pub(crate) fn fire(&mut self, tick: GravityTick) -> bool {
        if self.armed && tick.serial == self.serial {
            self.armed = false;
            true
        } else {
            false
        }
    }
}

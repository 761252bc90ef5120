//! Fixed-rate stepping for physics and game updates.

use log::warn;

use crate::config::PhysicsConfig;

/// How many steps of each kind a frame should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameSteps {
    pub physics_steps: u32,
    pub update_steps: u32,
}

/// Converts elapsed wall-clock time into whole physics and update steps.
/// Unspent time carries over as debt to the next frame.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    physics_dt: f64,
    update_dt: f64,
    physics_debt: f64,
    update_debt: f64,
    max_catch_up_steps: u32,
}

impl FixedTimestep {
    /// Panics if either rate is not positive.
    pub fn new(physics_rate_hz: f64, update_rate_hz: f64) -> Self {
        assert!(physics_rate_hz > 0.0 && update_rate_hz > 0.0, "Step rates must be positive");
        Self {
            physics_dt: 1.0 / physics_rate_hz,
            update_dt: 1.0 / update_rate_hz,
            physics_debt: 0.0,
            update_debt: 0.0,
            max_catch_up_steps: 8,
        }
    }

    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self::new(config.physics_rate_hz, config.update_rate_hz).with_max_catch_up_steps(config.max_catch_up_steps)
    }

    pub fn with_max_catch_up_steps(mut self, steps: u32) -> Self {
        self.max_catch_up_steps = steps.max(1);
        self
    }

    /// Seconds per physics step.
    pub fn physics_dt(&self) -> f64 {
        self.physics_dt
    }

    /// Seconds per update step.
    pub fn update_dt(&self) -> f64 {
        self.update_dt
    }

    /// Fraction of a physics step left in the debt, for render interpolation.
    pub fn alpha(&self) -> f64 {
        self.physics_debt / self.physics_dt
    }

    /// Adds `elapsed` seconds and returns the steps now due.
    pub fn advance(&mut self, elapsed: f64) -> FrameSteps {
        let elapsed = elapsed.max(0.0);
        let physics_steps = Self::drain(&mut self.physics_debt, elapsed, self.physics_dt, self.max_catch_up_steps, "physics");
        let update_steps = Self::drain(&mut self.update_debt, elapsed, self.update_dt, self.max_catch_up_steps, "update");
        FrameSteps { physics_steps, update_steps }
    }

    fn drain(debt: &mut f64, elapsed: f64, dt: f64, max_steps: u32, label: &str) -> u32 {
        *debt += elapsed;
        let mut steps = 0;
        while *debt >= dt {
            if steps == max_steps {
                let dropped = (*debt / dt).floor();
                warn!("Running {label} behind: dropping {dropped} step(s) after {max_steps} catch-up steps");
                *debt %= dt;
                break;
            }
            *debt -= dt;
            steps += 1;
        }
        steps
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }
}

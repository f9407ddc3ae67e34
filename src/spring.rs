//! Damped spring used to animate the displayed progress toward its target.
//!
//! This is a small semi-implicit Euler integrator (a simplified version of
//! harmonica). `frequency` is the stiffness, `damping` the energy loss;
//! `damping >= 2 * sqrt(frequency)` settles without overshoot.

use serde::{Deserialize, Serialize};

/// Default frames per second the spring is integrated at.
pub const DEFAULT_FPS: u32 = 60;
/// Default spring stiffness.
pub const DEFAULT_FREQUENCY: f64 = 18.0;
/// Default damping.
pub const DEFAULT_DAMPING: f64 = 1.0;

/// Advances a damped harmonic oscillator by one step of `dt` seconds.
///
/// Returns the new `(position, velocity)`. Parameters are not validated.
pub fn step(
    position: f64,
    velocity: f64,
    target: f64,
    dt: f64,
    frequency: f64,
    damping: f64,
) -> (f64, f64) {
    let force = (target - position) * frequency;
    let damping_force = -velocity * damping;

    let new_velocity = velocity + (force + damping_force) * dt;
    let new_position = position + new_velocity * dt;

    (new_position, new_velocity)
}

/// Spring parameters bound to a fixed frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    /// Frames per second; each [`Spring::update`] advances `1 / fps` seconds.
    pub fps: u32,
    /// Stiffness. Higher is faster.
    pub frequency: f64,
    /// Energy loss. Higher is less bouncy.
    pub damping: f64,
}

impl Spring {
    /// Creates a spring integrated at `fps` frames per second.
    pub fn new(fps: u32, frequency: f64, damping: f64) -> Self {
        Self {
            fps,
            frequency,
            damping,
        }
    }

    /// Length of one frame in seconds. A zero fps is treated as one frame per second.
    pub fn dt(&self) -> f64 {
        1.0 / self.fps.max(1) as f64
    }

    /// Runs one frame of the simulation toward `target`.
    pub fn update(&self, position: f64, velocity: f64, target: f64) -> (f64, f64) {
        step(
            position,
            velocity,
            target,
            self.dt(),
            self.frequency,
            self.damping,
        )
    }
}

impl Default for Spring {
    fn default() -> Self {
        Self::new(DEFAULT_FPS, DEFAULT_FREQUENCY, DEFAULT_DAMPING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spring_moves_toward_target() {
        let spring = Spring::new(60, 10.0, 1.0);
        let (pos, vel) = spring.update(0.0, 0.0, 1.0);
        assert!(pos > 0.0);
        assert!(pos < 1.0);
        assert!(vel > 0.0);
    }

    #[test]
    fn test_spring_moves_down_toward_lower_target() {
        let spring = Spring::default();
        let (pos, vel) = spring.update(0.8, 0.0, 0.2);
        assert!(pos < 0.8);
        assert!(vel < 0.0);
    }

    #[test]
    fn test_spring_converges() {
        let spring = Spring::new(60, 20.0, 2.0);
        let (mut pos, mut vel): (f64, f64) = (0.0, 0.0);
        for _ in 0..400 {
            (pos, vel) = spring.update(pos, vel, 0.75);
        }
        assert!((pos - 0.75).abs() < 0.02, "position {pos}");
        assert!(vel.abs() < 0.05, "velocity {vel}");
    }

    #[test]
    fn test_higher_frequency_is_faster() {
        let slow = Spring::new(60, 5.0, 1.0);
        let fast = Spring::new(60, 40.0, 1.0);
        let (mut a, mut va) = (0.0, 0.0);
        let (mut b, mut vb) = (0.0, 0.0);
        for _ in 0..10 {
            (a, va) = slow.update(a, va, 1.0);
            (b, vb) = fast.update(b, vb, 1.0);
        }
        assert!(b > a);
    }

    #[test]
    fn test_step_matches_update() {
        let spring = Spring::new(30, 12.0, 3.0);
        assert_eq!(
            spring.update(0.1, 0.2, 0.9),
            step(0.1, 0.2, 0.9, 1.0 / 30.0, 12.0, 3.0)
        );
    }

    #[test]
    fn test_at_rest_on_target_stays_put() {
        assert_eq!(step(0.5, 0.0, 0.5, 1.0 / 60.0, 18.0, 1.0), (0.5, 0.0));
    }
}

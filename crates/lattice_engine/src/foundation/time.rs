//! Pulse timing

use std::time::Instant;

/// Longest frame delta handed to simulation, in seconds.
///
/// A debugger break or asset stall would otherwise feed one huge step
/// into physics on resume.
const MAX_PULSE_DELTA: f32 = 0.25;

/// Clock driving the engine pulse.
///
/// Call [`PulseClock::tick`] once per pulse; it returns the clamped
/// delta since the previous tick.
pub struct PulseClock {
    last_tick: Instant,
    delta: f32,
    total: f64,
    pulses: u64,
}

impl Default for PulseClock {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseClock {
    /// Create a clock starting at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            delta: 0.0,
            total: 0.0,
            pulses: 0,
        }
    }

    /// Advance the clock and return the delta for this pulse in seconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let raw = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        self.delta = raw.min(MAX_PULSE_DELTA);
        self.total += f64::from(self.delta);
        self.pulses += 1;
        self.delta
    }

    /// Delta returned by the most recent [`PulseClock::tick`].
    #[must_use]
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Accumulated simulation time in seconds.
    ///
    /// Tracks clamped deltas, so it can run behind wall time after stalls.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Number of completed pulses.
    #[must_use]
    pub fn pulses(&self) -> u64 {
        self.pulses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_advances_pulse_count_and_total() {
        let mut clock = PulseClock::new();
        let dt = clock.tick();
        assert!(dt >= 0.0);
        assert_eq!(clock.pulses(), 1);
        assert!(clock.total() >= f64::from(dt) - f64::EPSILON);
    }

    #[test]
    fn delta_is_clamped() {
        let mut clock = PulseClock::new();
        clock.tick();
        assert!(clock.delta() <= MAX_PULSE_DELTA);
    }
}

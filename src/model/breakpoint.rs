#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One control point of a partial: the sinusoid's parameters at some instant.
///
/// The time is not stored here; a [`Partial`](super::Partial) maps times to
/// breakpoints.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Breakpoint {
    /// Hz
    pub frequency: f64,
    /// Linear amplitude; 0 marks a null breakpoint
    pub amplitude: f64,
    /// Noisiness, 0 = pure sinusoid, 1 = pure noise
    pub bandwidth: f64,
    /// Radians
    pub phase: f64,
}

impl Breakpoint {
    pub fn new(frequency: f64, amplitude: f64, bandwidth: f64, phase: f64) -> Self {
        Self {
            frequency,
            amplitude,
            bandwidth: bandwidth.clamp(0.0, 1.0),
            phase,
        }
    }

    /// A null (silent) breakpoint keeping this one's frequency, bandwidth and phase.
    pub fn silenced(self) -> Self {
        Self {
            amplitude: 0.0,
            ..self
        }
    }

    /// Null breakpoints mark silence or a phase reset.
    pub fn is_null(&self) -> bool {
        self.amplitude == 0.0
    }

    pub fn set_frequency(&mut self, frequency: f64) {
        self.frequency = frequency;
    }

    pub fn set_amplitude(&mut self, amplitude: f64) {
        self.amplitude = amplitude;
    }

    pub fn set_bandwidth(&mut self, bandwidth: f64) {
        self.bandwidth = bandwidth.clamp(0.0, 1.0);
    }

    pub fn set_phase(&mut self, phase: f64) {
        self.phase = phase;
    }
}

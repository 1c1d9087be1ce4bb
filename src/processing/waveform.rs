use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

/// Number of harmonics in the oscillator (fundamental plus two overtones).
pub const HARMONIC_COUNT: usize = 3;

/// How a phase offset enters the k-th harmonic term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PhaseConvention {
    /// `A_k sin(2πk·x + p_k)`; the offset is added to the angle.
    #[default]
    Additive,
    /// `A_k sin(2πk·(x + p_k))`; the offset shifts time and scales with k.
    TimeShift,
}

impl PhaseConvention {
    pub fn label(&self) -> &'static str {
        match self {
            PhaseConvention::Additive => "sin(2πk·x + p)",
            PhaseConvention::TimeShift => "sin(2πk·(x + p))",
        }
    }

    /// Value of one harmonic term. `harmonic` is 1-based.
    pub fn term(&self, amplitude: f64, phase: f64, harmonic: usize, x: f64) -> f64 {
        let k = harmonic as f64;
        let angle = match self {
            PhaseConvention::Additive => k * TAU * x + phase,
            PhaseConvention::TimeShift => k * TAU * (x + phase),
        };
        amplitude * angle.sin()
    }
}

/// Amplitudes and phases of the three-harmonic oscillator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Harmonics {
    pub amplitudes: [f64; HARMONIC_COUNT],
    pub phases: [f64; HARMONIC_COUNT],
}

impl Harmonics {
    /// The fundamental is fixed at amplitude 1 and phase 0.
    pub fn new(a2: f64, a3: f64, p2: f64, p3: f64) -> Self {
        Self {
            amplitudes: [1.0, a2, a3],
            phases: [0.0, p2, p3],
        }
    }

    pub fn value_at(&self, x: f64, convention: PhaseConvention) -> f64 {
        value_at(&self.amplitudes, &self.phases, x, convention)
    }

    pub fn evaluate(&self, sample_count: usize, convention: PhaseConvention) -> Vec<[f64; 2]> {
        evaluate(&self.amplitudes, &self.phases, sample_count, convention)
    }

    /// One curve per harmonic, in harmonic order.
    pub fn components(&self, sample_count: usize, convention: PhaseConvention) -> Vec<Vec<[f64; 2]>> {
        (0..HARMONIC_COUNT)
            .map(|i| {
                evaluate_component(self.amplitudes[i], self.phases[i], i + 1, sample_count, convention)
            })
            .collect()
    }
}

/// `Σ_k A_k sin(...)` at a single point. Extra entries in the longer slice are
/// ignored.
pub fn value_at(amplitudes: &[f64], phases: &[f64], x: f64, convention: PhaseConvention) -> f64 {
    amplitudes
        .iter()
        .zip(phases)
        .enumerate()
        .map(|(i, (&a, &p))| convention.term(a, p, i + 1, x))
        .sum()
}

/// `sample_count` evenly spaced positions in `[0, 1)`.
pub fn sample_positions(sample_count: usize) -> impl Iterator<Item = f64> {
    (0..sample_count).map(move |i| i as f64 / sample_count as f64)
}

/// Sample the composite waveform over one period.
pub fn evaluate(
    amplitudes: &[f64],
    phases: &[f64],
    sample_count: usize,
    convention: PhaseConvention,
) -> Vec<[f64; 2]> {
    sample_positions(sample_count)
        .map(|x| [x, value_at(amplitudes, phases, x, convention)])
        .collect()
}

/// Sample a single harmonic term over one period.
pub fn evaluate_component(
    amplitude: f64,
    phase: f64,
    harmonic: usize,
    sample_count: usize,
    convention: PhaseConvention,
) -> Vec<[f64; 2]> {
    sample_positions(sample_count)
        .map(|x| [x, convention.term(amplitude, phase, harmonic, x)])
        .collect()
}

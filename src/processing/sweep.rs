//! Generation of phase-space tables.
//!
//! For every combination of (A2, A3, p2, p3) on a regular grid, the global
//! maximum of the three-harmonic waveform over one period is located
//! numerically. The result has the same shape as the tables the viewer loads.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::data::record::{Field, Record};
use crate::error::SweepError;
use crate::processing::waveform::{Harmonics, PhaseConvention};

/// Decimal places kept for generated values (matches the CSV output).
pub const DECIMALS: i32 = 7;

const GOLDEN_ITERATIONS: usize = 60;

/// Half-open arithmetic range `[start, stop)` with a positive step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeSpec {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl RangeSpec {
    pub fn new(start: f64, stop: f64, step: f64) -> Self {
        Self { start, stop, step }
    }

    pub fn validate(&self, name: &'static str) -> Result<(), SweepError> {
        let invalid = |reason: &str| SweepError::InvalidRange {
            name,
            reason: reason.to_string(),
        };
        if !(self.start.is_finite() && self.stop.is_finite() && self.step.is_finite()) {
            return Err(invalid("bounds and step must be finite"));
        }
        if self.step <= 0.0 {
            return Err(invalid("step must be positive"));
        }
        if self.stop <= self.start {
            return Err(invalid("stop must be greater than start"));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        if self.validate("range").is_err() {
            return 0;
        }
        // Guard against `(stop - start) / step` landing a hair above an integer.
        ((self.stop - self.start) / self.step - 1e-9).ceil().max(0.0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn values(&self) -> Vec<f64> {
        (0..self.len())
            .map(|i| round_to(self.start + i as f64 * self.step, DECIMALS))
            .collect()
    }
}

/// Parameters of a full sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepSpec {
    /// Shared by A2 and A3.
    pub amplitude: RangeSpec,
    /// Shared by p2 and p3.
    pub phase: RangeSpec,
    /// Number of evenly spaced starting points for the local search.
    pub seeds: usize,
    pub convention: PhaseConvention,
}

impl Default for SweepSpec {
    fn default() -> Self {
        Self {
            amplitude: RangeSpec::new(0.5, 2.0, 0.25),
            phase: RangeSpec::new(0.0, 1.0, 0.2),
            seeds: 20,
            convention: PhaseConvention::Additive,
        }
    }
}

impl SweepSpec {
    pub fn validate(&self) -> Result<(), SweepError> {
        self.amplitude.validate("amplitude")?;
        self.phase.validate("phase")?;
        if self.seeds == 0 {
            return Err(SweepError::InvalidRange {
                name: "seeds",
                reason: "at least one starting point is required".to_string(),
            });
        }
        Ok(())
    }

    /// Number of records the sweep will produce.
    pub fn total(&self) -> usize {
        let a = self.amplitude.len();
        let p = self.phase.len();
        a * a * p * p
    }

    /// Short description used as the data source label, e.g.
    /// `0.5_2_0.25_0_1_0.2` like the published file names.
    pub fn describe(&self) -> String {
        format!(
            "{}_{}_{}_{}_{}_{}",
            self.amplitude.start,
            self.amplitude.stop,
            self.amplitude.step,
            self.phase.start,
            self.phase.stop,
            self.phase.step
        )
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Global maximum of the waveform over one period.
///
/// Each of `seeds` evenly spaced points brackets a window of width
/// `2 / seeds`; a golden-section search refines the maximum in every window.
pub fn maximize(harmonics: &Harmonics, seeds: usize, convention: PhaseConvention) -> f64 {
    let seeds = seeds.max(1);
    let f = |x: f64| harmonics.value_at(x, convention);
    let half_width = 1.0 / seeds as f64;

    (0..seeds)
        .map(|i| {
            let center = i as f64 / seeds as f64;
            let refined = golden_section_max(&f, center - half_width, center + half_width);
            refined.max(f(center))
        })
        .fold(f64::NEG_INFINITY, f64::max)
}

fn golden_section_max<F: Fn(f64) -> f64>(f: &F, mut a: f64, mut b: f64) -> f64 {
    let inv_phi = (5f64.sqrt() - 1.0) / 2.0;
    let mut c = b - inv_phi * (b - a);
    let mut d = a + inv_phi * (b - a);
    let mut fc = f(c);
    let mut fd = f(d);
    for _ in 0..GOLDEN_ITERATIONS {
        if fc > fd {
            b = d;
            d = c;
            fd = fc;
            c = b - inv_phi * (b - a);
            fc = f(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + inv_phi * (b - a);
            fd = f(d);
        }
    }
    fc.max(fd)
}

/// Evaluate the full Cartesian product A2 × A3 × p2 × p3 (p3 varies
/// fastest). `progress` is called after every record with `(done, total)`.
pub fn compute_space<P>(spec: &SweepSpec, mut progress: P) -> Result<Vec<Record>, SweepError>
where
    P: FnMut(usize, usize),
{
    spec.validate()?;
    let amplitudes = spec.amplitude.values();
    let phases = spec.phase.values();
    let total = spec.total();

    let mut records = Vec::with_capacity(total);
    for &a2 in &amplitudes {
        for &a3 in &amplitudes {
            for &p2 in &phases {
                for &p3 in &phases {
                    let h = Harmonics::new(a2, a3, p2, p3);
                    let max = round_to(maximize(&h, spec.seeds, spec.convention), DECIMALS);
                    records.push(Record::new(a2, a3, p2, p3, max));
                    progress(records.len(), total);
                }
            }
        }
    }
    Ok(records)
}

/// Write records as a sweep table with a plain `A2,A3,p2,p3,max` header.
pub fn write_csv<W: Write>(records: &[Record], writer: W) -> Result<(), SweepError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(Field::ALL.iter().map(|f| f.column_name()))?;
    for r in records {
        let row: Vec<String> = Field::ALL
            .iter()
            .map(|f| format!("{:.*}", DECIMALS as usize, r.get(*f)))
            .collect();
        out.write_record(&row)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_records;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn range_values_follow_arange() {
        assert_eq!(RangeSpec::new(0.5, 2.0, 0.25).values(), vec![0.5, 0.75, 1.0, 1.25, 1.5, 1.75]);
        assert_eq!(RangeSpec::new(0.0, 1.0, 0.2).values(), vec![0.0, 0.2, 0.4, 0.6, 0.8]);
        assert_eq!(RangeSpec::new(0.5, 2.0, 0.1).len(), 15);
        assert_eq!(RangeSpec::new(0.0, 1.0, 0.05).len(), 20);
    }

    #[test]
    fn invalid_ranges_are_rejected() {
        assert!(RangeSpec::new(0.0, 1.0, 0.0).validate("phase").is_err());
        assert!(RangeSpec::new(1.0, 1.0, 0.1).validate("phase").is_err());
        assert!(RangeSpec::new(0.0, f64::NAN, 0.1).validate("phase").is_err());
        assert!(RangeSpec::new(0.0, 1.0, -0.1).is_empty());

        let spec = SweepSpec {
            seeds: 0,
            ..SweepSpec::default()
        };
        assert!(matches!(
            compute_space(&spec, |_, _| {}),
            Err(SweepError::InvalidRange { name: "seeds", .. })
        ));
    }

    #[test]
    fn fundamental_peaks_at_one() {
        let h = Harmonics::new(0.0, 0.0, 0.0, 0.0);
        let m = maximize(&h, 20, PhaseConvention::Additive);
        assert!((m - 1.0).abs() < 1e-9, "got {m}");
    }

    #[test]
    fn known_two_harmonic_maximum() {
        // sin θ + cos 2θ = 1 + s - 2s² with s = sin θ, maximal at s = 1/4.
        let h = Harmonics::new(1.0, 0.0, FRAC_PI_2, 0.0);
        let m = maximize(&h, 20, PhaseConvention::Additive);
        assert!((m - 1.125).abs() < 1e-9, "got {m}");
    }

    #[test]
    fn maximum_dominates_dense_sampling() {
        let h = Harmonics::new(1.3, 0.7, 0.4, 0.9);
        for convention in [PhaseConvention::Additive, PhaseConvention::TimeShift] {
            let m = maximize(&h, 20, convention);
            let sampled = (0..10_000)
                .map(|i| h.value_at(i as f64 / 10_000.0, convention))
                .fold(f64::NEG_INFINITY, f64::max);
            assert!(m >= sampled - 1e-9);
            assert!(m - sampled < 1e-4);
        }
    }

    #[test]
    fn space_order_and_progress() {
        let spec = SweepSpec {
            amplitude: RangeSpec::new(0.5, 1.0, 0.25),
            phase: RangeSpec::new(0.0, 1.0, 0.5),
            seeds: 10,
            convention: PhaseConvention::Additive,
        };
        assert_eq!(spec.total(), 16);

        let mut calls = Vec::new();
        let records = compute_space(&spec, |done, total| calls.push((done, total))).unwrap();
        assert_eq!(records.len(), 16);
        assert_eq!(calls.len(), 16);
        assert_eq!(calls.last(), Some(&(16, 16)));

        assert_eq!((records[0].a2, records[0].a3, records[0].p2, records[0].p3), (0.5, 0.5, 0.0, 0.0));
        assert_eq!((records[1].a2, records[1].a3, records[1].p2, records[1].p3), (0.5, 0.5, 0.0, 0.5));
        assert_eq!((records[2].a2, records[2].a3, records[2].p2, records[2].p3), (0.5, 0.5, 0.5, 0.0));
        assert_eq!((records[4].a2, records[4].a3), (0.5, 0.75));
        assert_eq!((records[8].a2, records[8].a3), (0.75, 0.5));
        assert!(records.iter().all(|r| r.max > 0.0));
    }

    #[test]
    fn exported_table_loads_back() {
        let spec = SweepSpec {
            amplitude: RangeSpec::new(0.5, 1.0, 0.25),
            phase: RangeSpec::new(0.0, 1.0, 0.5),
            seeds: 10,
            convention: PhaseConvention::Additive,
        };
        let records = compute_space(&spec, |_, _| {}).unwrap();
        let mut buf = Vec::new();
        write_csv(&records, &mut buf).unwrap();

        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("A2,A3,p2,p3,max\n0.5000000,0.5000000,0.0000000,0.0000000,"));

        let loaded = read_records(buf.as_slice()).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn describe_matches_file_naming() {
        assert_eq!(SweepSpec::default().describe(), "0.5_2_0.25_0_1_0.2");
    }
}

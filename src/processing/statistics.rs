use crate::data::record::Record;

/// Summary of the `max` response over one (A2, A3) slice.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Record with the smallest response (first one on ties).
    pub argmin: Record,
    /// Record with the largest response (first one on ties).
    pub argmax: Record,
}

impl SliceStats {
    /// Compute statistics from a slice, ignoring non-finite responses.
    pub fn compute(slice: &[Record]) -> Option<Self> {
        let finite: Vec<&Record> = slice.iter().filter(|r| r.max.is_finite()).collect();
        let first = *finite.first()?;

        let mut argmin = first;
        let mut argmax = first;
        for &r in &finite {
            if r.max < argmin.max {
                argmin = r;
            }
            if r.max > argmax.max {
                argmax = r;
            }
        }

        let count = finite.len();
        let mean = finite.iter().map(|r| r.max).sum::<f64>() / count as f64;

        let mut vals: Vec<f64> = finite.iter().map(|r| r.max).collect();
        vals.sort_by(|a, b| a.total_cmp(b));
        let median = if count % 2 == 0 {
            (vals[count / 2 - 1] + vals[count / 2]) / 2.0
        } else {
            vals[count / 2]
        };

        Some(SliceStats {
            count,
            min: argmin.max,
            max: argmax.max,
            mean,
            median,
            argmin: *argmin,
            argmax: *argmax,
        })
    }

    /// Format as a multi-line report string.
    pub fn report(&self) -> String {
        format!(
            "Samples: {}\nMin: {:.4} at p2={:.3}, p3={:.3}\nMax: {:.4} at p2={:.3}, p3={:.3}\nMean: {:.4}\nMedian: {:.4}",
            self.count,
            self.min,
            self.argmin.p2,
            self.argmin.p3,
            self.max,
            self.argmax.p2,
            self.argmax.p3,
            self.mean,
            self.median,
        )
    }
}

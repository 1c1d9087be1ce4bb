use std::collections::HashSet;

use crate::data::record::{value_bits, Field, Record};

/// Distinct values of `field`, each once, in order of first occurrence.
pub fn distinct_values(records: &[Record], field: Field) -> Vec<f64> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(|r| r.get(field))
        .filter(|v| seen.insert(value_bits(*v)))
        .collect()
}

/// The distinct values one field takes, sorted ascending.
///
/// Used for axis bands and slider ticks; occurrence order from the source
/// table is not kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
    pub field: Field,
    values: Vec<f64>,
}

impl Domain {
    pub fn from_records(records: &[Record], field: Field) -> Self {
        let mut values = distinct_values(records, field);
        values.sort_by(|a, b| a.total_cmp(b));
        Self { field, values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn min(&self) -> Option<f64> {
        self.values.first().copied()
    }

    pub fn max(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Exact-value position of `value` among the sorted ticks.
    pub fn position(&self, value: f64) -> Option<usize> {
        let bits = value_bits(value);
        self.values.iter().position(|v| value_bits(*v) == bits)
    }

    pub fn contains(&self, value: f64) -> bool {
        self.position(value).is_some()
    }

    /// The tick closest to `value` (ties resolve to the lower tick).
    pub fn nearest(&self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        let pos = self.values.partition_point(|&v| v < value);
        let below = pos.checked_sub(1).and_then(|i| self.values.get(i));
        let above = self.values.get(pos);
        match (below, above) {
            (Some(&b), Some(&a)) => Some(if value - b <= a - value { b } else { a }),
            (Some(&b), None) => Some(b),
            (None, Some(&a)) => Some(a),
            (None, None) => None,
        }
    }

    /// Move `delta` ticks away from `value` (snapped first), clamped to the ends.
    pub fn step(&self, value: f64, delta: isize) -> Option<f64> {
        let current = self.nearest(value)?;
        let pos = self.position(current)? as isize;
        let last = self.values.len() as isize - 1;
        let target = (pos + delta).clamp(0, last) as usize;
        self.values.get(target).copied()
    }
}

/// Sorted domains of all five fields, built once per dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Domains {
    pub a2: Domain,
    pub a3: Domain,
    pub p2: Domain,
    pub p3: Domain,
    pub max: Domain,
}

impl Domains {
    pub fn from_records(records: &[Record]) -> Self {
        Self {
            a2: Domain::from_records(records, Field::A2),
            a3: Domain::from_records(records, Field::A3),
            p2: Domain::from_records(records, Field::P2),
            p3: Domain::from_records(records, Field::P3),
            max: Domain::from_records(records, Field::Max),
        }
    }

    pub fn get(&self, field: Field) -> &Domain {
        match field {
            Field::A2 => &self.a2,
            Field::A3 => &self.a3,
            Field::P2 => &self.p2,
            Field::P3 => &self.p3,
            Field::Max => &self.max,
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::data::domain::Domains;
use crate::data::record::{Field, GroupKey, Record};
use crate::data::sample_index::SampleIndex;
use crate::error::QueryError;
use crate::processing::waveform::Harmonics;

/// The (A2, A3) pair the heat map currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub a2: f64,
    pub a3: f64,
}

impl Selection {
    pub fn new(a2: f64, a3: f64) -> Self {
        Self { a2, a3 }
    }

    /// Smallest A2 and A3 of the dataset, or `None` for an empty one.
    pub fn initial(domains: &Domains) -> Option<Self> {
        Some(Self::new(domains.a2.min()?, domains.a3.min()?))
    }

    /// Record a new value for A2 or A3. The value is not checked against the
    /// dataset; an unknown value simply yields a missing slice.
    pub fn select(&mut self, field: Field, value: f64) -> Result<(), QueryError> {
        match field {
            Field::A2 => self.a2 = value,
            Field::A3 => self.a3 = value,
            other => return Err(QueryError::UnselectableField(other)),
        }
        Ok(())
    }

    pub fn get(&self, field: Field) -> Option<f64> {
        match field {
            Field::A2 => Some(self.a2),
            Field::A3 => Some(self.a3),
            _ => None,
        }
    }

    pub fn current(&self) -> GroupKey {
        GroupKey::new(self.a2, self.a3)
    }
}

/// The records matching `selection`.
pub fn query_slice<'a>(index: &'a SampleIndex, selection: &Selection) -> Result<&'a [Record], QueryError> {
    index
        .lookup(selection.current())
        .ok_or(QueryError::MissingSlice {
            a2: selection.a2,
            a3: selection.a3,
        })
}

/// The sample currently under the pointer (or pinned by a click).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoverPoint {
    pub a2: f64,
    pub a3: f64,
    pub p2: f64,
    pub p3: f64,
    pub max: f64,
}

impl HoverPoint {
    pub fn harmonics(&self) -> Harmonics {
        Harmonics::new(self.a2, self.a3, self.p2, self.p3)
    }

    pub fn describe(&self) -> String {
        format!(
            "A2={:.3}, A3={:.3}, p2={:.3}, p3={:.3}, max={:.4}",
            self.a2, self.a3, self.p2, self.p3, self.max
        )
    }
}

impl From<&Record> for HoverPoint {
    fn from(r: &Record) -> Self {
        Self {
            a2: r.a2,
            a3: r.a3,
            p2: r.p2,
            p3: r.p3,
            max: r.max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Vec<Record> {
        vec![
            Record::new(0.5, 0.5, 0.0, 0.0, 1.2),
            Record::new(0.5, 0.5, 0.0, 0.1, 0.8),
            Record::new(0.6, 0.5, 0.0, 0.0, 2.0),
        ]
    }

    #[test]
    fn initial_selection_is_domain_minimum() {
        let records = vec![
            Record::new(1.5, 0.75, 0.0, 0.0, 1.0),
            Record::new(0.5, 1.25, 0.0, 0.0, 1.0),
        ];
        let domains = Domains::from_records(&records);
        assert_eq!(Selection::initial(&domains), Some(Selection::new(0.5, 0.75)));
        assert_eq!(Selection::initial(&Domains::from_records(&[])), None);
    }

    #[test]
    fn query_returns_slice_in_input_order() {
        let records = scenario();
        let index = SampleIndex::build(records.clone());
        let slice = query_slice(&index, &Selection::new(0.5, 0.5)).unwrap();
        assert_eq!(slice, &records[..2]);
    }

    #[test]
    fn unknown_selection_is_missing_slice() {
        let index = SampleIndex::build(scenario());
        assert_eq!(
            query_slice(&index, &Selection::new(0.9, 0.9)),
            Err(QueryError::MissingSlice { a2: 0.9, a3: 0.9 })
        );
    }

    #[test]
    fn select_updates_amplitudes_only() {
        let mut selection = Selection::new(0.5, 0.5);
        selection.select(Field::A2, 0.6).unwrap();
        assert_eq!(selection.current(), GroupKey::new(0.6, 0.5));
        selection.select(Field::A3, 0.7).unwrap();
        assert_eq!(selection.get(Field::A3), Some(0.7));

        assert_eq!(
            selection.select(Field::P2, 0.1),
            Err(QueryError::UnselectableField(Field::P2))
        );
        assert_eq!(selection, Selection::new(0.6, 0.7));
    }

    #[test]
    fn unvalidated_select_leads_to_missing_slice() {
        let index = SampleIndex::build(scenario());
        let mut selection = Selection::new(0.5, 0.5);
        selection.select(Field::A2, 0.55).unwrap();
        assert!(matches!(
            query_slice(&index, &selection),
            Err(QueryError::MissingSlice { .. })
        ));
    }

    #[test]
    fn hover_point_uses_fixed_fundamental() {
        let hp = HoverPoint::from(&Record::new(0.5, 1.9, 0.2, 0.4, 2.1));
        let h = hp.harmonics();
        assert_eq!(h.amplitudes, [1.0, 0.5, 1.9]);
        assert_eq!(h.phases, [0.0, 0.2, 0.4]);
    }
}

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::data::record::{GroupKey, Record};

/// Records grouped by their (A2, A3) pair.
///
/// Built once from the loaded table and read-only afterwards. Every input
/// record lives in exactly one group, and records keep their input order
/// within a group.
#[derive(Debug, Clone, Default)]
pub struct SampleIndex {
    groups: HashMap<GroupKey, Vec<Record>>,
    /// Keys in order of first appearance.
    keys: Vec<GroupKey>,
    record_count: usize,
}

impl SampleIndex {
    pub fn build<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        let mut index = Self::default();
        for record in records {
            let key = record.key();
            let group = match index.groups.entry(key) {
                Entry::Occupied(e) => e.into_mut(),
                Entry::Vacant(e) => {
                    index.keys.push(key);
                    e.insert(Vec::new())
                }
            };
            group.push(record);
            index.record_count += 1;
        }
        index
    }

    /// The records sharing `key`, or `None` when the pair never occurs.
    pub fn lookup(&self, key: GroupKey) -> Option<&[Record]> {
        self.groups.get(&key).map(Vec::as_slice)
    }

    /// Groups in first-appearance order.
    pub fn groups(&self) -> impl Iterator<Item = (GroupKey, &[Record])> + '_ {
        self.keys
            .iter()
            .filter_map(|k| self.groups.get(k).map(|g| (*k, g.as_slice())))
    }

    /// Number of distinct (A2, A3) pairs.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.record_count
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
    fn groups_example_scenario() {
        let records = scenario();
        let index = SampleIndex::build(records.clone());

        assert_eq!(index.len(), 2);
        assert_eq!(index.record_count(), 3);

        let first = index.lookup(GroupKey::new(0.5, 0.5)).unwrap();
        assert_eq!(first, &records[0..2]);

        let second = index.lookup(GroupKey::new(0.6, 0.5)).unwrap();
        assert_eq!(second, &records[2..3]);

        assert!(index.lookup(GroupKey::new(0.9, 0.9)).is_none());
    }

    #[test]
    fn every_record_lands_in_its_own_group_once() {
        let mut records = Vec::new();
        for i in 0..40 {
            let a2 = 0.5 + (i % 3) as f64 * 0.25;
            let a3 = 0.5 + (i % 4) as f64 * 0.25;
            records.push(Record::new(a2, a3, (i % 5) as f64 * 0.2, (i % 7) as f64 * 0.1, i as f64));
        }
        let index = SampleIndex::build(records.clone());

        let mut total = 0;
        for (key, group) in index.groups() {
            assert!(!group.is_empty());
            for r in group {
                assert_eq!(r.key(), key);
            }
            total += group.len();
        }
        assert_eq!(total, records.len());

        // Same multiset: `max` is unique per input record here.
        let mut seen: Vec<f64> = index.groups().flat_map(|(_, g)| g.iter().map(|r| r.max)).collect();
        seen.sort_by(|a, b| a.total_cmp(b));
        let expected: Vec<f64> = (0..40).map(|i| i as f64).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn in_group_order_follows_input() {
        let records = vec![
            Record::new(1.0, 1.0, 0.0, 0.0, 3.0),
            Record::new(2.0, 2.0, 0.0, 0.0, 9.0),
            Record::new(1.0, 1.0, 0.0, 0.0, 1.0),
            Record::new(1.0, 1.0, 0.0, 0.0, 2.0),
        ];
        let index = SampleIndex::build(records);
        let maxes: Vec<f64> = index
            .lookup(GroupKey::new(1.0, 1.0))
            .unwrap()
            .iter()
            .map(|r| r.max)
            .collect();
        assert_eq!(maxes, vec![3.0, 1.0, 2.0]);
        let keys: Vec<GroupKey> = index.groups().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![GroupKey::new(1.0, 1.0), GroupKey::new(2.0, 2.0)]);
    }

    #[test]
    fn empty_input_builds_empty_index() {
        let index = SampleIndex::build(Vec::new());
        assert!(index.is_empty());
        assert_eq!(index.record_count(), 0);
        assert_eq!(index.groups().count(), 0);
    }
}

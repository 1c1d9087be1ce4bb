use crate::data::domain::Domains;
use crate::data::loader::DataSource;
use crate::data::record::Record;
use crate::data::sample_index::SampleIndex;

/// A loaded sweep table with its derived lookup structures.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub source: DataSource,
    pub index: SampleIndex,
    pub domains: Domains,
}

impl Dataset {
    pub fn new(source: DataSource, records: Vec<Record>) -> Self {
        let domains = Domains::from_records(&records);
        let index = SampleIndex::build(records);
        tracing::info!(
            "Indexed {} records into {} (A2, A3) groups from {}",
            index.record_count(),
            index.len(),
            source
        );
        Self {
            source,
            index,
            domains,
        }
    }

    /// All records, grouped by (A2, A3) in first-appearance order.
    pub fn records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.index.groups().flat_map(|(_, group)| group.iter())
    }

    pub fn record_count(&self) -> usize {
        self.index.record_count()
    }

    /// One-line description for the status bar.
    pub fn summary(&self) -> String {
        format!(
            "{} samples, {} x {} amplitude pairs, {} x {} phase grid",
            self.record_count(),
            self.domains.a2.len(),
            self.domains.a3.len(),
            self.domains.p2.len(),
            self.domains.p3.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_index_and_domains_together() {
        let records = vec![
            Record::new(0.5, 0.5, 0.0, 0.0, 1.2),
            Record::new(0.5, 0.5, 0.0, 0.1, 0.8),
            Record::new(0.6, 0.5, 0.0, 0.0, 2.0),
        ];
        let dataset = Dataset::new(DataSource::Url("mem://test".into()), records.clone());
        assert_eq!(dataset.record_count(), 3);
        assert_eq!(dataset.index.len(), 2);
        assert_eq!(dataset.domains.p3.values(), &[0.0, 0.1]);
        let all: Vec<Record> = dataset.records().copied().collect();
        assert_eq!(all, records);
        assert!(dataset.summary().starts_with("3 samples"));
    }
}

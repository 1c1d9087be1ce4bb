use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::record::{Field, Record};
use crate::error::DataLoadError;

/// Where a sweep table comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
    /// Produced in-process by the sweep generator.
    Generated { description: String },
}

impl DataSource {
    /// Interpret user input: anything starting with `http://` or `https://` is
    /// a URL, everything else a local path.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        let lower = trimmed.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
            DataSource::Generated { description } => write!(f, "generated ({description})"),
        }
    }
}

/// Load and validate every record of a data source.
pub fn load(source: &DataSource) -> Result<Vec<Record>, DataLoadError> {
    match source {
        DataSource::File(path) => load_file(path),
        DataSource::Url(url) => load_url(url),
        DataSource::Generated { .. } => Err(DataLoadError::Empty),
    }
}

fn load_file(path: &Path) -> Result<Vec<Record>, DataLoadError> {
    let file = std::fs::File::open(path)?;
    read_records(std::io::BufReader::new(file))
}

fn load_url(url: &str) -> Result<Vec<Record>, DataLoadError> {
    let response = ureq::get(url).call().map_err(|e| DataLoadError::Http {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    read_records(response.into_reader())
}

/// Parse a comma-delimited sweep table.
///
/// The header must name all of `A2, A3, p2, p3, max` (any order; a leading `#`
/// as written by numpy is ignored). Every data row must carry five finite
/// numbers, otherwise loading stops at that row.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<Record>, DataLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = reader.records();

    let header = loop {
        match rows.next() {
            Some(row) => {
                let row = row?;
                if !is_blank(&row) {
                    break row;
                }
            }
            None => return Err(DataLoadError::Empty),
        }
    };

    let columns = column_positions(&header)?;

    let mut records = Vec::new();
    for (i, row) in rows.enumerate() {
        let row = row?;
        if is_blank(&row) {
            continue;
        }
        let line = row
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(i + 2);

        let mut values = [0.0f64; 5];
        for (slot, (field, col)) in values.iter_mut().zip(Field::ALL.iter().zip(columns)) {
            let raw = row.get(col).unwrap_or("");
            *slot = parse_number(raw).ok_or_else(|| DataLoadError::InvalidNumber {
                row: line,
                column: *field,
                value: raw.to_string(),
            })?;
        }
        let [a2, a3, p2, p3, max] = values;
        records.push(Record::new(a2, a3, p2, p3, max));
    }

    if records.is_empty() {
        return Err(DataLoadError::Empty);
    }
    Ok(records)
}

/// Column index for each of `Field::ALL`, in that order. The first column
/// carrying a name wins when a name repeats.
fn column_positions(header: &csv::StringRecord) -> Result<[usize; 5], DataLoadError> {
    let mut found: [Option<usize>; 5] = [None; 5];
    for (col, name) in header.iter().enumerate() {
        let name = name.trim_start_matches('#').trim();
        if let Some(field) = Field::from_column_name(name) {
            found[field as usize].get_or_insert(col);
        }
    }

    let mut positions = [0usize; 5];
    for ((slot, col), field) in positions.iter_mut().zip(found).zip(Field::ALL) {
        *slot = col.ok_or(DataLoadError::MissingColumn(field))?;
    }
    Ok(positions)
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn is_blank(row: &csv::StringRecord) -> bool {
    row.iter().all(|cell| cell.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numpy_header() {
        let text = "# A2,A3,p2,p3,max\n\
                    0.5000000,0.5000000,0.0000000,0.0000000,1.2000000\n\
                    0.5000000,0.5000000,0.0000000,0.1000000,0.8000000\n";
        let records = read_records(text.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], Record::new(0.5, 0.5, 0.0, 0.0, 1.2));
        assert_eq!(records[1].p3, 0.1);
    }

    #[test]
    fn columns_may_be_reordered() {
        let text = "max, p3, p2, A3, A2\n2.0, 0.4, 0.3, 0.2, 0.1\n";
        let records = read_records(text.as_bytes()).unwrap();
        assert_eq!(records, vec![Record::new(0.1, 0.2, 0.3, 0.4, 2.0)]);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let text = "\nA2,A3,p2,p3,max\n\n1,1,0,0,2\n\n";
        let records = read_records(text.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn missing_column_is_reported() {
        let text = "A2,A3,p2,max\n1,1,0,2\n";
        match read_records(text.as_bytes()) {
            Err(DataLoadError::MissingColumn(Field::P3)) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn non_numeric_row_fails_fast() {
        let text = "A2,A3,p2,p3,max\n1,1,0,0,2\n1,abc,0,0,2\n";
        match read_records(text.as_bytes()) {
            Err(DataLoadError::InvalidNumber { row, column, value }) => {
                assert_eq!(row, 3);
                assert_eq!(column, Field::A3);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let text = "A2,A3,p2,p3,max\n1,1,0,0,NaN\n";
        assert!(matches!(
            read_records(text.as_bytes()),
            Err(DataLoadError::InvalidNumber { column: Field::Max, .. })
        ));
    }

    #[test]
    fn short_row_is_rejected() {
        let text = "A2,A3,p2,p3,max\n1,1,0\n";
        assert!(matches!(
            read_records(text.as_bytes()),
            Err(DataLoadError::InvalidNumber { column: Field::P3, .. })
        ));
    }

    #[test]
    fn header_only_is_empty() {
        let text = "A2,A3,p2,p3,max\n";
        assert!(matches!(read_records(text.as_bytes()), Err(DataLoadError::Empty)));
        assert!(matches!(read_records("".as_bytes()), Err(DataLoadError::Empty)));
    }

    #[test]
    fn source_parsing() {
        assert_eq!(
            DataSource::parse(" https://example.org/a.csv "),
            DataSource::Url("https://example.org/a.csv".to_string())
        );
        assert_eq!(
            DataSource::parse("data/a.csv"),
            DataSource::File(PathBuf::from("data/a.csv"))
        );
    }
}

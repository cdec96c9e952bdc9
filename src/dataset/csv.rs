//! Delimited-file loader that selects named feature columns and a label column.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use ::csv::ReaderBuilder;

use crate::error::{LogRegError, Result};

/// Feature and label columns pulled out of a CSV table.
///
/// `features[i][j]` is the value of `feature_names[j]` in data row `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularData {
    pub feature_names: Vec<String>,
    pub features: Vec<Vec<f64>>,
    pub labels: Vec<f64>,
}

impl TabularData {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Loads `feature_names` (in that order) and `label_name` from a headered CSV file.
///
/// # Example
///
/// ```no_run
/// use logreg_rs::dataset::read_csv;
///
/// let data = read_csv("data/train.csv", &["x1", "x2"], "label").unwrap();
/// assert_eq!(data.feature_names, vec!["x1", "x2"]);
/// ```
pub fn read_csv<P, S>(path: P, feature_names: &[S], label_name: &str) -> Result<TabularData>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let file = File::open(path)?;
    read_csv_from_reader(BufReader::new(file), feature_names, label_name)
}

/// Same as [`read_csv`] for any reader.
pub fn read_csv_from_reader<R, S>(
    reader: R,
    feature_names: &[S],
    label_name: &str,
) -> Result<TabularData>
where
    R: Read,
    S: AsRef<str>,
{
    let mut rdr = ReaderBuilder::new().trim(::csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LogRegError::MissingColumn(name.to_string()))
    };
    let feature_idx = feature_names
        .iter()
        .map(|n| column(n.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    let label_idx = column(label_name)?;

    let mut features = Vec::new();
    let mut labels = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        let cell = |idx: usize, name: &str| -> Result<f64> {
            let raw = record.get(idx).unwrap_or("");
            raw.parse::<f64>().map_err(|_| LogRegError::Parse {
                row,
                column: name.to_string(),
                value: raw.to_string(),
            })
        };

        let example = feature_idx
            .iter()
            .zip(feature_names)
            .map(|(&idx, name)| cell(idx, name.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        features.push(example);
        labels.push(cell(label_idx, label_name)?);
    }

    log::debug!(
        "loaded {} rows with {} feature columns",
        labels.len(),
        feature_idx.len()
    );

    Ok(TabularData {
        feature_names: feature_names.iter().map(|n| n.as_ref().to_string()).collect(),
        features,
        labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "id,b,a,label\n1,0.5,2,1\n2,-1.5,3,0\n3,4,0,1\n";

    #[test]
    fn test_selects_columns_in_requested_order() {
        let data = read_csv_from_reader(CSV.as_bytes(), &["a", "b"], "label").unwrap();
        assert_eq!(data.feature_names, vec!["a", "b"]);
        assert_eq!(
            data.features,
            vec![vec![2.0, 0.5], vec![3.0, -1.5], vec![0.0, 4.0]]
        );
        assert_eq!(data.labels, vec![1.0, 0.0, 1.0]);
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn test_missing_column() {
        let err = read_csv_from_reader(CSV.as_bytes(), &["a", "zzz"], "label").unwrap_err();
        assert!(matches!(err, LogRegError::MissingColumn(ref c) if c == "zzz"));

        let err = read_csv_from_reader(CSV.as_bytes(), &["a"], "target").unwrap_err();
        assert!(matches!(err, LogRegError::MissingColumn(ref c) if c == "target"));
    }

    #[test]
    fn test_parse_error_reports_cell() {
        let bad = "a,label\n1,0\nfoo,1\n";
        let err = read_csv_from_reader(bad.as_bytes(), &["a"], "label").unwrap_err();
        match err {
            LogRegError::Parse { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, "a");
                assert_eq!(value, "foo");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_header_only_is_empty() {
        let data = read_csv_from_reader("a,label\n".as_bytes(), &["a"], "label").unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_read_csv_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();

        let data = read_csv(file.path(), &["b"], "label").unwrap();
        assert_eq!(data.features, vec![vec![0.5], vec![-1.5], vec![4.0]]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_csv("/no/such/file.csv", &["a"], "label").unwrap_err();
        assert!(matches!(err, LogRegError::Io(_)));
    }
}

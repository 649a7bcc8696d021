//! CSV dataset readers.
//!
//! Loads a headered CSV into a [`ClassificationDataset`] or
//! [`RegressionDataset`]. The caller names the label/target column and which
//! columns are categorical; everything else is parsed as a numeric feature.
//! Categorical values (and class labels) are interned to dense codes in
//! first-appearance order, so loading the same file twice yields identical
//! codes.
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use csv::StringRecord;
use ndarray::Array1;

use crate::dataset::{CategoricalInfo, ClassificationDataset, DataPoint, RegressionDataset};

/// Configuration for reading a dataset from CSV.
#[derive(Debug, Clone)]
pub struct CsvReaderConfig {
    /// Column holding the class label (classification) or target (regression).
    pub label_column: String,
    /// Columns to treat as categorical features, in the order they should
    /// occupy the categorical index space.
    pub categorical_columns: Vec<String>,
    pub delimiter: u8,
}

impl CsvReaderConfig {
    pub fn new(label_column: impl Into<String>) -> Self {
        CsvReaderConfig {
            label_column: label_column.into(),
            categorical_columns: Vec::new(),
            delimiter: b',',
        }
    }

    pub fn with_categorical(mut self, columns: &[&str]) -> Self {
        self.categorical_columns = columns.iter().map(|s| s.to_string()).collect();
        self
    }
}

struct RawColumns {
    cat_names: Vec<String>,
    num_names: Vec<String>,
    cat_rows: Vec<Vec<usize>>,
    num_rows: Vec<Array1<f64>>,
    cat_arities: Vec<usize>,
    labels_raw: Vec<String>,
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn read_raw<R: Read>(reader: R, config: &CsvReaderConfig) -> Result<RawColumns> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .context("Failed to read CSV header row")?
        .clone();

    let label_idx = find_column(&headers, &config.label_column)
        .ok_or_else(|| anyhow!("Missing label column '{}'", config.label_column))?;

    let mut cat_indices = Vec::new();
    for name in &config.categorical_columns {
        let idx = find_column(&headers, name)
            .ok_or_else(|| anyhow!("Missing categorical column '{}'", name))?;
        if idx == label_idx {
            bail!("Column '{}' is both label and categorical feature", name);
        }
        cat_indices.push(idx);
    }

    let num_indices: Vec<usize> = (0..headers.len())
        .filter(|i| *i != label_idx && !cat_indices.contains(i))
        .collect();

    let mut interners: Vec<HashMap<String, usize>> =
        vec![HashMap::new(); cat_indices.len()];
    let mut raw = RawColumns {
        cat_names: cat_indices.iter().map(|&i| headers[i].to_string()).collect(),
        num_names: num_indices.iter().map(|&i| headers[i].to_string()).collect(),
        cat_rows: Vec::new(),
        num_rows: Vec::new(),
        cat_arities: vec![0; cat_indices.len()],
        labels_raw: Vec::new(),
    };

    for (row, record) in csv_reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV row {}", row + 2))?;

        let mut cat_row = Vec::with_capacity(cat_indices.len());
        for (j, &idx) in cat_indices.iter().enumerate() {
            let value = record
                .get(idx)
                .ok_or_else(|| anyhow!("Row {} is missing column {}", row + 2, idx))?;
            let next_code = interners[j].len();
            let code = *interners[j].entry(value.to_string()).or_insert(next_code);
            cat_row.push(code);
        }

        let mut num_row = Vec::with_capacity(num_indices.len());
        for &idx in &num_indices {
            let value = record
                .get(idx)
                .ok_or_else(|| anyhow!("Row {} is missing column {}", row + 2, idx))?;
            let parsed: f64 = value.trim().parse().with_context(|| {
                format!(
                    "Row {}: cannot parse '{}' in column '{}' as a number",
                    row + 2,
                    value,
                    &headers[idx]
                )
            })?;
            num_row.push(parsed);
        }

        let label = record
            .get(label_idx)
            .ok_or_else(|| anyhow!("Row {} is missing the label column", row + 2))?;

        raw.cat_rows.push(cat_row);
        raw.num_rows.push(Array1::from_vec(num_row));
        raw.labels_raw.push(label.trim().to_string());
    }

    for (j, interner) in interners.iter().enumerate() {
        raw.cat_arities[j] = interner.len().max(1);
    }
    Ok(raw)
}

/// Read a classification dataset; class labels are interned like categorical
/// values.
pub fn read_classification_from_reader<R: Read>(
    reader: R,
    config: &CsvReaderConfig,
) -> Result<ClassificationDataset> {
    let raw = read_raw(reader, config)?;

    let mut label_interner: HashMap<String, usize> = HashMap::new();
    let mut labels = Vec::with_capacity(raw.labels_raw.len());
    for value in &raw.labels_raw {
        let next_code = label_interner.len();
        labels.push(*label_interner.entry(value.clone()).or_insert(next_code));
    }
    let num_classes = label_interner.len().max(1);

    let categories: Vec<CategoricalInfo> = raw
        .cat_names
        .iter()
        .zip(&raw.cat_arities)
        .map(|(name, &arity)| CategoricalInfo::new(name.clone(), arity))
        .collect();

    let mut ds = ClassificationDataset::new(categories, raw.num_names.len(), num_classes);
    for ((cat, num), label) in raw.cat_rows.into_iter().zip(raw.num_rows).zip(labels) {
        ds.push(DataPoint::new(cat, num), label)
            .map_err(|e| anyhow!("{}", e))?;
    }
    Ok(ds)
}

pub fn read_classification_csv<P: AsRef<Path>>(
    path: P,
    config: &CsvReaderConfig,
) -> Result<ClassificationDataset> {
    let file = std::fs::File::open(&path)
        .with_context(|| format!("Failed to open CSV file: {}", path.as_ref().display()))?;
    read_classification_from_reader(file, config)
}

/// Read a regression dataset; the target column is parsed as a real value.
pub fn read_regression_from_reader<R: Read>(
    reader: R,
    config: &CsvReaderConfig,
) -> Result<RegressionDataset> {
    let raw = read_raw(reader, config)?;

    let mut targets = Vec::with_capacity(raw.labels_raw.len());
    for (row, value) in raw.labels_raw.iter().enumerate() {
        let parsed: f64 = value.parse().with_context(|| {
            format!(
                "Row {}: cannot parse target '{}' as a number",
                row + 2,
                value
            )
        })?;
        targets.push(parsed);
    }

    let categories: Vec<CategoricalInfo> = raw
        .cat_names
        .iter()
        .zip(&raw.cat_arities)
        .map(|(name, &arity)| CategoricalInfo::new(name.clone(), arity))
        .collect();

    let mut ds = RegressionDataset::new(categories, raw.num_names.len());
    for ((cat, num), target) in raw.cat_rows.into_iter().zip(raw.num_rows).zip(targets) {
        ds.push(DataPoint::new(cat, num), target)
            .map_err(|e| anyhow!("{}", e))?;
    }
    Ok(ds)
}

pub fn read_regression_csv<P: AsRef<Path>>(
    path: P,
    config: &CsvReaderConfig,
) -> Result<RegressionDataset> {
    let file = std::fs::File::open(&path)
        .with_context(|| format!("Failed to open CSV file: {}", path.as_ref().display()))?;
    read_regression_from_reader(file, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    const SAMPLE: &str = "\
color,width,height,class
red,1.0,2.0,a
blue,1.5,2.5,b
red,2.0,3.0,a
green,2.5,3.5,b
";

    #[test]
    fn classification_round_trip() {
        let config = CsvReaderConfig::new("class").with_categorical(&["color"]);
        let ds = read_classification_from_reader(SAMPLE.as_bytes(), &config).unwrap();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.num_categorical(), 1);
        assert_eq!(ds.num_numeric(), 2);
        assert_eq!(ds.num_classes(), 2);
        // first-appearance interning: red=0, blue=1, green=2; a=0, b=1
        assert_eq!(ds.point(0).categorical, vec![0]);
        assert_eq!(ds.point(1).categorical, vec![1]);
        assert_eq!(ds.point(3).categorical, vec![2]);
        assert_eq!(ds.label(0), 0);
        assert_eq!(ds.label(1), 1);
        assert_eq!(ds.categories()[0].arity, 3);
        assert_eq!(ds.point(2).numeric[0], 2.0);
    }

    #[test]
    fn regression_parses_targets() {
        let data = "x,y,target\n1.0,2.0,3.5\n4.0,5.0,6.5\n";
        let config = CsvReaderConfig::new("target");
        let ds = read_regression_from_reader(data.as_bytes(), &config).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.num_features(), 2);
        assert_eq!(ds.target(1), 6.5);
    }

    #[test]
    fn missing_columns_and_bad_numbers_error() {
        let config = CsvReaderConfig::new("nope");
        assert!(read_classification_from_reader(SAMPLE.as_bytes(), &config).is_err());

        let config = CsvReaderConfig::new("class").with_categorical(&["shape"]);
        assert!(read_classification_from_reader(SAMPLE.as_bytes(), &config).is_err());

        let bad = "x,class\nnot_a_number,a\n";
        let config = CsvReaderConfig::new("class");
        assert!(read_classification_from_reader(bad.as_bytes(), &config).is_err());
    }
}

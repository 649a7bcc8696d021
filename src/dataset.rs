//! Dataset containers for mixed categorical/numeric feature spaces.
//!
//! Features are addressed by a single global index in `[0, nF)`:
//! `[0, nCat)` are categorical, `[nCat, nF)` are numeric with local index
//! `global - nCat`. Datasets come in a classification and a regression
//! flavor; `AnyDataset` carries the runtime kind for factory dispatch.
use ndarray::Array1;

use crate::error::FeatureSelectionError;

/// Descriptor for one categorical feature: a name and how many distinct
/// category codes it can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoricalInfo {
    pub name: String,
    pub arity: usize,
}

impl CategoricalInfo {
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        CategoricalInfo {
            name: name.into(),
            arity,
        }
    }
}

/// A single observation: dense category codes followed by a numeric vector,
/// plus a sample weight (1.0 unless the caller says otherwise).
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    pub categorical: Vec<usize>,
    pub numeric: Array1<f64>,
    pub weight: f64,
}

impl DataPoint {
    pub fn new(categorical: Vec<usize>, numeric: Array1<f64>) -> Self {
        DataPoint {
            categorical,
            numeric,
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Total number of features (categorical + numeric) in this point.
    pub fn num_features(&self) -> usize {
        self.categorical.len() + self.numeric.len()
    }
}

/// Read-only descriptor surface shared by both dataset kinds.
pub trait Dataset {
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn categories(&self) -> &[CategoricalInfo];
    fn num_numeric(&self) -> usize;
    fn point(&self, i: usize) -> &DataPoint;

    fn num_categorical(&self) -> usize {
        self.categories().len()
    }
    fn num_features(&self) -> usize {
        self.num_categorical() + self.num_numeric()
    }
}

fn check_point_shape(
    point: &DataPoint,
    categories: &[CategoricalInfo],
    num_numeric: usize,
) -> Result<(), FeatureSelectionError> {
    if point.categorical.len() != categories.len() || point.numeric.len() != num_numeric {
        return Err(FeatureSelectionError::Configuration(format!(
            "data point has shape ({}, {}), dataset expects ({}, {})",
            point.categorical.len(),
            point.numeric.len(),
            categories.len(),
            num_numeric
        )));
    }
    for (j, (&code, info)) in point.categorical.iter().zip(categories).enumerate() {
        if code >= info.arity {
            return Err(FeatureSelectionError::Configuration(format!(
                "category code {} out of range for feature '{}' (arity {}, column {})",
                code, info.name, info.arity, j
            )));
        }
    }
    Ok(())
}

/// Dataset with integer class labels in `[0, num_classes)`.
#[derive(Debug, Clone)]
pub struct ClassificationDataset {
    points: Vec<DataPoint>,
    labels: Vec<usize>,
    categories: Vec<CategoricalInfo>,
    num_numeric: usize,
    num_classes: usize,
}

impl ClassificationDataset {
    pub fn new(
        categories: Vec<CategoricalInfo>,
        num_numeric: usize,
        num_classes: usize,
    ) -> Self {
        ClassificationDataset {
            points: Vec::new(),
            labels: Vec::new(),
            categories,
            num_numeric,
            num_classes,
        }
    }

    /// Convenience constructor for an all-numeric dataset.
    pub fn from_numeric(
        rows: Vec<Array1<f64>>,
        labels: Vec<usize>,
        num_classes: usize,
    ) -> Result<Self, FeatureSelectionError> {
        let num_numeric = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut ds = ClassificationDataset::new(Vec::new(), num_numeric, num_classes);
        if rows.len() != labels.len() {
            return Err(FeatureSelectionError::Configuration(format!(
                "{} rows but {} labels",
                rows.len(),
                labels.len()
            )));
        }
        for (row, label) in rows.into_iter().zip(labels) {
            ds.push(DataPoint::new(Vec::new(), row), label)?;
        }
        Ok(ds)
    }

    pub fn push(&mut self, point: DataPoint, label: usize) -> Result<(), FeatureSelectionError> {
        check_point_shape(&point, &self.categories, self.num_numeric)?;
        if label >= self.num_classes {
            return Err(FeatureSelectionError::Configuration(format!(
                "label {} out of range for {} classes",
                label, self.num_classes
            )));
        }
        self.points.push(point);
        self.labels.push(label);
        Ok(())
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn label(&self, i: usize) -> usize {
        self.labels[i]
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// New dataset containing only the rows named by `indices`.
    pub fn subset(&self, indices: &[usize]) -> ClassificationDataset {
        ClassificationDataset {
            points: indices.iter().map(|&i| self.points[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
            categories: self.categories.clone(),
            num_numeric: self.num_numeric,
            num_classes: self.num_classes,
        }
    }

    pub(crate) fn from_parts(
        points: Vec<DataPoint>,
        labels: Vec<usize>,
        categories: Vec<CategoricalInfo>,
        num_numeric: usize,
        num_classes: usize,
    ) -> Self {
        ClassificationDataset {
            points,
            labels,
            categories,
            num_numeric,
            num_classes,
        }
    }
}

impl Dataset for ClassificationDataset {
    fn len(&self) -> usize {
        self.points.len()
    }
    fn categories(&self) -> &[CategoricalInfo] {
        &self.categories
    }
    fn num_numeric(&self) -> usize {
        self.num_numeric
    }
    fn point(&self, i: usize) -> &DataPoint {
        &self.points[i]
    }
}

/// Dataset with real-valued targets.
#[derive(Debug, Clone)]
pub struct RegressionDataset {
    points: Vec<DataPoint>,
    targets: Vec<f64>,
    categories: Vec<CategoricalInfo>,
    num_numeric: usize,
}

impl RegressionDataset {
    pub fn new(categories: Vec<CategoricalInfo>, num_numeric: usize) -> Self {
        RegressionDataset {
            points: Vec::new(),
            targets: Vec::new(),
            categories,
            num_numeric,
        }
    }

    pub fn from_numeric(
        rows: Vec<Array1<f64>>,
        targets: Vec<f64>,
    ) -> Result<Self, FeatureSelectionError> {
        let num_numeric = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut ds = RegressionDataset::new(Vec::new(), num_numeric);
        if rows.len() != targets.len() {
            return Err(FeatureSelectionError::Configuration(format!(
                "{} rows but {} targets",
                rows.len(),
                targets.len()
            )));
        }
        for (row, target) in rows.into_iter().zip(targets) {
            ds.push(DataPoint::new(Vec::new(), row), target)?;
        }
        Ok(ds)
    }

    pub fn push(&mut self, point: DataPoint, target: f64) -> Result<(), FeatureSelectionError> {
        check_point_shape(&point, &self.categories, self.num_numeric)?;
        self.points.push(point);
        self.targets.push(target);
        Ok(())
    }

    pub fn target(&self, i: usize) -> f64 {
        self.targets[i]
    }

    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    pub fn subset(&self, indices: &[usize]) -> RegressionDataset {
        RegressionDataset {
            points: indices.iter().map(|&i| self.points[i].clone()).collect(),
            targets: indices.iter().map(|&i| self.targets[i]).collect(),
            categories: self.categories.clone(),
            num_numeric: self.num_numeric,
        }
    }

    pub(crate) fn from_parts(
        points: Vec<DataPoint>,
        targets: Vec<f64>,
        categories: Vec<CategoricalInfo>,
        num_numeric: usize,
    ) -> Self {
        RegressionDataset {
            points,
            targets,
            categories,
            num_numeric,
        }
    }
}

impl Dataset for RegressionDataset {
    fn len(&self) -> usize {
        self.points.len()
    }
    fn categories(&self) -> &[CategoricalInfo] {
        &self.categories
    }
    fn num_numeric(&self) -> usize {
        self.num_numeric
    }
    fn point(&self, i: usize) -> &DataPoint {
        &self.points[i]
    }
}

/// Runtime-kind wrapper used by the factory surface to dispatch between the
/// classification and regression search variants.
#[derive(Debug, Clone)]
pub enum AnyDataset {
    Classification(ClassificationDataset),
    Regression(RegressionDataset),
}

impl AnyDataset {
    pub fn num_features(&self) -> usize {
        match self {
            AnyDataset::Classification(ds) => ds.num_features(),
            AnyDataset::Regression(ds) => ds.num_features(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AnyDataset::Classification(ds) => ds.len(),
            AnyDataset::Regression(ds) => ds.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

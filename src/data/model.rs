use std::cmp::Ordering;
use std::fmt;

use nalgebra::DMatrix;

// ---------------------------------------------------------------------------
// Wavenumber – an orderable f64 key for the pivot index
// ---------------------------------------------------------------------------

/// A wavenumber usable as a `BTreeMap` key.
/// Ordering follows `f64::total_cmp`; the loader only lets finite values through.
#[derive(Debug, Clone, Copy)]
pub struct Wavenumber(pub f64);

impl PartialEq for Wavenumber {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Wavenumber {}

impl PartialOrd for Wavenumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Wavenumber {
    fn cmp(&self, other: &Self) -> Ordering {
        // -0.0 and 0.0 are the same physical wavenumber.
        let a = if self.0 == 0.0 { 0.0 } else { self.0 };
        let b = if other.0 == 0.0 { 0.0 } else { other.0 };
        a.total_cmp(&b)
    }
}

impl fmt::Display for Wavenumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// SpectrumReading – one input file
// ---------------------------------------------------------------------------

/// Raw (wavenumber, transmittance) pairs in file order.
/// Not sorted, not deduplicated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpectrumReading {
    pub points: Vec<(f64, f64)>,
}

impl SpectrumReading {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    pub fn wavenumbers(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|&(wn, _)| wn)
    }

    pub fn transmittance(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|&(_, t)| t)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A labelled reading: one sample group and its spectrum.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGroup {
    pub label: String,
    pub reading: SpectrumReading,
}

impl SampleGroup {
    pub fn new(label: impl Into<String>, reading: SpectrumReading) -> Self {
        Self {
            label: label.into(),
            reading,
        }
    }
}

// ---------------------------------------------------------------------------
// AlignedMatrix – PCA input
// ---------------------------------------------------------------------------

/// What the columns of an [`AlignedMatrix`] stand for.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureAxis {
    /// One column per distinct wavenumber, ascending.
    Wavenumbers(Vec<f64>),
    /// One column per group's transmittance series, in group order.
    GroupSeries(Vec<String>),
}

impl FeatureAxis {
    pub fn len(&self) -> usize {
        match self {
            FeatureAxis::Wavenumbers(w) => w.len(),
            FeatureAxis::GroupSeries(g) => g.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Rectangular, fully-defined observation × feature matrix with one label per row.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedMatrix {
    pub values: DMatrix<f64>,
    pub labels: Vec<String>,
    pub features: FeatureAxis,
    /// `true` when row labels are a positional approximation (legacy mode).
    pub approximate_labels: bool,
}

impl AlignedMatrix {
    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    /// Values of one row, e.g. a group's aligned spectrum.
    pub fn row_values(&self, row: usize) -> Vec<f64> {
        self.values.row(row).iter().copied().collect()
    }

    /// Index of the first row carrying `label`.
    pub fn row_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }
}

// ---------------------------------------------------------------------------
// Projection – PCA output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedPoint {
    pub pc1: f64,
    pub pc2: f64,
    pub label: String,
}

/// 2-D scores, one per observation, in input row order.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub points: Vec<ProjectedPoint>,
    /// Variance captured by each component.
    pub explained_variance: [f64; 2],
    /// Share of the total variance captured by each component.
    pub explained_variance_ratio: [f64; 2],
}

impl Projection {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Distinct labels in order of first appearance.
    pub fn labels(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for p in &self.points {
            if !seen.contains(&p.label.as_str()) {
                seen.push(&p.label);
            }
        }
        seen
    }
}

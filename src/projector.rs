//! Two-component PCA.
//!
//! The matrix is mean-centred per column and the two leading eigenvectors of
//! its covariance structure give the projection axes. When there are fewer
//! observations than features (the pivot layout: a handful of groups over
//! thousands of wavenumbers) the n×n Gram matrix is decomposed instead of the
//! p×p covariance; both yield the same scores.
//!
//! Component signs are arbitrary. Each axis is flipped so that its
//! largest-magnitude score is positive, which makes repeated runs identical
//! but carries no physical meaning.

use log::{debug, info};
use nalgebra::{DMatrix, DVector, SymmetricEigen};

use crate::data::model::{AlignedMatrix, ProjectedPoint, Projection};
use crate::error::{PipelineError, Result};

const N_COMPONENTS: usize = 2;

/// A fitted 2-component model.
#[derive(Debug, Clone)]
pub struct PcaModel {
    /// Per-feature mean removed before projecting.
    pub mean: DVector<f64>,
    /// Feature loadings, one column per component (p × 2).
    pub components: DMatrix<f64>,
    pub explained_variance: [f64; 2],
    pub explained_variance_ratio: [f64; 2],
}

impl PcaModel {
    /// Fit on rows = observations, columns = features.
    pub fn fit(values: &DMatrix<f64>) -> Result<Self> {
        let (n, p) = values.shape();
        if n < N_COMPONENTS || p < N_COMPONENTS {
            return Err(PipelineError::Dimension { rows: n, cols: p });
        }
        let mean = column_means(values);
        let centered = center(values, &mean);

        let (components, eigenvalues, total) = if p <= n {
            fit_covariance(&centered)
        } else {
            fit_gram(&centered)
        };

        let ratio = |v: f64| if total > 0.0 { v / total } else { 0.0 };
        let mut model = PcaModel {
            mean,
            components,
            explained_variance: eigenvalues,
            explained_variance_ratio: [ratio(eigenvalues[0]), ratio(eigenvalues[1])],
        };
        model.canonicalize_signs(&centered);
        Ok(model)
    }

    /// Scores (n × 2) of `values` in the fitted axes.
    pub fn transform(&self, values: &DMatrix<f64>) -> DMatrix<f64> {
        center(values, &self.mean) * &self.components
    }

    fn canonicalize_signs(&mut self, centered: &DMatrix<f64>) {
        let scores = centered * &self.components;
        for k in 0..N_COMPONENTS {
            let column = scores.column(k);
            let pivot = column
                .iter()
                .copied()
                .max_by(|a, b| a.abs().total_cmp(&b.abs()))
                .unwrap_or(0.0);
            if pivot < 0.0 {
                let mut axis = self.components.column_mut(k);
                axis.neg_mut();
            }
        }
    }
}

/// Fit a 2-component PCA on the aligned matrix and label every score row.
pub fn project(matrix: &AlignedMatrix) -> Result<Projection> {
    let model = PcaModel::fit(&matrix.values)?;
    let scores = model.transform(&matrix.values);

    let points = scores
        .row_iter()
        .zip(matrix.labels.iter())
        .map(|(row, label)| ProjectedPoint {
            pc1: row[0],
            pc2: row[1],
            label: label.clone(),
        })
        .collect::<Vec<_>>();

    info!(
        "PCA: {} observations, explained variance ratio PC1 {:.3}, PC2 {:.3}",
        points.len(),
        model.explained_variance_ratio[0],
        model.explained_variance_ratio[1]
    );

    Ok(Projection {
        points,
        explained_variance: model.explained_variance,
        explained_variance_ratio: model.explained_variance_ratio,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn column_means(values: &DMatrix<f64>) -> DVector<f64> {
    let n = values.nrows() as f64;
    DVector::from_iterator(values.ncols(), values.column_iter().map(|c| c.sum() / n))
}

fn center(values: &DMatrix<f64>, mean: &DVector<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(values.nrows(), values.ncols(), |r, c| values[(r, c)] - mean[c])
}

/// Indices of the two largest eigenvalues, descending.
fn leading(eigenvalues: &DVector<f64>) -> [usize; 2] {
    let mut order: Vec<usize> = (0..eigenvalues.len()).collect();
    order.sort_by(|&a, &b| eigenvalues[b].total_cmp(&eigenvalues[a]));
    [order[0], order[1]]
}

/// Eigen-decompose the p×p covariance. Returns (loadings, eigenvalues, total variance).
fn fit_covariance(centered: &DMatrix<f64>) -> (DMatrix<f64>, [f64; 2], f64) {
    let dof = (centered.nrows() - 1) as f64;
    let covariance = centered.transpose() * centered / dof;
    let total = covariance.trace();
    let eig = SymmetricEigen::new(covariance);
    let [i, j] = leading(&eig.eigenvalues);
    debug!("PCA via {0}x{0} covariance", centered.ncols());

    let components = DMatrix::from_columns(&[eig.eigenvectors.column(i), eig.eigenvectors.column(j)]);
    let eigenvalues = [eig.eigenvalues[i].max(0.0), eig.eigenvalues[j].max(0.0)];
    (components, eigenvalues, total)
}

/// Eigen-decompose the n×n Gram matrix and map its eigenvectors back to
/// feature loadings: `v = Xᵀu / s` with `s = sqrt(λ (n - 1))`.
fn fit_gram(centered: &DMatrix<f64>) -> (DMatrix<f64>, [f64; 2], f64) {
    let dof = (centered.nrows() - 1) as f64;
    let gram = centered * centered.transpose() / dof;
    let total = gram.trace();
    let eig = SymmetricEigen::new(gram);
    let [i, j] = leading(&eig.eigenvalues);
    debug!("PCA via {0}x{0} Gram matrix", centered.nrows());

    let (n, p) = centered.shape();
    // Eigenvalues below this are rounding noise; their axes carry no variance.
    let tolerance = eig.eigenvalues[i].max(0.0) * n.max(p) as f64 * f64::EPSILON;
    let mut components = DMatrix::zeros(p, N_COMPONENTS);
    let mut eigenvalues = [0.0; 2];
    for (k, idx) in [i, j].into_iter().enumerate() {
        let lambda = eig.eigenvalues[idx];
        if lambda <= tolerance {
            continue;
        }
        eigenvalues[k] = lambda;
        let singular = (lambda * dof).sqrt();
        let loading = centered.transpose() * eig.eigenvectors.column(idx) / singular;
        components.set_column(k, &loading);
    }
    (components, eigenvalues, total)
}

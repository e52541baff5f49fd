//! Wavenumber-indexed pivot alignment.
//!
//! All readings are merged on the wavenumber value: the index is the union
//! of distinct wavenumbers (ascending), there is one column per group, and
//! gaps are filled forward then backward along the wavenumber axis. The
//! table is then transposed so every group is exactly one observation.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use nalgebra::DMatrix;

use super::fill::{backward_fill, complete, forward_fill};
use crate::data::model::{AlignedMatrix, FeatureAxis, SampleGroup, Wavenumber};
use crate::error::{PipelineError, Result};

/// Running mean of repeated (wavenumber, group) entries.
#[derive(Debug, Default, Clone, Copy)]
struct Cell {
    sum: f64,
    count: u32,
}

impl Cell {
    fn mean(self) -> f64 {
        self.sum / f64::from(self.count)
    }
}

/// Build one row per group over the union of all wavenumbers.
pub fn align_pivot(groups: &[SampleGroup]) -> Result<AlignedMatrix> {
    if groups.is_empty() {
        return Err(PipelineError::Data("no sample groups to align".into()));
    }
    if let Some(empty) = groups.iter().find(|g| g.reading.is_empty()) {
        return Err(PipelineError::Data(format!(
            "group '{}' has no readings",
            empty.label
        )));
    }

    // Tag every pair with its label: label → wavenumber → cell.
    let mut table: BTreeMap<&str, BTreeMap<Wavenumber, Cell>> = BTreeMap::new();
    for group in groups {
        let column = table.entry(group.label.as_str()).or_default();
        for (wn, t) in &group.reading.points {
            let cell = column.entry(Wavenumber(*wn)).or_default();
            cell.sum += t;
            cell.count += 1;
        }
    }

    check_overlap(&table)?;

    let index: Vec<Wavenumber> = table
        .values()
        .flat_map(|column| column.keys().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut labels = Vec::with_capacity(table.len());
    let mut rows = Vec::with_capacity(table.len());
    for (label, column) in &table {
        let mut series: Vec<Option<f64>> = index
            .iter()
            .map(|wn| column.get(wn).map(|c| c.mean()))
            .collect();
        forward_fill(&mut series);
        backward_fill(&mut series);
        let series = complete(&series).map_err(|i| {
            PipelineError::Data(format!(
                "group '{label}' is undefined at wavenumber {} after filling",
                index[i]
            ))
        })?;
        labels.push(label.to_string());
        rows.push(series);
    }

    let values = DMatrix::from_fn(rows.len(), index.len(), |r, c| rows[r][c]);
    debug!(
        "pivot matrix: {} groups x {} wavenumbers",
        values.nrows(),
        values.ncols()
    );

    Ok(AlignedMatrix {
        values,
        labels,
        features: FeatureAxis::Wavenumbers(index.into_iter().map(|w| w.0).collect()),
        approximate_labels: false,
    })
}

/// With several groups, each must share at least one wavenumber with another;
/// otherwise its row would be made up entirely of fill values.
fn check_overlap(table: &BTreeMap<&str, BTreeMap<Wavenumber, Cell>>) -> Result<()> {
    if table.len() < 2 {
        return Ok(());
    }
    let mut owners: BTreeMap<Wavenumber, usize> = BTreeMap::new();
    for column in table.values() {
        for wn in column.keys() {
            *owners.entry(*wn).or_default() += 1;
        }
    }
    for (label, column) in table {
        if !column.keys().any(|wn| owners[wn] > 1) {
            return Err(PipelineError::Data(format!(
                "group '{label}' shares no wavenumber with any other group"
            )));
        }
    }
    Ok(())
}

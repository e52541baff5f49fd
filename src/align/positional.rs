//! Legacy positional alignment.
//!
//! Each group's transmittance series becomes one column and rows are matched
//! by list position only. Wavenumbers are ignored, so row `i` of two columns
//! may belong to different physical wavenumbers. Row labels are the
//! concatenated per-reading labels truncated to the row count, which is an
//! approximation. Kept as an explicit alternate mode; use the pivot for
//! real comparisons.

use log::{debug, warn};
use nalgebra::DMatrix;

use super::fill::{complete, forward_fill};
use crate::data::model::{AlignedMatrix, FeatureAxis, SampleGroup};
use crate::error::{PipelineError, Result};

/// Stack transmittance columns side by side in group order.
pub fn align_positional(groups: &[SampleGroup]) -> Result<AlignedMatrix> {
    if groups.is_empty() {
        return Err(PipelineError::Data("no sample groups to align".into()));
    }
    if let Some(empty) = groups.iter().find(|g| g.reading.is_empty()) {
        return Err(PipelineError::Data(format!(
            "group '{}' has no readings",
            empty.label
        )));
    }
    let n_rows = groups.iter().map(|g| g.reading.len()).max().unwrap_or(0);

    let mut columns = Vec::with_capacity(groups.len());
    for group in groups {
        let mut column: Vec<Option<f64>> = group.reading.transmittance().map(Some).collect();
        column.resize(n_rows, None);
        forward_fill(&mut column);
        let column = complete(&column).map_err(|row| {
            PipelineError::Data(format!(
                "group '{}' has no value at row {row} to carry forward",
                group.label
            ))
        })?;
        columns.push(column);
    }

    let mut labels: Vec<String> = groups
        .iter()
        .flat_map(|g| std::iter::repeat(g.label.clone()).take(g.reading.len()))
        .collect();
    if labels.len() > n_rows {
        warn!(
            "positional alignment: {} reading labels truncated to {} rows; labels are approximate",
            labels.len(),
            n_rows
        );
    }
    labels.truncate(n_rows);

    let values = DMatrix::from_fn(n_rows, columns.len(), |r, c| columns[c][r]);
    debug!("positional matrix: {} x {}", values.nrows(), values.ncols());

    Ok(AlignedMatrix {
        values,
        labels,
        features: FeatureAxis::GroupSeries(groups.iter().map(|g| g.label.clone()).collect()),
        approximate_labels: true,
    })
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;

    use super::*;
    use crate::data::model::SpectrumReading;

    fn group(label: &str, points: &[(f64, f64)]) -> SampleGroup {
        SampleGroup::new(label, SpectrumReading::new(points.to_vec()))
    }

    #[test]
    fn pads_shorter_columns_by_carrying_forward() {
        let groups = vec![
            group("A", &[(10.0, 0.5), (20.0, 0.6), (30.0, 0.7)]),
            group("B", &[(11.0, 0.4)]),
        ];
        let m = align_positional(&groups).unwrap();
        assert_eq!((m.nrows(), m.ncols()), (3, 2));
        assert_eq!(m.values.column(0).iter().copied().collect::<Vec<_>>(), vec![0.5, 0.6, 0.7]);
        assert_eq!(m.values.column(1).iter().copied().collect::<Vec<_>>(), vec![0.4, 0.4, 0.4]);
        assert!(m.approximate_labels);
    }

    #[test]
    fn ignores_wavenumbers() {
        let groups = vec![
            group("A", &[(10.0, 0.5), (20.0, 0.6)]),
            group("B", &[(99.0, 0.1), (5.0, 0.2)]),
        ];
        let m = align_positional(&groups).unwrap();
        assert_eq!(m.row_values(0), vec![0.5, 0.1]);
        assert_eq!(m.row_values(1), vec![0.6, 0.2]);
    }

    #[test]
    fn labels_are_truncated_concatenation() {
        let groups = vec![
            group("A", &[(1.0, 0.1), (2.0, 0.2)]),
            group("B", &[(1.0, 0.3), (2.0, 0.4), (3.0, 0.5)]),
        ];
        let m = align_positional(&groups).unwrap();
        // 5 readings in total, 3 rows: first three labels of A,A,B,B,B.
        assert_eq!(m.labels, vec!["A", "A", "B"]);
        assert_eq!(m.features, FeatureAxis::GroupSeries(vec!["A".into(), "B".into()]));
    }

    #[test]
    fn empty_group_cannot_be_filled() {
        let groups = vec![group("A", &[(1.0, 0.1)]), group("B", &[])];
        let err = align_positional(&groups).unwrap_err();
        assert_matches!(err, PipelineError::Data(ref m) if m.contains("'B'"));
    }

    #[test]
    fn all_groups_empty() {
        let groups = vec![group("A", &[]), group("B", &[])];
        assert_matches!(align_positional(&groups), Err(PipelineError::Data(_)));
    }

    #[test]
    fn no_groups() {
        assert_matches!(align_positional(&[]), Err(PipelineError::Data(_)));
    }
}

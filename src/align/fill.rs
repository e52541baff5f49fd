//! Missing-value imputation along an ordered axis.

/// Copy the nearest earlier defined value into each gap.
/// Leading gaps stay `None`.
pub fn forward_fill(column: &mut [Option<f64>]) {
    let mut last = None;
    for cell in column.iter_mut() {
        match cell {
            Some(v) => last = Some(*v),
            None => *cell = last,
        }
    }
}

/// Copy the nearest later defined value into each gap.
/// Trailing gaps stay `None`.
pub fn backward_fill(column: &mut [Option<f64>]) {
    let mut next = None;
    for cell in column.iter_mut().rev() {
        match cell {
            Some(v) => next = Some(*v),
            None => *cell = next,
        }
    }
}

/// Unwrap a filled column, or report the first index still undefined.
pub fn complete(column: &[Option<f64>]) -> Result<Vec<f64>, usize> {
    column
        .iter()
        .enumerate()
        .map(|(i, v)| v.ok_or(i))
        .collect()
}

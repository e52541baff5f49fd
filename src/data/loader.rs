use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use log::debug;

use super::model::{SampleGroup, SpectrumReading};
use crate::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load one spectrum file.
///
/// Layout: no header, one `wavenumber transmittance` pair per line, separated
/// by a single tab (or, on lines without tabs, by spaces). Every tab starts a
/// new field, so `10\t\t0.5` has three fields and is rejected. Blank lines
/// are skipped. Order is kept as-is.
pub fn load_reading(path: &Path) -> Result<SpectrumReading> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => PipelineError::NotFound {
            path: path.to_path_buf(),
        },
        _ => PipelineError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    let reading = parse_reading(file, path)?;
    debug!("loaded {} points from {}", reading.len(), path.display());
    Ok(reading)
}

/// Load a file and attach its group label.
pub fn load_group(label: &str, path: &Path) -> Result<SampleGroup> {
    Ok(SampleGroup::new(label, load_reading(path)?))
}

// ---------------------------------------------------------------------------
// Two-column parser
// ---------------------------------------------------------------------------

/// Parse two-column text from any reader. `path` is only used in errors.
pub fn parse_reading<R: Read>(source: R, path: &Path) -> Result<SpectrumReading> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(source);

    let mut points = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| PipelineError::Parse {
            path: path.to_path_buf(),
            line: e.position().map(|p| p.line() as usize).unwrap_or(0),
            message: e.to_string(),
        })?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);

        // A line without tabs is split on runs of spaces instead.
        let tokens: Vec<&str> = if record.len() == 1 {
            record[0].split_whitespace().collect()
        } else {
            record.iter().collect()
        };
        if tokens.is_empty() {
            continue;
        }
        if tokens.len() != 2 {
            return Err(PipelineError::Parse {
                path: path.to_path_buf(),
                line,
                message: format!("expected 2 numeric fields, found {}", tokens.len()),
            });
        }

        let wavenumber = parse_field(tokens[0], path, line)?;
        let transmittance = parse_field(tokens[1], path, line)?;
        points.push((wavenumber, transmittance));
    }

    Ok(SpectrumReading::new(points))
}

fn parse_field(tok: &str, path: &Path, line: usize) -> Result<f64> {
    let parse_error = |message: String| PipelineError::Parse {
        path: path.to_path_buf(),
        line,
        message,
    };
    let value = tok
        .parse::<f64>()
        .map_err(|_| parse_error(format!("'{tok}' is not a number")))?;
    if !value.is_finite() {
        return Err(parse_error(format!("'{tok}' is not a finite number")));
    }
    Ok(value)
}

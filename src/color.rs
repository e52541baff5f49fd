use std::collections::BTreeMap;
use std::str::FromStr;

use palette::{named, Hsl, IntoColor, Srgb};

use crate::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// Colour identifiers
// ---------------------------------------------------------------------------

/// Parse a display colour: an SVG/CSS name (`"purple"`) or hex (`"#8000ff"`).
pub fn parse_color(id: &str) -> Result<Srgb<u8>> {
    let id = id.trim();
    if let Some(c) = named::from_str(&id.to_ascii_lowercase()) {
        return Ok(c);
    }
    if id.starts_with('#') {
        if let Ok(c) = Srgb::<u8>::from_str(id) {
            return Ok(c);
        }
    }
    Err(PipelineError::Config(format!("unknown colour '{id}'")))
}

/// Hex form of a colour, e.g. for writing a configuration file.
pub fn to_hex(c: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Srgb<u8>> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            rgb.into_format::<u8>()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: group label → colour
// ---------------------------------------------------------------------------

/// Resolved colour for every label of a projection, in legend order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    entries: Vec<(String, Srgb<u8>)>,
}

impl ColorMap {
    /// Resolve a colour for each label. Fails if a label has no configured
    /// colour or its identifier is unknown.
    pub fn for_labels(labels: &[&str], colors: &BTreeMap<String, String>) -> Result<Self> {
        let entries = labels
            .iter()
            .map(|&label| {
                let id = colors.get(label).ok_or_else(|| {
                    PipelineError::Config(format!("no colour configured for label '{label}'"))
                })?;
                Ok((label.to_string(), parse_color(id)?))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ColorMap { entries })
    }

    /// Return the legend entries (label → colour).
    pub fn legend_entries(&self) -> &[(String, Srgb<u8>)] {
        &self.entries
    }
}

use std::path::PathBuf;

use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::{ScatterRenderer, ScatterScene};
use crate::error::{PipelineError, Result};

/// File formats plotters can write for us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    Bitmap,
}

impl ImageFormat {
    /// Pick the backend from the file extension.
    pub fn from_path(path: &std::path::Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "svg" => Ok(ImageFormat::Svg),
            "png" | "bmp" | "jpg" | "jpeg" => Ok(ImageFormat::Bitmap),
            other => Err(PipelineError::Config(format!(
                "unsupported image extension: .{other} (use .png or .svg)"
            ))),
        }
    }
}

/// Writes the scene to an image file.
#[derive(Debug, Clone)]
pub struct ImageRenderer {
    pub path: PathBuf,
    pub size: (u32, u32),
}

impl ImageRenderer {
    pub fn new(path: impl Into<PathBuf>, size: (u32, u32)) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }
}

impl ScatterRenderer for ImageRenderer {
    fn render(&self, scene: &ScatterScene) -> Result<()> {
        match ImageFormat::from_path(&self.path)? {
            ImageFormat::Svg => {
                let root = SVGBackend::new(&self.path, self.size).into_drawing_area();
                draw_scene(&root, scene)?;
            }
            ImageFormat::Bitmap => {
                let root = BitMapBackend::new(&self.path, self.size).into_drawing_area();
                draw_scene(&root, scene)?;
            }
        }
        info!("wrote {}", self.path.display());
        Ok(())
    }
}

fn render_error(e: impl std::fmt::Display) -> PipelineError {
    PipelineError::Render(e.to_string())
}

fn draw_scene<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, scene: &ScatterScene) -> Result<()> {
    root.fill(&WHITE).map_err(render_error)?;
    let ((x0, x1), (y0, y1)) = scene.bounds();

    let mut chart = ChartBuilder::on(root)
        .caption(&scene.title, ("sans-serif", 28).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(render_error)?;

    chart
        .configure_mesh()
        .x_desc(&scene.x_label)
        .y_desc(&scene.y_label)
        .label_style(("sans-serif", 16).into_font())
        .draw()
        .map_err(render_error)?;

    for series in &scene.series {
        let color = RGBColor(series.color.red, series.color.green, series.color.blue);
        chart
            .draw_series(
                series
                    .points
                    .iter()
                    .map(|p| Circle::new((p[0], p[1]), 4, color.filled())),
            )
            .map_err(render_error)?
            .label(series.label.as_str())
            .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_error)?;

    root.present().map_err(render_error)?;
    Ok(())
}

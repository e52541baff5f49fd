/// Visualizer: a backend-independent scatter scene plus two renderers.
///
/// ```text
///   Projection + label→colour
///        │
///        ▼
///   ScatterScene   one series per label, legend order = first appearance
///        │
///        ├── window  interactive egui plot
///        └── image   png / svg via plotters
/// ```
pub mod image;
pub mod window;

use std::collections::BTreeMap;

use palette::Srgb;

use crate::color::ColorMap;
use crate::data::model::Projection;
use crate::error::Result;

pub use image::ImageRenderer;
pub use window::WindowRenderer;

pub const X_LABEL: &str = "Principal Component 1";
pub const Y_LABEL: &str = "Principal Component 2";

/// Anything that can put a scene in front of the user.
pub trait ScatterRenderer {
    fn render(&self, scene: &ScatterScene) -> Result<()>;
}

/// All points sharing one label.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub label: String,
    pub color: Srgb<u8>,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterScene {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<ScatterSeries>,
    /// Extra line under the chart (explained variance).
    pub footer: String,
}

impl ScatterScene {
    /// Group the projection by label and resolve colours.
    /// Fails with a configuration error if a label has no colour.
    pub fn build(
        projection: &Projection,
        colors: &BTreeMap<String, String>,
        title: &str,
    ) -> Result<Self> {
        let color_map = ColorMap::for_labels(&projection.labels(), colors)?;

        let series = color_map
            .legend_entries()
            .iter()
            .map(|(label, color)| ScatterSeries {
                label: label.clone(),
                color: *color,
                points: projection
                    .points
                    .iter()
                    .filter(|p| &p.label == label)
                    .map(|p| [p.pc1, p.pc2])
                    .collect(),
            })
            .collect();

        let [r1, r2] = projection.explained_variance_ratio;
        Ok(ScatterScene {
            title: title.to_string(),
            x_label: X_LABEL.to_string(),
            y_label: Y_LABEL.to_string(),
            series,
            footer: format!(
                "explained variance: PC1 {:.1}%, PC2 {:.1}%",
                r1 * 100.0,
                r2 * 100.0
            ),
        })
    }

    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    /// Axis ranges covering every point with a 10% margin.
    pub fn bounds(&self) -> ((f64, f64), (f64, f64)) {
        let points = self.series.iter().flat_map(|s| s.points.iter());
        let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in points {
            x_min = x_min.min(p[0]);
            x_max = x_max.max(p[0]);
            y_min = y_min.min(p[1]);
            y_max = y_max.max(p[1]);
        }
        (pad(x_min, x_max), pad(y_min, y_max))
    }
}

fn pad(min: f64, max: f64) -> (f64, f64) {
    if !min.is_finite() || !max.is_finite() {
        return (-1.0, 1.0);
    }
    let margin = if max - min > f64::EPSILON {
        (max - min) * 0.1
    } else {
        1.0
    };
    (min - margin, max + margin)
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    use super::*;
    use crate::data::model::ProjectedPoint;
    use crate::error::PipelineError;

    fn projection() -> Projection {
        let p = |pc1: f64, pc2: f64, label: &str| ProjectedPoint {
            pc1,
            pc2,
            label: label.to_string(),
        };
        Projection {
            points: vec![p(1.0, 2.0, "LO"), p(-1.0, 0.0, "LG"), p(3.0, -2.0, "LO")],
            explained_variance: [2.0, 1.0],
            explained_variance_ratio: [0.625, 0.25],
        }
    }

    fn colors() -> BTreeMap<String, String> {
        [("LO", "red"), ("LG", "purple")]
            .iter()
            .map(|(l, c)| (l.to_string(), c.to_string()))
            .collect()
    }

    #[test]
    fn series_per_label() {
        let scene = ScatterScene::build(&projection(), &colors(), "PCA of FTIR Data").unwrap();
        assert_eq!(scene.series.len(), 2);
        assert_eq!(scene.series[0].label, "LO");
        assert_eq!(scene.series[0].points, vec![[1.0, 2.0], [3.0, -2.0]]);
        assert_eq!(scene.series[0].color, Srgb::new(255, 0, 0));
        assert_eq!(scene.series[1].label, "LG");
        assert_eq!(scene.point_count(), 3);
        assert_eq!(scene.x_label, "Principal Component 1");
        assert_eq!(scene.y_label, "Principal Component 2");
        assert_eq!(scene.footer, "explained variance: PC1 62.5%, PC2 25.0%");
    }

    #[test]
    fn missing_colour() {
        let mut colors = colors();
        colors.remove("LG");
        assert_matches!(
            ScatterScene::build(&projection(), &colors, "t"),
            Err(PipelineError::Config(_))
        );
    }

    #[test]
    fn bounds_with_margin() {
        let scene = ScatterScene::build(&projection(), &colors(), "t").unwrap();
        let ((x0, x1), (y0, y1)) = scene.bounds();
        assert_abs_diff_eq!(x0, -1.4, epsilon = 1e-12);
        assert_abs_diff_eq!(x1, 3.4, epsilon = 1e-12);
        assert_abs_diff_eq!(y0, -2.4, epsilon = 1e-12);
        assert_abs_diff_eq!(y1, 2.4, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_bounds() {
        assert_eq!(pad(2.0, 2.0), (1.0, 3.0));
        assert_eq!(pad(f64::INFINITY, f64::NEG_INFINITY), (-1.0, 1.0));
    }
}

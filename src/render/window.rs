use eframe::egui::{self, Color32, Ui};
use egui_plot::{Legend, MarkerShape, Plot, PlotPoints, Points};
use palette::Srgb;

use super::{ScatterRenderer, ScatterScene};
use crate::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ScatterApp {
    pub scene: ScatterScene,
}

impl ScatterApp {
    pub fn new(scene: ScatterScene) -> Self {
        Self { scene }
    }
}

impl eframe::App for ScatterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title ----
        egui::TopBottomPanel::top("title_bar").show(ctx, |ui| {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.heading(&self.scene.title);
            });
        });

        // ---- Bottom panel: explained variance ----
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.label(&self.scene.footer);
        });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            scatter_plot(ui, &self.scene);
        });
    }
}

pub fn to_color32(c: Srgb<u8>) -> Color32 {
    Color32::from_rgb(c.red, c.green, c.blue)
}

/// Render the scores, one coloured point series per label.
pub fn scatter_plot(ui: &mut Ui, scene: &ScatterScene) {
    Plot::new("pca_scatter")
        .legend(Legend::default())
        .x_axis_label(scene.x_label.as_str())
        .y_axis_label(scene.y_label.as_str())
        .show_grid(true)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &scene.series {
                let points: PlotPoints = series.points.iter().copied().collect();
                plot_ui.points(
                    Points::new(points)
                        .name(&series.label)
                        .color(to_color32(series.color))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(3.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Opens a native window and blocks until it is closed.
#[derive(Debug, Clone)]
pub struct WindowRenderer {
    pub size: [f32; 2],
}

impl Default for WindowRenderer {
    fn default() -> Self {
        Self {
            size: [1000.0, 700.0],
        }
    }
}

impl ScatterRenderer for WindowRenderer {
    fn render(&self, scene: &ScatterScene) -> Result<()> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size(self.size)
                .with_min_inner_size([400.0, 300.0]),
            ..Default::default()
        };
        let scene = scene.clone();
        let window_title = scene.title.clone();

        eframe::run_native(
            &window_title,
            options,
            Box::new(|_cc| Ok(Box::new(ScatterApp::new(scene)))),
        )
        .map_err(|e| PipelineError::Render(e.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn color_conversion() {
        assert_eq!(to_color32(Srgb::new(128, 0, 128)), Color32::from_rgb(128, 0, 128));
    }

    #[test]
    fn default_size_matches_reference_figure() {
        assert_eq!(WindowRenderer::default().size, [1000.0, 700.0]);
    }
}

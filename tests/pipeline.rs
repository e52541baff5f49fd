use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::Path;

use approx::assert_abs_diff_eq;
use assert_matches::assert_matches;
use log::Level;
use tempfile::TempDir;

use ftir_pca::data::model::FeatureAxis;
use ftir_pca::render::{ImageRenderer, ScatterRenderer, ScatterScene};
use ftir_pca::{pipeline, AlignmentStrategy, GroupSource, PipelineConfig, PipelineError};

/// Keeps every scene it is asked to draw.
#[derive(Default)]
struct RecordingRenderer {
    scenes: RefCell<Vec<ScatterScene>>,
}

impl ScatterRenderer for RecordingRenderer {
    fn render(&self, scene: &ScatterScene) -> ftir_pca::Result<()> {
        self.scenes.borrow_mut().push(scene.clone());
        Ok(())
    }
}

fn write_spectrum(dir: &Path, name: &str, lines: &[(f64, f64)]) {
    let text: String = lines.iter().map(|(w, t)| format!("{w}\t{t}\n")).collect();
    std::fs::write(dir.join(name), text).unwrap();
}

/// Four sites on overlapping but different grids.
fn four_sites(dir: &Path) -> PipelineConfig {
    let grid = |start: f64, step: f64, n: usize, f: &dyn Fn(f64) -> f64| {
        (0..n)
            .map(|i| {
                let wn = start - i as f64 * step;
                (wn, f(wn))
            })
            .collect::<Vec<_>>()
    };
    write_spectrum(dir, "LA1_Recife.txt", &grid(4000.0, 2.0, 50, &|w| 0.9 - (w - 3950.0).abs() * 1e-3));
    write_spectrum(dir, "LA2_Aldeia.txt", &grid(3990.0, 2.0, 40, &|w| 0.85 - (w - 3960.0).abs() * 1e-3));
    write_spectrum(dir, "LO.txt", &grid(4000.0, 4.0, 25, &|w| 0.6 + (w - 3950.0).abs() * 2e-3));
    write_spectrum(dir, "LG.txt", &grid(3980.0, 1.0, 60, &|w| 0.7 + (w - 3940.0) * 1e-3));
    PipelineConfig::reference_dataset(dir)
}

#[test]
fn reference_dataset_end_to_end() {
    let dir = TempDir::new().unwrap();
    let config = four_sites(dir.path());

    let out = pipeline::run(&config).unwrap();
    assert_eq!(out.matrix.nrows(), 4);
    assert_eq!(out.matrix.labels, vec!["LA1_Recife", "LA2_Aldeia", "LG", "LO"]);
    assert!(out.matrix.values.iter().all(|v| v.is_finite()));

    // Distinct wavenumbers across all four grids.
    let mut expected: Vec<f64> = Vec::new();
    for g in pipeline::load_groups(&config).unwrap() {
        expected.extend(g.reading.wavenumbers());
    }
    expected.sort_by(f64::total_cmp);
    expected.dedup();
    assert_eq!(out.matrix.features, FeatureAxis::Wavenumbers(expected));

    assert_eq!(out.projection.len(), 4);

    let renderer = RecordingRenderer::default();
    pipeline::visualize(&out.projection, &config, &renderer).unwrap();
    let scenes = renderer.scenes.borrow();
    assert_eq!(scenes.len(), 1);
    assert_eq!(scenes[0].title, "PCA of FTIR Data (All Samples)");
    assert_eq!(scenes[0].series.len(), 4);
    assert_eq!(scenes[0].point_count(), 4);
}

#[test]
fn two_group_scenario() {
    let dir = TempDir::new().unwrap();
    write_spectrum(dir.path(), "a.txt", &[(10.0, 0.5), (20.0, 0.6)]);
    write_spectrum(dir.path(), "b.txt", &[(10.0, 0.4), (30.0, 0.7)]);
    let config = PipelineConfig {
        groups: vec![
            GroupSource {
                label: "A".into(),
                path: dir.path().join("a.txt"),
            },
            GroupSource {
                label: "B".into(),
                path: dir.path().join("b.txt"),
            },
        ],
        colors: BTreeMap::new(),
        strategy: AlignmentStrategy::Pivot,
        title: None,
    };

    let out = pipeline::run(&config).unwrap();
    assert_eq!((out.matrix.nrows(), out.matrix.ncols()), (2, 3));
    let a = out.matrix.row_of("A").unwrap();
    assert_abs_diff_eq!(out.matrix.values[(a, 2)], 0.6);

    // Two observations: all variance on PC1, the points mirror each other.
    let p = &out.projection.points;
    assert_abs_diff_eq!(p[0].pc1, -p[1].pc1, epsilon = 1e-12);
    assert_abs_diff_eq!(p[0].pc2, 0.0, epsilon = 1e-12);
}

#[test]
fn missing_file_aborts_before_plotting() {
    let dir = TempDir::new().unwrap();
    let config = four_sites(dir.path());
    std::fs::remove_file(dir.path().join("LO.txt")).unwrap();

    let err = pipeline::run(&config).unwrap_err();
    assert_matches!(err, PipelineError::NotFound { ref path } if path.ends_with("LO.txt"));
    assert_eq!(err.stage(), "load");
}

#[test]
fn malformed_line_names_the_file() {
    let dir = TempDir::new().unwrap();
    let config = four_sites(dir.path());
    std::fs::write(dir.path().join("LG.txt"), "3980\t0.7\nabc\txyz\n").unwrap();

    let err = pipeline::run(&config).unwrap_err();
    assert_matches!(err, PipelineError::Parse { ref path, line: 2, .. } if path.ends_with("LG.txt"));
    assert!(err.to_string().contains("LG.txt"));
}

#[test]
fn missing_colour_fails_only_at_the_visualizer() {
    let dir = TempDir::new().unwrap();
    let mut config = four_sites(dir.path());
    config.colors.remove("LO");

    let out = pipeline::run(&config).unwrap();
    assert_eq!(out.projection.len(), 4);

    let renderer = RecordingRenderer::default();
    let err = pipeline::visualize(&out.projection, &config, &renderer).unwrap_err();
    assert_matches!(err, PipelineError::Config(ref m) if m.contains("'LO'"));
    assert!(renderer.scenes.borrow().is_empty());
}

#[test]
fn empty_group_is_a_data_error() {
    let dir = TempDir::new().unwrap();
    let config = four_sites(dir.path());
    std::fs::write(dir.path().join("LA2_Aldeia.txt"), "").unwrap();

    assert_matches!(pipeline::run(&config), Err(PipelineError::Data(_)));
}

#[test]
fn positional_mode_uses_truncated_labels() {
    let dir = TempDir::new().unwrap();
    let mut config = four_sites(dir.path());
    config.strategy = AlignmentStrategy::Positional;

    let out = pipeline::run(&config).unwrap();
    // Longest reading is LG with 60 points; one column per group.
    assert_eq!((out.matrix.nrows(), out.matrix.ncols()), (60, 4));
    assert!(out.matrix.approximate_labels);
    // First 60 of 50 x LA1_Recife, 40 x LA2_Aldeia, ...
    assert!(out.matrix.labels[..50].iter().all(|l| l == "LA1_Recife"));
    assert!(out.matrix.labels[50..].iter().all(|l| l == "LA2_Aldeia"));
    assert_eq!(out.projection.len(), 60);

    let renderer = RecordingRenderer::default();
    pipeline::visualize(&out.projection, &config, &renderer).unwrap();
    let scene = &renderer.scenes.borrow()[0];
    assert_eq!(scene.title, "PCA of FTIR Data");
    assert_eq!(scene.series.len(), 2);
    assert_eq!(scene.point_count(), 60);
}

#[test]
fn positional_mode_warns_once() {
    let dir = TempDir::new().unwrap();
    let mut config = four_sites(dir.path());
    config.strategy = AlignmentStrategy::Positional;

    testing_logger::setup();
    pipeline::run(&config).unwrap();
    testing_logger::validate(|captured_logs| {
        let warnings: Vec<_> = captured_logs
            .iter()
            .filter(|l| l.level == Level::Warn)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].body,
            "positional alignment: 175 reading labels truncated to 60 rows; labels are approximate"
        );
    });
}

#[test]
fn repeated_runs_agree_in_magnitude() {
    let dir = TempDir::new().unwrap();
    let config = four_sites(dir.path());
    let first = pipeline::run(&config).unwrap().projection;
    let second = pipeline::run(&config).unwrap().projection;
    for (a, b) in first.points.iter().zip(&second.points) {
        assert_eq!(a.label, b.label);
        assert_abs_diff_eq!(a.pc1.abs(), b.pc1.abs(), epsilon = 1e-12);
        assert_abs_diff_eq!(a.pc2.abs(), b.pc2.abs(), epsilon = 1e-12);
    }
}

#[test]
fn config_file_round_trip_drives_the_run() {
    let dir = TempDir::new().unwrap();
    let mut config = four_sites(dir.path());
    for group in &mut config.groups {
        group.path = group.path.file_name().unwrap().into();
    }
    let config_path = dir.path().join("config.json");
    config.save(&config_path).unwrap();

    let loaded = PipelineConfig::from_file(&config_path).unwrap();
    let out = pipeline::run(&loaded).unwrap();
    assert_eq!(out.matrix.nrows(), 4);
}

#[test]
fn bad_output_extension_is_reported() {
    let dir = TempDir::new().unwrap();
    let config = four_sites(dir.path());
    let out = pipeline::run(&config).unwrap();
    let renderer = ImageRenderer::new(dir.path().join("pca.gif"), (800, 600));
    assert_matches!(
        pipeline::visualize(&out.projection, &config, &renderer),
        Err(PipelineError::Config(_))
    );
}

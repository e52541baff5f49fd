use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ftir_pca::color::{generate_palette, to_hex};
use ftir_pca::{AlignmentStrategy, GroupSource, PipelineConfig};

/// Write synthetic FTIR transmittance spectra plus a matching config.json.
#[derive(Parser, Debug)]
struct Args {
    /// Output directory
    #[arg(default_value = "sample_data")]
    out_dir: PathBuf,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Box-Muller transform for normal distribution
fn gauss(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.random::<f64>().max(1e-15);
    let u2: f64 = rng.random();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

/// Transmittance: absorption bands dip below a flat baseline.
fn transmittance(wn: f64, bands: &[(f64, f64, f64)], noise: f64, rng: &mut StdRng) -> f64 {
    let absorbance: f64 = bands
        .iter()
        .map(|&(mu, sigma, amp)| gaussian(wn, mu, sigma, amp))
        .sum();
    (0.95 - absorbance + gauss(rng, 0.0, noise)).clamp(0.0, 1.0)
}

struct Site {
    label: &'static str,
    /// (start, stop, step) of the wavenumber grid, descending.
    grid: (f64, f64, f64),
    /// (centre, width, depth) of each band.
    bands: Vec<(f64, f64, f64)>,
}

fn sites() -> Vec<Site> {
    // Grids differ on purpose: shorter ranges, coarser and finer steps.
    vec![
        Site {
            label: "LA1_Recife",
            grid: (4000.0, 600.0, 2.0),
            bands: vec![(3400.0, 120.0, 0.35), (1630.0, 30.0, 0.20), (1030.0, 40.0, 0.45)],
        },
        Site {
            label: "LA2_Aldeia",
            grid: (3990.0, 650.0, 2.0),
            bands: vec![(3420.0, 110.0, 0.30), (1640.0, 35.0, 0.18), (1010.0, 45.0, 0.50)],
        },
        Site {
            label: "LO",
            grid: (4000.0, 600.0, 4.0),
            bands: vec![(3350.0, 140.0, 0.45), (2920.0, 25.0, 0.15), (1450.0, 40.0, 0.25)],
        },
        Site {
            label: "LG",
            grid: (3800.0, 400.0, 1.0),
            bands: vec![(3300.0, 150.0, 0.50), (2850.0, 20.0, 0.10), (1100.0, 60.0, 0.30)],
        },
    ]
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let sites = sites();
    let palette = generate_palette(sites.len());
    let mut config = PipelineConfig {
        groups: Vec::new(),
        colors: Default::default(),
        strategy: AlignmentStrategy::Pivot,
        title: None,
    };

    for (site, color) in sites.iter().zip(palette) {
        let file_name = format!("{}.txt", site.label);
        let path = args.out_dir.join(&file_name);
        let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        let mut out = BufWriter::new(file);

        let (start, stop, step) = site.grid;
        let n = ((start - stop) / step).round() as usize + 1;
        for i in 0..n {
            let wn = start - i as f64 * step;
            let t = transmittance(wn, &site.bands, 0.004, &mut rng);
            writeln!(out, "{wn:.1}\t{t:.5}")?;
        }
        out.flush()?;

        config.groups.push(GroupSource {
            label: site.label.to_string(),
            path: PathBuf::from(file_name),
        });
        config.colors.insert(site.label.to_string(), to_hex(color));
        println!("Wrote {n} points to {}", path.display());
    }

    let config_path = args.out_dir.join("config.json");
    config.save(&config_path)?;
    println!("Wrote {}", config_path.display());
    Ok(())
}

//! Loader → alignment → projector → visualizer, run once end to end.

use log::info;

use crate::config::PipelineConfig;
use crate::data::loader::load_group;
use crate::data::model::{AlignedMatrix, Projection, SampleGroup};
use crate::error::Result;
use crate::projector::project;
use crate::render::{ScatterRenderer, ScatterScene};

/// Intermediate products of one run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub matrix: AlignedMatrix,
    pub projection: Projection,
}

/// Load every configured group, in configuration order.
pub fn load_groups(config: &PipelineConfig) -> Result<Vec<SampleGroup>> {
    config
        .groups
        .iter()
        .map(|source| load_group(&source.label, &source.path))
        .collect()
}

/// Validate, load, align and project.
pub fn run(config: &PipelineConfig) -> Result<PipelineOutput> {
    config.validate()?;

    let groups = load_groups(config)?;
    info!("loaded {} sample groups", groups.len());

    let matrix = config.strategy.align(&groups)?;
    info!(
        "{} alignment: {} observations x {} features",
        config.strategy,
        matrix.nrows(),
        matrix.ncols()
    );

    let projection = project(&matrix)?;
    Ok(PipelineOutput { matrix, projection })
}

/// Resolve colours and hand the chart to a renderer.
pub fn visualize(
    projection: &Projection,
    config: &PipelineConfig,
    renderer: &dyn ScatterRenderer,
) -> Result<()> {
    let scene = ScatterScene::build(projection, &config.colors, config.title())?;
    renderer.render(&scene)
}

//! Run configuration: which file belongs to which group, how each group is
//! coloured, and which alignment to use. Built once and passed to every stage.

use std::collections::{BTreeMap, BTreeSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::align::AlignmentStrategy;
use crate::error::{PipelineError, Result};

/// One input file and the label of the group it measures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSource {
    pub label: String,
    pub path: PathBuf,
}

/// Expected JSON layout:
///
/// ```json
/// {
///   "groups": [
///     { "label": "LA1_Recife", "path": "LA1_Recife.txt" },
///     { "label": "LO",         "path": "LO.txt" }
///   ],
///   "colors": { "LA1_Recife": "blue", "LO": "red" },
///   "strategy": "pivot",
///   "title": "PCA of FTIR Data (All Samples)"
/// }
/// ```
///
/// `groups` is ordered; `strategy` and `title` are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub groups: Vec<GroupSource>,
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
    #[serde(default)]
    pub strategy: AlignmentStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Labels and colours of the site dataset this tool was written for.
const REFERENCE_GROUPS: [(&str, &str); 4] = [
    ("LA1_Recife", "blue"),
    ("LA2_Aldeia", "green"),
    ("LO", "red"),
    ("LG", "purple"),
];

impl PipelineConfig {
    /// The four-site dataset, reading `<label>.txt` from `data_dir`.
    pub fn reference_dataset(data_dir: &Path) -> Self {
        PipelineConfig {
            groups: REFERENCE_GROUPS
                .iter()
                .map(|(label, _)| GroupSource {
                    label: label.to_string(),
                    path: data_dir.join(format!("{label}.txt")),
                })
                .collect(),
            colors: REFERENCE_GROUPS
                .iter()
                .map(|(label, color)| (label.to_string(), color.to_string()))
                .collect(),
            strategy: AlignmentStrategy::default(),
            title: None,
        }
    }

    /// Read a JSON configuration. Relative group paths are resolved against
    /// the directory holding the configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => PipelineError::NotFound {
                path: path.to_path_buf(),
            },
            _ => PipelineError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        let mut config: PipelineConfig = serde_json::from_str(&text)
            .map_err(|e| PipelineError::Config(format!("{}: {e}", path.display())))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for group in &mut config.groups {
            if group.path.is_relative() {
                group.path = base.join(&group.path);
            }
        }
        debug!("read configuration with {} groups from {}", config.groups.len(), path.display());
        Ok(config)
    }

    /// Write the configuration as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| PipelineError::Config(e.to_string()))?;
        std::fs::write(path, text).map_err(|e| PipelineError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Startup checks: labels are present and unique, every input exists.
    /// Colour coverage is checked later, when the chart is built.
    pub fn validate(&self) -> Result<()> {
        if self.groups.is_empty() {
            return Err(PipelineError::Config("no sample groups configured".into()));
        }
        let mut seen = BTreeSet::new();
        for label in self.labels() {
            if label.trim().is_empty() {
                return Err(PipelineError::Config("a group has an empty label".into()));
            }
            if !seen.insert(label) {
                return Err(PipelineError::Config(format!(
                    "label '{label}' is configured more than once"
                )));
            }
        }
        if let Some(missing) = self.groups.iter().find(|g| !g.path.exists()) {
            return Err(PipelineError::NotFound {
                path: missing.path.clone(),
            });
        }
        Ok(())
    }

    /// Chart title, falling back to the strategy's default.
    pub fn title(&self) -> &str {
        self.title
            .as_deref()
            .unwrap_or_else(|| self.strategy.default_title())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.label.as_str())
    }
}

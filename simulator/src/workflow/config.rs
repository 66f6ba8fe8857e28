use crate::generator::preset::ScenePreset;
use anyhow::Context;
use scancore::render_interface::display::DEFAULT_TITLE;
use scancore::render_interface::Theme;
use scancore::SceneConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub seed: u64,
    /// Ticks to run in offline mode.
    pub ticks: u64,
    pub frame_ms: u64,
    pub theme: Theme,
    pub title: String,
    pub title_char_ms: u64,
    pub scene: SceneConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            ticks: 3600,
            frame_ms: 16,
            theme: Theme::Dark,
            title: DEFAULT_TITLE.to_string(),
            title_char_ms: 100,
            scene: SceneConfig::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(preset: ScenePreset, seed: u64, ticks: u64) -> Self {
        Self {
            seed,
            ticks,
            scene: preset.scene_config(),
            ..Default::default()
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }

    pub fn title_char_interval(&self) -> Duration {
        Duration::from_millis(self.title_char_ms.max(1))
    }
}

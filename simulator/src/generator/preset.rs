use clap::ValueEnum;
use scancore::SceneConfig;
use serde::{Deserialize, Serialize};

/// Named scene variants selectable from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ScenePreset {
    /// 15 degree cone, detections held on display for 3 s.
    #[default]
    Cone,
    /// 5 degree line, detections pulse and respawn at once.
    Line,
}

impl ScenePreset {
    pub fn scene_config(self) -> SceneConfig {
        match self {
            ScenePreset::Cone => SceneConfig::cone_variant(),
            ScenePreset::Line => SceneConfig::line_variant(),
        }
    }
}

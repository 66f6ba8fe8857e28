use scancore::render_interface::Theme;
use scancore::FrameReport;
use serde::{Deserialize, Serialize};

/// What the render surface polls: the latest frame plus overlay text.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VisualizationModel {
    #[serde(default)]
    pub frame: Option<FrameReport>,
    pub counter_text: String,
    pub counter_color: String,
    pub title: String,
    pub title_cursor: bool,
    pub theme: Theme,
}

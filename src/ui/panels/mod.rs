mod controls;
pub mod visualization;

pub use controls::{ControlsPanel, FrequencyChoice};
pub use visualization::VisualizationPanel;

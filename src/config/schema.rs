use serde::Deserialize;

use super::defaults::*;

/// Engine configuration: where plot artifacts land and the default plot
/// geometry handlers start from before per-request overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_plot_dir")]
    pub plot_dir: String,
    #[serde(default)]
    pub plots: PlotDefaults,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlotDefaults {
    #[serde(default = "default_plot_width")]
    pub width: u32,
    #[serde(default = "default_plot_height")]
    pub height: u32,
    #[serde(default = "default_plot_padding")]
    pub padding: u32,
    #[serde(default = "default_plot_legend")]
    pub legend: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plot_dir: default_plot_dir(),
            plots: PlotDefaults::default(),
        }
    }
}

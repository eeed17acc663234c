use super::schema::PlotDefaults;

pub(super) fn default_plot_dir() -> String {
    "plots".to_string()
}

pub(super) fn default_plot_width() -> u32 {
    800
}

pub(super) fn default_plot_height() -> u32 {
    600
}

pub(super) fn default_plot_padding() -> u32 {
    40
}

pub(super) fn default_plot_legend() -> bool {
    true
}

impl Default for PlotDefaults {
    fn default() -> Self {
        Self {
            width: default_plot_width(),
            height: default_plot_height(),
            padding: default_plot_padding(),
            legend: default_plot_legend(),
        }
    }
}

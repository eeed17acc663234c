use serde::Serialize;
use sha2::{Digest, Sha256};

/// Typed per-request options, one fresh value per request. Absent fields
/// fall back to handler- or engine-supplied defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub thumbnail: bool,
    pub thumb_width: Option<u32>,
    pub thumb_height: Option<u32>,
    pub plot_title: Option<String>,
    /// Always report in the base unit, regardless of magnitude.
    pub static_units: bool,
    /// Attach the retrieved dataset to the result next to the plot.
    pub include_report_data: bool,
}

impl ReportOptions {
    pub(crate) fn feed(&self, hasher: &mut Sha256) {
        feed_dimension(hasher, self.width);
        feed_dimension(hasher, self.height);
        feed_dimension(hasher, self.thumb_width);
        feed_dimension(hasher, self.thumb_height);
        hasher.update([
            self.thumbnail as u8,
            self.static_units as u8,
            self.include_report_data as u8,
        ]);
        match &self.plot_title {
            Some(title) => {
                hasher.update([1]);
                hasher.update((title.len() as u64).to_be_bytes());
                hasher.update(title.as_bytes());
            }
            None => hasher.update([0]),
        }
    }
}

fn feed_dimension(hasher: &mut Sha256, value: Option<u32>) {
    match value {
        Some(value) => {
            hasher.update([1]);
            hasher.update(value.to_be_bytes());
        }
        None => hasher.update([0]),
    }
}

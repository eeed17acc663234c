
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};

use crate::error::ReportError;
use crate::registry::ReportData;
use crate::render::PlotOutcome;

/// Single-flight memoization for one pipeline stage: at most one
/// concurrent computation per key, every other caller for the same key
/// waits for it. A failed computation is not cached; the next caller
/// recomputes.
struct StageCache<V> {
    cells: Mutex<HashMap<String, Arc<OnceCell<V>>>>,
}

impl<V: Clone> StageCache<V> {
    fn new() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
        }
    }

    async fn get_or_compute<F, Fut, E>(&self, key: &str, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let cell = {
            let mut cells = self.cells.lock().await;
            cells
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };
        let value = cell.get_or_try_init(compute).await?;
        Ok(value.clone())
    }

    async fn contains(&self, key: &str) -> bool {
        let cells = self.cells.lock().await;
        cells
            .get(key)
            .map(|cell| cell.initialized())
            .unwrap_or(false)
    }

    async fn clear(&self) {
        self.cells.lock().await.clear();
    }
}

/// Memoizes the two expensive stages of report generation, keyed by the
/// request's content hash. Eviction beyond [`clear`](Self::clear) is an
/// external retention policy.
pub struct ReportCache {
    data: StageCache<ReportData>,
    plots: StageCache<PlotOutcome>,
}

impl ReportCache {
    pub fn new() -> Self {
        Self {
            data: StageCache::new(),
            plots: StageCache::new(),
        }
    }

    pub(crate) async fn report_data<F, Fut>(
        &self,
        hash: &str,
        compute: F,
    ) -> Result<ReportData, ReportError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ReportData, ReportError>>,
    {
        self.data.get_or_compute(hash, compute).await
    }

    pub(crate) async fn rendered_plot<F, Fut>(
        &self,
        hash: &str,
        compute: F,
    ) -> Result<PlotOutcome, ReportError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<PlotOutcome, ReportError>>,
    {
        self.plots.get_or_compute(hash, compute).await
    }

    pub async fn has_report_data(&self, hash: &str) -> bool {
        self.data.contains(hash).await
    }

    pub async fn has_rendered_plot(&self, hash: &str) -> bool {
        self.plots.contains(hash).await
    }

    /// Drop every entry of both stages together.
    pub async fn clear(&self) {
        self.data.clear().await;
        self.plots.clear().await;
    }
}

impl Default for ReportCache {
    fn default() -> Self {
        Self::new()
    }
}

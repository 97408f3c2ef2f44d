use serde::Serialize;

use crate::slurm::error::CollectError;
use crate::slurm::inventory::InventoryFetcher;
use crate::slurm::sinfo;

pub(crate) const TOTAL_ARGS: &[&str] = &["--json"];
pub(crate) const ALLOCATED_ARGS: &[&str] = &["-a", "--json", "--state=allocated"];

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct GpusMetrics {
    pub(crate) alloc: f64,
    pub(crate) idle: f64,
    pub(crate) total: f64,
    pub(crate) utilization: f64,
}

impl GpusMetrics {
    /// Idle is not clamped: inconsistent queries can make it negative.
    pub(crate) fn from_counts(total: f64, alloc: f64) -> Self {
        let utilization = if total > 0.0 { alloc / total } else { 0.0 };

        GpusMetrics {
            alloc,
            idle: total - alloc,
            total,
            utilization,
        }
    }
}

pub(crate) fn fetch_total_gpus(fetcher: &dyn InventoryFetcher) -> Result<f64, CollectError> {
    let output = fetcher.fetch(TOTAL_ARGS)?;

    Ok(sinfo::parse_total_gpus(&output))
}

pub(crate) fn fetch_allocated_gpus(fetcher: &dyn InventoryFetcher) -> Result<f64, CollectError> {
    let output = fetcher.fetch(ALLOCATED_ARGS)?;

    Ok(sinfo::parse_allocated_gpus(&output))
}

/// Runs both inventory queries, one after the other, and derives the gauges.
pub(crate) fn collect(fetcher: &dyn InventoryFetcher) -> Result<GpusMetrics, CollectError> {
    let total = fetch_total_gpus(fetcher)?;
    let alloc = fetch_allocated_gpus(fetcher)?;

    Ok(GpusMetrics::from_counts(total, alloc))
}

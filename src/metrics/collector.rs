use std::sync::Arc;

use prometheus_client::collector::Collector;
use prometheus_client::encoding::{DescriptorEncoder, EncodeMetric};
use prometheus_client::metrics::gauge::ConstGauge;
use prometheus_client::registry::Registry;

use crate::config::config::Config;
use crate::metrics::snapshot::{self, GpusMetrics};
use crate::slurm::error::CollectError;
use crate::slurm::inventory::InventoryFetcher;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MetricDescriptor {
    pub(crate) name: &'static str,
    pub(crate) help: &'static str,
}

/// The four unlabeled GPU gauges, in exposition order.
#[derive(Debug, Clone)]
pub(crate) struct GpuDescriptors {
    alloc: MetricDescriptor,
    idle: MetricDescriptor,
    total: MetricDescriptor,
    utilization: MetricDescriptor,
}

impl GpuDescriptors {
    pub(crate) fn new() -> Self {
        GpuDescriptors {
            alloc: MetricDescriptor { name: "slurm_gpus_alloc", help: "Allocated GPUs" },
            idle: MetricDescriptor { name: "slurm_gpus_idle", help: "Idle GPUs" },
            total: MetricDescriptor { name: "slurm_gpus_total", help: "Total GPUs" },
            utilization: MetricDescriptor { name: "slurm_gpus_utilization", help: "Total GPU utilization" },
        }
    }

    pub(crate) fn all(&self) -> [MetricDescriptor; 4] {
        [self.alloc, self.idle, self.total, self.utilization]
    }

    pub(crate) fn samples(&self, metrics: &GpusMetrics) -> Vec<(MetricDescriptor, f64)> {
        vec![
            (self.alloc, metrics.alloc),
            (self.idle, metrics.idle),
            (self.total, metrics.total),
            (self.utilization, metrics.utilization),
        ]
    }
}

#[derive(Debug)]
pub(crate) struct GpusCollector {
    descriptors: GpuDescriptors,
    fetcher: Arc<dyn InventoryFetcher>,
}

impl GpusCollector {
    pub(crate) fn new(fetcher: Arc<dyn InventoryFetcher>) -> Self {
        GpusCollector {
            descriptors: GpuDescriptors::new(),
            fetcher,
        }
    }

    /// Descriptors only; the inventory command is not run.
    pub(crate) fn describe(&self) -> [MetricDescriptor; 4] {
        self.descriptors.all()
    }

    /// Runs the full pipeline and pairs every descriptor with its fresh value.
    pub(crate) fn collect(&self) -> Result<Vec<(MetricDescriptor, f64)>, CollectError> {
        let metrics = snapshot::collect(self.fetcher.as_ref())?;

        Ok(self.descriptors.samples(&metrics))
    }
}

impl Collector for GpusCollector {
    fn encode(&self, mut encoder: DescriptorEncoder) -> Result<(), std::fmt::Error> {
        let samples = match self.collect() {
            Ok(samples) => samples,
            Err(err) => {
                error!("Failed to collect GPU metrics: {}", err);
                return Ok(());
            }
        };

        for (descriptor, value) in samples {
            let gauge = ConstGauge::new(value);
            let metric_encoder = encoder.encode_descriptor(
                descriptor.name,
                descriptor.help,
                None,
                gauge.metric_type(),
            )?;
            gauge.encode(metric_encoder)?;
        }

        Ok(())
    }
}

/// Registry holding the gauges of an already collected snapshot.
pub(crate) fn snapshot_registry(metrics: &GpusMetrics) -> Registry {
    let mut registry = Registry::default();

    for (descriptor, value) in GpuDescriptors::new().samples(metrics) {
        registry.register(descriptor.name, descriptor.help, ConstGauge::new(value));
    }

    registry
}

pub(crate) fn build_registry(configuration: &Config, fetcher: Arc<dyn InventoryFetcher>) -> Registry {
    let mut registry = Registry::default();

    if configuration.gpus.enabled {
        debug!("Register GPU collector");
        registry.register_collector(Box::new(GpusCollector::new(fetcher)));
    }

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus_client::encoding::text::encode;
    use crate::fixtures::sinfo::{cluster_fetcher, CannedFetcher};

    fn sample_value(body: &str, name: &str) -> Option<f64> {
        body.lines()
            .find(|line| line.starts_with(&format!("{} ", name)))
            .and_then(|line| line.split_whitespace().nth(1))
            .and_then(|value| value.parse::<f64>().ok())
    }

    #[test]
    fn test_describe_does_not_fetch() {
        let fetcher = Arc::new(cluster_fetcher());
        let collector = GpusCollector::new(fetcher.clone());

        let names: Vec<&str> = collector.describe().iter().map(|d| d.name).collect();

        assert_eq!(names, vec![
            "slurm_gpus_alloc",
            "slurm_gpus_idle",
            "slurm_gpus_total",
            "slurm_gpus_utilization",
        ]);
        assert_eq!(fetcher.calls(), 0);
    }

    #[test]
    fn test_collect_samples() {
        let collector = GpusCollector::new(Arc::new(cluster_fetcher()));
        let samples = collector.collect().unwrap();

        let values: Vec<(&str, f64)> = samples.iter().map(|(d, v)| (d.name, *v)).collect();
        assert_eq!(values, vec![
            ("slurm_gpus_alloc", 3.0),
            ("slurm_gpus_idle", 3.0),
            ("slurm_gpus_total", 6.0),
            ("slurm_gpus_utilization", 0.5),
        ]);
    }

    #[test]
    fn test_every_scrape_runs_the_pipeline() {
        let fetcher = Arc::new(cluster_fetcher());
        let collector = GpusCollector::new(fetcher.clone());

        collector.collect().unwrap();
        collector.collect().unwrap();

        assert_eq!(fetcher.calls(), 4);
    }

    #[test]
    fn test_encode_registry() {
        let registry = build_registry(&Config::default(), Arc::new(cluster_fetcher()));

        let mut body = String::new();
        encode(&mut body, &registry).unwrap();

        assert!(body.contains("# TYPE slurm_gpus_alloc gauge"));
        assert_eq!(sample_value(&body, "slurm_gpus_alloc"), Some(3.0));
        assert_eq!(sample_value(&body, "slurm_gpus_idle"), Some(3.0));
        assert_eq!(sample_value(&body, "slurm_gpus_total"), Some(6.0));
        assert_eq!(sample_value(&body, "slurm_gpus_utilization"), Some(0.5));
    }

    #[test]
    fn test_encode_with_failing_fetch() {
        let registry = build_registry(&Config::default(), Arc::new(CannedFetcher::failing()));

        let mut body = String::new();
        encode(&mut body, &registry).unwrap();

        assert!(!body.contains("slurm_gpus"));
    }

    #[test]
    fn test_snapshot_registry() {
        let registry = snapshot_registry(&GpusMetrics::from_counts(8.0, 2.0));

        let mut body = String::new();
        encode(&mut body, &registry).unwrap();

        assert!(body.contains("# TYPE slurm_gpus_total gauge"));
        assert_eq!(sample_value(&body, "slurm_gpus_alloc"), Some(2.0));
        assert_eq!(sample_value(&body, "slurm_gpus_idle"), Some(6.0));
        assert_eq!(sample_value(&body, "slurm_gpus_total"), Some(8.0));
        assert_eq!(sample_value(&body, "slurm_gpus_utilization"), Some(0.25));
    }

    #[test]
    fn test_registry_without_gpus() {
        let mut configuration = Config::default();
        configuration.gpus.enabled = false;
        let fetcher = Arc::new(cluster_fetcher());
        let registry = build_registry(&configuration, fetcher.clone());

        let mut body = String::new();
        encode(&mut body, &registry).unwrap();

        assert!(!body.contains("slurm_gpus"));
        assert_eq!(fetcher.calls(), 0);
    }
}

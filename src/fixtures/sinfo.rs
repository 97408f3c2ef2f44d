use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;

use crate::metrics::snapshot::{ALLOCATED_ARGS, TOTAL_ARGS};
use crate::slurm::error::CollectError;
use crate::slurm::inventory::InventoryFetcher;

/// Builds a `sinfo --json` payload from `(name, gres total, gres used)` rows.
pub(crate) fn sinfo_json(nodes: &[(&str, &str, &str)]) -> Vec<u8> {
    let nodes: Vec<serde_json::Value> = nodes
        .iter()
        .map(|(name, total, used)| {
            json!({
                "name": name,
                "gres": { "total": total, "used": used },
                "state": ["IDLE"],
            })
        })
        .collect();

    serde_json::to_vec(&json!({ "sinfo": nodes })).unwrap()
}

/// Answers fetches from canned payloads keyed by the joined argument list.
#[derive(Debug, Default)]
pub(crate) struct CannedFetcher {
    responses: HashMap<String, Vec<u8>>,
    calls: AtomicUsize,
}

impl CannedFetcher {
    pub(crate) fn new(total: Vec<u8>, allocated: Vec<u8>) -> Self {
        let mut responses = HashMap::new();
        responses.insert(TOTAL_ARGS.join(" "), total);
        responses.insert(ALLOCATED_ARGS.join(" "), allocated);

        CannedFetcher { responses, calls: AtomicUsize::new(0) }
    }

    /// Every fetch fails as if the command exited non-zero.
    pub(crate) fn failing() -> Self {
        CannedFetcher::default()
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl InventoryFetcher for CannedFetcher {
    fn fetch(&self, args: &[&str]) -> Result<Vec<u8>, CollectError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let key = args.join(" ");
        self.responses
            .get(&key)
            .cloned()
            .ok_or_else(|| CollectError::CommandExited(format!("sinfo {}: exit status: 1", key)))
    }
}

/// Three nodes with `gpu:4`, `gpu:2` and no GPU; one allocated node using `gpu:3`.
pub(crate) fn cluster_fetcher() -> CannedFetcher {
    CannedFetcher::new(
        sinfo_json(&[
            ("gpu01", "gpu:4", ""),
            ("gpu02", "gpu:2", ""),
            ("cpu01", "", ""),
        ]),
        sinfo_json(&[("gpu01", "gpu:4", "gpu:3")]),
    )
}

use serde::{Deserialize, Deserializer};

use crate::slurm::error::CollectError;
use crate::slurm::gres;

#[derive(Deserialize, Debug, Default)]
pub(crate) struct SinfoResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) sinfo: Vec<SinfoNode>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub(crate) struct SinfoNode {
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) gres: GresInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) state: Vec<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub(crate) struct GresInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) total: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) used: String,
}

/// `null` decodes like a missing field: `"used": null` is an empty string,
/// `"state": null` an empty list.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let value = Option::<T>::deserialize(deserializer)?;

    Ok(value.unwrap_or_default())
}

pub(crate) fn decode_nodes(data: &[u8]) -> Result<Vec<SinfoNode>, CollectError> {
    let response: SinfoResponse = serde_json::from_slice(data)?;

    Ok(response.sinfo)
}

/// Total GPUs declared by every node of an unfiltered inventory.
pub(crate) fn parse_total_gpus(data: &[u8]) -> f64 {
    sum_gpus(data, |gres| gres.total.as_str())
}

/// GPUs in use, read from an inventory already filtered on allocated nodes.
pub(crate) fn parse_allocated_gpus(data: &[u8]) -> f64 {
    sum_gpus(data, |gres| gres.used.as_str())
}

// A payload that does not decode counts as zero GPUs.
fn sum_gpus(data: &[u8], descriptor: fn(&GresInfo) -> &str) -> f64 {
    let nodes = match decode_nodes(data) {
        Ok(nodes) => nodes,
        Err(err) => {
            error!("Failed to parse JSON: {}", err);
            return 0.0;
        }
    };

    let mut num_gpus = 0.0;

    for node in nodes.iter() {
        let gres = descriptor(&node.gres);

        if !gres::has_gpus(gres) {
            continue;
        }

        let count = gres::count_gpus(gres);
        debug!("Node {} [{}] has {} GPUs in '{}'", node.name, node.state.join(","), count, gres);
        num_gpus += count as f64;
    }

    num_gpus
}

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // "gpu:4", "gpu:A100:8", "gpu:a30:2(S:0-1)"
    // ASCII digits only, like RE2's \d
    static ref GPU_GRES: Regex = Regex::new(r"gpu:(?:[^:]*:)?([0-9]+)").unwrap();
}

/// Sums every GPU count found in a GRES descriptor such as
/// `gpu:A100:8,gpu:V100:2`. Anything that does not match counts as zero.
pub(crate) fn count_gpus(descriptor: &str) -> u64 {
    GPU_GRES
        .captures_iter(descriptor)
        .filter_map(|captures| captures.get(1))
        .filter_map(|count| count.as_str().parse::<u64>().ok())
        .sum()
}

pub(crate) fn has_gpus(descriptor: &str) -> bool {
    !descriptor.is_empty() && descriptor.contains("gpu:")
}

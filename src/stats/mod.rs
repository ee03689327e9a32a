//! Time-shift statistics
//!
//! Per-node inter-event time gaps, used downstream as normalization priors
//! for temporal models. A single forward pass over interactions sorted by
//! timestamp tracks, separately for the source role and the destination role,
//! when each node was last seen; each interaction contributes the gap since
//! that node's previous appearance in the same role. Unseen nodes default to
//! a last-seen time of 0, so a node's first gap is its first timestamp.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Mean and standard deviation of per-node inter-event gaps
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeShiftStatistics {
    /// Mean gap between a source node's consecutive interactions
    pub mean_src: f64,
    /// Standard deviation of source gaps
    pub std_src: f64,
    /// Mean gap between a destination node's consecutive interactions
    pub mean_dst: f64,
    /// Standard deviation of destination gaps
    pub std_dst: f64,
}

/// Raw gap sequences, one entry per interaction
pub fn time_shift_gaps(
    sources: &[u64],
    destinations: &[u64],
    timestamps: &[f64],
) -> (Vec<f64>, Vec<f64>) {
    assert_eq!(sources.len(), destinations.len());
    assert_eq!(sources.len(), timestamps.len());

    let mut last_seen_src: HashMap<u64, f64> = HashMap::new();
    let mut last_seen_dst: HashMap<u64, f64> = HashMap::new();
    let mut gaps_src = Vec::with_capacity(sources.len());
    let mut gaps_dst = Vec::with_capacity(sources.len());

    for k in 0..sources.len() {
        let ts = timestamps[k];
        let last_src = last_seen_src.get(&sources[k]).copied().unwrap_or(0.0);
        let last_dst = last_seen_dst.get(&destinations[k]).copied().unwrap_or(0.0);

        gaps_src.push(ts - last_src);
        gaps_dst.push(ts - last_dst);

        last_seen_src.insert(sources[k], ts);
        last_seen_dst.insert(destinations[k], ts);
    }

    (gaps_src, gaps_dst)
}

/// Compute time-shift statistics over interactions sorted by timestamp
pub fn compute_time_shift_statistics(
    sources: &[u64],
    destinations: &[u64],
    timestamps: &[f64],
) -> TimeShiftStatistics {
    let (gaps_src, gaps_dst) = time_shift_gaps(sources, destinations, timestamps);

    let (mean_src, std_src) = mean_std(&gaps_src);
    let (mean_dst, std_dst) = mean_std(&gaps_dst);

    TimeShiftStatistics {
        mean_src,
        std_src,
        mean_dst,
        std_dst,
    }
}

/// Population mean and standard deviation
fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

    (mean, variance.sqrt())
}

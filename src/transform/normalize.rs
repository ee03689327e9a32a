//! Edge weight normalization
//!
//! Three stateless transforms over the weight column: global min-max
//! rescaling, logarithmic compression with a floor, and per-node proportional
//! normalization grouped by (node, timestamp).

use hashbrown::HashMap;

use crate::data::Interaction;

/// Floor applied after the logarithm so small or zero weights survive
pub const LOG_WEIGHT_FLOOR: f64 = 0.001;

/// Which endpoint of an interaction a per-node normalization groups by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// Group by source node (outgoing weight per node and timestamp)
    Source,
    /// Group by destination node (incoming weight per node and timestamp)
    Destination,
}

/// Rescale weights into `[range.0, range.1]` using the global min and max
///
/// Degenerate input where every weight is equal maps to the lower bound.
pub fn min_max_scale(weights: &[f64], range: (f64, f64)) -> Vec<f64> {
    if weights.is_empty() {
        return Vec::new();
    }

    let min = weights.iter().copied().fold(f64::INFINITY, f64::min);
    let max = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    let (lo, hi) = range;

    weights
        .iter()
        .map(|&w| {
            if span > 0.0 {
                (w - min) / span * (hi - lo) + lo
            } else {
                lo
            }
        })
        .collect()
}

/// Replace each weight `w` with `max(log10(w), 0.001)`
///
/// The floor keeps weights at or below 1 (including zero) from collapsing to
/// negative or undefined values.
pub fn logarithmize(weights: &[f64]) -> Vec<f64> {
    weights.iter().map(|&w| w.log10().max(LOG_WEIGHT_FLOOR)).collect()
}

/// Per-node proportional normalization, grouped by (node, timestamp)
///
/// For every group whose weight sum is nonzero, each weight becomes its share
/// of the group total; zero-sum groups are left unchanged. Group sums are
/// computed from the `weights` snapshot and results written to a fresh output
/// buffer, so no group ever reads another group's rescaled values.
pub fn normalize_per_node(rows: &[Interaction], weights: &[f64], role: NodeRole) -> Vec<f64> {
    assert_eq!(
        rows.len(),
        weights.len(),
        "weight snapshot must match table length"
    );

    let mut group_sums: HashMap<(u64, u64), f64> = HashMap::new();
    for (row, &w) in rows.iter().zip(weights) {
        let key = group_key(row, role);
        *group_sums.entry(key).or_insert(0.0) += w;
    }

    rows.iter()
        .zip(weights)
        .map(|(row, &w)| {
            let sum = group_sums[&group_key(row, role)];
            if sum != 0.0 {
                w / sum
            } else {
                w
            }
        })
        .collect()
}

fn group_key(row: &Interaction, role: NodeRole) -> (u64, u64) {
    let node = match role {
        NodeRole::Source => row.source,
        NodeRole::Destination => row.destination,
    };
    (node, row.timestamp.to_bits())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(source: u64, destination: u64, timestamp: f64, weight: f64) -> Interaction {
        Interaction {
            source,
            destination,
            timestamp,
            edge_idx: 0,
            label: 0,
            weight,
        }
    }

    #[test]
    fn test_min_max_maps_endpoints() {
        let weights = vec![2.0, 5.0, 8.0, 11.0];
        let scaled = min_max_scale(&weights, (0.0, 10.0));

        assert!((scaled[0] - 0.0).abs() < 1e-12);
        assert!((scaled[3] - 10.0).abs() < 1e-12);
        assert!(scaled.iter().all(|&v| (0.0..=10.0).contains(&v)));
    }

    #[test]
    fn test_min_max_degenerate_input() {
        let weights = vec![3.0, 3.0, 3.0];
        let scaled = min_max_scale(&weights, (0.0, 10.0));
        assert_eq!(scaled, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_logarithmize_floor() {
        let weights = vec![0.0, 0.5, 1.0, 100.0];
        let logged = logarithmize(&weights);

        assert!(logged.iter().all(|&v| v >= LOG_WEIGHT_FLOOR));
        assert!((logged[3] - 2.0).abs() < 1e-12);
        // log10 of anything at or below 1 lands on the floor
        assert_eq!(logged[0], LOG_WEIGHT_FLOOR);
        assert_eq!(logged[1], LOG_WEIGHT_FLOOR);
        assert_eq!(logged[2], LOG_WEIGHT_FLOOR);
    }

    #[test]
    fn test_per_node_groups_sum_to_one() {
        let rows = vec![
            row(1, 2, 10.0, 2.0),
            row(1, 3, 10.0, 6.0),
            row(1, 4, 20.0, 5.0),
            row(2, 4, 10.0, 3.0),
        ];
        let weights: Vec<f64> = rows.iter().map(|r| r.weight).collect();
        let normalized = normalize_per_node(&rows, &weights, NodeRole::Source);

        // Node 1 at t=10 has total 8.0 split 2/6
        assert!((normalized[0] - 0.25).abs() < 1e-12);
        assert!((normalized[1] - 0.75).abs() < 1e-12);
        // Singleton groups normalize to 1
        assert!((normalized[2] - 1.0).abs() < 1e-12);
        assert!((normalized[3] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_per_node_zero_sum_group_unchanged() {
        let rows = vec![row(1, 2, 10.0, 0.0), row(1, 3, 10.0, 0.0)];
        let weights: Vec<f64> = rows.iter().map(|r| r.weight).collect();
        let normalized = normalize_per_node(&rows, &weights, NodeRole::Source);
        assert_eq!(normalized, vec![0.0, 0.0]);
    }

    #[test]
    fn test_per_node_destination_grouping() {
        let rows = vec![
            row(1, 5, 10.0, 1.0),
            row(2, 5, 10.0, 3.0),
            row(3, 6, 10.0, 4.0),
        ];
        let weights: Vec<f64> = rows.iter().map(|r| r.weight).collect();
        let normalized = normalize_per_node(&rows, &weights, NodeRole::Destination);

        assert!((normalized[0] - 0.25).abs() < 1e-12);
        assert!((normalized[1] - 0.75).abs() < 1e-12);
        assert!((normalized[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_per_node_reads_snapshot_not_output() {
        // Two groups sharing a node across timestamps; normalizing the first
        // group must not affect the sums seen by the second.
        let rows = vec![
            row(1, 2, 10.0, 4.0),
            row(1, 3, 10.0, 4.0),
            row(1, 2, 20.0, 4.0),
            row(1, 3, 20.0, 12.0),
        ];
        let weights: Vec<f64> = rows.iter().map(|r| r.weight).collect();
        let normalized = normalize_per_node(&rows, &weights, NodeRole::Source);

        assert!((normalized[0] - 0.5).abs() < 1e-12);
        assert!((normalized[1] - 0.5).abs() < 1e-12);
        assert!((normalized[2] - 0.25).abs() < 1e-12);
        assert!((normalized[3] - 0.75).abs() < 1e-12);
    }
}

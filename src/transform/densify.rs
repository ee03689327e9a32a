//! Full-graph densification
//!
//! Materializes an edge between every ordered pair of nodes at every distinct
//! timestamp, so the graph is complete at each instant. Pairs absent from the
//! original table get weight 0; existing edges keep their weight. All output
//! rows carry label 0 and contiguous 1-based edge ids.

use hashbrown::HashMap;

use crate::data::{Interaction, InteractionTable};

/// Densify an interaction table over the global node set
///
/// The node set crossed at each timestamp is the table's global set of nodes,
/// not the subset active at that instant, so downstream consumers see the
/// same pair universe at every time step; restricting to per-timestamp active
/// nodes would shrink the output and is the obvious optimization if T·|V|²
/// rows become the bottleneck. The output is built one timestamp chunk at a
/// time, so the only quadratic allocation is the output table itself.
pub fn densify(table: &InteractionTable) -> InteractionTable {
    let nodes: Vec<u64> = table.node_set().into_iter().collect();
    let timestamps = table.distinct_timestamps();

    // Frozen weight lookup keyed on (source, destination, timestamp)
    let mut existing: HashMap<(u64, u64, u64), f64> =
        HashMap::with_capacity(table.len());
    for row in table.rows() {
        existing.insert(
            (row.source, row.destination, row.timestamp.to_bits()),
            row.weight,
        );
    }

    let mut rows = Vec::with_capacity(timestamps.len() * nodes.len() * nodes.len());
    let mut edge_idx = 1;

    for &t in &timestamps {
        let t_bits = t.to_bits();
        for &x in &nodes {
            for &y in &nodes {
                let weight = existing.get(&(x, y, t_bits)).copied().unwrap_or(0.0);
                rows.push(Interaction {
                    source: x,
                    destination: y,
                    timestamp: t,
                    edge_idx,
                    label: 0,
                    weight,
                });
                edge_idx += 1;
            }
        }
    }

    InteractionTable::new(rows)
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
            label: 7,
            weight,
        }
    }

    #[test]
    fn test_densify_row_count() {
        // 3 nodes over 2 timestamps: 2 * 3^2 = 18 rows
        let table = InteractionTable::new(vec![
            row(1, 2, 10.0, 1.0),
            row(2, 3, 10.0, 2.0),
            row(1, 3, 20.0, 3.0),
        ]);

        let dense = densify(&table);
        assert_eq!(dense.len(), 18);

        let per_ts = dense
            .rows()
            .iter()
            .filter(|r| r.timestamp == 10.0)
            .count();
        assert_eq!(per_ts, 9);
    }

    #[test]
    fn test_densify_preserves_existing_weights() {
        let table = InteractionTable::new(vec![row(1, 2, 10.0, 1.5), row(2, 1, 10.0, 2.5)]);
        let dense = densify(&table);

        for r in dense.rows() {
            let expected = match (r.source, r.destination) {
                (1, 2) => 1.5,
                (2, 1) => 2.5,
                _ => 0.0,
            };
            assert_eq!(r.weight, expected);
        }
    }

    #[test]
    fn test_densify_zero_fills_missing_pairs() {
        let table = InteractionTable::new(vec![row(1, 2, 10.0, 1.0)]);
        let dense = densify(&table);

        // 2 nodes, 1 timestamp: self-loops and the reverse pair get weight 0
        assert_eq!(dense.len(), 4);
        let zero_count = dense.rows().iter().filter(|r| r.weight == 0.0).count();
        assert_eq!(zero_count, 3);
    }

    #[test]
    fn test_densify_labels_and_edge_idxs() {
        let table = InteractionTable::new(vec![row(1, 2, 10.0, 1.0), row(2, 1, 20.0, 2.0)]);
        let dense = densify(&table);

        assert!(dense.rows().iter().all(|r| r.label == 0));
        let idxs: Vec<usize> = dense.rows().iter().map(|r| r.edge_idx).collect();
        let expected: Vec<usize> = (1..=dense.len()).collect();
        assert_eq!(idxs, expected);
    }

    #[test]
    fn test_densify_uses_global_node_set_every_timestamp() {
        // Node 3 only appears at t=20 but is crossed at t=10 as well
        let table = InteractionTable::new(vec![row(1, 2, 10.0, 1.0), row(3, 1, 20.0, 2.0)]);
        let dense = densify(&table);

        assert_eq!(dense.len(), 2 * 9);
        assert!(dense
            .rows()
            .iter()
            .any(|r| r.source == 3 && r.timestamp == 10.0));
    }
}

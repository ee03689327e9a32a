//! Core data types for temporal interaction graphs
//!
//! This module defines the fundamental structures used throughout the library:
//! - Interaction: a single timestamped edge between two nodes
//! - InteractionTable: the mutable working table the transform pipeline operates on
//! - InteractionData: an immutable columnar store produced for each split

use std::collections::{BTreeSet, HashSet};

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::stats::{compute_time_shift_statistics, TimeShiftStatistics};

/// A single timestamped interaction between a source and a destination node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Source node id
    pub source: u64,
    /// Destination node id
    pub destination: u64,
    /// Event time
    pub timestamp: f64,
    /// Unique 1-based interaction id
    pub edge_idx: usize,
    /// Classification label
    pub label: i64,
    /// Edge weight
    pub weight: f64,
}

/// Working table of interactions, ordered by timestamp
///
/// The transform pipeline (positive-edge filtering, densification, weight
/// normalization) mutates this table; the splitter consumes it read-only and
/// produces immutable [`InteractionData`] stores.
#[derive(Debug, Clone, Default)]
pub struct InteractionTable {
    rows: Vec<Interaction>,
}

impl InteractionTable {
    /// Create a table from rows, preserving their order
    pub fn new(rows: Vec<Interaction>) -> Self {
        Self { rows }
    }

    /// Create a table from rows sorted by ascending timestamp
    pub fn from_unsorted(mut rows: Vec<Interaction>) -> Self {
        rows.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        Self { rows }
    }

    /// Number of interactions
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Borrow the rows
    pub fn rows(&self) -> &[Interaction] {
        &self.rows
    }

    /// Timestamp column
    pub fn timestamps(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.timestamp).collect()
    }

    /// Weight column
    pub fn weights(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.weight).collect()
    }

    /// Overwrite the weight column
    pub fn set_weights(&mut self, weights: &[f64]) {
        assert_eq!(
            weights.len(),
            self.rows.len(),
            "weight column must match table length"
        );
        for (row, &w) in self.rows.iter_mut().zip(weights) {
            row.weight = w;
        }
    }

    /// Distinct timestamps in order of first appearance
    pub fn distinct_timestamps(&self) -> Vec<f64> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for row in &self.rows {
            if seen.insert(row.timestamp.to_bits()) {
                out.push(row.timestamp);
            }
        }
        out
    }

    /// Sorted set of all node ids appearing as source or destination
    pub fn node_set(&self) -> BTreeSet<u64> {
        let mut nodes = BTreeSet::new();
        for row in &self.rows {
            nodes.insert(row.source);
            nodes.insert(row.destination);
        }
        nodes
    }

    /// Drop interactions with weight 0 and renumber edge ids contiguously from 1
    pub fn retain_positive(&mut self) {
        self.rows.retain(|r| r.weight != 0.0);
        self.renumber_edges();
    }

    /// Assign contiguous 1-based edge ids in row order
    pub fn renumber_edges(&mut self) {
        for (k, row) in self.rows.iter_mut().enumerate() {
            row.edge_idx = k + 1;
        }
    }
}

/// Immutable columnar store holding one split of interaction data
///
/// All parallel sequences share the same length; edge ids are unique within
/// one store. Constructed once from a boolean mask over a parent table and
/// never mutated afterwards.
#[derive(Debug, Clone)]
pub struct InteractionData {
    /// Source node ids
    pub sources: Vec<u64>,
    /// Destination node ids
    pub destinations: Vec<u64>,
    /// Event times
    pub timestamps: Vec<f64>,
    /// Unique interaction ids
    pub edge_idxs: Vec<usize>,
    /// Classification labels
    pub labels: Vec<i64>,
    /// Per-interaction feature vectors, one row per interaction
    pub edge_features: Option<Array2<f64>>,
    unique_nodes: HashSet<u64>,
}

impl InteractionData {
    /// Build a store from the rows of `table` selected by `mask`
    ///
    /// When `edge_features` is given, its rows are aligned positionally with
    /// the table and sliced by the same mask.
    pub fn from_table(
        table: &InteractionTable,
        edge_features: Option<&Array2<f64>>,
        mask: &[bool],
    ) -> Self {
        assert_eq!(mask.len(), table.len(), "mask must match table length");
        if let Some(features) = edge_features {
            assert_eq!(
                features.nrows(),
                table.len(),
                "edge feature rows must match table length"
            );
        }

        let selected: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(k, &keep)| keep.then_some(k))
            .collect();

        let rows = table.rows();
        let mut sources = Vec::with_capacity(selected.len());
        let mut destinations = Vec::with_capacity(selected.len());
        let mut timestamps = Vec::with_capacity(selected.len());
        let mut edge_idxs = Vec::with_capacity(selected.len());
        let mut labels = Vec::with_capacity(selected.len());
        let mut unique_nodes = HashSet::new();

        for &k in &selected {
            let row = rows[k];
            sources.push(row.source);
            destinations.push(row.destination);
            timestamps.push(row.timestamp);
            edge_idxs.push(row.edge_idx);
            labels.push(row.label);
            unique_nodes.insert(row.source);
            unique_nodes.insert(row.destination);
        }

        debug_assert_eq!(
            edge_idxs.iter().collect::<HashSet<_>>().len(),
            edge_idxs.len(),
            "edge ids must be unique within a store"
        );

        let edge_features = edge_features.map(|f| f.select(Axis(0), &selected));

        Self {
            sources,
            destinations,
            timestamps,
            edge_idxs,
            labels,
            edge_features,
            unique_nodes,
        }
    }

    /// Build a store containing every row of `table`
    pub fn full(table: &InteractionTable, edge_features: Option<&Array2<f64>>) -> Self {
        let mask = vec![true; table.len()];
        Self::from_table(table, edge_features, &mask)
    }

    /// Number of interactions in this store
    pub fn n_interactions(&self) -> usize {
        self.sources.len()
    }

    /// Set of all node ids touched by this store
    pub fn unique_nodes(&self) -> &HashSet<u64> {
        &self.unique_nodes
    }

    /// Number of distinct nodes touched by this store
    pub fn n_unique_nodes(&self) -> usize {
        self.unique_nodes.len()
    }

    /// Per-node inter-event time statistics over this store
    ///
    /// Assumes the store is ordered by ascending timestamp, which holds for
    /// every store produced by the splitter from a sorted table.
    pub fn time_shift_statistics(&self) -> TimeShiftStatistics {
        compute_time_shift_statistics(&self.sources, &self.destinations, &self.timestamps)
    }
}

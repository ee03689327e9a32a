//! # Temporal Graph Dataset Preparation
//!
//! This library prepares temporal interaction-graph datasets for training and
//! evaluating temporal graph neural network models. It ingests a table of
//! timestamped edges plus per-node and per-edge feature matrices and produces
//! chronological train/validation/test splits together with inductive
//! "new node" evaluation subsets.
//!
//! ## Key Features
//!
//! - **Chronological Splitting**: train/val/test cutoffs at timestamp quantiles
//! - **Inductive Masking**: a seeded sample of nodes is withheld from training
//!   to measure generalization to unseen entities
//! - **Weight Normalization**: min-max rescaling, logarithmic compression, and
//!   per-node proportional normalization of edge weights
//! - **Densification**: materializes zero-weight edges so the graph is
//!   complete at every timestamp
//! - **Time-Shift Statistics**: per-node inter-event gap priors for temporal
//!   models
//!
//! ## Modules
//!
//! - `data` - interaction records, columnar stores, feature matrices, file I/O
//! - `transform` - weight normalization and graph densification
//! - `split` - chronological splitting and inductive mask derivation
//! - `stats` - time-shift statistics
//! - `error` - error types
//!
//! ## Example
//!
//! ```rust
//! use ndarray::Array2;
//! use temporal_graph_data::prelude::*;
//!
//! fn main() -> Result<(), DatasetError> {
//!     let rows: Vec<Interaction> = (0..10u64)
//!         .map(|k| Interaction {
//!             source: k % 4,
//!             destination: (k + 1) % 4,
//!             timestamp: k as f64,
//!             edge_idx: k as usize + 1,
//!             label: 0,
//!             weight: 0.0,
//!         })
//!         .collect();
//!     let table = InteractionTable::new(rows);
//!
//!     // Node features are row-indexed by node id; the edge feature matrix
//!     // carries one leading padding row for 1-based edge ids.
//!     let node_features = Array2::zeros((4, 8));
//!     let edge_features = Array2::from_elem((11, 1), 1.0);
//!
//!     let config = DatasetConfig::default();
//!     let dataset = prepare_link_prediction(table, node_features, edge_features, &config)?;
//!
//!     assert_eq!(dataset.full.n_interactions(), 10);
//!     let stats = dataset.full.time_shift_statistics();
//!     assert!(stats.mean_src > 0.0);
//!     Ok(())
//! }
//! ```

pub mod data;
pub mod error;
pub mod split;
pub mod stats;
pub mod transform;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::data::{
        aligned_weight_column, pad_feature_columns, random_features, GraphLoader, Interaction,
        InteractionData, InteractionTable,
    };
    pub use crate::error::DatasetError;
    pub use crate::split::{
        quantile, split_node_classification, split_temporal, NodeClassificationSplits,
        TemporalSplits,
    };
    pub use crate::stats::{compute_time_shift_statistics, TimeShiftStatistics};
    pub use crate::transform::{
        densify, logarithmize, min_max_scale, normalize_per_node, NodeRole,
    };
    pub use crate::{
        prepare_link_prediction, prepare_node_classification, DatasetConfig,
        NodeClassificationDataset, PreparedDataset,
    };
}

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::data::{
    aligned_weight_column, pad_feature_columns, random_features, InteractionData, InteractionTable,
};
use crate::error::{DatasetError, Result};
use crate::transform::{densify, logarithmize, min_max_scale, normalize_per_node, NodeRole};

/// Target range for min-max weight rescaling
const MIN_MAX_RANGE: (f64, f64) = (0.0, 10.0);

/// Dataset preparation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Fraction of time reserved for validation, in (0, 1)
    pub val_ratio: f64,
    /// Fraction of time reserved for testing, in (0, 1)
    pub test_ratio: f64,
    /// Seed for the withheld-node sample and feature randomization
    pub seed: u64,
    /// Withhold disjoint node sets for validation and test
    pub different_new_nodes_between_val_and_test: bool,
    /// Replace the node feature matrix with uniform random values
    pub randomize_features: bool,
    /// Rescale edge weights into [0, 10] by global min/max
    pub max_normalization: bool,
    /// Apply the log10 transform with a 0.001 floor to edge weights
    pub logarithmize_weights: bool,
    /// Divide each weight by its source node's total weight per timestamp
    pub node_out_normalization: bool,
    /// Divide each weight by its destination node's total weight per timestamp
    pub node_in_normalization: bool,
    /// Materialize zero-weight edges for all node pairs at every timestamp
    pub fill_all_edges: bool,
    /// Drop interactions with weight 0 and renumber edge ids from 1
    pub only_positive_edges: bool,
    /// Pad node and edge feature matrices with zero columns to this width
    pub pad_features_to: Option<usize>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            val_ratio: 0.15,
            test_ratio: 0.15,
            seed: 2020,
            different_new_nodes_between_val_and_test: false,
            randomize_features: false,
            max_normalization: false,
            logarithmize_weights: false,
            node_out_normalization: false,
            node_in_normalization: false,
            fill_all_edges: false,
            only_positive_edges: false,
            pad_features_to: None,
        }
    }
}

impl DatasetConfig {
    /// Validate the split ratios before any quantile computation
    pub fn validate(&self) -> Result<()> {
        let open_unit = |v: f64| v > 0.0 && v < 1.0;
        if !open_unit(self.val_ratio)
            || !open_unit(self.test_ratio)
            || self.val_ratio + self.test_ratio >= 1.0
        {
            return Err(DatasetError::InvalidRatios {
                val_ratio: self.val_ratio,
                test_ratio: self.test_ratio,
            });
        }
        Ok(())
    }
}

/// Everything the training driver needs for link prediction
#[derive(Debug, Clone)]
pub struct PreparedDataset {
    /// Node feature matrix, row-indexed by node id
    pub node_features: Array2<f64>,
    /// Per-interaction feature column after all weight transforms
    pub edge_features: Array2<f64>,
    /// Every interaction
    pub full: InteractionData,
    /// Training interactions (before the validation cutoff, no withheld nodes)
    pub train: InteractionData,
    /// Validation interactions
    pub val: InteractionData,
    /// Test interactions
    pub test: InteractionData,
    /// Validation interactions touching at least one new node
    pub new_node_val: InteractionData,
    /// Test interactions touching at least one new node
    pub new_node_test: InteractionData,
}

/// Chronological splits and feature matrices for node classification
#[derive(Debug, Clone)]
pub struct NodeClassificationDataset {
    /// Node feature matrix, row-indexed by node id
    pub node_features: Array2<f64>,
    /// Edge feature matrix as loaded, row-indexed by edge id
    pub edge_features: Array2<f64>,
    /// Every interaction
    pub full: InteractionData,
    /// Training interactions
    pub train: InteractionData,
    /// Validation interactions
    pub val: InteractionData,
    /// Test interactions
    pub test: InteractionData,
}

/// Run the full link-prediction preparation pipeline
///
/// Stages, in order: feature padding and randomization, weight derivation from
/// the edge feature matrix, positive-edge filtering, densification, weight
/// normalization, chronological splitting with inductive masks. Each stage is
/// a pure function of the previous table; any failure aborts the pipeline.
///
/// Weight transforms chain the way the stages are listed: min-max and the
/// logarithm rescale the output feature column, while each per-node pass
/// recomputes from the table's weight column and writes back to it, so a
/// per-node pass supersedes earlier rescales and a later per-node pass reads
/// the previous one's result.
pub fn prepare_link_prediction(
    mut table: InteractionTable,
    node_features: Array2<f64>,
    edge_features: Array2<f64>,
    config: &DatasetConfig,
) -> Result<PreparedDataset> {
    config.validate()?;
    if table.is_empty() {
        return Err(DatasetError::EmptyTable);
    }

    let mut node_features = node_features;
    let mut edge_features = edge_features;
    if let Some(target) = config.pad_features_to {
        node_features = pad_feature_columns(&node_features, target)?;
        edge_features = pad_feature_columns(&edge_features, target)?;
    }

    let mut rng = StdRng::seed_from_u64(config.seed);

    if config.randomize_features {
        node_features = random_features(node_features.nrows(), node_features.ncols(), &mut rng);
    }

    let weights = aligned_weight_column(&edge_features, table.len())?;
    table.set_weights(&weights);

    if config.only_positive_edges {
        table.retain_positive();
    }

    if config.fill_all_edges {
        table = densify(&table);
    }

    let mut feature_weights = table.weights();
    if config.max_normalization {
        feature_weights = min_max_scale(&feature_weights, MIN_MAX_RANGE);
    }
    if config.logarithmize_weights {
        feature_weights = logarithmize(&feature_weights);
    }
    if config.node_out_normalization {
        let snapshot = table.weights();
        feature_weights = normalize_per_node(table.rows(), &snapshot, NodeRole::Source);
        table.set_weights(&feature_weights);
    }
    if config.node_in_normalization {
        let snapshot = table.weights();
        feature_weights = normalize_per_node(table.rows(), &snapshot, NodeRole::Destination);
        table.set_weights(&feature_weights);
    }

    let n = table.len();
    let edge_feature_column = Array2::from_shape_vec((n, 1), feature_weights)
        .map_err(|e| DatasetError::ShapeMismatch(format!("edge feature column: {}", e)))?;

    let splits = split::split_temporal(&table, &edge_feature_column, config, &mut rng)?;

    Ok(PreparedDataset {
        node_features,
        edge_features: edge_feature_column,
        full: splits.full,
        train: splits.train,
        val: splits.val,
        test: splits.test,
        new_node_val: splits.new_node_val,
        new_node_test: splits.new_node_test,
    })
}

/// Prepare chronological splits for the node-classification variant
///
/// Uses fixed 0.70/0.85 timestamp quantiles, applies no weight transforms and
/// no inductive masking, and passes both feature matrices through as loaded.
pub fn prepare_node_classification(
    table: InteractionTable,
    node_features: Array2<f64>,
    edge_features: Array2<f64>,
    use_validation: bool,
) -> Result<NodeClassificationDataset> {
    let splits = split::split_node_classification(&table, use_validation)?;

    Ok(NodeClassificationDataset {
        node_features,
        edge_features,
        full: splits.full,
        train: splits.train,
        val: splits.val,
        test: splits.test,
    })
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

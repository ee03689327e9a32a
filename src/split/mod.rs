//! Chronological train/validation/test splitting with inductive new-node masks
//!
//! Interactions are partitioned by timestamp quantiles. A seeded sample of
//! nodes seen after the validation cutoff is withheld from training entirely;
//! edges touching withheld nodes are excluded from the train set and isolated
//! into dedicated new-node evaluation subsets.

use std::collections::{BTreeSet, HashSet};

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::info;

use crate::data::{InteractionData, InteractionTable};
use crate::error::{DatasetError, Result};
use crate::DatasetConfig;

/// Share of all nodes withheld for inductive evaluation
const NEW_NODE_FRACTION: f64 = 0.1;

/// Timestamp quantiles for the node-classification variant
const NODE_CLASSIFICATION_QUANTILES: (f64, f64) = (0.70, 0.85);

/// The six stores produced by the temporal splitter
#[derive(Debug, Clone)]
pub struct TemporalSplits {
    /// Every interaction
    pub full: InteractionData,
    /// Interactions before the validation cutoff touching no withheld node
    pub train: InteractionData,
    /// Interactions between the validation and test cutoffs (all edges)
    pub val: InteractionData,
    /// Interactions after the test cutoff (all edges)
    pub test: InteractionData,
    /// Validation interactions touching at least one new node
    pub new_node_val: InteractionData,
    /// Test interactions touching at least one new node
    pub new_node_test: InteractionData,
}

/// Chronological splits for the node-classification variant
#[derive(Debug, Clone)]
pub struct NodeClassificationSplits {
    /// Every interaction
    pub full: InteractionData,
    /// Interactions up to the training cutoff
    pub train: InteractionData,
    /// Interactions between the cutoffs, or the test set when validation is off
    pub val: InteractionData,
    /// Interactions after the test cutoff
    pub test: InteractionData,
}

/// Linear-interpolation quantile of an unsorted sample
///
/// Matches the default quantile definition of the numeric ecosystem this
/// pipeline's datasets come from: with the sample sorted ascending, the
/// quantile sits at fractional rank `(n - 1) * q` and interpolates linearly
/// between the bracketing order statistics.
pub fn quantile(values: &[f64], q: f64) -> f64 {
    assert!(!values.is_empty(), "quantile of an empty sample");

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;

    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (rank - lo as f64) * (sorted[hi] - sorted[lo])
    }
}

/// Partition interactions into train/val/test plus inductive new-node subsets
///
/// `edge_features` rows align positionally with the table. The sample of
/// withheld nodes is drawn from `rng`; candidates are visited in sorted order
/// so a fixed seed reproduces the same split on any platform.
pub fn split_temporal(
    table: &InteractionTable,
    edge_features: &Array2<f64>,
    config: &DatasetConfig,
    rng: &mut StdRng,
) -> Result<TemporalSplits> {
    config.validate()?;
    if table.is_empty() {
        return Err(DatasetError::EmptyTable);
    }

    let timestamps = table.timestamps();
    let val_time = quantile(&timestamps, 1.0 - config.val_ratio - config.test_ratio);
    let test_time = quantile(&timestamps, 1.0 - config.test_ratio);

    let rows = table.rows();
    let node_set = table.node_set();

    // Nodes touching any interaction after the validation cutoff
    let test_node_set: BTreeSet<u64> = rows
        .iter()
        .filter(|r| r.timestamp > val_time)
        .flat_map(|r| [r.source, r.destination])
        .collect();

    // Withhold a fixed-fraction sample of all nodes, drawn from those seen at
    // test time, so their edges can be removed from training entirely
    let sample_size = (NEW_NODE_FRACTION * node_set.len() as f64) as usize;
    if sample_size > test_node_set.len() {
        return Err(DatasetError::SampleTooLarge {
            requested: sample_size,
            population: test_node_set.len(),
        });
    }

    let candidates: Vec<u64> = test_node_set.iter().copied().collect();
    let new_test_nodes: Vec<u64> = candidates
        .choose_multiple(rng, sample_size)
        .copied()
        .collect();
    let new_test_node_set: HashSet<u64> = new_test_nodes.iter().copied().collect();

    // True where neither endpoint is withheld
    let observed_edges_mask: Vec<bool> = rows
        .iter()
        .map(|r| {
            !new_test_node_set.contains(&r.source) && !new_test_node_set.contains(&r.destination)
        })
        .collect();

    let train_mask: Vec<bool> = rows
        .iter()
        .zip(&observed_edges_mask)
        .map(|(r, &observed)| r.timestamp <= val_time && observed)
        .collect();

    let full = InteractionData::full(table, Some(edge_features));
    let train = InteractionData::from_table(table, Some(edge_features), &train_mask);

    let train_node_set: HashSet<u64> = train.unique_nodes().clone();
    assert!(
        train_node_set.is_disjoint(&new_test_node_set),
        "withheld nodes leaked into the training set"
    );

    // Nodes never seen during training
    let new_node_set: HashSet<u64> = node_set
        .iter()
        .filter(|n| !train_node_set.contains(n))
        .copied()
        .collect();

    let val_mask: Vec<bool> = rows
        .iter()
        .map(|r| r.timestamp > val_time && r.timestamp <= test_time)
        .collect();
    let test_mask: Vec<bool> = rows.iter().map(|r| r.timestamp > test_time).collect();

    let (new_node_val_mask, new_node_test_mask) =
        if config.different_new_nodes_between_val_and_test {
            // Disjoint withheld sets for validation and test, in sample order
            let half = new_test_nodes.len() / 2;
            let val_new: HashSet<u64> = new_test_nodes[..half].iter().copied().collect();
            let test_new: HashSet<u64> = new_test_nodes[half..].iter().copied().collect();

            let val_mask_new: Vec<bool> = rows
                .iter()
                .zip(&val_mask)
                .map(|(r, &in_val)| in_val && touches(&val_new, r.source, r.destination))
                .collect();
            let test_mask_new: Vec<bool> = rows
                .iter()
                .zip(&test_mask)
                .map(|(r, &in_test)| in_test && touches(&test_new, r.source, r.destination))
                .collect();
            (val_mask_new, test_mask_new)
        } else {
            let val_mask_new: Vec<bool> = rows
                .iter()
                .zip(&val_mask)
                .map(|(r, &in_val)| in_val && touches(&new_node_set, r.source, r.destination))
                .collect();
            let test_mask_new: Vec<bool> = rows
                .iter()
                .zip(&test_mask)
                .map(|(r, &in_test)| in_test && touches(&new_node_set, r.source, r.destination))
                .collect();
            (val_mask_new, test_mask_new)
        };

    let val = InteractionData::from_table(table, Some(edge_features), &val_mask);
    let test = InteractionData::from_table(table, Some(edge_features), &test_mask);
    let new_node_val = InteractionData::from_table(table, Some(edge_features), &new_node_val_mask);
    let new_node_test =
        InteractionData::from_table(table, Some(edge_features), &new_node_test_mask);

    info!(
        "the dataset has {} interactions, involving {} different nodes",
        full.n_interactions(),
        full.n_unique_nodes()
    );
    info!(
        "the training dataset has {} interactions, involving {} different nodes",
        train.n_interactions(),
        train.n_unique_nodes()
    );
    info!(
        "the validation dataset has {} interactions, involving {} different nodes",
        val.n_interactions(),
        val.n_unique_nodes()
    );
    info!(
        "the test dataset has {} interactions, involving {} different nodes",
        test.n_interactions(),
        test.n_unique_nodes()
    );
    info!(
        "the new node validation dataset has {} interactions, involving {} different nodes",
        new_node_val.n_interactions(),
        new_node_val.n_unique_nodes()
    );
    info!(
        "the new node test dataset has {} interactions, involving {} different nodes",
        new_node_test.n_interactions(),
        new_node_test.n_unique_nodes()
    );
    info!(
        "{} nodes were used for the inductive testing, i.e. are never seen during training",
        new_test_nodes.len()
    );

    Ok(TemporalSplits {
        full,
        train,
        val,
        test,
        new_node_val,
        new_node_test,
    })
}

/// Chronological splits at fixed 0.70/0.85 quantiles, no inductive masking
///
/// With `use_validation` off, the validation store is the test store and
/// training runs up to the test cutoff. Stores carry no per-interaction edge
/// features.
pub fn split_node_classification(
    table: &InteractionTable,
    use_validation: bool,
) -> Result<NodeClassificationSplits> {
    if table.is_empty() {
        return Err(DatasetError::EmptyTable);
    }

    let timestamps = table.timestamps();
    let (val_q, test_q) = NODE_CLASSIFICATION_QUANTILES;
    let val_time = quantile(&timestamps, val_q);
    let test_time = quantile(&timestamps, test_q);

    let rows = table.rows();
    let train_cutoff = if use_validation { val_time } else { test_time };

    let train_mask: Vec<bool> = rows.iter().map(|r| r.timestamp <= train_cutoff).collect();
    let test_mask: Vec<bool> = rows.iter().map(|r| r.timestamp > test_time).collect();
    let val_mask: Vec<bool> = if use_validation {
        rows.iter()
            .map(|r| r.timestamp > val_time && r.timestamp <= test_time)
            .collect()
    } else {
        test_mask.clone()
    };

    Ok(NodeClassificationSplits {
        full: InteractionData::full(table, None),
        train: InteractionData::from_table(table, None, &train_mask),
        val: InteractionData::from_table(table, None, &val_mask),
        test: InteractionData::from_table(table, None, &test_mask),
    })
}

fn touches(nodes: &HashSet<u64>, source: u64, destination: u64) -> bool {
    nodes.contains(&source) || nodes.contains(&destination)
}

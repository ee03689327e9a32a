//! Loading and saving interaction tables and feature matrices
//!
//! Thin I/O glue around the columnar pipeline: interaction tables travel as
//! CSV with columns `u,i,ts,label,idx` (plus an optional `weight` column),
//! feature matrices as headerless CSV of floats.

use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, Writer};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::data::types::{Interaction, InteractionTable};
use crate::error::{DatasetError, Result};

/// One CSV row of the interaction table
#[derive(Debug, Serialize, Deserialize)]
struct EdgeRecord {
    /// Source node id
    u: u64,
    /// Destination node id
    i: u64,
    /// Event time
    ts: f64,
    /// Classification label
    label: i64,
    /// 1-based interaction id
    idx: usize,
    /// Edge weight; absent when weights are derived from the feature matrix
    #[serde(default)]
    weight: f64,
}

impl From<EdgeRecord> for Interaction {
    fn from(record: EdgeRecord) -> Self {
        Interaction {
            source: record.u,
            destination: record.i,
            timestamp: record.ts,
            edge_idx: record.idx,
            label: record.label,
            weight: record.weight,
        }
    }
}

impl From<&Interaction> for EdgeRecord {
    fn from(row: &Interaction) -> Self {
        EdgeRecord {
            u: row.source,
            i: row.destination,
            ts: row.timestamp,
            label: row.label,
            idx: row.edge_idx,
            weight: row.weight,
        }
    }
}

/// Loader for interaction tables and feature matrices
pub struct GraphLoader;

impl GraphLoader {
    /// Load an interaction table from a CSV file, sorted by timestamp
    pub fn load_interactions<P: AsRef<Path>>(path: P) -> Result<InteractionTable> {
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

        let mut rows = Vec::new();
        for result in reader.deserialize() {
            let record: EdgeRecord = result?;
            rows.push(Interaction::from(record));
        }

        Ok(InteractionTable::from_unsorted(rows))
    }

    /// Save an interaction table to a CSV file
    pub fn save_interactions<P: AsRef<Path>>(table: &InteractionTable, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = Writer::from_writer(file);

        for row in table.rows() {
            writer.serialize(EdgeRecord::from(row))?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Load an interaction table from a JSON file, sorted by timestamp
    pub fn load_interactions_json<P: AsRef<Path>>(path: P) -> Result<InteractionTable> {
        let file = File::open(path)?;
        let rows: Vec<Interaction> = serde_json::from_reader(file)?;
        Ok(InteractionTable::from_unsorted(rows))
    }

    /// Save an interaction table to a JSON file
    pub fn save_interactions_json<P: AsRef<Path>>(table: &InteractionTable, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, table.rows())?;
        Ok(())
    }

    /// Load a dense feature matrix from headerless CSV
    ///
    /// Every row must have the same number of columns; a ragged file is a
    /// shape mismatch.
    pub fn load_feature_matrix<P: AsRef<Path>>(path: P) -> Result<Array2<f64>> {
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut values = Vec::new();
        let mut n_rows = 0;
        let mut width: Option<usize> = None;

        for result in reader.records() {
            let record = result?;
            let row: Vec<f64> = record
                .iter()
                .map(|field| {
                    field.trim().parse::<f64>().map_err(|e| {
                        DatasetError::ShapeMismatch(format!(
                            "non-numeric feature value {:?}: {}",
                            field, e
                        ))
                    })
                })
                .collect::<Result<_>>()?;

            match width {
                None => width = Some(row.len()),
                Some(w) if w != row.len() => {
                    return Err(DatasetError::ShapeMismatch(format!(
                        "feature matrix row {} has {} columns, expected {}",
                        n_rows,
                        row.len(),
                        w
                    )));
                }
                Some(_) => {}
            }

            values.extend(row);
            n_rows += 1;
        }

        let width = width.unwrap_or(0);
        Array2::from_shape_vec((n_rows, width), values)
            .map_err(|e| DatasetError::ShapeMismatch(format!("feature matrix reshape failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::tempdir;

    fn sample_table() -> InteractionTable {
        InteractionTable::new(vec![
            Interaction { source: 1, destination: 2, timestamp: 10.0, edge_idx: 1, label: 0, weight: 1.5 },
            Interaction { source: 2, destination: 3, timestamp: 20.0, edge_idx: 2, label: 1, weight: 0.0 },
        ])
    }

    #[test]
    fn test_csv_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("interactions.csv");

        let table = sample_table();
        GraphLoader::save_interactions(&table, &path).unwrap();
        let loaded = GraphLoader::load_interactions(&path).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.rows()[0].source, 1);
        assert_eq!(loaded.rows()[1].weight, 0.0);
        assert_eq!(loaded.rows()[1].edge_idx, 2);
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("interactions.json");

        let table = sample_table();
        GraphLoader::save_interactions_json(&table, &path).unwrap();
        let loaded = GraphLoader::load_interactions_json(&path).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.rows()[0].timestamp, 10.0);
    }

    #[test]
    fn test_load_sorts_by_timestamp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("unsorted.csv");

        let mut file = File::create(&path).unwrap();
        writeln!(file, "u,i,ts,label,idx").unwrap();
        writeln!(file, "3,4,30.0,0,2").unwrap();
        writeln!(file, "1,2,10.0,0,1").unwrap();
        drop(file);

        let loaded = GraphLoader::load_interactions(&path).unwrap();
        assert_eq!(loaded.timestamps(), vec![10.0, 30.0]);
    }

    #[test]
    fn test_load_feature_matrix() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("features.csv");

        let mut file = File::create(&path).unwrap();
        writeln!(file, "0.0,0.0").unwrap();
        writeln!(file, "1.0,2.0").unwrap();
        writeln!(file, "3.0,4.0").unwrap();
        drop(file);

        let matrix = GraphLoader::load_feature_matrix(&path).unwrap();
        assert_eq!(matrix.dim(), (3, 2));
        assert_eq!(matrix[[1, 1]], 2.0);
    }

    #[test]
    fn test_ragged_feature_matrix_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ragged.csv");

        let mut file = File::create(&path).unwrap();
        writeln!(file, "1.0,2.0").unwrap();
        writeln!(file, "3.0").unwrap();
        drop(file);

        let result = GraphLoader::load_feature_matrix(&path);
        assert!(matches!(result, Err(DatasetError::ShapeMismatch(_))));
    }
}

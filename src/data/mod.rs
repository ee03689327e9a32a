//! Interaction records, columnar stores, feature matrices, and file I/O

mod features;
mod loader;
mod types;

pub use features::{aligned_weight_column, pad_feature_columns, random_features};
pub use loader::GraphLoader;
pub use types::{Interaction, InteractionData, InteractionTable};

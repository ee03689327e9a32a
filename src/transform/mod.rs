//! Weight normalization and graph densification transforms

mod densify;
mod normalize;

pub use densify::densify;
pub use normalize::{
    logarithmize, min_max_scale, normalize_per_node, NodeRole, LOG_WEIGHT_FLOOR,
};

//! Reconstruction, network reordering and visualization of brain functional network connectivity (FNC) matrices.
//!
//! The focus of this package is on FNC matrices computed from the 105 components of an ICN atlas:
//! correlation vectors are expanded into square matrices with [`vec2mat`], rows and columns are grouped by
//! functional network with [`NetworkReorderer`], and the [`NetworkLayout`] provides the network boundaries for display.

pub mod colormap;
pub mod error;
pub mod icn_table;
pub mod normalization;
pub mod reorder;
pub mod traits;
pub mod trends;
pub mod util;
pub mod vec2mat;

#[cfg(feature = "plot")]
pub mod plot;

pub use colormap::{jet, ColorRange};
pub use error::{FncError, Result};
pub use icn_table::{IcnTable, NetworkGroup, NetworkLayout};
pub use normalization::normalize;
pub use reorder::{network_order_permutation, organize_ordered_map, reorder_with_table, NetworkReorderer, DEFAULT_ICN_TABLE_PATH, ICN_COUNT};
pub use traits::CellColor;
pub use trends::{fnc_trend_stats, TrendStats};
pub use vec2mat::{mat2vec, matrix_dim, vec2mat, vec2mat_batch, FillPolicy, Symmetry, Vec2MatOptions};

// #![warn(missing_docs)]

//! # planarity
//!
//! Edge-addition planarity algorithms over an extensible array-based
//! graph store: linear-time planar embedding with Kuratowski
//! obstruction isolation, outerplanarity, K2,3 / K3,3 / K4 homeomorph
//! search, and visibility-representation drawings.
//!
//! Input and output interoperate with [`petgraph`](https://docs.rs/petgraph)
//! via [`types::UnGraph`]; batch workflows use the [`graph6`] format.

pub mod debugging;
pub mod dfs;
pub mod draw;
pub mod embed;
pub(crate) mod embed_blocks;
pub mod extension;
pub mod graph;
pub mod graph6;
pub mod input;
pub mod integrity;
pub(crate) mod isolate;
pub(crate) mod isolate_blocks;
pub mod list_collection;
pub mod outerplanar;
pub mod output;
pub mod search;
pub mod testing;
pub mod types;

pub use draw::{VisibilityRep, drawing};
pub use embed::{embed, is_planar};
pub use graph::Graph;
pub use outerplanar::is_outerplanar;
pub use types::{EmbedMode, EmbedResult, GraphError, UnGraph};

//! Graph generators for tests: seeded random graphs, exhaustive
//! enumeration of small graphs, and grids.

pub mod graph_enumerator;
pub mod grids;
pub mod random_graphs;

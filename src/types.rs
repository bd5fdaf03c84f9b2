use thiserror::Error;

/// Sentinel index meaning "no vertex / no arc / no list entry".
pub const NIL: usize = usize::MAX;

/// Planar graphs have at most `3n - 6` edges; a graph sized for `n`
/// vertices gets `2 * EDGE_LIMIT * n` arc slots for real edges.
pub const EDGE_LIMIT: usize = 3;

/// Classification of an arc in the store.
///
/// `Real` arcs come from input edges the DFS has not yet classified;
/// the tree builder refines them into `Tree` and `Back`. `ShortCircuit`
/// arcs are synthetic: the walkdown adds them between a bicomp root and
/// a stopping vertex to shorten later external-face walks, and they are
/// removed before any result is reported.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EdgeType {
    Real,
    Tree,
    Back,
    ShortCircuit,
}

impl std::fmt::Display for EdgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeType::Real => write!(f, "Real"),
            EdgeType::Tree => write!(f, "Tree"),
            EdgeType::Back => write!(f, "Back"),
            EdgeType::ShortCircuit => write!(f, "ShortCircuit"),
        }
    }
}

/// The algorithm run by [`crate::embed`](crate::embed::embed).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum EmbedMode {
    Planar,
    Outerplanar,
    DrawPlanar,
    SearchK23,
    SearchK33,
    SearchK4,
}

/// Per-mode configuration, a pure lookup instead of mutable command
/// tables.
#[derive(Clone, Copy, Debug)]
pub struct ModeConfig {
    pub name: &'static str,
    /// Treat every vertex as externally active (outerplanarity family).
    pub outerplanar: bool,
    /// Obstruction family the isolator reports in this mode.
    pub obstruction: ObstructionKind,
}

/// The obstruction family a failed embedding is rewritten into.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ObstructionKind {
    /// K5 or K3,3 subdivision (planarity family).
    Kuratowski,
    /// K2,3 or K4 subdivision (outerplanarity family).
    Outerplanarity,
}

impl EmbedMode {
    pub fn config(self) -> ModeConfig {
        match self {
            EmbedMode::Planar => ModeConfig {
                name: "planar embedding",
                outerplanar: false,
                obstruction: ObstructionKind::Kuratowski,
            },
            EmbedMode::Outerplanar => ModeConfig {
                name: "outerplanar embedding",
                outerplanar: true,
                obstruction: ObstructionKind::Outerplanarity,
            },
            EmbedMode::DrawPlanar => ModeConfig {
                name: "planar drawing",
                outerplanar: false,
                obstruction: ObstructionKind::Kuratowski,
            },
            EmbedMode::SearchK23 => ModeConfig {
                name: "K2,3 homeomorph search",
                outerplanar: true,
                obstruction: ObstructionKind::Outerplanarity,
            },
            EmbedMode::SearchK33 => ModeConfig {
                name: "K3,3 homeomorph search",
                outerplanar: false,
                obstruction: ObstructionKind::Kuratowski,
            },
            EmbedMode::SearchK4 => ModeConfig {
                name: "K4 homeomorph search",
                outerplanar: true,
                obstruction: ObstructionKind::Outerplanarity,
            },
        }
    }
}

/// Outcome of an algorithm run.
///
/// `NonEmbeddable` is a valid negative answer, not an error: the graph
/// has been rewritten in place into the obstruction subgraph witnessing
/// it. In the search modes it means the target subdivision was found and
/// retained.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EmbedResult {
    Ok,
    NonEmbeddable,
}

impl EmbedResult {
    /// Exit-code convention of batch front ends: 0 for an embeddable
    /// graph, 1 for the negative answer.
    pub fn exit_code(self) -> i32 {
        match self {
            EmbedResult::Ok => 0,
            EmbedResult::NonEmbeddable => 1,
        }
    }
}

/// Errors surfaced by the graph store and the algorithms.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The store could not be sized as requested. Fatal to the instance.
    #[error("allocation failed: {0}")]
    Allocation(String),

    /// Malformed input or misuse: self-loop, duplicate edge, vertex out
    /// of range, capacity exhausted. The graph stays usable.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// The embedder or isolator reached a configuration it cannot
    /// classify. A logic defect, never expected in correct operation.
    #[error("internal invariant violation: {0}")]
    InternalInvariantViolation(String),
}

/// Wrapper for petgraph's graph type, the public input boundary.
pub type UnGraph = petgraph::graph::UnGraph<u32, ()>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_config_is_pure_lookup() {
        assert!(EmbedMode::Outerplanar.config().outerplanar);
        assert!(EmbedMode::SearchK23.config().outerplanar);
        assert!(EmbedMode::SearchK4.config().outerplanar);
        assert!(!EmbedMode::Planar.config().outerplanar);
        assert_eq!(
            EmbedMode::SearchK33.config().obstruction,
            ObstructionKind::Kuratowski
        );
    }

    #[test]
    fn exit_codes_match_cli_convention() {
        assert_eq!(EmbedResult::Ok.exit_code(), 0);
        assert_eq!(EmbedResult::NonEmbeddable.exit_code(), 1);
    }
}

use crate::extension::{ExtensionId, GraphExtension};
use crate::graph::Graph;
use crate::types::{EmbedMode, EmbedResult, GraphError, UnGraph};

/// Marker extension for the outerplanarity family of modes.
///
/// Its presence flips the embedder's activity rules: every vertex counts
/// as externally active, so nothing may ever leave the external face,
/// and the isolator reports K2,3 / K4 obstructions instead of
/// Kuratowski ones. It keeps no side state of its own.
pub struct OuterplanarExtension;

impl OuterplanarExtension {
    pub fn new() -> Self {
        OuterplanarExtension
    }
}

impl Default for OuterplanarExtension {
    fn default() -> Self {
        OuterplanarExtension::new()
    }
}

impl GraphExtension for OuterplanarExtension {
    fn id(&self) -> ExtensionId {
        ExtensionId::Outerplanar
    }

    fn dup(&self) -> Box<dyn GraphExtension> {
        Box::new(OuterplanarExtension)
    }
}

/// Convenience wrapper over [`crate::embed::embed`] for petgraph
/// inputs. On a non-outerplanar graph the second element is the
/// isolated K2,3 or K4 subdivision.
pub fn is_outerplanar(graph: &UnGraph) -> Result<(bool, UnGraph), GraphError> {
    let mut g = Graph::from_petgraph(graph)?;
    let res = crate::embed::embed(&mut g, EmbedMode::Outerplanar)?;
    Ok((res == EmbedResult::Ok, g.to_petgraph()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::embed;

    fn graph_from_edges(n: usize, edges: &[(usize, usize)]) -> Graph {
        let mut g = Graph::new(n);
        for &(u, v) in edges {
            g.add_edge(u, v).unwrap();
        }
        g
    }

    #[test]
    fn cycles_and_fans_are_outerplanar() {
        let mut g = graph_from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]);
        assert_eq!(
            embed(&mut g, EmbedMode::Outerplanar).unwrap(),
            EmbedResult::Ok
        );
        // Fan: path plus a hub seeing every path vertex.
        let mut g = graph_from_edges(
            5,
            &[(0, 1), (0, 2), (0, 3), (0, 4), (1, 2), (2, 3), (3, 4)],
        );
        assert_eq!(
            embed(&mut g, EmbedMode::Outerplanar).unwrap(),
            EmbedResult::Ok
        );
    }

    #[test]
    fn nested_chords_are_outerplanar() {
        let mut g = graph_from_edges(
            6,
            &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0), (1, 4), (2, 4)],
        );
        assert_eq!(
            embed(&mut g, EmbedMode::Outerplanar).unwrap(),
            EmbedResult::Ok
        );
    }

    #[test]
    fn k4_is_planar_but_not_outerplanar() {
        let edges = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];
        let mut g = graph_from_edges(4, &edges);
        assert_eq!(embed(&mut g, EmbedMode::Planar).unwrap(), EmbedResult::Ok);
        let mut g = graph_from_edges(4, &edges);
        assert_eq!(
            embed(&mut g, EmbedMode::Outerplanar).unwrap(),
            EmbedResult::NonEmbeddable
        );
    }

    #[test]
    fn is_outerplanar_reports_the_obstruction() {
        let mut pg = UnGraph::default();
        let ns: Vec<_> = (0..5).map(|i| pg.add_node(i)).collect();
        for (u, v) in [(0, 2), (0, 3), (0, 4), (1, 2), (1, 3), (1, 4)] {
            pg.add_edge(ns[u], ns[v], ());
        }
        let (outer, obstruction) = is_outerplanar(&pg).unwrap();
        assert!(!outer);
        assert_eq!(obstruction.edge_count(), 6);
    }
}

use crate::dfs;
use crate::embed_blocks::post;
use crate::embed_blocks::structures::EmbedContext;
use crate::graph::GraphCore;
use crate::isolate_blocks::{context, mark, minors};
use crate::types::GraphError;

/// Rewrites the store, left at the point of embedding failure, into an
/// obstruction subgraph proving the negative answer: a K5 or K3,3
/// subdivision for planarity, a K4 or K2,3 subdivision for the
/// outerplanarity family.
///
/// The partial embedding is first normalized (short-circuit arcs
/// removed, bicomp rotations oriented), then one of the failure
/// patterns is matched and its edges are marked, including the
/// unembedded back edges the pattern relies on. Everything unmarked is
/// deleted and the store is returned to the input numbering.
pub fn isolate(
    core: &mut GraphCore,
    ctx: &mut EmbedContext,
    failed_arc: usize,
) -> Result<(), GraphError> {
    post::remove_short_circuits(core);
    post::orient(core, &ctx.forest);
    core.clear_visited();
    let ic = context::analyze(core, ctx, failed_arc)?;
    if ctx.outerplanar {
        minors::isolate_outerplanar(core, ctx, &ic)?;
    } else {
        minors::isolate_planar(core, ctx, &ic)?;
    }
    post::join_bicomps(core, &ctx.forest);
    mark::delete_unmarked(core);
    dfs::sort_vertices(core, &ctx.forest.to_input);
    core.clear_visited();
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::embed::embed;
    use crate::graph::Graph;
    use crate::types::{EmbedMode, EmbedResult};

    fn graph_from_edges(n: usize, edges: &[(usize, usize)]) -> Graph {
        let mut g = Graph::new(n);
        for &(u, v) in edges {
            g.add_edge(u, v).unwrap();
        }
        g
    }

    fn degrees(g: &Graph) -> Vec<usize> {
        (0..g.core.n).map(|v| g.core.degree(v)).collect()
    }

    #[test]
    fn k5_is_returned_whole() {
        let mut g = Graph::new(5);
        for u in 0..5 {
            for v in (u + 1)..5 {
                g.add_edge(u, v).unwrap();
            }
        }
        assert_eq!(
            embed(&mut g, EmbedMode::Planar).unwrap(),
            EmbedResult::NonEmbeddable
        );
        assert_eq!(g.core.edge_count, 10);
        assert_eq!(degrees(&g), vec![4; 5]);
    }

    #[test]
    fn k33_is_returned_whole() {
        let mut g = graph_from_edges(
            6,
            &[
                (0, 3),
                (0, 4),
                (0, 5),
                (1, 3),
                (1, 4),
                (1, 5),
                (2, 3),
                (2, 4),
                (2, 5),
            ],
        );
        assert_eq!(
            embed(&mut g, EmbedMode::Planar).unwrap(),
            EmbedResult::NonEmbeddable
        );
        assert_eq!(g.core.edge_count, 9);
        assert_eq!(degrees(&g), vec![3; 6]);
    }

    #[test]
    fn pendant_edge_is_pruned_from_a_subdivided_k33() {
        // K3,3 on {0,1,2} x {3,4,5} with edge (2,5) subdivided through 6,
        // plus a pendant vertex 7. The only obstruction is the
        // subdivision, so the pendant edge must go.
        let mut g = graph_from_edges(
            8,
            &[
                (0, 3),
                (0, 4),
                (0, 5),
                (1, 3),
                (1, 4),
                (1, 5),
                (2, 3),
                (2, 4),
                (2, 6),
                (6, 5),
                (0, 7),
            ],
        );
        assert_eq!(
            embed(&mut g, EmbedMode::Planar).unwrap(),
            EmbedResult::NonEmbeddable
        );
        assert_eq!(g.core.edge_count, 10);
        let d = degrees(&g);
        assert_eq!(d[6], 2);
        assert_eq!(d[7], 0);
        for v in 0..6 {
            assert_eq!(d[v], 3);
        }
    }

    #[test]
    fn separate_component_is_pruned_from_k5() {
        let mut g = Graph::new(8);
        for u in 0..5 {
            for v in (u + 1)..5 {
                g.add_edge(u, v).unwrap();
            }
        }
        for (u, v) in [(5, 6), (6, 7), (7, 5)] {
            g.add_edge(u, v).unwrap();
        }
        assert_eq!(
            embed(&mut g, EmbedMode::Planar).unwrap(),
            EmbedResult::NonEmbeddable
        );
        assert_eq!(g.core.edge_count, 10);
        let d = degrees(&g);
        assert_eq!(&d[..5], &[4; 5]);
        assert_eq!(&d[5..], &[0; 3]);
    }

    #[test]
    fn k4_obstructs_outerplanarity() {
        let mut g = Graph::new(4);
        for u in 0..4 {
            for v in (u + 1)..4 {
                g.add_edge(u, v).unwrap();
            }
        }
        assert_eq!(
            embed(&mut g, EmbedMode::Outerplanar).unwrap(),
            EmbedResult::NonEmbeddable
        );
        assert_eq!(g.core.edge_count, 6);
        assert_eq!(degrees(&g), vec![3; 4]);
    }

    #[test]
    fn k23_obstructs_outerplanarity() {
        let mut g = graph_from_edges(5, &[(0, 2), (0, 3), (0, 4), (1, 2), (1, 3), (1, 4)]);
        assert_eq!(
            embed(&mut g, EmbedMode::Outerplanar).unwrap(),
            EmbedResult::NonEmbeddable
        );
        assert_eq!(g.core.edge_count, 6);
        let mut d = degrees(&g);
        d.sort_unstable();
        assert_eq!(d, vec![2, 2, 2, 3, 3]);
    }

    #[test]
    fn outerplanar_obstruction_inside_larger_graph() {
        // A K2,3 on {0,1} x {2,3,4} with an outerplanar tail hanging off.
        let mut g = graph_from_edges(
            7,
            &[
                (0, 2),
                (0, 3),
                (0, 4),
                (1, 2),
                (1, 3),
                (1, 4),
                (4, 5),
                (5, 6),
            ],
        );
        assert_eq!(
            embed(&mut g, EmbedMode::Outerplanar).unwrap(),
            EmbedResult::NonEmbeddable
        );
        assert_eq!(g.core.edge_count, 6);
        let d = degrees(&g);
        assert_eq!(d[5], 0);
        assert_eq!(d[6], 0);
    }
}

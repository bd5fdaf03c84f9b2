use hashbrown::HashSet;
use petgraph::visit::NodeIndexable;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::types::UnGraph;

/// Generates a connected simple graph on `n` vertices with about `m`
/// edges: a random spanning tree first, then random chords. Duplicate
/// picks are skipped, so the edge count may fall short of `m` on dense
/// requests.
pub fn random_graph(n: usize, m: usize, seed: u64) -> UnGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = UnGraph::default();
    let mut seen: HashSet<(usize, usize)> = HashSet::new();

    for i in 0..n {
        graph.add_node(i as u32);
        if i > 0 {
            let j = rng.random_range(0..i);
            seen.insert((j, i));
            graph.add_edge(graph.from_index(i), graph.from_index(j), ());
        }
    }

    if n < 2 {
        return graph;
    }
    let max_edges = n * (n - 1) / 2;
    for _ in n.saturating_sub(1)..m.min(max_edges) {
        let s = rng.random_range(0..n);
        let t = rng.random_range(0..n);
        if s == t || !seen.insert((s.min(t), s.max(t))) {
            continue;
        }
        graph.add_edge(graph.from_index(s), graph.from_index(t), ());
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::visit::EdgeRef;

    #[test]
    fn same_seed_same_graph() {
        let a = random_graph(20, 40, 7);
        let b = random_graph(20, 40, 7);
        let edges = |g: &UnGraph| {
            g.edge_references()
                .map(|e| (e.source().index(), e.target().index()))
                .collect::<Vec<_>>()
        };
        assert_eq!(edges(&a), edges(&b));
    }

    #[test]
    fn graphs_are_simple_and_spanning() {
        let g = random_graph(30, 80, 3);
        assert_eq!(g.node_count(), 30);
        assert!(g.edge_count() >= 29);
        let mut seen = HashSet::new();
        for e in g.edge_references() {
            let (u, v) = (e.source().index(), e.target().index());
            assert_ne!(u, v);
            assert!(seen.insert((u.min(v), u.max(v))));
        }
    }
}

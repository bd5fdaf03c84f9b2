use petgraph::visit::NodeIndexable;

use crate::types::UnGraph;

/// Exhaustive enumeration of all simple graphs on `n` labeled vertices,
/// one per edge-subset bitmask.
pub struct GraphEnumeratorState {
    pub n: usize,
    pub mask: usize,
    pub last_mask: usize,
}

impl GraphEnumeratorState {
    /// Iterator over every graph on `n` vertices. Keep `n` tiny: the
    /// count is `2^(n(n-1)/2)`.
    pub fn all(n: usize) -> Self {
        GraphEnumeratorState {
            n,
            mask: 0,
            last_mask: 1 << (n * (n - 1) / 2),
        }
    }
}

impl Iterator for GraphEnumeratorState {
    type Item = UnGraph;

    fn next(&mut self) -> Option<Self::Item> {
        if self.mask == self.last_mask {
            return None;
        }

        let mut graph = UnGraph::default();
        for i in 0..self.n {
            graph.add_node(i as u32);
        }

        let mut check = 0;
        for i in 0..self.n {
            for j in (i + 1)..self.n {
                if self.mask & (1 << check) != 0 {
                    graph.add_edge(graph.from_index(i), graph.from_index(j), ());
                }
                check += 1;
            }
        }

        self.mask += 1;
        Some(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerates_all_graphs_on_three_vertices() {
        let graphs: Vec<UnGraph> = GraphEnumeratorState::all(3).collect();
        assert_eq!(graphs.len(), 8);
        assert_eq!(graphs[0].edge_count(), 0);
        assert_eq!(graphs[7].edge_count(), 3);
    }
}

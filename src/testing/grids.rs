use petgraph::graph::NodeIndex;

use crate::types::UnGraph;

/// Generates a grid graph with the specified number of rows and columns.
/// Grids are planar and, for `rows, cols > 1`, biconnected.
pub fn generate_grid_graph(rows: usize, cols: usize) -> UnGraph {
    assert!(rows > 1 && cols > 1);
    let mut graph = UnGraph::default();

    for r in 0..rows {
        for c in 0..cols {
            graph.add_node((r * cols + c) as u32);
        }
    }

    for r in 0..rows {
        for c in 0..cols {
            if r + 1 < rows {
                graph.add_edge(
                    NodeIndex::new(r * cols + c),
                    NodeIndex::new((r + 1) * cols + c),
                    (),
                );
            }
            if c + 1 < cols {
                graph.add_edge(
                    NodeIndex::new(r * cols + c),
                    NodeIndex::new(r * cols + c + 1),
                    (),
                );
            }
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_the_right_size() {
        let g = generate_grid_graph(3, 4);
        assert_eq!(g.node_count(), 12);
        assert_eq!(g.edge_count(), 2 * 12 - 3 - 4);
    }
}

use dot::{Edges, GraphWalk, Labeller, Nodes};

use crate::dfs::DfsForest;
use crate::graph::GraphCore;
use crate::types::NIL;

type Node = usize;

#[derive(Debug, Clone)]
struct Edge {
    source: Node,
    target: Node,
    label: String,
}

struct Store<'a> {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    forest: Option<&'a DfsForest>,
}

impl<'a> Labeller<'a, Node, Edge> for Store<'a> {
    fn graph_id(&self) -> dot::Id<'_> {
        dot::Id::new("G").unwrap()
    }

    fn node_id(&self, n: &Node) -> dot::Id<'_> {
        dot::Id::new(format!("N{}", n)).unwrap()
    }

    fn node_label(&self, n: &Node) -> dot::LabelText<'a> {
        let text = match self.forest {
            Some(f) if *n < f.parent.len() => {
                let p = if f.parent[*n] == NIL {
                    "Root".to_string()
                } else {
                    f.parent[*n].to_string()
                };
                format!(
                    "{}\nin:{}\np:{} low:{} la:{}",
                    n, f.to_input[*n], p, f.lowpoint[*n], f.least_ancestor[*n]
                )
            }
            _ => n.to_string(),
        };
        dot::LabelText::label(text)
    }

    fn edge_label(&self, e: &Edge) -> dot::LabelText<'a> {
        dot::LabelText::label(e.label.clone())
    }
}

impl<'a> GraphWalk<'a, Node, Edge> for Store<'a> {
    fn nodes(&self) -> Nodes<'_, Node> {
        self.nodes.iter().cloned().collect()
    }

    fn edges(&self) -> Edges<'_, Edge> {
        self.edges.as_slice().into()
    }

    fn source(&self, e: &Edge) -> Node {
        e.source
    }

    fn target(&self, e: &Edge) -> Node {
        e.target
    }
}

/// Renders a DOT snapshot of the store, virtual vertices and hidden
/// edges included, with DFS annotations when a forest is given. For
/// eyeballing intermediate algorithm state, not for production output.
pub fn render(core: &GraphCore, forest: Option<&DfsForest>) -> String {
    let mut store = Store {
        nodes: Vec::new(),
        edges: Vec::new(),
        forest,
    };
    for v in 0..2 * core.n {
        if core.vertex_in_use.contains(v) || core.vertices[v].link != [NIL, NIL] {
            store.nodes.push(v);
        }
    }
    for pair in (0..core.arcs.len()).step_by(2) {
        if !core.arc_in_use.contains(pair) {
            continue;
        }
        let mut label = format!("{} {}", pair, core.arcs[pair].ty);
        if core.arcs[pair].inverted || core.arcs[pair + 1].inverted {
            label.push_str(" inv");
        }
        if core.arcs[pair].hidden {
            label.push_str(" hidden");
        }
        store.edges.push(Edge {
            source: core.origin(pair),
            target: core.arcs[pair].neighbor,
            label,
        });
    }
    let mut buffer = std::io::Cursor::new(Vec::new());
    dot::render(&store, &mut buffer).unwrap();
    String::from_utf8(buffer.into_inner()).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dfs;

    #[test]
    fn renders_a_store_with_dfs_annotations() {
        let mut core = GraphCore::new(3);
        core.add_edge(0, 1).unwrap();
        core.add_edge(1, 2).unwrap();
        core.add_edge(2, 0).unwrap();
        let forest = dfs::build(&mut core);
        let out = render(&core, Some(&forest));
        assert!(out.contains("graph G"));
        assert!(out.contains("N0"));
        assert!(out.contains("low:"));
    }

    #[test]
    fn renders_without_a_forest() {
        let mut core = GraphCore::new(2);
        core.add_edge(0, 1).unwrap();
        let out = render(&core, None);
        assert!(out.contains("N0"));
        assert!(out.contains("N1"));
    }
}

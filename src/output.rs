use crate::graph::Graph;
use crate::types::GraphError;

/// Returns the adjacency lists of the visible graph, one vertex per
/// line, neighbors in rotation order. After a successful embed this is
/// the combinatorial embedding itself.
pub fn adjacency_lists(g: &Graph) -> String {
    let core = &g.core;
    let mut out = String::new();
    for v in 0..core.n {
        out.push_str(&format!("{v}:"));
        for a in core.adjacency(v) {
            out.push_str(&format!(" {}", core.arcs[a].neighbor));
        }
        out.push('\n');
    }
    out
}

/// Returns the graph in DOT format.
///
/// Intended to be used with `neato`.
pub fn draw_graph(g: &Graph) -> String {
    let core = &g.core;
    let mut output = String::from("graph {\n");
    output.push_str("  mode=sgd;\n");
    output.push_str("  maxiter=1000;\n");
    output.push_str("  node [shape=circle, style=filled, fillcolor=lightblue];\n");
    for v in 0..core.n {
        output.push_str(&format!("  {v} [label=\"{v}\"];\n"));
    }
    for pair in (0..core.arc_watermark).step_by(2) {
        if !core.arc_in_use.contains(pair) || core.arcs[pair].hidden {
            continue;
        }
        let u = core.origin(pair);
        let v = core.arcs[pair].neighbor;
        output.push_str(&format!("  {u} -- {v};\n"));
    }
    output.push_str("}\n");
    output
}

/// Writes the graph to a file in DOT format.
pub fn to_dot_file(g: &Graph, path: &str) -> Result<(), GraphError> {
    to_file(&draw_graph(g), path)
}

/// Writes a string to a file.
pub fn to_file(content: &str, path: &str) -> Result<(), GraphError> {
    std::fs::write(path, content)
        .map_err(|e| GraphError::InvalidGraph(format!("cannot write {path}: {e}")))
}

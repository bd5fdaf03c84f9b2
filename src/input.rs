use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};

use crate::graph::Graph;
use crate::types::GraphError;

/// Reads a graph from a file.
///
/// Undirected graph input:
/// - one line, one edge in format "u,v",
/// - by convention start numbering from 0 and go up to |V|-1.
///
/// Multi-edges and self-loops are rejected.
///
/// Example input:
/// ```text
/// 0,1
/// 1,2
/// 2,3
/// 3,0
/// 0,2
/// ```
pub fn from_file(path: &str) -> Result<Graph, GraphError> {
    let file = File::open(path)
        .map_err(|e| GraphError::InvalidGraph(format!("cannot open {path}: {e}")))?;
    parse_edge_lines(BufReader::new(file))
}

/// This is equivalent to [`from_file`], but takes a string as input.
pub fn from_str(input: &str) -> Result<Graph, GraphError> {
    parse_edge_lines(BufReader::new(Cursor::new(input)))
}

fn parse_edge_lines<R: BufRead>(reader: R) -> Result<Graph, GraphError> {
    let mut edges = Vec::new();
    let mut max_node = 0;
    for line in reader.lines() {
        let line = line.map_err(|e| GraphError::InvalidGraph(format!("read error: {e}")))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (u, v) = line
            .split_once(',')
            .ok_or_else(|| GraphError::InvalidGraph(format!("expected 'u,v', got '{line}'")))?;
        let u: usize = u
            .trim()
            .parse()
            .map_err(|_| GraphError::InvalidGraph(format!("bad vertex index '{u}'")))?;
        let v: usize = v
            .trim()
            .parse()
            .map_err(|_| GraphError::InvalidGraph(format!("bad vertex index '{v}'")))?;
        max_node = max_node.max(u).max(v);
        edges.push((u, v));
    }
    let n = if edges.is_empty() { 0 } else { max_node + 1 };
    let mut g = Graph::new(n);
    g.core.ensure_arc_capacity(edges.len())?;
    for (u, v) in edges {
        g.add_edge(u, v)?;
    }
    Ok(g)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_edge_lines() {
        let g = from_str("0,1\n1,2\n").unwrap();
        assert_eq!(g.core.n, 3);
        assert_eq!(g.core.edge_count, 2);
    }

    #[test]
    fn tolerates_blank_lines_and_spaces() {
        let g = from_str("0, 1\n\n 1,2 \n").unwrap();
        assert_eq!(g.core.edge_count, 2);
    }

    #[test]
    fn rejects_garbage() {
        assert!(from_str("0;1\n").is_err());
        assert!(from_str("0,x\n").is_err());
        assert!(from_str("3,3\n").is_err());
    }

    #[test]
    fn dense_inputs_grow_capacity() {
        let mut text = String::new();
        for u in 0..10 {
            for v in (u + 1)..10 {
                text.push_str(&format!("{u},{v}\n"));
            }
        }
        let g = from_str(&text).unwrap();
        assert_eq!(g.core.edge_count, 45);
    }
}

//! The graph6 text format: one graph per line, the vertex count followed
//! by the bits of the upper-triangular adjacency matrix, packed six bits
//! per printable byte. Used for batch testing against external graph
//! generators, so the encoding is byte-exact.

use std::io::{BufRead, Write};

use crate::graph::{Graph, GraphCore};
use crate::types::GraphError;

pub const HEADER: &str = ">>graph6<<";

/// Largest order expressible in the three-byte long form (18 bits).
const MAX_ORDER: usize = (1 << 18) - 1;

/// Encodes the visible edges of the store as one graph6 line, without
/// the trailing newline.
pub fn encode(core: &GraphCore) -> Result<String, GraphError> {
    let n = core.n;
    if n > MAX_ORDER {
        return Err(GraphError::InvalidGraph(format!(
            "graph order {n} exceeds the graph6 limit"
        )));
    }
    let mut bytes = Vec::new();
    if n <= 62 {
        bytes.push(n as u8 + 63);
    } else {
        bytes.push(126);
        for i in (0..3).rev() {
            bytes.push(((n >> (6 * i)) & 63) as u8 + 63);
        }
    }
    let nbits = n * n.saturating_sub(1) / 2;
    let mut data = vec![0u8; nbits.div_ceil(6)];
    for pair in (0..core.arc_watermark).step_by(2) {
        if !core.arc_in_use.contains(pair) || core.arcs[pair].hidden {
            continue;
        }
        let a = core.origin(pair);
        let b = core.arcs[pair].neighbor;
        if a >= n || b >= n {
            continue;
        }
        let (u, v) = (a.min(b), a.max(b));
        let k = v * (v - 1) / 2 + u;
        data[k / 6] |= 1 << (5 - k % 6);
    }
    bytes.extend(data.iter().map(|b| b + 63));
    Ok(bytes.into_iter().map(char::from).collect())
}

/// Decodes one graph6 line (a leading header is tolerated) into a fresh
/// graph.
pub fn decode(line: &str) -> Result<Graph, GraphError> {
    let line = line.strip_prefix(HEADER).unwrap_or(line);
    let b = line.trim_end_matches(['\r', '\n']).as_bytes();
    if b.is_empty() {
        return Err(GraphError::InvalidGraph("empty graph6 line".into()));
    }
    let (n, order_len) = decode_order(b)?;
    let nbits = n * n.saturating_sub(1) / 2;
    let data = &b[order_len..];
    if data.len() != nbits.div_ceil(6) {
        return Err(GraphError::InvalidGraph(format!(
            "graph6 encoding of order {n} has {} data bytes, expected {}",
            data.len(),
            nbits.div_ceil(6)
        )));
    }
    let mut edges = Vec::new();
    for v in 1..n {
        for u in 0..v {
            let k = v * (v - 1) / 2 + u;
            let byte = check_byte(data[k / 6])?;
            if byte >> (5 - k % 6) & 1 == 1 {
                edges.push((u, v));
            }
        }
    }
    // Trailing pad bits must be zero.
    if nbits % 6 != 0 {
        let last = check_byte(data[data.len() - 1])?;
        if last & ((1 << (6 - nbits % 6)) - 1) != 0 {
            return Err(GraphError::InvalidGraph(
                "graph6 padding bits are not zero".into(),
            ));
        }
    }
    let mut g = Graph::new(n);
    g.core.ensure_arc_capacity(edges.len())?;
    for (u, v) in edges {
        g.add_edge(u, v)?;
    }
    Ok(g)
}

fn decode_order(b: &[u8]) -> Result<(usize, usize), GraphError> {
    if b[0] == 126 {
        if b.len() < 4 {
            return Err(GraphError::InvalidGraph(
                "truncated long-form graph6 order".into(),
            ));
        }
        let mut n = 0usize;
        for i in 0..3 {
            n = (n << 6) | check_byte(b[1 + i])? as usize;
        }
        Ok((n, 4))
    } else {
        Ok((check_byte(b[0])? as usize, 1))
    }
}

/// Strips the printable-ascii offset, rejecting bytes outside the
/// graph6 alphabet.
fn check_byte(b: u8) -> Result<u8, GraphError> {
    if !(63..=126).contains(&b) {
        return Err(GraphError::InvalidGraph(format!(
            "byte {b:#x} outside the graph6 alphabet"
        )));
    }
    Ok(b - 63)
}

/// Streaming writer: the header once, then one line per graph.
pub struct G6Writer<W: Write> {
    out: W,
    written: usize,
}

impl<W: Write> G6Writer<W> {
    pub fn new(mut out: W) -> Result<Self, GraphError> {
        out.write_all(HEADER.as_bytes()).map_err(io_err)?;
        Ok(G6Writer { out, written: 0 })
    }

    pub fn write_graph(&mut self, core: &GraphCore) -> Result<(), GraphError> {
        let line = encode(core)?;
        self.out.write_all(line.as_bytes()).map_err(io_err)?;
        self.out.write_all(b"\n").map_err(io_err)?;
        self.written += 1;
        Ok(())
    }

    pub fn graphs_written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Streaming reader over a graph6 file or string: an iterator yielding
/// one graph per non-empty line. A header on the first line is skipped.
pub struct G6Reader<R: BufRead> {
    input: R,
    first: bool,
    read: usize,
}

impl<R: BufRead> G6Reader<R> {
    pub fn new(input: R) -> Self {
        G6Reader {
            input,
            first: true,
            read: 0,
        }
    }

    pub fn graphs_read(&self) -> usize {
        self.read
    }
}

impl<R: BufRead> Iterator for G6Reader<R> {
    type Item = Result<Graph, GraphError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(io_err(e))),
            }
            let mut text = line.trim_end_matches(['\r', '\n']);
            if self.first {
                self.first = false;
                text = text.strip_prefix(HEADER).unwrap_or(text);
            }
            if text.is_empty() {
                continue;
            }
            self.read += 1;
            return Some(decode(text));
        }
    }
}

fn io_err(e: std::io::Error) -> GraphError {
    GraphError::InvalidGraph(format!("graph6 stream error: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge_list(g: &Graph) -> Vec<(usize, usize)> {
        let core = &g.core;
        let mut out = Vec::new();
        for pair in (0..core.arc_watermark).step_by(2) {
            if !core.arc_in_use.contains(pair) {
                continue;
            }
            let u = core.origin(pair);
            let v = core.arcs[pair].neighbor;
            out.push((u.min(v), u.max(v)));
        }
        out.sort_unstable();
        out
    }

    #[test]
    fn triangle_encodes_as_bw() {
        let mut g = Graph::new(3);
        g.add_edge(0, 1).unwrap();
        g.add_edge(0, 2).unwrap();
        g.add_edge(1, 2).unwrap();
        assert_eq!(encode(&g.core).unwrap(), "Bw");
    }

    #[test]
    fn bw_decodes_to_the_triangle() {
        let g = decode("Bw").unwrap();
        assert_eq!(g.core.n, 3);
        assert_eq!(edge_list(&g), vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn empty_graph_is_a_single_byte() {
        let g = Graph::new(0);
        assert_eq!(encode(&g.core).unwrap(), "?");
        assert_eq!(decode("?").unwrap().core.n, 0);
        let g = Graph::new(5);
        assert_eq!(encode(&g.core).unwrap(), "D??");
    }

    #[test]
    fn round_trips_k4() {
        let mut g = Graph::new(4);
        for (u, v) in [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)] {
            g.add_edge(u, v).unwrap();
        }
        let line = encode(&g.core).unwrap();
        let back = decode(&line).unwrap();
        assert_eq!(edge_list(&back), edge_list(&g));
    }

    #[test]
    fn long_form_order_round_trips() {
        let mut g = Graph::new(63);
        g.add_edge(0, 62).unwrap();
        g.add_edge(5, 40).unwrap();
        let line = encode(&g.core).unwrap();
        assert_eq!(line.as_bytes()[0], 126);
        let back = decode(&line).unwrap();
        assert_eq!(back.core.n, 63);
        assert_eq!(edge_list(&back), vec![(0, 62), (5, 40)]);
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(decode("").is_err());
        assert!(decode("Bwx").is_err()); // extra data byte
        assert!(decode("B").is_err()); // missing data byte
        assert!(decode("B\u{1}").is_err()); // byte below the alphabet
    }

    #[test]
    fn reader_skips_the_header_and_streams_lines() {
        let text = format!("{HEADER}Bw\nBw\n\nBw\n");
        let mut reader = G6Reader::new(text.as_bytes());
        let mut count = 0;
        for g in reader.by_ref() {
            assert_eq!(g.unwrap().core.n, 3);
            count += 1;
        }
        assert_eq!(count, 3);
        assert_eq!(reader.graphs_read(), 3);
    }

    #[test]
    fn writer_emits_header_then_lines() {
        let mut w = G6Writer::new(Vec::new()).unwrap();
        let mut g = Graph::new(3);
        g.add_edge(0, 1).unwrap();
        g.add_edge(0, 2).unwrap();
        g.add_edge(1, 2).unwrap();
        w.write_graph(&g.core).unwrap();
        w.write_graph(&g.core).unwrap();
        assert_eq!(w.graphs_written(), 2);
        let bytes = w.into_inner();
        assert_eq!(String::from_utf8(bytes).unwrap(), format!("{HEADER}Bw\nBw\n"));
    }

    mod properties {
        use super::*;
        use crate::testing::random_graphs::random_graph;
        use proptest::prelude::*;

        proptest! {
            /// Round trip across both order encodings (the range spans
            /// the 62-vertex short-form boundary).
            #[test]
            fn encode_decode_round_trips(
                n in 0usize..80,
                m in 0usize..160,
                seed in any::<u64>(),
            ) {
                let pg = random_graph(n, m, seed);
                let g = Graph::from_petgraph(&pg).unwrap();
                let line = encode(&g.core).unwrap();
                let back = decode(&line).unwrap();
                prop_assert_eq!(back.core.n, g.core.n);
                prop_assert_eq!(edge_list(&back), edge_list(&g));
            }
        }
    }
}

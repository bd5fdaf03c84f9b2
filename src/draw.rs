use hashbrown::{HashMap, HashSet};

use crate::embed::embed;
use crate::extension::{ExtensionId, GraphExtension};
use crate::graph::{Graph, GraphCore};
use crate::types::{EmbedMode, EmbedResult, GraphError, NIL};

/// Horizontal segment of one vertex in the visibility representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexSegment {
    pub row: usize,
    pub col_lo: usize,
    pub col_hi: usize,
}

/// Vertical segment of one edge, keyed by its even arc index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeSegment {
    pub col: usize,
    pub row_lo: usize,
    pub row_hi: usize,
}

/// A visibility representation of a planar embedding: every vertex a
/// horizontal segment, every edge a vertical one touching exactly its
/// two endpoint segments.
#[derive(Clone, Debug, Default)]
pub struct VisibilityRep {
    pub vertices: Vec<VertexSegment>,
    pub edges: HashMap<usize, EdgeSegment>,
}

/// Extension carrying the drawing computed after a `DrawPlanar` embed.
///
/// Its per-edge table is keyed by arc slot, so the arc arena must not
/// grow once attached.
#[derive(Default)]
pub struct DrawExtension {
    pub drawing: Option<VisibilityRep>,
}

impl DrawExtension {
    pub fn new() -> Self {
        DrawExtension::default()
    }
}

impl GraphExtension for DrawExtension {
    fn id(&self) -> ExtensionId {
        ExtensionId::Draw
    }

    fn forbids_arc_growth(&self) -> bool {
        true
    }

    fn as_any(&self) -> Option<&dyn std::any::Any> {
        Some(self)
    }

    fn as_any_mut(&mut self) -> Option<&mut dyn std::any::Any> {
        Some(self)
    }

    fn on_reinit(&mut self, _core: &mut GraphCore) {
        self.drawing = None;
    }

    fn dup(&self) -> Box<dyn GraphExtension> {
        Box::new(DrawExtension {
            drawing: self.drawing.clone(),
        })
    }
}

/// The drawing held by the graph's draw extension, if computed.
pub fn drawing(g: &Graph) -> Option<&VisibilityRep> {
    g.extensions
        .iter()
        .find(|e| e.id() == ExtensionId::Draw)
        .and_then(|e| e.as_any())
        .and_then(|a| a.downcast_ref::<DrawExtension>())
        .and_then(|d| d.drawing.as_ref())
}

/// Computes the visibility representation from the finished embedding
/// and stores it in the attached draw extension.
pub fn compute_into_extension(g: &mut Graph) -> Result<(), GraphError> {
    let rep = compute(&g.core)?;
    let ext = g
        .extensions
        .iter_mut()
        .find(|e| e.id() == ExtensionId::Draw)
        .and_then(|e| e.as_any_mut())
        .and_then(|a| a.downcast_mut::<DrawExtension>())
        .ok_or_else(|| {
            GraphError::InternalInvariantViolation(
                "draw extension missing after a drawing run".into(),
            )
        })?;
    ext.drawing = Some(rep);
    Ok(())
}

/// Builds the representation. A biconnected graph is drawn directly;
/// anything else is first augmented with virtual edges until it is
/// biconnected, drawn, and then stripped back to its own edges.
pub fn compute(core: &GraphCore) -> Result<VisibilityRep, GraphError> {
    let n = core.n;
    if n == 0 {
        return Ok(VisibilityRep::default());
    }
    if n == 1 {
        return Ok(VisibilityRep {
            vertices: vec![VertexSegment {
                row: 0,
                col_lo: 0,
                col_hi: 0,
            }],
            edges: HashMap::new(),
        });
    }
    let adj: Vec<Vec<usize>> = (0..n).map(|v| core.adjacency(v)).collect();
    if let Some(dfs) = DrawDfs::run(core, &adj, 0) {
        return draw_biconnected(core, &adj, &dfs);
    }
    draw_augmented(core)
}

/// Draws a biconnected embedding: an st-numbering orients every edge
/// upward, vertex rows come from longest paths in that orientation, and
/// edge columns from a topological numbering of the faces between the
/// oriented boundary paths.
fn draw_biconnected(
    core: &GraphCore,
    adj: &[Vec<usize>],
    dfs: &DrawDfs,
) -> Result<VisibilityRep, GraphError> {
    let n = core.n;
    let s = 0;
    let t = core.arcs[adj[s][0]].neighbor;
    let st = st_number(core, adj, dfs, s, t)?;

    // Rows: longest path from s in the upward orientation.
    let mut by_st: Vec<usize> = (0..n).collect();
    by_st.sort_unstable_by_key(|&v| st[v]);
    let mut rank = vec![0usize; n];
    for &v in &by_st {
        for &a in &adj[v] {
            let u = core.arcs[a].neighbor;
            if st[u] < st[v] {
                rank[v] = rank[v].max(rank[u] + 1);
            }
        }
    }

    // Columns: topological numbering of the faces, flowing across each
    // upward edge from its one side to the other. The st edge itself is
    // the seam between the leftmost and rightmost face.
    let face = trace_faces(core);
    let nu = number_faces(core, &face, &st, s, t)?;
    let mut edges = HashMap::new();
    for pair in (0..core.arc_watermark).step_by(2) {
        if !core.arc_in_use.contains(pair) {
            continue;
        }
        let u = core.origin(pair);
        let w = core.arcs[pair].neighbor;
        let tail = if st[u] < st[w] { pair } else { pair ^ 1 };
        edges.insert(
            pair,
            EdgeSegment {
                col: nu[face[tail]],
                row_lo: rank[u].min(rank[w]),
                row_hi: rank[u].max(rank[w]),
            },
        );
    }
    let mut vertices = Vec::with_capacity(n);
    for v in 0..n {
        let mut lo = usize::MAX;
        let mut hi = 0;
        for &a in &adj[v] {
            let col = edges[&(a & !1)].col;
            lo = lo.min(col);
            hi = hi.max(col);
        }
        vertices.push(VertexSegment {
            row: rank[v],
            col_lo: lo,
            col_hi: hi,
        });
    }
    Ok(VisibilityRep { vertices, edges })
}

/// Draws a graph with cut vertices or several components.
///
/// The edge list is augmented until the graph is biconnected: bridge
/// edges tie the components together, then each round re-embeds and
/// chords one vertex that some face walk visits twice. The chords of a
/// round sit at the corners of a single face, so they can all be routed
/// inside that face and the graph stays planar. The augmented drawing
/// keeps its vertex segments; edge segments of virtual edges are
/// dropped and the rest rekeyed to the input arc pairs.
fn draw_augmented(core: &GraphCore) -> Result<VisibilityRep, GraphError> {
    let n = core.n;
    let mut orig_pairs = Vec::new();
    let mut aug: Vec<(usize, usize)> = Vec::new();
    let mut present: HashSet<(usize, usize)> = HashSet::new();
    for pair in (0..core.arc_watermark).step_by(2) {
        if !core.arc_in_use.contains(pair) || core.arcs[pair].hidden {
            continue;
        }
        let u = core.origin(pair);
        let w = core.arcs[pair].neighbor;
        orig_pairs.push(pair);
        aug.push((u, w));
        present.insert((u.min(w), u.max(w)));
    }

    // Bridge edges between one representative per component.
    let mut comp = vec![NIL; n];
    let mut reps = Vec::new();
    for v in 0..n {
        if comp[v] != NIL {
            continue;
        }
        reps.push(v);
        comp[v] = v;
        let mut stack = vec![v];
        while let Some(u) = stack.pop() {
            for a in core.adjacency(u) {
                let w = core.arcs[a].neighbor;
                if comp[w] == NIL {
                    comp[w] = v;
                    stack.push(w);
                }
            }
        }
    }
    for pair in reps.windows(2) {
        aug.push((pair[0], pair[1]));
        present.insert((pair[0], pair[1]));
    }

    loop {
        let mut g2 = graph_from_pairs(n, &aug)?;
        if embed(&mut g2, EmbedMode::Planar)? != EmbedResult::Ok {
            return Err(GraphError::InternalInvariantViolation(
                "augmented drawing graph lost planarity".into(),
            ));
        }
        let Some(corners) = split_corners(&g2.core) else {
            let adj: Vec<Vec<usize>> = (0..n).map(|v| g2.core.adjacency(v)).collect();
            let dfs = DrawDfs::run(&g2.core, &adj, 0).ok_or_else(|| {
                GraphError::InternalInvariantViolation(
                    "augmented drawing graph is not biconnected".into(),
                )
            })?;
            let full = draw_biconnected(&g2.core, &adj, &dfs)?;
            let mut edges = HashMap::new();
            for (i, &pair) in orig_pairs.iter().enumerate() {
                if let Some(seg) = full.edges.get(&(2 * i)) {
                    edges.insert(pair, *seg);
                }
            }
            return Ok(VisibilityRep {
                vertices: full.vertices,
                edges,
            });
        };
        let before = aug.len();
        for (u, w) in corners {
            let key = (u.min(w), u.max(w));
            if u != w && present.insert(key) {
                aug.push((u, w));
            }
        }
        if aug.len() == before {
            return Err(GraphError::InternalInvariantViolation(
                "no chord available at a repeated face vertex".into(),
            ));
        }
    }
}

fn graph_from_pairs(n: usize, edges: &[(usize, usize)]) -> Result<Graph, GraphError> {
    let mut g = Graph::new(n);
    g.core.ensure_arc_capacity(edges.len())?;
    for &(u, w) in edges {
        g.add_edge(u, w)?;
    }
    Ok(g)
}

/// Corner vertex pairs around the first vertex some face walk visits
/// twice. `None` means every face walk is a simple cycle, so the graph
/// has no cut vertex.
fn split_corners(core: &GraphCore) -> Option<Vec<(usize, usize)>> {
    let mut seen = vec![false; core.arcs.len()];
    for start in 0..core.arc_watermark {
        if !core.arc_in_use.contains(start) || seen[start] {
            continue;
        }
        let mut walk = Vec::new();
        let mut a = start;
        while !seen[a] {
            seen[a] = true;
            walk.push(a);
            let w = core.arcs[a].neighbor;
            let succ = core.arcs[a ^ 1].link[0];
            a = if succ == NIL {
                core.vertices[w].link[0]
            } else {
                succ
            };
        }
        let mut visited: HashSet<usize> = HashSet::new();
        let mut cut = NIL;
        for &a in &walk {
            let v = core.origin(a);
            if !visited.insert(v) {
                cut = v;
                break;
            }
        }
        if cut == NIL {
            continue;
        }
        let len = walk.len();
        let mut corners = Vec::new();
        for (i, &a) in walk.iter().enumerate() {
            if core.origin(a) != cut {
                continue;
            }
            let prev = core.origin(walk[(i + len - 1) % len]);
            let next = core.arcs[a].neighbor;
            corners.push((prev, next));
        }
        return Some(corners);
    }
    None
}

struct DrawDfs {
    dfn: Vec<usize>,
    parent: Vec<usize>,
    /// Even arc index of the tree edge up to the parent.
    tree_pair: Vec<usize>,
    low: Vec<usize>,
    /// Arc out of `v` realizing `low[v]`: a back arc to the low
    /// ancestor, or the tree arc into the child inheriting it.
    low_arc: Vec<usize>,
}

impl DrawDfs {
    /// Iterative DFS from `s`; the first arc of `adj[s]` seeds the tree,
    /// so the chosen sink `t` becomes the first child. Returns `None`
    /// on disconnected input or an articulation point.
    fn run(core: &GraphCore, adj: &[Vec<usize>], s: usize) -> Option<DrawDfs> {
        let n = core.n;
        let mut d = DrawDfs {
            dfn: vec![NIL; n],
            parent: vec![NIL; n],
            tree_pair: vec![NIL; n],
            low: vec![NIL; n],
            low_arc: vec![NIL; n],
        };
        let mut next = 0;
        d.dfn[s] = 0;
        d.low[s] = 0;
        next += 1;
        let mut stack: Vec<(usize, usize)> = vec![(s, 0)];
        let mut root_children = 0;
        while let Some(&mut (v, ref mut i)) = stack.last_mut() {
            if *i < adj[v].len() {
                let a = adj[v][*i];
                *i += 1;
                let w = core.arcs[a].neighbor;
                if d.dfn[w] == NIL {
                    d.dfn[w] = next;
                    d.low[w] = next;
                    next += 1;
                    d.parent[w] = v;
                    d.tree_pair[w] = a & !1;
                    if v == s {
                        root_children += 1;
                    }
                    stack.push((w, 0));
                } else if (a & !1) != d.tree_pair[v] && d.dfn[w] < d.low[v] {
                    d.low[v] = d.dfn[w];
                    d.low_arc[v] = a;
                }
            } else {
                stack.pop();
                if let Some(&(p, _)) = stack.last() {
                    if p != s && d.low[v] >= d.dfn[p] {
                        return None;
                    }
                    if d.low[v] < d.low[p] {
                        d.low[p] = d.low[v];
                        // the tree arc from p down into v
                        d.low_arc[p] = if core.origin(d.tree_pair[v]) == p {
                            d.tree_pair[v]
                        } else {
                            d.tree_pair[v] ^ 1
                        };
                    }
                }
            }
        }
        if next != n || root_children > 1 {
            return None;
        }
        Some(d)
    }
}

/// Even–Tarjan st-numbering: repeatedly extends the set of numbered
/// ("old") vertices by ear paths found along lowpoint chains, yielding
/// an order where every vertex except the ends has both a smaller and a
/// larger neighbor.
fn st_number(
    core: &GraphCore,
    adj: &[Vec<usize>],
    dfs: &DrawDfs,
    s: usize,
    t: usize,
) -> Result<Vec<usize>, GraphError> {
    let n = core.n;
    let mut old_v = vec![false; n];
    let mut old_e = vec![false; core.arcs.len()];
    let mut pos = vec![0usize; n];
    old_v[s] = true;
    old_v[t] = true;
    let st_pair = dfs.tree_pair[t];
    old_e[st_pair] = true;
    let mut stack = vec![t, s];
    let mut st = vec![NIL; n];
    let mut next = 0;
    while let Some(v) = stack.pop() {
        match find_ear(core, adj, dfs, &mut old_v, &mut old_e, &mut pos, v) {
            None => {
                st[v] = next;
                next += 1;
            }
            Some(internals) => {
                for &u in internals.iter().rev() {
                    stack.push(u);
                }
                stack.push(v);
            }
        }
    }
    if next != n {
        return Err(GraphError::InternalInvariantViolation(
            "st-numbering did not reach every vertex".into(),
        ));
    }
    Ok(st)
}

/// Finds a path of unused edges from the numbered vertex `v` to another
/// numbered vertex, marking everything on it used. Returns the interior
/// vertices, or `None` when `v` has no unused edge left.
fn find_ear(
    core: &GraphCore,
    adj: &[Vec<usize>],
    dfs: &DrawDfs,
    old_v: &mut [bool],
    old_e: &mut [bool],
    pos: &mut [usize],
    v: usize,
) -> Option<Vec<usize>> {
    while pos[v] < adj[v].len() {
        let a = adj[v][pos[v]];
        pos[v] += 1;
        let pair = a & !1;
        if old_e[pair] {
            continue;
        }
        old_e[pair] = true;
        let w = core.arcs[a].neighbor;
        if dfs.parent[w] == v && dfs.tree_pair[w] == pair {
            // Tree edge down: follow the lowpoint chain to an ancestor.
            let mut internals = Vec::new();
            let mut cur = w;
            loop {
                old_v[cur] = true;
                internals.push(cur);
                let la = dfs.low_arc[cur];
                old_e[la & !1] = true;
                let nxt = core.arcs[la].neighbor;
                if dfs.dfn[nxt] < dfs.dfn[cur] {
                    break;
                }
                cur = nxt;
            }
            return Some(internals);
        }
        if dfs.dfn[w] < dfs.dfn[v] {
            // Back edge straight to an ancestor, already numbered.
            return Some(Vec::new());
        }
        // Back edge into a descendant: climb the tree until numbered.
        let mut internals = Vec::new();
        let mut cur = w;
        while !old_v[cur] {
            old_v[cur] = true;
            internals.push(cur);
            old_e[dfs.tree_pair[cur]] = true;
            cur = dfs.parent[cur];
        }
        return Some(internals);
    }
    None
}

/// Face id per directed arc, from tracing the rotation system.
fn trace_faces(core: &GraphCore) -> Vec<usize> {
    let mut face = vec![NIL; core.arcs.len()];
    let mut next_id = 0;
    for start in 0..core.arc_watermark {
        if !core.arc_in_use.contains(start) || face[start] != NIL {
            continue;
        }
        let mut a = start;
        while face[a] == NIL {
            face[a] = next_id;
            let w = core.arcs[a].neighbor;
            let succ = core.arcs[a ^ 1].link[0];
            a = if succ == NIL {
                core.vertices[w].link[0]
            } else {
                succ
            };
        }
        next_id += 1;
    }
    face
}

/// Topological numbering of the faces across the upward edge
/// orientation, with the faces beside the st edge as the extremes.
fn number_faces(
    core: &GraphCore,
    face: &[usize],
    st: &[usize],
    s: usize,
    t: usize,
) -> Result<Vec<usize>, GraphError> {
    let nf = face
        .iter()
        .filter(|&&f| f != NIL)
        .max()
        .map(|&f| f + 1)
        .unwrap_or(0);
    let mut out: Vec<Vec<usize>> = vec![Vec::new(); nf];
    let mut in_deg = vec![0usize; nf];
    for pair in (0..core.arc_watermark).step_by(2) {
        if !core.arc_in_use.contains(pair) {
            continue;
        }
        let u = core.origin(pair);
        let w = core.arcs[pair].neighbor;
        if (u == s && w == t) || (u == t && w == s) {
            continue;
        }
        let tail = if st[u] < st[w] { pair } else { pair ^ 1 };
        let (from, to) = (face[tail], face[tail ^ 1]);
        if from == to {
            continue;
        }
        out[from].push(to);
        in_deg[to] += 1;
    }
    let mut nu = vec![NIL; nf];
    let mut queue: Vec<usize> = (0..nf).filter(|&f| in_deg[f] == 0).collect();
    let mut next = 0;
    let mut head = 0;
    while head < queue.len() {
        let f = queue[head];
        head += 1;
        nu[f] = next;
        next += 1;
        for i in 0..out[f].len() {
            let g = out[f][i];
            in_deg[g] -= 1;
            if in_deg[g] == 0 {
                queue.push(g);
            }
        }
    }
    if next != nf {
        return Err(GraphError::InternalInvariantViolation(
            "face ordering of the upward embedding has a cycle".into(),
        ));
    }
    Ok(nu)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::embed;
    use crate::types::{EmbedMode, EmbedResult};

    fn drawn(n: usize, edges: &[(usize, usize)]) -> (Graph, VisibilityRep) {
        let mut g = Graph::new(n);
        for &(u, v) in edges {
            g.add_edge(u, v).unwrap();
        }
        assert_eq!(
            embed(&mut g, EmbedMode::DrawPlanar).unwrap(),
            EmbedResult::Ok
        );
        let rep = drawing(&g).unwrap().clone();
        (g, rep)
    }

    /// Segments must touch exactly their endpoints and never cross.
    fn assert_valid(g: &Graph, rep: &VisibilityRep) {
        let core = &g.core;
        for (&pair, seg) in &rep.edges {
            let u = core.origin(pair);
            let w = core.arcs[pair].neighbor;
            let (vu, vw) = (rep.vertices[u], rep.vertices[w]);
            assert_ne!(vu.row, vw.row);
            assert_eq!(seg.row_lo, vu.row.min(vw.row));
            assert_eq!(seg.row_hi, vu.row.max(vw.row));
            assert!(vu.col_lo <= seg.col && seg.col <= vu.col_hi);
            assert!(vw.col_lo <= seg.col && seg.col <= vw.col_hi);
        }
        // Edges sharing a column stack without interior overlap.
        let mut by_col: HashMap<usize, Vec<(usize, usize)>> = HashMap::new();
        for seg in rep.edges.values() {
            by_col.entry(seg.col).or_default().push((seg.row_lo, seg.row_hi));
        }
        for spans in by_col.values_mut() {
            spans.sort_unstable();
            for w in spans.windows(2) {
                assert!(w[1].0 >= w[0].1);
            }
        }
        // Vertices sharing a row do not properly overlap.
        let mut by_row: HashMap<usize, Vec<(usize, usize)>> = HashMap::new();
        for seg in &rep.vertices {
            by_row.entry(seg.row).or_default().push((seg.col_lo, seg.col_hi));
        }
        for spans in by_row.values_mut() {
            spans.sort_unstable();
            for w in spans.windows(2) {
                assert!(w[1].0 > w[0].1);
            }
        }
    }

    #[test]
    fn draws_a_square() {
        let (g, rep) = drawn(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        assert_valid(&g, &rep);
        // One edge spans the full height on its own column; the other
        // three stack in a second column.
        let cols: Vec<usize> = rep.edges.values().map(|e| e.col).collect();
        let mut uniq = cols.clone();
        uniq.sort_unstable();
        uniq.dedup();
        assert_eq!(uniq.len(), 2);
    }

    #[test]
    fn draws_k4() {
        let (g, rep) = drawn(4, &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
        assert_valid(&g, &rep);
        assert_eq!(rep.edges.len(), 6);
    }

    #[test]
    fn draws_the_octahedron() {
        let mut edges = Vec::new();
        for u in 0..6 {
            for v in (u + 1)..6 {
                if [(0, 1), (2, 3), (4, 5)].contains(&(u, v)) {
                    continue;
                }
                edges.push((u, v));
            }
        }
        let (g, rep) = drawn(6, &edges);
        assert_valid(&g, &rep);
        assert_eq!(rep.edges.len(), 12);
    }

    /// Two triangles sharing a vertex: the shared vertex repeats on a
    /// face walk and the drawing must still come out consistent.
    #[test]
    fn draws_two_triangles_sharing_a_vertex() {
        let (g, rep) = drawn(5, &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 2)]);
        assert_valid(&g, &rep);
        assert_eq!(rep.edges.len(), 6);
    }

    #[test]
    fn draws_a_path() {
        let (g, rep) = drawn(4, &[(0, 1), (1, 2), (2, 3)]);
        assert_valid(&g, &rep);
        assert_eq!(rep.edges.len(), 3);
    }

    #[test]
    fn draws_disconnected_components() {
        let (g, rep) = drawn(6, &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]);
        assert_valid(&g, &rep);
        assert_eq!(rep.edges.len(), 6);
        assert_eq!(rep.vertices.len(), 6);
    }

    #[test]
    fn draws_an_isolated_vertex_beside_an_edge() {
        let (g, rep) = drawn(3, &[(0, 1)]);
        assert_valid(&g, &rep);
        assert_eq!(rep.edges.len(), 1);
        assert_eq!(rep.vertices.len(), 3);
    }

    #[test]
    fn single_edge_draws_as_two_stacked_segments() {
        let (g, rep) = drawn(2, &[(0, 1)]);
        assert_valid(&g, &rep);
        assert_eq!(rep.vertices[0].row.max(rep.vertices[1].row), 1);
    }
}

use fixedbitset::FixedBitSet;
use hashbrown::HashSet;

use crate::extension::{ExtensionId, GraphExtension};
use crate::types::{EDGE_LIMIT, EdgeType, GraphError, NIL, UnGraph};

/// One directed arc of a twin pair. The pair for one edge lives at
/// indices `2k` and `2k + 1`, so `twin(a) = a ^ 1`. An arc is stored in
/// the adjacency list of its origin, which is recoverable as
/// `arcs[a ^ 1].neighbor`.
#[derive(Clone, Debug)]
pub struct Arc {
    /// Vertex at the far end of this arc.
    pub neighbor: usize,
    /// Neighboring arcs in the origin's adjacency list. `link[s]` is the
    /// next arc when walking the list from the `s` end.
    pub link: [usize; 2],
    pub ty: EdgeType,
    /// On tree arcs: the child bicomp below was flipped an odd number of
    /// times. Resolved by the orientation pass.
    pub inverted: bool,
    pub hidden: bool,
    pub visited: bool,
}

impl Default for Arc {
    fn default() -> Self {
        Arc {
            neighbor: NIL,
            link: [NIL, NIL],
            ty: EdgeType::Real,
            inverted: false,
            hidden: false,
            visited: false,
        }
    }
}

/// A vertex slot. `link[s]` holds the extreme arc at end `s` of the
/// adjacency list; during embedding the two extremes are exactly the two
/// external-face neighbors of the vertex.
#[derive(Clone, Debug)]
pub struct Vertex {
    pub link: [usize; 2],
    pub visited: bool,
}

impl Default for Vertex {
    fn default() -> Self {
        Vertex {
            link: [NIL, NIL],
            visited: false,
        }
    }
}

/// Undo journal entries for the vertex-level store operations.
#[derive(Clone, Debug)]
pub enum UndoRecord {
    Begin,
    HiddenEdge { arc: usize },
    HiddenVertex { v: usize },
    /// `v` was absorbed into `u`; its arcs occupied `v0..=v1` of its old
    /// list and now sit at the `0` end of `u`'s list.
    Identified { u: usize, v: usize, v0: usize, v1: usize },
}

/// The extensible array-based graph store.
///
/// Vertices `0..n` are the input vertices; `n..2n` are virtual bicomp
/// root slots used only while an embedding is under construction (root
/// `n + c` stands for the parent end of the tree edge into DFS child
/// `c`). Real edges draw arc pairs from `0..arc_watermark`; slots past
/// the watermark form an arena for the embedder's short-circuit arcs.
#[derive(Clone, Debug)]
pub struct GraphCore {
    pub n: usize,
    pub vertices: Vec<Vertex>,
    pub arcs: Vec<Arc>,
    pub vertex_in_use: FixedBitSet,
    pub arc_in_use: FixedBitSet,
    /// Real edges currently in the graph, hidden ones included.
    pub edge_count: usize,
    pub arc_watermark: usize,
    next_real: usize,
    free_real: Vec<usize>,
    next_extra: usize,
    free_extra: Vec<usize>,
    pub growth_locked: bool,
    pub undo: Vec<UndoRecord>,
}

impl GraphCore {
    pub fn new(n: usize) -> Self {
        let mut g = GraphCore {
            n: 0,
            vertices: Vec::new(),
            arcs: Vec::new(),
            vertex_in_use: FixedBitSet::new(),
            arc_in_use: FixedBitSet::new(),
            edge_count: 0,
            arc_watermark: 0,
            next_real: 0,
            free_real: Vec::new(),
            next_extra: 0,
            free_extra: Vec::new(),
            growth_locked: false,
            undo: Vec::new(),
        };
        g.init(n);
        g
    }

    /// (Re)initializes the store for `n` vertices. Re-entrant: all prior
    /// edges, marks, and journal entries are discarded.
    pub fn init(&mut self, n: usize) {
        self.n = n;
        self.vertices = vec![Vertex::default(); 2 * n];
        self.arc_watermark = 2 * EDGE_LIMIT * n;
        // Extra arena: up to one short-circuit pair per direction per
        // bicomp root.
        let cap = self.arc_watermark + 4 * n;
        self.arcs = vec![Arc::default(); cap];
        self.vertex_in_use = FixedBitSet::with_capacity(2 * n);
        self.vertex_in_use.insert_range(0..n);
        self.arc_in_use = FixedBitSet::with_capacity(cap);
        self.edge_count = 0;
        self.next_real = 0;
        self.free_real.clear();
        self.next_extra = self.arc_watermark;
        self.free_extra.clear();
        self.undo.clear();
    }

    /// Grows the real-arc region to hold at least `edges` edges. Rejected
    /// once an extension with arc-indexed side tables is attached.
    pub fn ensure_arc_capacity(&mut self, edges: usize) -> Result<(), GraphError> {
        if 2 * edges <= self.arc_watermark {
            return Ok(());
        }
        if self.growth_locked {
            return Err(GraphError::InvalidGraph(
                "arc capacity is locked by an attached extension".into(),
            ));
        }
        if self.next_extra > self.arc_watermark || !self.free_extra.is_empty() {
            return Err(GraphError::InvalidGraph(
                "cannot grow arc capacity while virtual arcs exist".into(),
            ));
        }
        let old_watermark = self.arc_watermark;
        self.arc_watermark = 2 * edges;
        let cap = self.arc_watermark + 4 * self.n;
        self.arcs.resize(cap, Arc::default());
        self.arc_in_use.grow(cap);
        self.next_extra = self.arc_watermark;
        debug_assert!(self.next_real <= old_watermark);
        Ok(())
    }

    pub fn twin(&self, arc: usize) -> usize {
        arc ^ 1
    }

    /// Origin vertex of `arc`: the vertex whose adjacency list holds it.
    pub fn origin(&self, arc: usize) -> usize {
        self.arcs[arc ^ 1].neighbor
    }

    // ---- adjacency-list surgery -------------------------------------

    /// Links `arc` into `v`'s adjacency list at end `end`, and points the
    /// twin back at `v`.
    pub fn attach_arc(&mut self, v: usize, arc: usize, end: usize) {
        let old = self.vertices[v].link[end];
        self.arcs[arc].link[end] = old;
        self.arcs[arc].link[1 ^ end] = NIL;
        if old != NIL {
            self.arcs[old].link[1 ^ end] = arc;
        } else {
            self.vertices[v].link[1 ^ end] = arc;
        }
        self.vertices[v].link[end] = arc;
        self.arcs[arc ^ 1].neighbor = v;
    }

    /// Unlinks `arc` from its origin's list, leaving the arc's own link
    /// fields intact so `relink_arc` can undo this in LIFO order.
    pub fn unlink_arc(&mut self, arc: usize) {
        let v = self.origin(arc);
        let n0 = self.arcs[arc].link[0];
        let n1 = self.arcs[arc].link[1];
        if n1 != NIL {
            self.arcs[n1].link[0] = n0;
        } else {
            self.vertices[v].link[0] = n0;
        }
        if n0 != NIL {
            self.arcs[n0].link[1] = n1;
        } else {
            self.vertices[v].link[1] = n1;
        }
    }

    /// Undoes `unlink_arc` using the arc's preserved link fields. Only
    /// valid if the surrounding list has not changed since the unlink.
    pub fn relink_arc(&mut self, arc: usize) {
        let v = self.origin(arc);
        let n0 = self.arcs[arc].link[0];
        let n1 = self.arcs[arc].link[1];
        if n1 != NIL {
            self.arcs[n1].link[0] = arc;
        } else {
            self.vertices[v].link[0] = arc;
        }
        if n0 != NIL {
            self.arcs[n0].link[1] = arc;
        } else {
            self.vertices[v].link[1] = arc;
        }
    }

    /// Reverses the rotation of `v` by swapping every link pair in its
    /// list, ends included.
    pub fn invert_vertex(&mut self, v: usize) {
        let mut a = self.vertices[v].link[0];
        while a != NIL {
            let next = self.arcs[a].link[0];
            self.arcs[a].link.swap(0, 1);
            a = next;
        }
        self.vertices[v].link.swap(0, 1);
    }

    /// Arcs of `v`'s adjacency list, walking from end 0.
    pub fn adjacency(&self, v: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut a = self.vertices[v].link[0];
        while a != NIL {
            out.push(a);
            a = self.arcs[a].link[0];
        }
        out
    }

    pub fn degree(&self, v: usize) -> usize {
        let mut d = 0;
        let mut a = self.vertices[v].link[0];
        while a != NIL {
            d += 1;
            a = self.arcs[a].link[0];
        }
        d
    }

    // ---- edges ------------------------------------------------------

    /// Adds the undirected edge `(u, v)` and returns the arc stored in
    /// `u`'s list. Self-loops, duplicates, out-of-range endpoints, and
    /// capacity exhaustion are `InvalidGraph`.
    pub fn add_edge(&mut self, u: usize, v: usize) -> Result<usize, GraphError> {
        if u >= self.n || v >= self.n {
            return Err(GraphError::InvalidGraph(format!(
                "edge ({u}, {v}) out of range for {} vertices",
                self.n
            )));
        }
        if u == v {
            return Err(GraphError::InvalidGraph(format!("self-loop at {u}")));
        }
        let mut a = self.vertices[u].link[0];
        while a != NIL {
            if self.arcs[a].neighbor == v {
                return Err(GraphError::InvalidGraph(format!("duplicate edge ({u}, {v})")));
            }
            a = self.arcs[a].link[0];
        }
        let pair = if let Some(p) = self.free_real.pop() {
            p
        } else if self.next_real < self.arc_watermark {
            let p = self.next_real;
            self.next_real += 2;
            p
        } else {
            return Err(GraphError::InvalidGraph(format!(
                "arc capacity exhausted ({} arcs)",
                self.arc_watermark
            )));
        };
        self.arcs[pair] = Arc {
            neighbor: v,
            ..Arc::default()
        };
        self.arcs[pair + 1] = Arc {
            neighbor: u,
            ..Arc::default()
        };
        self.attach_arc(u, pair, 1);
        self.attach_arc(v, pair + 1, 1);
        self.arc_in_use.insert(pair);
        self.arc_in_use.insert(pair + 1);
        self.edge_count += 1;
        Ok(pair)
    }

    /// Allocates an arc pair from the arena past the watermark. Used for
    /// arcs that never count as edges of the graph.
    pub fn alloc_extra_pair(&mut self) -> Result<usize, GraphError> {
        let pair = if let Some(p) = self.free_extra.pop() {
            p
        } else if self.next_extra + 1 < self.arcs.len() {
            let p = self.next_extra;
            self.next_extra += 2;
            p
        } else {
            return Err(GraphError::Allocation(
                "virtual arc arena exhausted".into(),
            ));
        };
        self.arcs[pair] = Arc::default();
        self.arcs[pair + 1] = Arc::default();
        self.arc_in_use.insert(pair);
        self.arc_in_use.insert(pair + 1);
        Ok(pair)
    }

    /// Unlinks both arcs of the pair containing `arc` but keeps the slots
    /// allocated, so `restore_edge` can put them back. O(1).
    pub fn hide_edge(&mut self, arc: usize) {
        let pair = arc & !1;
        self.unlink_arc(pair);
        self.unlink_arc(pair + 1);
        self.arcs[pair].hidden = true;
        self.arcs[pair + 1].hidden = true;
    }

    /// Relinks a hidden edge at its old list positions. Edges must be
    /// restored in the reverse order of hiding.
    pub fn restore_edge(&mut self, arc: usize) {
        let pair = arc & !1;
        self.arcs[pair].hidden = false;
        self.arcs[pair + 1].hidden = false;
        self.relink_arc(pair + 1);
        self.relink_arc(pair);
    }

    /// Removes the pair containing `arc` from the graph entirely.
    pub fn delete_edge(&mut self, arc: usize) {
        let pair = arc & !1;
        if !self.arcs[pair].hidden {
            self.unlink_arc(pair);
            self.unlink_arc(pair + 1);
        }
        self.arc_in_use.remove(pair);
        self.arc_in_use.remove(pair + 1);
        self.arcs[pair] = Arc::default();
        self.arcs[pair + 1] = Arc::default();
        if pair < self.arc_watermark {
            self.free_real.push(pair);
            self.edge_count -= 1;
        } else {
            self.free_extra.push(pair);
        }
    }

    // ---- vertex-level operations with undo journal ------------------

    /// Hides `v` and all its incident edges. Undone by `restore_vertex`.
    pub fn hide_vertex(&mut self, v: usize) -> Result<(), GraphError> {
        if v >= self.n || !self.vertex_in_use.contains(v) {
            return Err(GraphError::InvalidGraph(format!("vertex {v} not in use")));
        }
        self.undo.push(UndoRecord::Begin);
        while self.vertices[v].link[0] != NIL {
            let a = self.vertices[v].link[0];
            self.hide_edge(a);
            self.undo.push(UndoRecord::HiddenEdge { arc: a });
        }
        self.vertex_in_use.remove(v);
        self.undo.push(UndoRecord::HiddenVertex { v });
        Ok(())
    }

    /// Merges `v` into `u`: edges that would become self-loops or
    /// duplicates are hidden, the rest of `v`'s list is spliced onto
    /// `u`'s, and `v` leaves the graph. Undone by `restore_vertex`.
    pub fn identify_vertices(&mut self, u: usize, v: usize) -> Result<(), GraphError> {
        if u >= self.n || v >= self.n || u == v {
            return Err(GraphError::InvalidGraph(format!(
                "cannot identify vertices {u} and {v}"
            )));
        }
        if !self.vertex_in_use.contains(u) || !self.vertex_in_use.contains(v) {
            return Err(GraphError::InvalidGraph(format!(
                "vertex {u} or {v} not in use"
            )));
        }
        self.undo.push(UndoRecord::Begin);
        let u_neighbors: HashSet<usize> = self
            .adjacency(u)
            .into_iter()
            .map(|a| self.arcs[a].neighbor)
            .collect();
        for a in self.adjacency(v) {
            let w = self.arcs[a].neighbor;
            if w == u || u_neighbors.contains(&w) {
                self.hide_edge(a);
                self.undo.push(UndoRecord::HiddenEdge { arc: a });
            }
        }
        let v0 = self.vertices[v].link[0];
        let v1 = self.vertices[v].link[1];
        if v0 != NIL {
            self.arcs[v1].link[0] = self.vertices[u].link[0];
            if self.vertices[u].link[0] != NIL {
                self.arcs[self.vertices[u].link[0]].link[1] = v1;
            } else {
                self.vertices[u].link[1] = v1;
            }
            self.vertices[u].link[0] = v0;
            let mut a = v0;
            loop {
                self.arcs[a ^ 1].neighbor = u;
                if a == v1 {
                    break;
                }
                a = self.arcs[a].link[0];
            }
        }
        self.vertices[v].link = [NIL, NIL];
        self.vertex_in_use.remove(v);
        self.undo.push(UndoRecord::Identified { u, v, v0, v1 });
        Ok(())
    }

    /// Undoes the most recent `hide_vertex` or `identify_vertices`.
    pub fn restore_vertex(&mut self) -> Result<(), GraphError> {
        match self.undo.pop() {
            Some(UndoRecord::HiddenVertex { v }) => {
                self.vertex_in_use.insert(v);
            }
            Some(UndoRecord::Identified { u, v, v0, v1 }) => {
                if v0 != NIL {
                    debug_assert_eq!(self.vertices[u].link[0], v0);
                    let after = self.arcs[v1].link[0];
                    self.vertices[u].link[0] = after;
                    if after != NIL {
                        self.arcs[after].link[1] = NIL;
                    } else {
                        self.vertices[u].link[1] = NIL;
                    }
                    self.arcs[v1].link[0] = NIL;
                    self.vertices[v].link = [v0, v1];
                    let mut a = v0;
                    loop {
                        self.arcs[a ^ 1].neighbor = v;
                        if a == v1 {
                            break;
                        }
                        a = self.arcs[a].link[0];
                    }
                }
                self.vertex_in_use.insert(v);
            }
            _ => {
                return Err(GraphError::InternalInvariantViolation(
                    "restore_vertex with no vertex operation journaled".into(),
                ));
            }
        }
        loop {
            match self.undo.pop() {
                Some(UndoRecord::HiddenEdge { arc }) => self.restore_edge(arc),
                Some(UndoRecord::Begin) => return Ok(()),
                _ => {
                    return Err(GraphError::InternalInvariantViolation(
                        "malformed undo journal".into(),
                    ));
                }
            }
        }
    }

    // ---- marks ------------------------------------------------------

    pub fn clear_visited(&mut self) {
        for v in &mut self.vertices {
            v.visited = false;
        }
        for a in &mut self.arcs {
            a.visited = false;
        }
    }
}

/// The public graph: the core store plus the ordered extension chain.
pub struct Graph {
    pub core: GraphCore,
    pub extensions: Vec<Box<dyn GraphExtension>>,
}

impl Graph {
    pub fn new(n: usize) -> Self {
        Graph {
            core: GraphCore::new(n),
            extensions: Vec::new(),
        }
    }

    /// Reinitializes for `n` vertices; attached extensions stay attached
    /// and rebuild their side state.
    pub fn init(&mut self, n: usize) {
        self.core.init(n);
        for ext in &mut self.extensions {
            ext.on_init(&mut self.core);
        }
    }

    /// Reinitializes at the current size.
    pub fn reinit(&mut self) {
        let n = self.core.n;
        self.core.init(n);
        for ext in &mut self.extensions {
            ext.on_reinit(&mut self.core);
        }
    }

    /// Attaches an extension; a second attach of the same id is a no-op.
    pub fn attach_extension(&mut self, mut ext: Box<dyn GraphExtension>) {
        if self.has_extension(ext.id()) {
            return;
        }
        if ext.forbids_arc_growth() {
            self.core.growth_locked = true;
        }
        ext.on_init(&mut self.core);
        self.extensions.push(ext);
    }

    pub fn has_extension(&self, id: ExtensionId) -> bool {
        self.extensions.iter().any(|e| e.id() == id)
    }

    pub fn add_edge(&mut self, u: usize, v: usize) -> Result<usize, GraphError> {
        self.core.add_edge(u, v)
    }

    pub fn hide_edge(&mut self, arc: usize) {
        for ext in &mut self.extensions {
            ext.on_hide_edge(&mut self.core, arc);
        }
        self.core.hide_edge(arc);
    }

    pub fn restore_edge(&mut self, arc: usize) {
        self.core.restore_edge(arc);
        for ext in &mut self.extensions {
            ext.on_restore_edge(&mut self.core, arc);
        }
    }

    pub fn hide_vertex(&mut self, v: usize) -> Result<(), GraphError> {
        self.core.hide_vertex(v)
    }

    pub fn identify_vertices(&mut self, u: usize, v: usize) -> Result<(), GraphError> {
        self.core.identify_vertices(u, v)?;
        for ext in &mut self.extensions {
            ext.on_identify_vertices(&mut self.core, u, v);
        }
        Ok(())
    }

    pub fn restore_vertex(&mut self) -> Result<(), GraphError> {
        let restored = match self.core.undo.last() {
            Some(UndoRecord::HiddenVertex { v }) => *v,
            Some(UndoRecord::Identified { v, .. }) => *v,
            _ => NIL,
        };
        self.core.restore_vertex()?;
        if restored != NIL {
            for ext in &mut self.extensions {
                ext.on_restore_vertex(&mut self.core, restored);
            }
        }
        Ok(())
    }

    /// Deep copy, extensions included.
    pub fn duplicate(&self) -> Graph {
        Graph {
            core: self.core.clone(),
            extensions: self.extensions.iter().map(|e| e.dup()).collect(),
        }
    }

    /// Builds a graph from a petgraph graph; parallel edges and
    /// self-loops are rejected.
    pub fn from_petgraph(pg: &UnGraph) -> Result<Graph, GraphError> {
        let mut g = Graph::new(pg.node_count());
        g.core.ensure_arc_capacity(pg.edge_count())?;
        let mut seen: HashSet<(usize, usize)> = HashSet::new();
        for e in pg.edge_indices() {
            if let Some((a, b)) = pg.edge_endpoints(e) {
                let (u, v) = (a.index(), b.index());
                let key = (u.min(v), u.max(v));
                if !seen.insert(key) {
                    return Err(GraphError::InvalidGraph(format!(
                        "parallel edge ({u}, {v})"
                    )));
                }
                g.add_edge(u, v)?;
            }
        }
        Ok(g)
    }

    /// Exports the visible part of the graph back to petgraph.
    pub fn to_petgraph(&self) -> UnGraph {
        let core = &self.core;
        let mut pg = UnGraph::default();
        let nodes: Vec<_> = (0..core.n).map(|v| pg.add_node(v as u32)).collect();
        for pair in (0..core.arc_watermark).step_by(2) {
            if !core.arc_in_use.contains(pair) || core.arcs[pair].hidden {
                continue;
            }
            let u = core.origin(pair);
            let v = core.arcs[pair].neighbor;
            if u < core.n && v < core.n {
                pg.add_edge(nodes[u], nodes[v], ());
            }
        }
        pg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbors(g: &GraphCore, v: usize) -> Vec<usize> {
        g.adjacency(v).iter().map(|&a| g.arcs[a].neighbor).collect()
    }

    #[test]
    fn add_edge_keeps_insertion_order() {
        let mut g = GraphCore::new(4);
        g.add_edge(0, 1).unwrap();
        g.add_edge(0, 2).unwrap();
        g.add_edge(0, 3).unwrap();
        assert_eq!(neighbors(&g, 0), vec![1, 2, 3]);
        assert_eq!(neighbors(&g, 3), vec![0]);
        assert_eq!(g.edge_count, 3);
    }

    #[test]
    fn add_edge_rejects_bad_input() {
        let mut g = GraphCore::new(3);
        assert!(matches!(
            g.add_edge(1, 1),
            Err(GraphError::InvalidGraph(_))
        ));
        assert!(matches!(
            g.add_edge(0, 3),
            Err(GraphError::InvalidGraph(_))
        ));
        g.add_edge(0, 1).unwrap();
        assert!(matches!(
            g.add_edge(1, 0),
            Err(GraphError::InvalidGraph(_))
        ));
    }

    #[test]
    fn capacity_is_enforced_and_growable() {
        let mut g2 = GraphCore::new(4);
        let mut added = 0;
        'outer: for u in 0..4 {
            for v in (u + 1)..4 {
                if g2.add_edge(u, v).is_err() {
                    break 'outer;
                }
                added += 1;
            }
        }
        assert_eq!(added, 6); // K4 fits: 6 edges, 12 arcs, watermark 24
        g2.ensure_arc_capacity(20).unwrap();
        assert!(g2.arc_watermark >= 40);
        g2.growth_locked = true;
        assert!(g2.ensure_arc_capacity(100).is_err());
    }

    #[test]
    fn hide_restore_edge_preserves_rotation() {
        let mut g = GraphCore::new(4);
        g.add_edge(0, 1).unwrap();
        let e = g.add_edge(0, 2).unwrap();
        g.add_edge(0, 3).unwrap();
        g.hide_edge(e);
        assert_eq!(neighbors(&g, 0), vec![1, 3]);
        assert_eq!(neighbors(&g, 2), Vec::<usize>::new());
        g.restore_edge(e);
        assert_eq!(neighbors(&g, 0), vec![1, 2, 3]);
        assert_eq!(neighbors(&g, 2), vec![0]);
    }

    #[test]
    fn invert_vertex_reverses_rotation() {
        let mut g = GraphCore::new(4);
        g.add_edge(0, 1).unwrap();
        g.add_edge(0, 2).unwrap();
        g.add_edge(0, 3).unwrap();
        g.invert_vertex(0);
        assert_eq!(neighbors(&g, 0), vec![3, 2, 1]);
        g.invert_vertex(0);
        assert_eq!(neighbors(&g, 0), vec![1, 2, 3]);
    }

    #[test]
    fn hide_and_restore_vertex_round_trips() {
        let mut g = GraphCore::new(4);
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        g.add_edge(1, 3).unwrap();
        g.hide_vertex(1).unwrap();
        assert!(!g.vertex_in_use.contains(1));
        assert_eq!(neighbors(&g, 0), Vec::<usize>::new());
        assert_eq!(neighbors(&g, 2), Vec::<usize>::new());
        g.restore_vertex().unwrap();
        assert!(g.vertex_in_use.contains(1));
        assert_eq!(neighbors(&g, 1), vec![0, 2, 3]);
        assert_eq!(neighbors(&g, 0), vec![1]);
    }

    #[test]
    fn identify_hides_duplicates_and_restores() {
        // u = 0 and v = 1 share neighbor 2 and the edge (0, 1).
        let mut g = GraphCore::new(5);
        g.add_edge(0, 1).unwrap();
        g.add_edge(0, 2).unwrap();
        g.add_edge(1, 2).unwrap();
        g.add_edge(1, 3).unwrap();
        g.add_edge(1, 4).unwrap();
        g.identify_vertices(0, 1).unwrap();
        assert!(!g.vertex_in_use.contains(1));
        let ns = neighbors(&g, 0);
        assert_eq!(ns.len(), 3);
        assert!(ns.contains(&2) && ns.contains(&3) && ns.contains(&4));
        assert_eq!(neighbors(&g, 3), vec![0]);
        g.restore_vertex().unwrap();
        assert_eq!(neighbors(&g, 0), vec![1, 2]);
        assert_eq!(neighbors(&g, 1), vec![0, 2, 3, 4]);
        assert_eq!(neighbors(&g, 3), vec![1]);
    }

    #[test]
    fn nested_vertex_operations_unwind_lifo() {
        let mut g = GraphCore::new(4);
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        g.add_edge(2, 3).unwrap();
        g.hide_vertex(3).unwrap();
        g.identify_vertices(0, 2).unwrap();
        g.restore_vertex().unwrap();
        g.restore_vertex().unwrap();
        assert_eq!(neighbors(&g, 2), vec![1, 3]);
        assert_eq!(neighbors(&g, 3), vec![2]);
        assert!(g.undo.is_empty());
    }

    #[test]
    fn petgraph_round_trip() {
        let mut pg = UnGraph::default();
        let ns: Vec<_> = (0..4).map(|i| pg.add_node(i)).collect();
        pg.add_edge(ns[0], ns[1], ());
        pg.add_edge(ns[1], ns[2], ());
        pg.add_edge(ns[2], ns[0], ());
        let g = Graph::from_petgraph(&pg).unwrap();
        assert_eq!(g.core.edge_count, 3);
        let back = g.to_petgraph();
        assert_eq!(back.node_count(), 4);
        assert_eq!(back.edge_count(), 3);
    }

    /// Imports denser than the default capacity of 3n edges must grow
    /// the arc arena instead of failing.
    #[test]
    fn petgraph_import_accepts_dense_graphs() {
        let mut pg = UnGraph::default();
        let ns: Vec<_> = (0..10).map(|i| pg.add_node(i)).collect();
        for u in 0..10 {
            for v in (u + 1)..10 {
                pg.add_edge(ns[u], ns[v], ());
            }
        }
        let g = Graph::from_petgraph(&pg).unwrap();
        assert_eq!(g.core.edge_count, 45);
    }

    #[test]
    fn attach_arc_at_both_ends() {
        let mut g = GraphCore::new(3);
        let e1 = g.add_edge(0, 1).unwrap();
        let e2 = g.add_edge(0, 2).unwrap();
        g.unlink_arc(e2);
        g.attach_arc(0, e2, 0);
        assert_eq!(neighbors(&g, 0), vec![2, 1]);
        g.unlink_arc(e1);
        g.attach_arc(0, e1, 0);
        assert_eq!(neighbors(&g, 0), vec![1, 2]);
    }

    mod properties {
        use super::*;
        use crate::testing::random_graphs::random_graph;
        use proptest::prelude::*;

        proptest! {
            /// Hiding any subset of edges and restoring it in reverse
            /// order leaves every rotation untouched.
            #[test]
            fn hide_restore_preserves_rotations(
                n in 2usize..24,
                m in 0usize..48,
                seed in any::<u64>(),
                pick in any::<u64>(),
            ) {
                let pg = random_graph(n, m, seed);
                let g0 = Graph::from_petgraph(&pg).unwrap();
                let mut core = g0.core.clone();
                let rotations: Vec<Vec<usize>> =
                    (0..n).map(|v| core.adjacency(v)).collect();
                let picked: Vec<usize> = (0..core.arc_watermark)
                    .step_by(2)
                    .filter(|&p| core.arc_in_use.contains(p))
                    .enumerate()
                    .filter(|(i, _)| pick >> (i % 64) & 1 == 1)
                    .map(|(_, p)| p)
                    .collect();
                for &p in &picked {
                    core.hide_edge(p);
                }
                for &p in picked.iter().rev() {
                    core.restore_edge(p);
                }
                for v in 0..n {
                    prop_assert_eq!(core.adjacency(v), rotations[v].clone());
                }
            }
        }
    }
}

use crate::dfs::DfsForest;
use crate::graph::GraphCore;
use crate::list_collection::ListCollection;
use crate::types::NIL;

/// One half of a merge-stack pair: a vertex (or bicomp root) together
/// with the external-face direction the walkdown was using there.
#[derive(Clone, Copy, Debug)]
pub struct StackEntry {
    pub vertex: usize,
    pub dir: usize,
}

/// Mutable state of one embedding run, kept next to (not inside) the
/// graph store. All vertex indices are in DFS space.
pub struct EmbedContext {
    pub forest: DfsForest,
    /// Every vertex counts as externally active (outerplanarity family).
    pub outerplanar: bool,
    /// The vertex currently being processed, counting down.
    pub step: usize,
    /// For a pertinent descendant `w`: the forward arc of the back edge
    /// `(step, w)` awaiting embedding. Cleared when embedded.
    pub back_arc: Vec<usize>,
    /// Walkup stamps; a vertex stamped with the current step has already
    /// been climbed through.
    pub visited_step: Vec<usize>,
    /// Pertinent-root lists per vertex. Item `c` stands for the root
    /// `n + c`; internally active roots sit before externally active
    /// ones.
    pub proots: ListCollection,
    pub proot_head: Vec<usize>,
    /// Alternating `(w, win)`, `(r, rout)` pairs of bicomps the walkdown
    /// has descended through but not yet merged. Left non-empty when the
    /// walkdown is blocked, which the isolator relies on.
    pub merge_stack: Vec<StackEntry>,
}

impl EmbedContext {
    pub fn new(forest: DfsForest, outerplanar: bool) -> Self {
        let n = forest.to_input.len();
        EmbedContext {
            outerplanar,
            step: NIL,
            back_arc: vec![NIL; n],
            visited_step: vec![NIL; 2 * n],
            proots: ListCollection::new(n),
            proot_head: vec![NIL; n],
            merge_stack: Vec::new(),
            forest,
        }
    }

    /// The subtree of `w` holds an endpoint of an unembedded back edge
    /// of the current step.
    pub fn pertinent(&self, w: usize) -> bool {
        self.back_arc[w] != NIL || self.proot_head[w] != NIL
    }

    /// `w` connects below the current step by a back edge or through a
    /// separated child subtree, so it must stay on the external face.
    pub fn externally_active(&self, w: usize) -> bool {
        if self.outerplanar {
            return true;
        }
        if self.forest.least_ancestor[w] < self.step {
            return true;
        }
        let head = self.forest.child_list[w];
        head != NIL && self.forest.lowpoint[self.forest.children.front(head)] < self.step
    }

    pub fn internally_active(&self, w: usize) -> bool {
        self.pertinent(w) && !self.externally_active(w)
    }

    pub fn inactive(&self, w: usize) -> bool {
        !self.pertinent(w) && !self.externally_active(w)
    }

    /// External activity of the bicomp root `n + c` as a whole.
    pub fn root_externally_active(&self, c: usize) -> bool {
        self.outerplanar || self.forest.lowpoint[c] < self.step
    }

    /// Records root `n + c` as pertinent for its parent. Internally
    /// active roots are prepended so the walkdown prefers them.
    pub fn record_pertinent_root(&mut self, parent: usize, c: usize) {
        if self.root_externally_active(c) {
            self.proot_head[parent] = self.proots.append(self.proot_head[parent], c);
        } else {
            self.proot_head[parent] = self.proots.prepend(self.proot_head[parent], c);
        }
    }

    /// First pertinent root of `w` as a root index, or `NIL`.
    pub fn first_pertinent_root(&self, w: usize) -> usize {
        let head = self.proot_head[w];
        if head == NIL { NIL } else { head + self.back_arc.len() }
    }

    /// Last pertinent root of `w` as a root index, or `NIL`.
    pub fn last_pertinent_root(&self, w: usize) -> usize {
        let c = self.proots.back(self.proot_head[w]);
        if c == NIL { NIL } else { c + self.back_arc.len() }
    }

    /// Removes root `n + c` from its parent's pertinent list.
    pub fn remove_pertinent_root(&mut self, parent: usize, c: usize) {
        self.proot_head[parent] = self.proots.delete(self.proot_head[parent], c);
    }
}

/// Rebuilds the adjacency structure as one singleton bicomp per tree
/// edge: the parent end of the edge into child `c` is relocated to the
/// virtual root `n + c`, and every back arc is left unlinked until the
/// walkdown embeds it.
pub fn create_tree_embedding(core: &mut GraphCore, forest: &DfsForest) {
    let n = core.n;
    for v in 0..2 * n {
        core.vertices[v].link = [NIL, NIL];
    }
    for a in 0..core.arcs.len() {
        if core.arc_in_use.contains(a) {
            core.arcs[a].link = [NIL, NIL];
        }
    }
    for c in 0..n {
        if forest.parent[c] == NIL {
            continue;
        }
        let r = n + c;
        core.vertex_in_use.insert(r);
        let t = forest.tree_arc_to_child[c];
        core.attach_arc(r, t, 0);
        core.attach_arc(c, t ^ 1, 0);
    }
}

use crate::dfs::{self, DfsForest};
use crate::graph::GraphCore;
use crate::types::NIL;

/// Turns the finished embedding back into a consistent rotation system
/// on the input numbering: short-circuit arcs go away, flipped bicomps
/// are physically re-oriented, leftover bicomp roots are folded into
/// their parent vertices, and the DFS renumbering is undone.
pub fn finalize(core: &mut GraphCore, forest: &DfsForest) {
    remove_short_circuits(core);
    orient(core, forest);
    join_bicomps(core, forest);
    dfs::sort_vertices(core, &forest.to_input);
}

/// Deletes every arc pair allocated from the virtual arena.
pub fn remove_short_circuits(core: &mut GraphCore) {
    for pair in (core.arc_watermark..core.arcs.len()).step_by(2) {
        if core.arc_in_use.contains(pair) {
            core.delete_edge(pair);
        }
    }
}

/// Resolves the inversion signs accumulated on tree arcs during merges.
///
/// A vertex's rotation is flipped iff an odd number of signed tree arcs
/// lie between it and the root of its final bicomp; surviving bicomp
/// roots start a fresh frame, so the parity chain restarts below them.
pub fn orient(core: &mut GraphCore, forest: &DfsForest) {
    let n = core.n;
    let mut parity = vec![false; n];
    for v in 0..n {
        let p = forest.parent[v];
        if p == NIL || core.vertex_in_use.contains(n + v) {
            continue;
        }
        let t = forest.tree_arc_to_child[v];
        parity[v] = parity[p] ^ core.arcs[t].inverted;
    }
    for v in 0..n {
        if parity[v] {
            core.invert_vertex(v);
        }
    }
    for a in 0..core.arcs.len() {
        core.arcs[a].inverted = false;
    }
}

/// Splices each surviving bicomp root into its parent vertex. Any
/// insertion point keeps the rotation system planar, since the bicomps
/// below a cut vertex share nothing but the cut vertex itself.
pub fn join_bicomps(core: &mut GraphCore, forest: &DfsForest) {
    let n = core.n;
    for c in 0..n {
        let r = n + c;
        if !core.vertex_in_use.contains(r) {
            continue;
        }
        let p = forest.parent[c];
        let mut a = core.vertices[r].link[0];
        while a != NIL {
            core.arcs[a ^ 1].neighbor = p;
            a = core.arcs[a].link[0];
        }
        let r0 = core.vertices[r].link[0];
        let r1 = core.vertices[r].link[1];
        let e_p = core.vertices[p].link[0];
        if e_p == NIL {
            core.vertices[p].link = [r0, r1];
        } else {
            core.arcs[r1].link[0] = e_p;
            core.arcs[e_p].link[1] = r1;
            core.vertices[p].link[0] = r0;
        }
        core.vertices[r].link = [NIL, NIL];
        core.vertex_in_use.remove(r);
    }
}

use crate::embed_blocks::structures::EmbedContext;
use crate::graph::GraphCore;
use crate::types::NIL;

/// Merges the bicomp rooted at `r` into its parent vertex `w`.
///
/// `win` is the direction the walkdown entered `w` through, `rout` the
/// direction it left `r` through. When the two coincide the child
/// bicomp is on the wrong side: `r`'s rotation is inverted in place and
/// the tree arc down to the child records the flip, which the
/// orientation pass later pushes down to the bicomp's other vertices.
/// After normalization `r`'s list slots line up with `w`'s, so the
/// splice keeps every interior link untouched.
pub fn merge_bicomps(
    core: &mut GraphCore,
    ctx: &mut EmbedContext,
    w: usize,
    win: usize,
    r: usize,
    mut rout: usize,
) {
    let c = r - core.n;
    if rout == win {
        core.invert_vertex(r);
        let t = ctx.forest.tree_arc_to_child[c];
        core.arcs[t].inverted = !core.arcs[t].inverted;
        rout = 1 ^ rout;
    }

    // The child is no longer separated, and its root no longer pertinent.
    ctx.forest.child_list[w] = ctx.forest.children.delete(ctx.forest.child_list[w], c);
    ctx.remove_pertinent_root(w, c);

    let mut a = core.vertices[r].link[0];
    while a != NIL {
        core.arcs[a ^ 1].neighbor = w;
        a = core.arcs[a].link[0];
    }

    let a_near = core.vertices[r].link[rout];
    let a_far = core.vertices[r].link[1 ^ rout];
    let e_w = core.vertices[w].link[win];
    core.arcs[a_near].link[win] = e_w;
    core.arcs[e_w].link[1 ^ win] = a_near;
    core.vertices[w].link[win] = a_far;

    core.vertices[r].link = [NIL, NIL];
    core.vertex_in_use.remove(r);
}

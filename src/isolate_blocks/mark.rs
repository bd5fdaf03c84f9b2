use hashbrown::HashMap;

use crate::embed_blocks::ext_face::ext_face_next;
use crate::embed_blocks::structures::EmbedContext;
use crate::graph::GraphCore;
use crate::isolate_blocks::context;
use crate::types::{GraphError, NIL};

pub fn mark_vertex(core: &mut GraphCore, v: usize) {
    core.vertices[v].visited = true;
}

pub fn mark_edge(core: &mut GraphCore, arc: usize) {
    core.arcs[arc].visited = true;
    core.arcs[arc ^ 1].visited = true;
}

/// Marks the arcs of `arcs` together with both endpoints of each.
pub fn mark_arc_path(core: &mut GraphCore, arcs: &[usize]) {
    for &a in arcs {
        mark_edge(core, a);
        let u = core.origin(a);
        let w = core.arcs[a].neighbor;
        mark_vertex(core, u);
        mark_vertex(core, w);
    }
}

/// Marks the external-face path from `from` (entered through `fin`) up
/// to and including `to`. With `from == to` the whole face is marked.
pub fn mark_ext_face_path(core: &mut GraphCore, from: usize, fin: usize, to: usize) {
    mark_vertex(core, from);
    let (mut z, mut zin) = (from, fin);
    loop {
        let e = core.vertices[z].link[1 ^ zin];
        let (nz, nzin) = ext_face_next(core, z, zin);
        mark_edge(core, e);
        mark_vertex(core, nz);
        z = nz;
        zin = nzin;
        if z == to {
            break;
        }
    }
}

pub fn mark_whole_ext_face(core: &mut GraphCore, r: usize) {
    mark_ext_face_path(core, r, 1, r);
}

/// Marks the tree path from a descendant up to and including `to_anc`.
pub fn mark_tree_path(
    core: &mut GraphCore,
    ctx: &EmbedContext,
    from_desc: usize,
    to_anc: usize,
) -> Result<(), GraphError> {
    let mut z = from_desc;
    mark_vertex(core, z);
    while z != to_anc {
        let t = ctx.forest.tree_arc_to_child[z];
        mark_edge(core, t);
        z = ctx.forest.parent[z];
        if z == NIL {
            return Err(GraphError::InternalInvariantViolation(
                "tree path ran past the root before reaching its ancestor".into(),
            ));
        }
        mark_vertex(core, z);
    }
    Ok(())
}

/// Links a still-unembedded arc pair into both endpoint lists and marks
/// it. Idempotent, so overlapping obstruction paths may share edges.
pub fn add_and_mark_unembedded(core: &mut GraphCore, arc: usize) {
    let pair = arc & !1;
    if core.arcs[pair].visited {
        return;
    }
    let to = core.arcs[pair].neighbor;
    let from = core.arcs[pair + 1].neighbor;
    core.attach_arc(from, pair, 0);
    core.attach_arc(to, pair + 1, 0);
    mark_edge(core, pair);
    mark_vertex(core, from);
    mark_vertex(core, to);
}

/// Marks a path from `w` down to a descendant `d` carrying an unembedded
/// back edge of the current step, plus that edge itself. Returns `d`.
pub fn mark_pertinent(
    core: &mut GraphCore,
    ctx: &EmbedContext,
    w: usize,
    via_last: bool,
) -> Result<usize, GraphError> {
    let d = context::find_pertinent_descendant(core, ctx, w, via_last)?;
    mark_tree_path(core, ctx, d, w)?;
    let f = ctx.back_arc[d];
    if f == NIL {
        return Err(GraphError::InternalInvariantViolation(
            "pertinent descendant lost its back edge".into(),
        ));
    }
    add_and_mark_unembedded(core, f);
    Ok(d)
}

/// Marks how `z` reaches an ancestor of the current step: the tree path
/// down to the certifying descendant plus its back edge. Returns the
/// ancestor reached.
pub fn mark_activity(
    core: &mut GraphCore,
    ctx: &EmbedContext,
    z: usize,
) -> Result<usize, GraphError> {
    let act = context::find_activity(core, ctx, z)?;
    mark_tree_path(core, ctx, act.descendant, z)?;
    add_and_mark_unembedded(core, act.arc);
    Ok(act.ancestor)
}

/// An internal path joining the two external-face sides of a bicomp,
/// found by hiding the root's arcs and walking the boundary of the face
/// that opens up.
pub struct CrossPath {
    /// Path vertices from `px` to `py` inclusive.
    pub verts: Vec<usize>,
    /// Arcs along the path; `arcs[i]` joins `verts[i]` to `verts[i + 1]`.
    pub arcs: Vec<usize>,
    pub px: usize,
    pub py: usize,
    /// An interior path vertex that reaches back up to the hidden root,
    /// or `NIL` when the path separates the root from the lower face.
    pub z: usize,
    /// Arcs from `z` to the former root neighbor closing its loop.
    pub z_arcs: Vec<usize>,
    /// Arc of the root edge closing the `z` path, or `NIL`.
    pub z_edge: usize,
}

/// Finds the attachment path closest to the bicomp root `r` joining the
/// face sides flagged in `side_a` and `side_b`.
///
/// The walk starts on the `side_a` side at `start` (entered through
/// `start_in`) and traces the boundary of the merged face left by hiding
/// `r`'s arcs. A vertex met twice pinches off a closed loop, which is
/// excised from the path; the first excised loop hanging off the final
/// path that reaches a former neighbor of `r` is reported as the `z`
/// path. The walk ends at the first `side_b` vertex.
pub fn cross_path(
    core: &mut GraphCore,
    r: usize,
    start: usize,
    start_in: usize,
    side_a: &[bool],
    side_b: &[bool],
) -> Result<CrossPath, GraphError> {
    let mut r_edge_to = vec![NIL; 2 * core.n];
    let r_arcs = core.adjacency(r);
    for &a in &r_arcs {
        r_edge_to[core.arcs[a].neighbor] = a;
    }
    for &a in &r_arcs {
        core.hide_edge(a);
    }
    let walked = walk_boundary(core, start, start_in, side_a, side_b, &r_edge_to);
    for &a in r_arcs.iter().rev() {
        core.restore_edge(a);
    }
    walked
}

fn walk_boundary(
    core: &GraphCore,
    start: usize,
    start_in: usize,
    side_a: &[bool],
    side_b: &[bool],
    r_edge_to: &[usize],
) -> Result<CrossPath, GraphError> {
    let overrun = || {
        GraphError::InternalInvariantViolation(
            "face boundary walk failed to cross between the stopping sides".into(),
        )
    };
    let mut stack: Vec<usize> = vec![start];
    let mut arc_to: Vec<usize> = vec![NIL];
    let mut pos = vec![NIL; 2 * core.n];
    pos[start] = 0;
    // vertex -> arcs of the loop pinched off at it, in walk order
    let mut loops: HashMap<usize, Vec<usize>> = HashMap::new();
    let (mut z, mut zin) = (start, start_in);
    let mut guard = 4 * core.arcs.len() + 8;
    let py;
    loop {
        if guard == 0 {
            return Err(overrun());
        }
        guard -= 1;
        let e = core.vertices[z].link[1 ^ zin];
        if e == NIL {
            return Err(overrun());
        }
        let (nz, nzin) = ext_face_next(core, z, zin);
        if pos[nz] != NIL {
            let k = pos[nz];
            let mut looped: Vec<usize> = arc_to[k + 1..].to_vec();
            looped.push(e);
            loops.entry(nz).or_insert(looped);
            for &s in &stack[k + 1..] {
                pos[s] = NIL;
            }
            stack.truncate(k + 1);
            arc_to.truncate(k + 1);
        } else {
            stack.push(nz);
            arc_to.push(e);
            pos[nz] = stack.len() - 1;
            if side_b[nz] {
                py = nz;
                break;
            }
        }
        z = nz;
        zin = nzin;
    }
    let mut px_pos = NIL;
    for i in (0..stack.len() - 1).rev() {
        if side_a[stack[i]] {
            px_pos = i;
            break;
        }
    }
    if px_pos == NIL {
        return Err(overrun());
    }
    let verts = stack[px_pos..].to_vec();
    let arcs = arc_to[px_pos + 1..].to_vec();

    // A loop at an interior path vertex that climbs back to a former
    // neighbor of the root yields the vertical path of that vertex.
    let mut zv = NIL;
    let mut z_arcs = Vec::new();
    let mut z_edge = NIL;
    'outer: for &cand in &verts[1..verts.len() - 1] {
        if let Some(loop_arcs) = loops.get(&cand) {
            if r_edge_to[cand] != NIL {
                zv = cand;
                z_edge = r_edge_to[cand];
                break;
            }
            let mut prefix = Vec::new();
            for &a in loop_arcs {
                let t = core.arcs[a].neighbor;
                prefix.push(a);
                if r_edge_to[t] != NIL {
                    zv = cand;
                    z_arcs = prefix;
                    z_edge = r_edge_to[t];
                    break 'outer;
                }
            }
        }
    }
    Ok(CrossPath {
        px: verts[0],
        py,
        verts,
        arcs,
        z: zv,
        z_arcs,
        z_edge,
    })
}

/// Membership flags for one external-face side of the bicomp rooted at
/// `r`: every vertex from `r` (exclusive) through `to` (inclusive),
/// walking out through entry direction `sin`.
pub fn face_side(core: &GraphCore, r: usize, sin: usize, to: usize) -> Vec<bool> {
    let mut side = vec![false; 2 * core.n];
    let (mut z, mut zin) = ext_face_next(core, r, sin);
    loop {
        side[z] = true;
        if z == to {
            break;
        }
        let (nz, nzin) = ext_face_next(core, z, zin);
        z = nz;
        zin = nzin;
    }
    side
}

/// Deletes every real edge the marking passes left unvisited. Arc pairs
/// that were never linked into an adjacency list are flagged hidden
/// first so the deletion does not splice through their stale links.
pub fn delete_unmarked(core: &mut GraphCore) {
    for pair in (0..core.arc_watermark).step_by(2) {
        if !core.arc_in_use.contains(pair) || core.arcs[pair].visited {
            continue;
        }
        if !arc_is_linked(core, pair) {
            core.arcs[pair].hidden = true;
            core.arcs[pair + 1].hidden = true;
        }
        core.delete_edge(pair);
    }
}

fn arc_is_linked(core: &GraphCore, arc: usize) -> bool {
    core.arcs[arc].link != [NIL, NIL] || core.vertices[core.origin(arc)].link[0] == arc
}

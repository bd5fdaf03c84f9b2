use crate::embed_blocks::ext_face::ext_face_next;
use crate::embed_blocks::structures::EmbedContext;
use crate::graph::GraphCore;
use crate::isolate_blocks::context::{self, FailureContext};
use crate::isolate_blocks::mark::{
    self, CrossPath, add_and_mark_unembedded, face_side, mark_activity, mark_arc_path, mark_edge,
    mark_ext_face_path, mark_pertinent, mark_tree_path, mark_vertex, mark_whole_ext_face,
};
use crate::types::{GraphError, NIL};

/// Marks a Kuratowski subgraph (a K5 or K3,3 subdivision) witnessing the
/// planarity failure described by `ic`.
pub fn isolate_planar(
    core: &mut GraphCore,
    ctx: &EmbedContext,
    ic: &FailureContext,
) -> Result<(), GraphError> {
    if ic.blocked_descent {
        return minor_a(core, ctx, ic);
    }
    let last = ctx.last_pertinent_root(ic.w);
    if last != NIL && ctx.root_externally_active(last - core.n) {
        return minor_b(core, ctx, ic);
    }
    let side_a = face_side(core, ic.r, 1, ic.x);
    let side_b = face_side(core, ic.r, 0, ic.y);
    let path = mark::cross_path(core, ic.r, ic.x, 1 ^ ic.xin, &side_a, &side_b)?;
    if path.px != ic.x || path.py != ic.y {
        return minor_c(core, ctx, ic, &path);
    }
    if path.z != NIL {
        return minor_d(core, ctx, ic, &path);
    }
    minor_e(core, ctx, ic, &path)
}

/// The walkdown was blocked inside a descendant bicomp: both stopping
/// vertices are externally active while a pertinent vertex sits between
/// them, and the bicomp hangs below the failed step by a tree path.
fn minor_a(
    core: &mut GraphCore,
    ctx: &EmbedContext,
    ic: &FailureContext,
) -> Result<(), GraphError> {
    mark_whole_ext_face(core, ic.r);
    mark_pertinent(core, ctx, ic.w, false)?;
    let ux = mark_activity(core, ctx, ic.x)?;
    let uy = mark_activity(core, ctx, ic.y)?;
    let anchor = ctx.forest.parent[ic.r - core.n];
    mark_tree_path(core, ctx, anchor, ux.min(uy))
}

/// The stranded vertex `w` still has an externally active pertinent
/// child bicomp: the pertinent and active paths through it diverge below
/// `w`, giving the sixth branch vertex.
fn minor_b(
    core: &mut GraphCore,
    ctx: &EmbedContext,
    ic: &FailureContext,
) -> Result<(), GraphError> {
    mark_whole_ext_face(core, ic.r);
    mark_pertinent(core, ctx, ic.w, true)?;
    let ux = mark_activity(core, ctx, ic.x)?;
    let uy = mark_activity(core, ctx, ic.y)?;
    let c_b = ctx.last_pertinent_root(ic.w) - core.n;
    let uw = mark_activity(core, ctx, c_b)?;
    let top = ux.min(uy).min(uw);
    let bottom = ux.max(uy).max(uw);
    mark_tree_path(core, ctx, bottom, top)
}

/// A path between the two face sides attaches above a stopping vertex.
fn minor_c(
    core: &mut GraphCore,
    ctx: &EmbedContext,
    ic: &FailureContext,
    path: &CrossPath,
) -> Result<(), GraphError> {
    if path.px != ic.x {
        // High attachment on the x side: the face is marked the long way
        // around, leaving the segment between the root and px out.
        mark_ext_face_path(core, ic.r, 1, path.py);
    } else {
        mark_ext_face_path(core, ic.r, 0, path.px);
    }
    mark_arc_path(core, &path.arcs);
    mark_pertinent(core, ctx, ic.w, false)?;
    let ux = mark_activity(core, ctx, ic.x)?;
    let uy = mark_activity(core, ctx, ic.y)?;
    mark_tree_path(core, ctx, ic.v, ux.min(uy))
}

/// An interior vertex of the crossing path climbs back to the bicomp
/// root, separating the stranded vertex from both stopping vertices.
fn minor_d(
    core: &mut GraphCore,
    ctx: &EmbedContext,
    ic: &FailureContext,
    path: &CrossPath,
) -> Result<(), GraphError> {
    mark_ext_face_path(core, ic.x, ic.xin, ic.y);
    mark_arc_path(core, &path.arcs);
    mark_arc_path(core, &path.z_arcs);
    mark_edge(core, path.z_edge);
    mark_vertex(core, core.origin(path.z_edge));
    mark_vertex(core, core.arcs[path.z_edge].neighbor);
    mark_pertinent(core, ctx, ic.w, false)?;
    let ux = mark_activity(core, ctx, ic.x)?;
    let uy = mark_activity(core, ctx, ic.y)?;
    mark_tree_path(core, ctx, ic.v, ux.min(uy))
}

/// The crossing path runs from stopping vertex to stopping vertex. The
/// shape of the obstruction now depends on how the externally active
/// vertices below reach their ancestors.
fn minor_e(
    core: &mut GraphCore,
    ctx: &EmbedContext,
    ic: &FailureContext,
    path: &CrossPath,
) -> Result<(), GraphError> {
    // Look for a second externally active vertex on the lower face.
    let mut z = NIL;
    let mut z_before_w = false;
    let mut passed_w = false;
    let (mut t, mut tin) = ext_face_next(core, ic.x, ic.xin);
    while t != ic.y {
        if t == ic.w {
            passed_w = true;
        }
        if t < core.n && ctx.externally_active(t) {
            z = t;
            z_before_w = !passed_w && t != ic.w;
            break;
        }
        let (nt, ntin) = ext_face_next(core, t, tin);
        t = nt;
        tin = ntin;
    }
    if z == NIL {
        return Err(GraphError::InternalInvariantViolation(
            "stranded pertinent vertex is not externally active".into(),
        ));
    }
    if z != ic.w {
        return minor_e1(core, ctx, ic, path, z, z_before_w);
    }
    let ax = context::find_activity(core, ctx, ic.x)?;
    let ay = context::find_activity(core, ctx, ic.y)?;
    let aw = context::find_activity(core, ctx, ic.w)?;
    let (ux, uy, uw) = (ax.ancestor, ay.ancestor, aw.ancestor);
    if ux != uy && ux != uw && uy != uw {
        if uw > ux.max(uy) {
            minor_e_low(core, ctx, ic)
        } else {
            minor_e_asym(core, ctx, ic, path, ux > uy)
        }
    } else {
        minor_e_k5(core, ctx, ic, path)
    }
}

/// A second externally active vertex `z` off the stranded one: `z` takes
/// over one side of the crossing, so only one upper face segment and two
/// of the activity paths are needed.
fn minor_e1(
    core: &mut GraphCore,
    ctx: &EmbedContext,
    ic: &FailureContext,
    path: &CrossPath,
    z: usize,
    z_before_w: bool,
) -> Result<(), GraphError> {
    mark_ext_face_path(core, ic.x, ic.xin, ic.y);
    mark_arc_path(core, &path.arcs);
    mark_pertinent(core, ctx, ic.w, false)?;
    let uz = mark_activity(core, ctx, z)?;
    let uo = if z_before_w {
        mark_ext_face_path(core, ic.r, 1, ic.x);
        mark_activity(core, ctx, ic.y)?
    } else {
        mark_ext_face_path(core, ic.r, 0, ic.y);
        mark_activity(core, ctx, ic.x)?
    };
    mark_tree_path(core, ctx, ic.v, uz.min(uo))
}

/// The stranded vertex reaches the deepest ancestor of the three: its
/// activity path and the tree form the sixth branch, and neither the
/// crossing path nor the pertinent path is needed.
fn minor_e_low(
    core: &mut GraphCore,
    ctx: &EmbedContext,
    ic: &FailureContext,
) -> Result<(), GraphError> {
    mark_whole_ext_face(core, ic.r);
    let ux = mark_activity(core, ctx, ic.x)?;
    let uy = mark_activity(core, ctx, ic.y)?;
    let uw = mark_activity(core, ctx, ic.w)?;
    mark_tree_path(core, ctx, ic.v, ux.min(uy).min(uw))
}

/// The three activity endpoints are distinct and the stranded one is not
/// the deepest: the deeper stopping side keeps its lower face segment
/// while the other keeps its upper one.
fn minor_e_asym(
    core: &mut GraphCore,
    ctx: &EmbedContext,
    ic: &FailureContext,
    path: &CrossPath,
    x_deeper: bool,
) -> Result<(), GraphError> {
    if x_deeper {
        mark_ext_face_path(core, ic.r, 0, ic.y);
        mark_ext_face_path(core, ic.x, ic.xin, ic.w);
    } else {
        mark_ext_face_path(core, ic.r, 1, ic.x);
        mark_ext_face_path(core, ic.y, ic.yin, ic.w);
    }
    mark_arc_path(core, &path.arcs);
    mark_pertinent(core, ctx, ic.w, false)?;
    let ux = mark_activity(core, ctx, ic.x)?;
    let uy = mark_activity(core, ctx, ic.y)?;
    let uw = mark_activity(core, ctx, ic.w)?;
    mark_tree_path(core, ctx, ic.v, ux.min(uy).min(uw))
}

/// Two of the three activity endpoints coincide, so the whole pattern
/// contracts to a K5 subdivision.
fn minor_e_k5(
    core: &mut GraphCore,
    ctx: &EmbedContext,
    ic: &FailureContext,
    path: &CrossPath,
) -> Result<(), GraphError> {
    mark_whole_ext_face(core, ic.r);
    mark_arc_path(core, &path.arcs);
    mark_pertinent(core, ctx, ic.w, false)?;
    let ux = mark_activity(core, ctx, ic.x)?;
    let uy = mark_activity(core, ctx, ic.y)?;
    let uw = mark_activity(core, ctx, ic.w)?;
    mark_tree_path(core, ctx, ic.v, ux.min(uy).min(uw))
}

/// Marks a K2,3 or K4 subdivision witnessing an outerplanarity failure.
pub fn isolate_outerplanar(
    core: &mut GraphCore,
    ctx: &EmbedContext,
    ic: &FailureContext,
) -> Result<(), GraphError> {
    if ic.blocked_descent {
        // Both face sides of the blocked bicomp hold a vertex other than
        // the stranded one, and the tree path up to the failed step gives
        // the third connection: a K2,3 with long legs.
        mark_whole_ext_face(core, ic.r);
        mark_pertinent(core, ctx, ic.w, false)?;
        let anchor = ctx.forest.parent[ic.r - core.n];
        return mark_tree_path(core, ctx, anchor, ic.v);
    }
    let d = context::find_pertinent_descendant(core, ctx, ic.w, false)?;
    if d != ic.w {
        // The connection to the failed step leaves the face through a
        // proper descendant, so all three K2,3 legs have inner vertices.
        mark_whole_ext_face(core, ic.r);
        mark_pertinent(core, ctx, ic.w, false)?;
        return Ok(());
    }
    // Direct chord back to the failed step: the obstruction is a K4, and
    // a second chord crossing the first one must exist in the bicomp.
    let mut side_a = face_side(core, ic.r, 1, ic.w);
    let mut side_b = face_side(core, ic.r, 0, ic.w);
    side_a[ic.w] = false;
    side_b[ic.w] = false;
    let path = mark::cross_path(core, ic.r, ic.w, 1 ^ ic.win, &side_a, &side_b)?;
    mark_whole_ext_face(core, ic.r);
    mark_arc_path(core, &path.arcs);
    let f = ctx.back_arc[ic.w];
    if f == NIL {
        return Err(GraphError::InternalInvariantViolation(
            "stranded vertex lost its back edge".into(),
        ));
    }
    add_and_mark_unembedded(core, f);
    Ok(())
}

use crate::embed_blocks::ext_face::ext_face_next;
use crate::embed_blocks::structures::EmbedContext;
use crate::graph::GraphCore;
use crate::types::{GraphError, NIL};

/// Where the embedding failed: the bicomp whose walkdown could not
/// finish, the two stopping vertices on its external face with their
/// entry directions, and a pertinent vertex stranded between them.
pub struct FailureContext {
    /// The step being processed when embedding failed.
    pub v: usize,
    /// Root of the failed bicomp.
    pub r: usize,
    /// The walkdown stopped inside a descendant bicomp it had descended
    /// into, leaving the merge stack non-empty.
    pub blocked_descent: bool,
    pub x: usize,
    pub xin: usize,
    pub y: usize,
    pub yin: usize,
    pub w: usize,
    pub win: usize,
}

/// Reconstructs the failure context from the state the walkdown left
/// behind. With a non-empty merge stack the failed bicomp is the one on
/// top of the stack; otherwise it is the root bicomp of the step vertex
/// on the tree path down to the unreachable back-edge endpoint.
pub fn analyze(
    core: &GraphCore,
    ctx: &EmbedContext,
    failed_arc: usize,
) -> Result<FailureContext, GraphError> {
    let n = core.n;
    let v = ctx.step;
    let (r, blocked_descent) = if let Some(top) = ctx.merge_stack.last() {
        (top.vertex, true)
    } else {
        let mut c = core.arcs[failed_arc].neighbor;
        loop {
            let p = ctx.forest.parent[c];
            if p == v {
                break;
            }
            if p == NIL {
                return Err(GraphError::InternalInvariantViolation(
                    "unembedded back edge has no tree path up to the failed step".into(),
                ));
            }
            c = p;
        }
        (n + c, false)
    };
    let (x, xin) = next_external(core, ctx, r, 1)?;
    let (y, yin) = next_external(core, ctx, r, 0)?;
    let (w, win) = first_pertinent_after(core, ctx, x, xin)?;
    Ok(FailureContext {
        v,
        r,
        blocked_descent,
        x,
        xin,
        y,
        yin,
        w,
        win,
    })
}

/// First externally active vertex on the external face from `start`,
/// stepping out through entry direction `sin`.
pub fn next_external(
    core: &GraphCore,
    ctx: &EmbedContext,
    start: usize,
    sin: usize,
) -> Result<(usize, usize), GraphError> {
    let (mut z, mut zin) = ext_face_next(core, start, sin);
    let mut steps = core.arcs.len() + 1;
    while z >= core.n || !ctx.externally_active(z) {
        if z == start || steps == 0 {
            return Err(GraphError::InternalInvariantViolation(
                "no externally active vertex on the failed external face".into(),
            ));
        }
        let (nz, nzin) = ext_face_next(core, z, zin);
        z = nz;
        zin = nzin;
        steps -= 1;
    }
    Ok((z, zin))
}

/// First pertinent vertex strictly after `from` on the external face.
pub fn first_pertinent_after(
    core: &GraphCore,
    ctx: &EmbedContext,
    from: usize,
    fin: usize,
) -> Result<(usize, usize), GraphError> {
    let (mut z, mut zin) = ext_face_next(core, from, fin);
    let mut steps = core.arcs.len() + 1;
    while z >= core.n || !ctx.pertinent(z) {
        if steps == 0 {
            return Err(GraphError::InternalInvariantViolation(
                "no pertinent vertex on the failed external face".into(),
            ));
        }
        let (nz, nzin) = ext_face_next(core, z, zin);
        z = nz;
        zin = nzin;
        steps -= 1;
    }
    Ok((z, zin))
}

/// Walks the pertinence structure down from `w` to a vertex carrying an
/// unembedded back edge of the current step. With `via_last` the descent
/// leaves `w` through its last pertinent root even when `w` itself has a
/// pending back edge.
pub fn find_pertinent_descendant(
    core: &GraphCore,
    ctx: &EmbedContext,
    w: usize,
    via_last: bool,
) -> Result<usize, GraphError> {
    let mut z = w;
    let mut force_root = via_last;
    loop {
        if !force_root && ctx.back_arc[z] != NIL {
            return Ok(z);
        }
        let root = if force_root {
            ctx.last_pertinent_root(z)
        } else {
            ctx.first_pertinent_root(z)
        };
        force_root = false;
        if root == NIL {
            return Err(GraphError::InternalInvariantViolation(
                "pertinent vertex has neither a back edge nor a pertinent root".into(),
            ));
        }
        let (p, _) = first_pertinent_after(core, ctx, root, 1)?;
        z = p;
    }
}

/// An external-activity certificate for a vertex: the ancestor reached,
/// the descendant carrying the back edge, and that edge's arc pair.
pub struct Activity {
    pub ancestor: usize,
    pub descendant: usize,
    pub arc: usize,
}

/// Finds how the subtree hanging at `z` reaches an ancestor of the
/// current step: a direct back edge out of `z`, or a chain of first
/// separated children ending in one.
pub fn find_activity(
    core: &GraphCore,
    ctx: &EmbedContext,
    z: usize,
) -> Result<Activity, GraphError> {
    let v = ctx.step;
    let f = &ctx.forest;
    let mut t = z;
    loop {
        if f.least_ancestor[t] < v {
            let u = f.least_ancestor[t];
            for &arc in &f.fwd_arcs[u] {
                if core.arcs[arc].neighbor == t {
                    return Ok(Activity {
                        ancestor: u,
                        descendant: t,
                        arc,
                    });
                }
            }
            return Err(GraphError::InternalInvariantViolation(
                "least ancestor has no matching forward arc".into(),
            ));
        }
        let head = f.child_list[t];
        if head == NIL {
            return Err(GraphError::InternalInvariantViolation(
                "externally active vertex has no active certificate".into(),
            ));
        }
        let c = f.children.front(head);
        if f.lowpoint[c] >= v {
            return Err(GraphError::InternalInvariantViolation(
                "externally active vertex has no active certificate".into(),
            ));
        }
        t = c;
    }
}

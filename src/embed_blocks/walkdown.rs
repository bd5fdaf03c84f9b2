use crate::embed_blocks::ext_face::ext_face_next;
use crate::embed_blocks::merge::merge_bicomps;
use crate::embed_blocks::structures::{EmbedContext, StackEntry};
use crate::graph::GraphCore;
use crate::types::{EdgeType, GraphError, NIL};

/// Embeds the back edges of the current step that land in the subtree
/// under the bicomp root `r`.
///
/// Both external-face directions out of `r` are walked in turn. Along a
/// walk, a vertex with a pending back edge gets it embedded (after
/// merging every bicomp the walk descended through), a vertex with
/// pertinent child bicomps is descended into, an inactive vertex is
/// stepped over, and an externally active vertex stops the walk. A stop
/// with bicomps still on the merge stack means the remaining pertinent
/// vertices are unreachable; the stack is left as is for the isolator.
pub fn walkdown(
    core: &mut GraphCore,
    ctx: &mut EmbedContext,
    v: usize,
    r: usize,
) -> Result<(), GraphError> {
    ctx.merge_stack.clear();
    for vout in 0..2 {
        let (mut w, mut win) = ext_face_next(core, r, 1 ^ vout);
        while w != r {
            if ctx.back_arc[w] != NIL {
                while let Some(re) = ctx.merge_stack.pop() {
                    let we = ctx.merge_stack.pop().ok_or_else(|| {
                        GraphError::InternalInvariantViolation(
                            "merge stack holds an unpaired entry".into(),
                        )
                    })?;
                    merge_bicomps(core, ctx, we.vertex, we.dir, re.vertex, re.dir);
                }
                let f = ctx.back_arc[w];
                core.attach_arc(r, f, vout);
                core.attach_arc(w, f ^ 1, win);
                ctx.back_arc[w] = NIL;
            }
            if ctx.proot_head[w] != NIL {
                ctx.merge_stack.push(StackEntry { vertex: w, dir: win });
                let r2 = ctx.first_pertinent_root(w);
                let (x, xin) = next_active(core, ctx, r2, 1);
                let (y, yin) = next_active(core, ctx, r2, 0);
                let (nw, nwin, rout) = if ctx.internally_active(x) {
                    (x, xin, 0)
                } else if ctx.internally_active(y) {
                    (y, yin, 1)
                } else if ctx.pertinent(x) {
                    (x, xin, 0)
                } else {
                    (y, yin, 1)
                };
                ctx.merge_stack.push(StackEntry {
                    vertex: r2,
                    dir: rout,
                });
                w = nw;
                win = nwin;
            } else if ctx.inactive(w) {
                let (nw, nwin) = ext_face_next(core, w, win);
                w = nw;
                win = nwin;
            } else {
                // Externally active and nothing left to embed below.
                if !ctx.merge_stack.is_empty() {
                    return Ok(());
                }
                embed_short_circuit(core, r, vout, w, win)?;
                break;
            }
        }
    }
    Ok(())
}

/// First pertinent or externally active vertex on the external face from
/// `start`, stepping through the `sin` entry direction.
fn next_active(
    core: &GraphCore,
    ctx: &EmbedContext,
    start: usize,
    sin: usize,
) -> (usize, usize) {
    let (mut z, mut zin) = ext_face_next(core, start, sin);
    while ctx.inactive(z) {
        let (nz, nzin) = ext_face_next(core, z, zin);
        z = nz;
        zin = nzin;
    }
    (z, zin)
}

/// Adds a short-circuit arc between the bicomp root and the stopping
/// vertex, so later external-face walks skip the inactive path between
/// them.
fn embed_short_circuit(
    core: &mut GraphCore,
    r: usize,
    vout: usize,
    w: usize,
    win: usize,
) -> Result<(), GraphError> {
    let pair = core.alloc_extra_pair()?;
    core.arcs[pair].ty = EdgeType::ShortCircuit;
    core.arcs[pair + 1].ty = EdgeType::ShortCircuit;
    core.attach_arc(r, pair, vout);
    core.attach_arc(w, pair + 1, win);
    Ok(())
}

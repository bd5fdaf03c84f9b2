use crate::dfs;
use crate::embed_blocks::post;
use crate::embed_blocks::structures::{EmbedContext, create_tree_embedding};
use crate::embed_blocks::walkdown::walkdown;
use crate::embed_blocks::walkup::walkup;
use crate::graph::Graph;
use crate::isolate;
use crate::types::{EmbedMode, EmbedResult, GraphError, NIL, UnGraph};

/// Runs the edge-addition algorithm selected by `mode`.
///
/// On `Ok` the store holds a consistent combinatorial embedding (planar
/// or outerplanar, per mode) in the input numbering. On `NonEmbeddable`
/// the store has been rewritten into the obstruction subgraph that
/// proves the negative answer. Either way the graph's edge set before
/// the call decides the answer; the call consumes the current contents
/// of the store.
pub fn embed(g: &mut Graph, mode: EmbedMode) -> Result<EmbedResult, GraphError> {
    let cfg = mode.config();
    match mode {
        EmbedMode::Outerplanar | EmbedMode::SearchK23 | EmbedMode::SearchK4 => {
            g.attach_extension(Box::new(crate::outerplanar::OuterplanarExtension::new()));
        }
        EmbedMode::DrawPlanar => {
            g.attach_extension(Box::new(crate::draw::DrawExtension::new()));
        }
        _ => {}
    }
    let core = &mut g.core;
    let n = core.n;
    if n == 0 {
        return Ok(EmbedResult::Ok);
    }
    let forest = dfs::build(core);
    create_tree_embedding(core, &forest);
    let mut ctx = EmbedContext::new(forest, cfg.outerplanar);

    for v in (0..n).rev() {
        ctx.step = v;
        for i in 0..ctx.forest.fwd_arcs[v].len() {
            let f = ctx.forest.fwd_arcs[v][i];
            walkup(core, &mut ctx, v, f);
        }
        loop {
            let head = ctx.proot_head[v];
            if head == NIL {
                break;
            }
            let c = ctx.proots.front(head);
            ctx.remove_pertinent_root(v, c);
            walkdown(core, &mut ctx, v, n + c)?;
            if !ctx.merge_stack.is_empty() {
                break;
            }
        }
        let mut failed = NIL;
        for i in 0..ctx.forest.fwd_arcs[v].len() {
            let f = ctx.forest.fwd_arcs[v][i];
            let w = core.arcs[f].neighbor;
            if ctx.back_arc[w] != NIL {
                failed = f;
                break;
            }
        }
        if failed != NIL {
            isolate::isolate(core, &mut ctx, failed)?;
            return Ok(EmbedResult::NonEmbeddable);
        }
    }

    post::finalize(core, &ctx.forest);
    if mode == EmbedMode::DrawPlanar {
        crate::draw::compute_into_extension(g)?;
    }
    Ok(EmbedResult::Ok)
}

/// Convenience wrapper over [`embed`] for petgraph inputs. On a
/// nonplanar graph the second element is the isolated Kuratowski
/// subgraph.
pub fn is_planar(graph: &UnGraph) -> Result<(bool, UnGraph), GraphError> {
    let mut g = Graph::from_petgraph(graph)?;
    let res = embed(&mut g, EmbedMode::Planar)?;
    Ok((res == EmbedResult::Ok, g.to_petgraph()))
}

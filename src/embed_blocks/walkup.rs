use crate::embed_blocks::ext_face::ext_face_next;
use crate::embed_blocks::structures::EmbedContext;
use crate::graph::GraphCore;
use crate::types::NIL;

/// Climbs from the descendant endpoint of one unembedded back edge of
/// `v` up to `v`, recording every bicomp root passed through as a
/// pertinent root of its parent.
///
/// Within each bicomp the climb walks both external-face directions in
/// strict alternation, so the cost is proportional to the shorter side.
/// Vertices are stamped with the step number; meeting a stamp from this
/// step means an earlier walkup already recorded everything above, and
/// the climb stops.
pub fn walkup(core: &GraphCore, ctx: &mut EmbedContext, v: usize, fwd_arc: usize) {
    let n = core.n;
    let w = core.arcs[fwd_arc].neighbor;
    ctx.back_arc[w] = fwd_arc;
    ctx.visited_step[w] = v;

    let (mut x, mut xin) = (w, 1);
    let (mut y, mut yin) = (w, 0);
    let mut side = 0;
    loop {
        let r = if x >= n {
            x
        } else if y >= n {
            y
        } else {
            NIL
        };
        if r != NIL {
            if ctx.visited_step[r] == v {
                return;
            }
            ctx.visited_step[r] = v;
            let c = r - n;
            let p = ctx.forest.parent[c];
            ctx.record_pertinent_root(p, c);
            if p == v || ctx.visited_step[p] == v {
                return;
            }
            ctx.visited_step[p] = v;
            x = p;
            xin = 1;
            y = p;
            yin = 0;
            side = 0;
            continue;
        }
        if side == 0 {
            let (nx, nxin) = ext_face_next(core, x, xin);
            x = nx;
            xin = nxin;
            if x < n {
                if ctx.visited_step[x] == v {
                    return;
                }
                ctx.visited_step[x] = v;
            }
        } else {
            let (ny, nyin) = ext_face_next(core, y, yin);
            y = ny;
            yin = nyin;
            if y < n {
                if ctx.visited_step[y] == v {
                    return;
                }
                ctx.visited_step[y] = v;
            }
        }
        side ^= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dfs;
    use crate::embed_blocks::structures::create_tree_embedding;

    #[test]
    fn walkup_records_roots_up_to_the_step_vertex() {
        // Path 0-1-2 with a back edge 2-0: at step 0, the climb from 2
        // passes roots 4 (over 1) and 5 (over 2).
        let mut g = GraphCore::new(3);
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        g.add_edge(2, 0).unwrap();
        let f = dfs::build(&mut g);
        create_tree_embedding(&mut g, &f);
        let fwd = f.fwd_arcs[0][0];
        let mut ctx = EmbedContext::new(f, false);
        ctx.step = 0;
        walkup(&g, &mut ctx, 0, fwd);
        assert_eq!(ctx.back_arc[2], fwd);
        assert_eq!(ctx.first_pertinent_root(1), 5); // root over child 2
        assert_eq!(ctx.first_pertinent_root(0), 4); // root over child 1
    }

    #[test]
    fn second_walkup_stops_at_stamped_vertices() {
        // Two back edges into the same subtree: 3-0 and 2-0 over the
        // path 0-1-2-3. The second climb stops as soon as it meets the
        // first one's stamps, so each root is recorded exactly once.
        let mut g = GraphCore::new(4);
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        g.add_edge(2, 3).unwrap();
        g.add_edge(3, 0).unwrap();
        g.add_edge(2, 0).unwrap();
        let f = dfs::build(&mut g);
        create_tree_embedding(&mut g, &f);
        let fwds = f.fwd_arcs[0].clone();
        let mut ctx = EmbedContext::new(f, false);
        ctx.step = 0;
        for fwd in fwds {
            walkup(&g, &mut ctx, 0, fwd);
        }
        for w in 1..4 {
            let head = ctx.proot_head[w - 1];
            if head != NIL {
                // No duplicates: each list has at most one entry here.
                assert_eq!(ctx.proots.successor(head, head), NIL);
            }
        }
    }
}

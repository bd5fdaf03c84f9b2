use crate::graph::{GraphCore, Vertex};
use crate::list_collection::ListCollection;
use crate::types::{EdgeType, NIL};

/// Output of the DFS pass, all arrays indexed by DFS index.
///
/// [`build`] physically renumbers the store so that vertex slot `i` is
/// the vertex with DFS index `i`; every descendant then has a higher
/// index than its ancestors, which is what the embedder's activity tests
/// compare. `to_input` maps back to the caller's numbering and is handed
/// to [`sort_vertices`] once the embedding (or obstruction) is final.
#[derive(Clone, Debug)]
pub struct DfsForest {
    pub to_input: Vec<usize>,
    pub parent: Vec<usize>,
    /// For a non-root `c`: the arc whose origin is `parent[c]` and whose
    /// neighbor is `c`.
    pub tree_arc_to_child: Vec<usize>,
    /// Lowest DFS index reachable from `v` by a single back edge;
    /// defaults to `v` itself.
    pub least_ancestor: Vec<usize>,
    pub lowpoint: Vec<usize>,
    /// Per ancestor: its back-edge arcs toward descendants, ascending by
    /// descendant DFS index.
    pub fwd_arcs: Vec<Vec<usize>>,
    /// Separated-DFS-child lists, ascending by child lowpoint; ties keep
    /// DFS discovery order. The embedder deletes a child when its bicomp
    /// merges into the parent.
    pub children: ListCollection,
    pub child_list: Vec<usize>,
}

/// Runs the DFS over all components, classifies arcs into tree and back
/// arcs, renumbers the store into DFS space, and computes lowpoints,
/// least ancestors, forward-arc lists, and the sorted child lists.
pub fn build(core: &mut GraphCore) -> DfsForest {
    let n = core.n;
    let mut dfi_of = vec![NIL; n];
    let mut to_input: Vec<usize> = Vec::with_capacity(n);
    let mut parent_of = vec![NIL; n];
    let mut parent_arc = vec![NIL; n];

    for root in 0..n {
        if dfi_of[root] != NIL {
            continue;
        }
        dfi_of[root] = to_input.len();
        to_input.push(root);
        let mut stack = vec![(root, core.vertices[root].link[0])];
        while let Some((u, a)) = stack.pop() {
            if a == NIL {
                continue;
            }
            stack.push((u, core.arcs[a].link[0]));
            let w = core.arcs[a].neighbor;
            if dfi_of[w] == NIL {
                dfi_of[w] = to_input.len();
                to_input.push(w);
                parent_of[w] = u;
                parent_arc[w] = a;
                core.arcs[a].ty = EdgeType::Tree;
                core.arcs[a ^ 1].ty = EdgeType::Tree;
                stack.push((w, core.vertices[w].link[0]));
            } else if core.arcs[a].ty == EdgeType::Real && dfi_of[w] < dfi_of[u] {
                core.arcs[a].ty = EdgeType::Back;
                core.arcs[a ^ 1].ty = EdgeType::Back;
            }
        }
    }

    renumber(core, &dfi_of);

    let mut parent = vec![NIL; n];
    let mut tree_arc_to_child = vec![NIL; n];
    for old in 0..n {
        if parent_of[old] != NIL {
            let c = dfi_of[old];
            parent[c] = dfi_of[parent_of[old]];
            tree_arc_to_child[c] = parent_arc[old];
        }
    }

    let mut least_ancestor: Vec<usize> = (0..n).collect();
    let mut fwd_arcs: Vec<Vec<usize>> = vec![Vec::new(); n];
    for v in 0..n {
        let mut a = core.vertices[v].link[0];
        while a != NIL {
            let u = core.arcs[a].neighbor;
            if core.arcs[a].ty == EdgeType::Back && u < v {
                least_ancestor[v] = least_ancestor[v].min(u);
                fwd_arcs[u].push(a ^ 1);
            }
            a = core.arcs[a].link[0];
        }
    }

    let mut lowpoint = least_ancestor.clone();
    for v in (1..n).rev() {
        if parent[v] != NIL {
            let p = parent[v];
            lowpoint[p] = lowpoint[p].min(lowpoint[v]);
        }
    }

    // Bucket sort by lowpoint; scanning children in ascending DFS index
    // keeps discovery order within a bucket.
    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); n];
    for c in 0..n {
        if parent[c] != NIL {
            buckets[lowpoint[c]].push(c);
        }
    }
    let mut children = ListCollection::new(n);
    let mut child_list = vec![NIL; n];
    for bucket in &buckets {
        for &c in bucket {
            let p = parent[c];
            child_list[p] = children.append(child_list[p], c);
        }
    }

    DfsForest {
        to_input,
        parent,
        tree_arc_to_child,
        least_ancestor,
        lowpoint,
        fwd_arcs,
        children,
        child_list,
    }
}

/// Permutes the real vertex slots so vertex `old` lands at slot
/// `new_of_old[old]`, rewriting arc neighbor fields to match. Arc
/// indices never move.
pub fn renumber(core: &mut GraphCore, new_of_old: &[usize]) {
    let n = core.n;
    let mut permuted = vec![Vertex::default(); 2 * n];
    for (old, vert) in core.vertices[..n].iter().enumerate() {
        permuted[new_of_old[old]] = vert.clone();
    }
    for (slot, vert) in core.vertices[n..].iter().enumerate() {
        permuted[n + slot] = vert.clone();
    }
    core.vertices = permuted;
    for a in 0..core.arcs.len() {
        if core.arc_in_use.contains(a) && core.arcs[a].neighbor < n {
            core.arcs[a].neighbor = new_of_old[core.arcs[a].neighbor];
        }
    }
}

/// Restores the caller's vertex numbering after the algorithms finish.
/// `to_input` is the map produced by [`build`].
pub fn sort_vertices(core: &mut GraphCore, to_input: &[usize]) {
    renumber(core, to_input);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbors(g: &GraphCore, v: usize) -> Vec<usize> {
        g.adjacency(v).iter().map(|&a| g.arcs[a].neighbor).collect()
    }

    #[test]
    fn path_gets_identity_numbering() {
        let mut g = GraphCore::new(3);
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        let f = build(&mut g);
        assert_eq!(f.to_input, vec![0, 1, 2]);
        assert_eq!(f.parent, vec![NIL, 0, 1]);
        assert_eq!(f.lowpoint, vec![0, 1, 2]);
    }

    #[test]
    fn dfs_order_follows_adjacency_not_labels() {
        let mut g = GraphCore::new(3);
        g.add_edge(0, 2).unwrap();
        g.add_edge(0, 1).unwrap();
        g.add_edge(2, 1).unwrap();
        let f = build(&mut g);
        // 0 explores 2 first, and 2 reaches 1, so DFS order is 0, 2, 1.
        assert_eq!(f.to_input, vec![0, 2, 1]);
        // In the renumbered store, slot 1 is input vertex 2.
        assert_eq!(f.parent, vec![NIL, 0, 1]);
        assert_eq!(neighbors(&g, 1), vec![0, 2]);
    }

    #[test]
    fn cycle_classifies_one_back_arc() {
        let mut g = GraphCore::new(4);
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        g.add_edge(2, 3).unwrap();
        g.add_edge(3, 0).unwrap();
        let f = build(&mut g);
        let back: Vec<usize> = (0..g.arc_watermark)
            .filter(|&a| g.arc_in_use.contains(a) && g.arcs[a].ty == EdgeType::Back)
            .collect();
        assert_eq!(back.len(), 2); // one edge, two arcs
        assert_eq!(f.least_ancestor[3], 0);
        assert_eq!(f.lowpoint, vec![0, 0, 0, 0]);
        assert_eq!(f.fwd_arcs[0].len(), 1);
        assert_eq!(g.arcs[f.fwd_arcs[0][0]].neighbor, 3);
    }

    #[test]
    fn fwd_arcs_ascend_by_descendant() {
        // Path 0-1-2-3 with back edges 2-0 and 3-0.
        let mut g = GraphCore::new(4);
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        g.add_edge(2, 3).unwrap();
        g.add_edge(2, 0).unwrap();
        g.add_edge(3, 0).unwrap();
        let f = build(&mut g);
        let targets: Vec<usize> = f.fwd_arcs[0].iter().map(|&a| g.arcs[a].neighbor).collect();
        assert_eq!(targets, vec![2, 3]);
    }

    #[test]
    fn child_lists_sort_by_lowpoint_stably() {
        // Root 0 with children 1, 2, 3 (in discovery order); lowpoints
        // via back edges: child subtrees 1 and 3 reach 0, child 2 is a
        // pendant path.
        let mut g = GraphCore::new(7);
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 4).unwrap();
        g.add_edge(4, 0).unwrap();
        g.add_edge(0, 2).unwrap();
        g.add_edge(2, 5).unwrap();
        g.add_edge(0, 3).unwrap();
        g.add_edge(3, 6).unwrap();
        g.add_edge(6, 0).unwrap();
        let f = build(&mut g);
        // DFS indices: 0=0, 1=1, 4=2, 2=3, 5=4, 3=5, 6=6.
        let mut kids = vec![];
        let head = f.child_list[0];
        let mut c = f.children.front(head);
        while c != NIL {
            kids.push(c);
            c = f.children.successor(head, c);
        }
        // Children of 0 in DFS space: 1 (lp 0), 3 (lp 3), 5 (lp 0).
        // Sorted by lowpoint with ties in discovery order: 1, 5, 3.
        assert_eq!(kids, vec![1, 5, 3]);
    }

    #[test]
    fn sort_vertices_round_trips() {
        let mut g = GraphCore::new(3);
        g.add_edge(0, 2).unwrap();
        g.add_edge(0, 1).unwrap();
        g.add_edge(2, 1).unwrap();
        let before: Vec<Vec<usize>> = (0..3).map(|v| neighbors(&g, v)).collect();
        let f = build(&mut g);
        sort_vertices(&mut g, &f.to_input);
        let after: Vec<Vec<usize>> = (0..3).map(|v| neighbors(&g, v)).collect();
        assert_eq!(before, after);
    }
}

//! Homeomorph search built on the embedder's obstruction machinery.
//!
//! Each search runs the matching embedding mode and classifies the
//! isolated obstruction. On a positive answer the store retains the
//! target subdivision; on a negative one it holds either the embedding
//! or, when the graph was obstructed by the other pattern of the family,
//! that pattern (a K5 in the K3,3 search, a K2,3 in the K4 search — the
//! search does not reduce past the first obstruction found).

use crate::embed::embed;
use crate::graph::{Graph, GraphCore};
use crate::types::{EmbedMode, EmbedResult, GraphError, NIL};

/// The four patterns the isolator can leave behind, recognized by branch
/// vertex count after ignoring subdivision vertices.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Pattern {
    K23,
    K4,
    K33,
    K5,
}

/// Searches for a K2,3 homeomorph. Any graph that is not outerplanar
/// contains one: when the isolator reports a K4, a K2,3 inside it is
/// carved out by dropping one of its six paths.
pub fn find_k23(g: &mut Graph) -> Result<bool, GraphError> {
    match embed(g, EmbedMode::SearchK23)? {
        EmbedResult::Ok => Ok(false),
        EmbedResult::NonEmbeddable => {
            if classify(&g.core)? == Pattern::K4 {
                reduce_k4_to_k23(&mut g.core)?;
            }
            Ok(true)
        }
    }
}

/// Searches for a K3,3 homeomorph via the planarity isolator. A graph
/// whose only obstruction is a K5 homeomorph reports not-found.
pub fn find_k33(g: &mut Graph) -> Result<bool, GraphError> {
    match embed(g, EmbedMode::SearchK33)? {
        EmbedResult::Ok => Ok(false),
        EmbedResult::NonEmbeddable => Ok(classify(&g.core)? == Pattern::K33),
    }
}

/// Searches for a K4 homeomorph via the outerplanarity isolator. A graph
/// whose only obstruction is a K2,3 homeomorph reports not-found.
pub fn find_k4(g: &mut Graph) -> Result<bool, GraphError> {
    match embed(g, EmbedMode::SearchK4)? {
        EmbedResult::Ok => Ok(false),
        EmbedResult::NonEmbeddable => Ok(classify(&g.core)? == Pattern::K4),
    }
}

fn degrees(core: &GraphCore) -> Vec<usize> {
    let mut deg = vec![0usize; core.n];
    for pair in (0..core.arc_watermark).step_by(2) {
        if !core.arc_in_use.contains(pair) {
            continue;
        }
        deg[core.origin(pair)] += 1;
        deg[core.arcs[pair].neighbor] += 1;
    }
    deg
}

fn classify(core: &GraphCore) -> Result<Pattern, GraphError> {
    let deg = degrees(core);
    let branch = deg.iter().filter(|&&d| d > 2).count();
    match branch {
        2 => Ok(Pattern::K23),
        4 => Ok(Pattern::K4),
        6 => Ok(Pattern::K33),
        5 => Ok(Pattern::K5),
        b => Err(GraphError::InternalInvariantViolation(format!(
            "obstruction with {b} branch vertices"
        ))),
    }
}

/// From the branch vertex `from`, follows the subdivision path starting
/// with arc `a` to the next branch vertex. Returns that vertex and the
/// arc pairs along the way.
fn follow_path(
    core: &GraphCore,
    deg: &[usize],
    from: usize,
    a: usize,
) -> Result<(usize, Vec<usize>), GraphError> {
    let mut pairs = vec![a & !1];
    let mut prev = from;
    let mut cur = core.arcs[a].neighbor;
    let mut steps = 0;
    while deg[cur] == 2 {
        let mut out = NIL;
        for ca in core.adjacency(cur) {
            if core.arcs[ca].neighbor != prev {
                out = ca;
            }
        }
        if out == NIL {
            return Err(GraphError::InternalInvariantViolation(
                "subdivision path ends in a dead end".into(),
            ));
        }
        pairs.push(out & !1);
        prev = cur;
        cur = core.arcs[out].neighbor;
        steps += 1;
        if steps > core.n {
            return Err(GraphError::InternalInvariantViolation(
                "subdivision path does not terminate".into(),
            ));
        }
    }
    Ok((cur, pairs))
}

/// Deletes one path of a K4 subdivision, leaving the K2,3 subdivision
/// spanned by the other two branch vertices and three path chains.
fn reduce_k4_to_k23(core: &mut GraphCore) -> Result<(), GraphError> {
    let deg = degrees(core);
    let branch: Vec<usize> = (0..core.n).filter(|&v| deg[v] > 2).collect();
    let (c, d) = (branch[2], branch[3]);
    for a in core.adjacency(c) {
        let (end, pairs) = follow_path(core, &deg, c, a)?;
        if end == d {
            for pair in pairs {
                core.delete_edge(pair);
            }
            return Ok(());
        }
    }
    Err(GraphError::InternalInvariantViolation(
        "K4 branch vertices are not pairwise joined".into(),
    ))
}

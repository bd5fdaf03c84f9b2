//! Post-run validation oracle. Given a copy of the store taken before an
//! algorithm ran and the store it left behind, verifies that a positive
//! answer is a consistent embedding of the same edge set and that a
//! negative answer is a genuine obstruction subgraph. Used by tests, not
//! by the production call path.

use hashbrown::{HashMap, HashSet};

use crate::graph::GraphCore;
use crate::types::{EdgeType, EmbedMode, EmbedResult, NIL, ObstructionKind};

/// Validates `after` against `before` for the given run outcome.
pub fn check(
    before: &GraphCore,
    after: &GraphCore,
    mode: EmbedMode,
    outcome: EmbedResult,
) -> Result<(), String> {
    match outcome {
        EmbedResult::Ok => check_embedding(before, after, mode.config().outerplanar),
        EmbedResult::NonEmbeddable => check_obstruction(before, after, mode.config().obstruction),
    }
}

/// A positive answer must be a consistent rotation system over exactly
/// the original edge set, satisfying Euler's formula per component; an
/// outerplanar answer must additionally keep every vertex of a component
/// on one common face.
pub fn check_embedding(
    before: &GraphCore,
    after: &GraphCore,
    outerplanar: bool,
) -> Result<(), String> {
    check_rotation(after)?;
    for pair in (0..after.arc_watermark).step_by(2) {
        if after.arc_in_use.contains(pair) && after.arcs[pair].hidden {
            return Err(format!("edge at arc {pair} left hidden after embedding"));
        }
    }
    let old = edge_keys(before);
    let new = edge_keys(after);
    if old != new {
        return Err(format!(
            "edge set changed: {} edges before, {} after",
            old.len(),
            new.len()
        ));
    }
    let comp = components(after);
    let faces = trace_faces(after)?;
    check_euler(after, &comp, &faces)?;
    if outerplanar {
        check_common_face(after, &comp, &faces)?;
    }
    Ok(())
}

/// A negative answer must retain a subset of the original edges forming
/// exactly one subdivision of the forbidden pattern for the mode, plus
/// possibly isolated vertices.
pub fn check_obstruction(
    before: &GraphCore,
    after: &GraphCore,
    kind: ObstructionKind,
) -> Result<(), String> {
    let old = edge_keys(before);
    let new = edge_keys(after);
    if !is_subset(&new, &old) {
        return Err("obstruction contains edges not present in the input".into());
    }
    let reduced = reduce_subdivision(after)?;
    match kind {
        ObstructionKind::Kuratowski => check_kuratowski(&reduced),
        ObstructionKind::Outerplanarity => check_outerplanarity_pattern(&reduced),
    }
}

/// The obstruction with its degree-2 path vertices suppressed: branch
/// vertices and the multiset of paths between them.
struct Reduced {
    branch: Vec<usize>,
    degree: Vec<usize>,
    /// Normalized branch pair -> number of parallel paths.
    paths: HashMap<(usize, usize), usize>,
}

fn reduce_subdivision(core: &GraphCore) -> Result<Reduced, String> {
    let n = core.n;
    let mut degree = vec![0usize; n];
    for pair in (0..core.arc_watermark).step_by(2) {
        if !core.arc_in_use.contains(pair) {
            continue;
        }
        degree[core.origin(pair)] += 1;
        degree[core.arcs[pair].neighbor] += 1;
    }
    let mut branch = Vec::new();
    for v in 0..n {
        match degree[v] {
            0 | 2 => {}
            1 => return Err(format!("obstruction has a degree-1 vertex {v}")),
            3 | 4 => branch.push(v),
            d => return Err(format!("obstruction vertex {v} has degree {d}")),
        }
    }
    if branch.is_empty() {
        return Err("obstruction has no branch vertices".into());
    }
    let mut on_path = vec![false; n];
    let mut traversals: HashMap<(usize, usize), usize> = HashMap::new();
    for &b in &branch {
        for a in core.adjacency(b) {
            let mut prev = b;
            let mut cur = core.arcs[a].neighbor;
            let mut steps = 0;
            while degree[cur] == 2 {
                on_path[cur] = true;
                let mut nxt = NIL;
                for ca in core.adjacency(cur) {
                    let w = core.arcs[ca].neighbor;
                    if w != prev {
                        nxt = w;
                    }
                }
                prev = cur;
                cur = nxt;
                steps += 1;
                if steps > n {
                    return Err("subdivision path does not terminate".into());
                }
            }
            if cur == b {
                return Err(format!("obstruction path loops back to vertex {b}"));
            }
            *traversals.entry((b.min(cur), b.max(cur))).or_insert(0) += 1;
        }
    }
    for v in 0..n {
        if degree[v] == 2 && !on_path[v] {
            return Err(format!(
                "vertex {v} lies on a cycle detached from every branch vertex"
            ));
        }
    }
    let mut paths = HashMap::new();
    for (pair, count) in traversals {
        if count % 2 != 0 {
            return Err(format!(
                "path between {} and {} traversed an odd number of times",
                pair.0, pair.1
            ));
        }
        paths.insert(pair, count / 2);
    }
    Ok(Reduced {
        branch,
        degree,
        paths,
    })
}

fn check_kuratowski(r: &Reduced) -> Result<(), String> {
    if r.paths.values().any(|&m| m != 1) {
        return Err("Kuratowski obstruction has parallel subdivision paths".into());
    }
    let adj = reduced_adjacency(r);
    match r.branch.len() {
        5 => {
            // K5: every branch vertex sees the other four.
            for &b in &r.branch {
                if r.degree[b] != 4 || adj[&b].len() != 4 {
                    return Err(format!("vertex {b} does not look like a K5 branch"));
                }
            }
            Ok(())
        }
        6 => {
            // K3,3: the non-neighbors of any branch vertex form its side.
            let b0 = r.branch[0];
            if r.degree[b0] != 3 {
                return Err("K3,3 branch vertex of wrong degree".into());
            }
            let side_b = &adj[&b0];
            let side_a: Vec<usize> = r
                .branch
                .iter()
                .copied()
                .filter(|v| !side_b.contains(v))
                .collect();
            if side_a.len() != 3 || side_b.len() != 3 {
                return Err("branch vertices do not split 3 + 3".into());
            }
            for &a in &side_a {
                if adj[&a] != *side_b {
                    return Err(format!("vertex {a} is not joined to the opposite side"));
                }
            }
            Ok(())
        }
        k => Err(format!("{k} branch vertices fit neither K5 nor K3,3")),
    }
}

fn check_outerplanarity_pattern(r: &Reduced) -> Result<(), String> {
    match r.branch.len() {
        // A K2,3 subdivision reduces to two degree-3 vertices joined by
        // three parallel paths.
        2 => {
            let key = (
                r.branch[0].min(r.branch[1]),
                r.branch[0].max(r.branch[1]),
            );
            if r.paths.len() == 1 && r.paths.get(&key) == Some(&3) {
                Ok(())
            } else {
                Err("two branch vertices but not three parallel paths".into())
            }
        }
        4 => {
            if r.paths.values().any(|&m| m != 1) {
                return Err("K4 obstruction has parallel subdivision paths".into());
            }
            let adj = reduced_adjacency(r);
            for &b in &r.branch {
                if r.degree[b] != 3 || adj[&b].len() != 3 {
                    return Err(format!("vertex {b} does not look like a K4 branch"));
                }
            }
            Ok(())
        }
        k => Err(format!("{k} branch vertices fit neither K4 nor K2,3")),
    }
}

fn reduced_adjacency(r: &Reduced) -> HashMap<usize, HashSet<usize>> {
    let mut adj: HashMap<usize, HashSet<usize>> = HashMap::new();
    for &b in &r.branch {
        adj.entry(b).or_default();
    }
    for &(u, v) in r.paths.keys() {
        adj.entry(u).or_default().insert(v);
        adj.entry(v).or_default().insert(u);
    }
    adj
}

// ---- rotation system --------------------------------------------------

fn check_rotation(core: &GraphCore) -> Result<(), String> {
    let mut seen = vec![false; core.arcs.len()];
    for v in 0..core.n {
        let mut prev = NIL;
        let mut a = core.vertices[v].link[0];
        let mut steps = 0;
        while a != NIL {
            if steps > core.arcs.len() {
                return Err(format!("adjacency list of {v} does not terminate"));
            }
            if seen[a] {
                return Err(format!("arc {a} linked twice"));
            }
            seen[a] = true;
            if !core.arc_in_use.contains(a) {
                return Err(format!("freed arc {a} still linked at vertex {v}"));
            }
            if core.arcs[a].hidden {
                return Err(format!("hidden arc {a} linked at vertex {v}"));
            }
            if core.origin(a) != v {
                return Err(format!("arc {a} in the list of {v} but originates elsewhere"));
            }
            if core.arcs[a].neighbor >= core.n {
                return Err(format!("arc {a} points at virtual vertex"));
            }
            if core.arcs[a].ty == EdgeType::ShortCircuit {
                return Err(format!("short-circuit arc {a} survived post-processing"));
            }
            if core.arcs[a].link[1] != prev {
                return Err(format!("arc {a} has a broken back link"));
            }
            prev = a;
            a = core.arcs[a].link[0];
            steps += 1;
        }
        if core.vertices[v].link[1] != prev {
            return Err(format!("vertex {v} end handle does not match its list"));
        }
    }
    for r in core.n..2 * core.n {
        if core.vertices[r].link != [NIL, NIL] {
            return Err(format!("virtual vertex {r} still has an adjacency list"));
        }
    }
    for a in 0..core.arcs.len() {
        if !core.arc_in_use.contains(a) {
            continue;
        }
        if a >= core.arc_watermark {
            return Err(format!("virtual arc {a} still allocated"));
        }
        if !core.arcs[a].hidden && !seen[a] {
            return Err(format!("arc {a} in use but absent from every list"));
        }
    }
    Ok(())
}

// ---- faces and Euler's formula ----------------------------------------

/// Connected component label per vertex.
fn components(core: &GraphCore) -> Vec<usize> {
    let mut comp = vec![NIL; core.n];
    let mut next = 0;
    for start in 0..core.n {
        if comp[start] != NIL {
            continue;
        }
        comp[start] = next;
        let mut stack = vec![start];
        while let Some(v) = stack.pop() {
            for a in core.adjacency(v) {
                let w = core.arcs[a].neighbor;
                if comp[w] == NIL {
                    comp[w] = next;
                    stack.push(w);
                }
            }
        }
        next += 1;
    }
    comp
}

/// Face id per linked arc, from the orbits of the face successor (the
/// rotation successor of the twin at the far end).
fn trace_faces(core: &GraphCore) -> Result<Vec<usize>, String> {
    let mut face = vec![NIL; core.arcs.len()];
    let mut next = 0;
    for start in 0..core.arc_watermark {
        if !core.arc_in_use.contains(start) || core.arcs[start].hidden || face[start] != NIL {
            continue;
        }
        let mut a = start;
        let mut steps = 0;
        while face[a] == NIL {
            face[a] = next;
            let w = core.arcs[a].neighbor;
            let succ = core.arcs[a ^ 1].link[0];
            a = if succ == NIL {
                core.vertices[w].link[0]
            } else {
                succ
            };
            steps += 1;
            if steps > core.arcs.len() {
                return Err("face walk does not terminate".into());
            }
        }
        if a != start {
            return Err(format!("face walk from arc {start} does not return to start"));
        }
        next += 1;
    }
    Ok(face)
}

fn check_euler(core: &GraphCore, comp: &[usize], face: &[usize]) -> Result<(), String> {
    let nc = comp.iter().map(|&c| c + 1).max().unwrap_or(0);
    let mut verts = vec![0usize; nc];
    let mut edges = vec![0usize; nc];
    let mut comp_faces: Vec<HashSet<usize>> = vec![HashSet::new(); nc];
    for v in 0..core.n {
        verts[comp[v]] += 1;
    }
    for pair in (0..core.arc_watermark).step_by(2) {
        if !core.arc_in_use.contains(pair) {
            continue;
        }
        let c = comp[core.origin(pair)];
        edges[c] += 1;
        comp_faces[c].insert(face[pair]);
        comp_faces[c].insert(face[pair ^ 1]);
    }
    for c in 0..nc {
        if edges[c] == 0 {
            continue;
        }
        let f = comp_faces[c].len();
        if verts[c] + f != edges[c] + 2 {
            return Err(format!(
                "component {c} violates Euler's formula: V={} E={} F={f}",
                verts[c], edges[c]
            ));
        }
    }
    Ok(())
}

/// Every component must have one face whose walk touches all of its
/// vertices.
fn check_common_face(core: &GraphCore, comp: &[usize], face: &[usize]) -> Result<(), String> {
    let nc = comp.iter().map(|&c| c + 1).max().unwrap_or(0);
    let mut verts = vec![0usize; nc];
    for v in 0..core.n {
        if core.degree(v) > 0 {
            verts[comp[v]] += 1;
        }
    }
    let mut face_verts: HashMap<usize, HashSet<usize>> = HashMap::new();
    for a in 0..core.arc_watermark {
        if core.arc_in_use.contains(a) && !core.arcs[a].hidden {
            face_verts.entry(face[a]).or_default().insert(core.origin(a));
        }
    }
    let mut covered = vec![false; nc];
    for verts_on_face in face_verts.values() {
        if let Some(&v) = verts_on_face.iter().next() {
            let c = comp[v];
            if verts_on_face.len() == verts[c] {
                covered[c] = true;
            }
        }
    }
    for c in 0..nc {
        if verts[c] > 0 && !covered[c] {
            return Err(format!("component {c} has no face containing all its vertices"));
        }
    }
    Ok(())
}

// ---- edge sets --------------------------------------------------------

/// Normalized endpoint pairs of all in-use real edges, sorted.
fn edge_keys(core: &GraphCore) -> Vec<u64> {
    let mut keys = Vec::with_capacity(core.edge_count);
    for pair in (0..core.arc_watermark).step_by(2) {
        if !core.arc_in_use.contains(pair) {
            continue;
        }
        let u = core.origin(pair);
        let w = core.arcs[pair].neighbor;
        keys.push(((u.min(w) as u64) << 32) | u.max(w) as u64);
    }
    radsort::sort(&mut keys);
    keys
}

fn is_subset(sub: &[u64], sup: &[u64]) -> bool {
    let mut i = 0;
    for &k in sub {
        while i < sup.len() && sup[i] < k {
            i += 1;
        }
        if i == sup.len() || sup[i] != k {
            return false;
        }
        i += 1;
    }
    true
}

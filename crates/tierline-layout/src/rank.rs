//! Rank assignment.
//!
//! Ranks come from a longest-path pass (sinks at rank 0, every other node as low as its
//! out-edges allow), after which sinks are pulled up against their closest predecessor. Each
//! weakly connected component is then shifted so its first rank is 0, which keeps unrelated
//! components (and isolated nodes) top-aligned.
//!
//! Expects an acyclic graph without self loops.

use crate::LayoutGraph;
use rustc_hash::FxHashMap as HashMap;
use std::collections::VecDeque;

pub fn rank(g: &mut LayoutGraph) {
    longest_path(g);
    tighten_sinks(g);
    normalize_components(g);
}

/// Kahn order over `g`, seeded and expanded in insertion order. Nodes on a cycle are appended in
/// insertion order so every node is returned exactly once.
pub fn topological_order(g: &LayoutGraph) -> Vec<String> {
    let mut indegree: HashMap<&str, usize> = g.nodes().map(|id| (id, 0)).collect();
    for e in g.edges() {
        if e.is_self_loop() {
            continue;
        }
        if let Some(d) = indegree.get_mut(e.w.as_str()) {
            *d += 1;
        }
    }

    let mut queue: VecDeque<&str> = g
        .nodes()
        .filter(|id| indegree.get(id).copied().unwrap_or(0) == 0)
        .collect();
    let mut topo: Vec<String> = Vec::with_capacity(g.node_count());
    while let Some(v) = queue.pop_front() {
        topo.push(v.to_string());
        for w in g.successors(v) {
            if w == v {
                continue;
            }
            if let Some(d) = indegree.get_mut(w) {
                *d = d.saturating_sub(1);
                if *d == 0 {
                    queue.push_back(w);
                }
            }
        }
    }

    if topo.len() != g.node_count() {
        let seen: rustc_hash::FxHashSet<String> = topo.iter().cloned().collect();
        let rest: Vec<String> = g
            .nodes()
            .filter(|id| !seen.contains(*id))
            .map(str::to_string)
            .collect();
        topo.extend(rest);
    }
    topo
}

pub fn longest_path(g: &mut LayoutGraph) {
    let topo = topological_order(g);
    let mut ranks: HashMap<String, i32> = HashMap::default();

    for v in topo.iter().rev() {
        let mut rank: Option<i32> = None;
        for e in g.out_edges(v) {
            if e.is_self_loop() {
                continue;
            }
            let Some(&w_rank) = ranks.get(&e.w) else {
                continue;
            };
            let minlen = g.edge_by_key(&e).map(|l| l.minlen as i32).unwrap_or(1);
            let candidate = w_rank - minlen;
            rank = Some(rank.map_or(candidate, |r| r.min(candidate)));
        }
        ranks.insert(v.clone(), rank.unwrap_or(0));
    }

    g.for_each_node_mut(|id, n| {
        n.rank = ranks.get(id).copied();
    });
}

/// Moves every sink with predecessors up to the lowest rank its in-edges allow.
fn tighten_sinks(g: &mut LayoutGraph) {
    let sinks: Vec<String> = g.sinks().into_iter().map(str::to_string).collect();
    for v in sinks {
        let mut rank: Option<i32> = None;
        for e in g.in_edges(&v) {
            let Some(u_rank) = g.node(&e.v).and_then(|n| n.rank) else {
                continue;
            };
            let minlen = g.edge_by_key(&e).map(|l| l.minlen as i32).unwrap_or(1);
            let candidate = u_rank + minlen;
            rank = Some(rank.map_or(candidate, |r| r.max(candidate)));
        }
        if let (Some(rank), Some(n)) = (rank, g.node_mut(&v)) {
            n.rank = Some(rank);
        }
    }
}

fn normalize_components(g: &mut LayoutGraph) {
    let component = weak_components(g);
    let mut min_rank: HashMap<usize, i32> = HashMap::default();
    for id in g.nodes() {
        let (Some(&c), Some(rank)) = (component.get(id), g.node(id).and_then(|n| n.rank)) else {
            continue;
        };
        min_rank
            .entry(c)
            .and_modify(|m| *m = (*m).min(rank))
            .or_insert(rank);
    }

    g.for_each_node_mut(|id, n| {
        let Some(c) = component.get(id) else {
            return;
        };
        if let (Some(rank), Some(&min)) = (n.rank, min_rank.get(c)) {
            n.rank = Some(rank - min);
        }
    });
}

/// Component index per node, numbered in order of first appearance.
pub fn weak_components(g: &LayoutGraph) -> HashMap<String, usize> {
    let mut component: HashMap<String, usize> = HashMap::default();
    let mut next = 0usize;
    for root in g.nodes() {
        if component.contains_key(root) {
            continue;
        }
        let mut queue: VecDeque<String> = VecDeque::from([root.to_string()]);
        component.insert(root.to_string(), next);
        while let Some(v) = queue.pop_front() {
            for w in g.successors(&v).into_iter().chain(g.predecessors(&v)) {
                if !component.contains_key(w) {
                    component.insert(w.to_string(), next);
                    queue.push_back(w.to_string());
                }
            }
        }
        next += 1;
    }
    component
}

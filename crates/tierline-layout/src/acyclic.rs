//! Break cycles by reversing a DFS feedback arc set.
//!
//! Reversed edges carry `reversed = true` and are flipped back by [`undo`]. When the reversed
//! edge collides with an existing edge in the opposite direction, the two are merged for ranking
//! and the original is parked on the graph label until `undo`.

use crate::graphlib::EdgeKey;
use crate::LayoutGraph;
use rustc_hash::FxHashSet as HashSet;

pub fn run(g: &mut LayoutGraph) {
    let fas = dfs_fas(g);
    tracing::trace!(reversed = fas.len(), "acyclic");

    for e in fas {
        let Some(mut label) = g.remove_edge(&e.v, &e.w) else {
            continue;
        };

        if let Some(existing) = g.edge_mut(&e.w, &e.v) {
            existing.weight += label.weight;
            existing.minlen = existing.minlen.max(label.minlen);
            g.graph_mut().merged_reversals.push((e, label));
            continue;
        }

        label.reversed = true;
        g.set_edge_with_label(e.w, e.v, label);
    }
}

pub fn undo(g: &mut LayoutGraph) {
    for e in g.edge_keys() {
        let reversed = g.edge_by_key(&e).is_some_and(|l| l.reversed);
        if !reversed {
            continue;
        }
        let Some(mut label) = g.remove_edge(&e.v, &e.w) else {
            continue;
        };
        label.reversed = false;
        g.set_edge_with_label(e.w, e.v, label);
    }

    let merged = std::mem::take(&mut g.graph_mut().merged_reversals);
    for (key, label) in merged {
        if let Some(existing) = g.edge_mut(&key.w, &key.v) {
            existing.weight -= label.weight;
        }
        g.set_edge_with_label(key.v, key.w, label);
    }
}

/// Edges closing a cycle while walking depth-first from every node in insertion order.
fn dfs_fas(g: &LayoutGraph) -> Vec<EdgeKey> {
    let mut fas: Vec<EdgeKey> = Vec::new();
    let mut visited: HashSet<String> = HashSet::default();
    let mut on_stack: HashSet<String> = HashSet::default();

    // Explicit stack of (node, outgoing edges, next edge index) so long chains cannot overflow.
    for root in g.nodes() {
        if visited.contains(root) {
            continue;
        }
        visited.insert(root.to_string());
        on_stack.insert(root.to_string());
        let mut stack: Vec<(String, Vec<EdgeKey>, usize)> =
            vec![(root.to_string(), g.out_edges(root), 0)];

        while let Some((v, out, next)) = stack.last_mut() {
            let Some(e) = out.get(*next).cloned() else {
                on_stack.remove(v.as_str());
                stack.pop();
                continue;
            };
            *next += 1;

            if e.is_self_loop() {
                continue;
            }
            if on_stack.contains(&e.w) {
                fas.push(e);
            } else if visited.insert(e.w.clone()) {
                on_stack.insert(e.w.clone());
                let out = g.out_edges(&e.w);
                stack.push((e.w, out, 0));
            }
        }
    }
    fas
}

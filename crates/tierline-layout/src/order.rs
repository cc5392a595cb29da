//! Crossing reduction.
//!
//! Starting from a depth-first initial order, layers are swept alternately downwards (each
//! layer sorted by the barycenter of its predecessors) and upwards (by successors). The ordering
//! with the fewest weighted crossings wins; the search stops once a few sweeps in a row fail to
//! improve on it.

use crate::LayoutGraph;
use rustc_hash::FxHashMap as HashMap;
use rustc_hash::FxHashSet as HashSet;

const MAX_SWEEPS: usize = 24;
const PATIENCE: usize = 4;

pub fn order(g: &mut LayoutGraph) {
    let mut layering = init_order(g);

    let mut best = layering.clone();
    let mut best_cc = cross_count(g, &layering);
    let mut since_best = 0usize;
    let mut sweep = 0usize;

    while best_cc > 0.0 && since_best < PATIENCE && sweep < MAX_SWEEPS {
        sweep_layers(g, &mut layering, sweep % 2 == 0);
        let cc = cross_count(g, &layering);
        if cc < best_cc {
            best = layering.clone();
            best_cc = cc;
            since_best = 0;
        } else {
            since_best += 1;
        }
        sweep += 1;
    }

    tracing::trace!(sweeps = sweep, crossings = best_cc, "order");
    assign_order(g, &best);
}

/// Layers filled by a depth-first walk that starts from nodes in rank order, so connected nodes
/// start out close to each other.
pub fn init_order(g: &LayoutGraph) -> Vec<Vec<String>> {
    let mut ranked: Vec<(i32, &str)> = g
        .nodes()
        .filter_map(|id| Some((g.node(id)?.rank?, id)))
        .collect();
    let Some(max_rank) = ranked.iter().map(|(r, _)| *r).max() else {
        return Vec::new();
    };
    ranked.sort_by_key(|(rank, _)| *rank);

    let mut layers: Vec<Vec<String>> = vec![Vec::new(); (max_rank.max(0) + 1) as usize];
    let mut visited: HashSet<&str> = HashSet::default();

    for (_, root) in ranked {
        let mut stack: Vec<&str> = vec![root];
        while let Some(v) = stack.pop() {
            if !visited.insert(v) {
                continue;
            }
            let rank = g.node(v).and_then(|n| n.rank).unwrap_or(0);
            if let Some(layer) = layers.get_mut(rank.max(0) as usize) {
                layer.push(v.to_string());
            }
            stack.extend(g.successors(v).into_iter().rev());
        }
    }
    layers
}

fn sweep_layers(g: &LayoutGraph, layering: &mut [Vec<String>], downward: bool) {
    let n = layering.len();
    if n < 2 {
        return;
    }
    let indices: Vec<usize> = if downward {
        (1..n).collect()
    } else {
        (0..n - 1).rev().collect()
    };

    for i in indices {
        let fixed = if downward { i - 1 } else { i + 1 };
        let reordered = {
            let fixed_pos: HashMap<&str, usize> = layering[fixed]
                .iter()
                .enumerate()
                .map(|(pos, id)| (id.as_str(), pos))
                .collect();
            reorder_layer(g, &layering[i], &fixed_pos, downward)
        };
        layering[i] = reordered;
    }
}

/// Sorts the nodes that have neighbours in the fixed layer by barycenter. Nodes without such
/// neighbours keep their slot.
fn reorder_layer(
    g: &LayoutGraph,
    layer: &[String],
    fixed_pos: &HashMap<&str, usize>,
    downward: bool,
) -> Vec<String> {
    let mut sortable: Vec<(f64, usize)> = Vec::new();
    for (idx, v) in layer.iter().enumerate() {
        if let Some(bc) = barycenter(g, v, fixed_pos, downward) {
            sortable.push((bc, idx));
        }
    }
    let slots: Vec<usize> = sortable.iter().map(|(_, idx)| *idx).collect();
    sortable.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let mut out: Vec<String> = layer.to_vec();
    for (slot, (_, idx)) in slots.into_iter().zip(sortable) {
        out[slot] = layer[idx].clone();
    }
    out
}

pub fn barycenter(
    g: &LayoutGraph,
    v: &str,
    fixed_pos: &HashMap<&str, usize>,
    downward: bool,
) -> Option<f64> {
    let edges = if downward {
        g.in_edges(v)
    } else {
        g.out_edges(v)
    };

    let mut sum = 0.0;
    let mut weight = 0.0;
    for e in edges {
        let other = if downward { &e.v } else { &e.w };
        let Some(&pos) = fixed_pos.get(other.as_str()) else {
            continue;
        };
        let w = g.edge_by_key(&e).map(|l| l.weight).unwrap_or(1.0);
        sum += w * pos as f64;
        weight += w;
    }
    (weight > 0.0).then(|| sum / weight)
}

/// Weighted number of edge crossings between consecutive layers.
pub fn cross_count(g: &LayoutGraph, layering: &[Vec<String>]) -> f64 {
    layering
        .windows(2)
        .map(|pair| two_layer_cross_count(g, &pair[0], &pair[1]))
        .sum()
}

// Accumulator tree over south positions: walking north-to-south edges in (north, south) order,
// every already-inserted edge ending further right than the current one is a crossing.
fn two_layer_cross_count(g: &LayoutGraph, north: &[String], south: &[String]) -> f64 {
    if south.is_empty() {
        return 0.0;
    }
    let south_pos: HashMap<&str, usize> = south
        .iter()
        .enumerate()
        .map(|(i, v)| (v.as_str(), i))
        .collect();

    let mut entries: Vec<(usize, f64)> = Vec::new();
    for v in north {
        let mut out: Vec<(usize, f64)> = g
            .out_edges(v)
            .into_iter()
            .filter_map(|e| {
                let pos = *south_pos.get(e.w.as_str())?;
                let weight = g.edge_by_key(&e).map(|l| l.weight).unwrap_or(1.0);
                Some((pos, weight))
            })
            .collect();
        out.sort_by_key(|(pos, _)| *pos);
        entries.extend(out);
    }

    let leaves = south.len().next_power_of_two();
    let mut tree: Vec<f64> = vec![0.0; 2 * leaves - 1];
    let first_leaf = leaves - 1;

    let mut crossings = 0.0;
    for (pos, weight) in entries {
        let mut idx = first_leaf + pos;
        tree[idx] += weight;
        let mut right_of = 0.0;
        while idx > 0 {
            if idx % 2 == 1 {
                right_of += tree[idx + 1];
            }
            idx = (idx - 1) / 2;
            tree[idx] += weight;
        }
        crossings += weight * right_of;
    }
    crossings
}

fn assign_order(g: &mut LayoutGraph, layering: &[Vec<String>]) {
    for layer in layering {
        for (i, v) in layer.iter().enumerate() {
            if let Some(n) = g.node_mut(v) {
                n.order = Some(i);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeLabel;

    fn ranked(g: &mut LayoutGraph, id: &str, rank: i32) {
        g.set_node(
            id,
            NodeLabel {
                rank: Some(rank),
                ..Default::default()
            },
        );
    }

    fn layers(ids: &[&[&str]]) -> Vec<Vec<String>> {
        ids.iter()
            .map(|l| l.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn cross_count_is_zero_for_parallel_edges() {
        let mut g = LayoutGraph::new();
        g.set_edge("a1", "b1");
        g.set_edge("a2", "b2");
        assert_eq!(cross_count(&g, &layers(&[&["a1", "a2"], &["b1", "b2"]])), 0.0);
    }

    #[test]
    fn cross_count_weights_crossings() {
        let mut g = LayoutGraph::new();
        g.set_edge("a1", "b1");
        g.set_edge_with_label(
            "a2",
            "b2",
            crate::EdgeLabel {
                weight: 2.0,
                ..Default::default()
            },
        );
        assert_eq!(cross_count(&g, &layers(&[&["a1", "a2"], &["b2", "b1"]])), 2.0);
    }

    #[test]
    fn init_order_walks_depth_first() {
        let mut g = LayoutGraph::new();
        ranked(&mut g, "a", 0);
        ranked(&mut g, "b", 0);
        ranked(&mut g, "c", 1);
        ranked(&mut g, "d", 1);
        g.set_edge("a", "d");
        g.set_edge("b", "c");
        assert_eq!(init_order(&g), layers(&[&["a", "b"], &["d", "c"]]));
    }

    #[test]
    fn order_removes_an_avoidable_crossing() {
        let mut g = LayoutGraph::new();
        ranked(&mut g, "a", 0);
        ranked(&mut g, "b", 0);
        ranked(&mut g, "c", 1);
        ranked(&mut g, "d", 1);
        ranked(&mut g, "e", 1);
        g.set_edge("a", "e");
        g.set_edge("b", "c");
        g.set_edge("b", "d");
        g.set_edge("a", "c");

        order(&mut g);
        let layering = crate::util::build_layer_matrix(&g);
        assert_eq!(cross_count(&g, &layering), 0.0);
    }
}

//! Small helpers shared by the layout passes.

use crate::graphlib::EdgeKey;
use crate::{EdgeLabel, LayoutGraph};
use std::collections::BTreeMap;

/// Removes self loops from `g` and returns them in insertion order.
pub fn take_self_loops(g: &mut LayoutGraph) -> Vec<(EdgeKey, EdgeLabel)> {
    let loops: Vec<EdgeKey> = g.edges().filter(|e| e.is_self_loop()).cloned().collect();
    loops
        .into_iter()
        .filter_map(|key| {
            let label = g.remove_edge(&key.v, &key.w)?;
            Some((key, label))
        })
        .collect()
}

/// Returns an id starting with `prefix` that is not yet used by a node of `g`.
pub fn unique_id(g: &LayoutGraph, prefix: &str, counter: &mut usize) -> String {
    loop {
        *counter += 1;
        let candidate = format!("{prefix}{counter}");
        if !g.has_node(&candidate) {
            return candidate;
        }
    }
}

/// Groups ranked nodes into layers, each sorted by `order` (insertion order for unordered
/// nodes). Layer `i` holds the nodes of rank `i`; ranks are expected to be normalised.
pub fn build_layer_matrix(g: &LayoutGraph) -> Vec<Vec<String>> {
    let mut by_rank: BTreeMap<i32, Vec<(usize, String)>> = BTreeMap::new();
    for (idx, id) in g.nodes().enumerate() {
        let Some(n) = g.node(id) else {
            continue;
        };
        let Some(rank) = n.rank else {
            continue;
        };
        by_rank
            .entry(rank)
            .or_default()
            .push((n.order.unwrap_or(usize::MAX / 2 + idx), id.to_string()));
    }

    let Some(&max_rank) = by_rank.keys().next_back() else {
        return Vec::new();
    };
    let mut layers: Vec<Vec<String>> = vec![Vec::new(); (max_rank.max(0) + 1) as usize];
    for (rank, mut entries) in by_rank {
        if rank < 0 {
            continue;
        }
        entries.sort_by_key(|(order, _)| *order);
        layers[rank as usize] = entries.into_iter().map(|(_, id)| id).collect();
    }
    layers
}

/// Shifts the drawing so its bounding box starts at the origin and records its size.
pub fn translate(g: &mut LayoutGraph) {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    g.for_each_node_mut(|_id, n| {
        let (Some(x), Some(y)) = (n.x, n.y) else {
            return;
        };
        min_x = min_x.min(x - n.width / 2.0);
        min_y = min_y.min(y - n.height / 2.0);
        max_x = max_x.max(x + n.width / 2.0);
        max_y = max_y.max(y + n.height / 2.0);
    });

    if !min_x.is_finite() || !min_y.is_finite() {
        let label = g.graph_mut();
        label.width = 0.0;
        label.height = 0.0;
        return;
    }

    g.for_each_node_mut(|_id, n| {
        if let Some(x) = n.x.as_mut() {
            *x -= min_x;
        }
        if let Some(y) = n.y.as_mut() {
            *y -= min_y;
        }
    });

    let label = g.graph_mut();
    label.width = max_x - min_x;
    label.height = max_y - min_y;
}

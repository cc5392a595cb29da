//! Coordinate assignment.
//!
//! Ranks are stacked along y, each as tall as its tallest node, `ranksep` apart. Along x every
//! layer starts packed and is then repeatedly pulled towards the median x of its neighbours in
//! the adjacent layer. The pull is resolved as an isotonic regression over the layer, so the
//! result is the least-squares placement that keeps the crossing-reduced order and the minimum
//! separation between neighbours.

use crate::{LayoutGraph, util};
use rustc_hash::FxHashMap as HashMap;

const SWEEPS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Neighbors {
    Above,
    Below,
    Both,
}

pub fn position(g: &mut LayoutGraph) {
    let layering = util::build_layer_matrix(g);
    if layering.is_empty() {
        return;
    }
    position_y(g, &layering);
    position_x(g, &layering);
}

fn position_y(g: &mut LayoutGraph, layering: &[Vec<String>]) {
    let ranksep = g.graph().ranksep;
    let mut y = 0.0;
    for layer in layering {
        let max_height = layer
            .iter()
            .filter_map(|v| g.node(v))
            .map(|n| n.height)
            .fold(0.0, f64::max);
        for v in layer {
            if let Some(n) = g.node_mut(v) {
                n.y = Some(y + max_height / 2.0);
            }
        }
        y += max_height + ranksep;
    }
}

fn position_x(g: &mut LayoutGraph, layering: &[Vec<String>]) {
    let gaps: Vec<Vec<f64>> = layering.iter().map(|l| layer_gaps(g, l)).collect();

    let mut xs: HashMap<String, f64> = HashMap::default();
    for (layer, gaps) in layering.iter().zip(&gaps) {
        let start = layer
            .first()
            .and_then(|v| g.node(v))
            .map(|n| n.width / 2.0)
            .unwrap_or(0.0);
        let mut x = start;
        for (i, v) in layer.iter().enumerate() {
            if i > 0 {
                x += gaps[i - 1];
            }
            xs.insert(v.clone(), x);
        }
    }

    let n = layering.len();
    for sweep in 0..SWEEPS {
        if n < 2 {
            break;
        }
        let (indices, neighbors): (Vec<usize>, Neighbors) = if sweep % 2 == 0 {
            ((1..n).collect(), Neighbors::Above)
        } else {
            ((0..n - 1).rev().collect(), Neighbors::Below)
        };
        for i in indices {
            align_layer(g, &layering[i], &gaps[i], &mut xs, neighbors);
        }
    }
    for (layer, gaps) in layering.iter().zip(&gaps) {
        align_layer(g, layer, gaps, &mut xs, Neighbors::Both);
    }

    g.for_each_node_mut(|id, n| {
        if let Some(&x) = xs.get(id) {
            n.x = Some(x);
        }
    });
}

/// Minimum center distance between each pair of neighbours in `layer`.
fn layer_gaps(g: &LayoutGraph, layer: &[String]) -> Vec<f64> {
    let label = g.graph();
    let half_extent = |v: &str| -> f64 {
        let Some(n) = g.node(v) else {
            return 0.0;
        };
        let gap = if n.dummy {
            label.edgesep
        } else {
            label.nodesep
        };
        (n.width + gap) / 2.0
    };
    layer
        .windows(2)
        .map(|pair| half_extent(pair[0].as_str()) + half_extent(pair[1].as_str()))
        .collect()
}

fn align_layer(
    g: &LayoutGraph,
    layer: &[String],
    gaps: &[f64],
    xs: &mut HashMap<String, f64>,
    neighbors: Neighbors,
) {
    if layer.is_empty() {
        return;
    }
    let current: &HashMap<String, f64> = xs;
    let desired: Vec<f64> = layer
        .iter()
        .map(|v| {
            let x = current.get(v).copied().unwrap_or(0.0);
            median_neighbor_x(g, v, current, neighbors).unwrap_or(x)
        })
        .collect();
    let placed = isotonic_place(&desired, gaps);
    for (v, x) in layer.iter().zip(placed) {
        xs.insert(v.clone(), x);
    }
}

fn median_neighbor_x(
    g: &LayoutGraph,
    v: &str,
    xs: &HashMap<String, f64>,
    neighbors: Neighbors,
) -> Option<f64> {
    let mut ids: Vec<&str> = Vec::new();
    if matches!(neighbors, Neighbors::Above | Neighbors::Both) {
        ids.extend(g.predecessors(v));
    }
    if matches!(neighbors, Neighbors::Below | Neighbors::Both) {
        ids.extend(g.successors(v));
    }
    let mut values: Vec<f64> = ids.into_iter().filter_map(|id| xs.get(id).copied()).collect();
    median(&mut values)
}

pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

/// Least-squares fit of `desired` subject to `x[i + 1] - x[i] >= gaps[i]` (pool adjacent
/// violators over the gap-adjusted targets).
pub fn isotonic_place(desired: &[f64], gaps: &[f64]) -> Vec<f64> {
    let mut offsets: Vec<f64> = Vec::with_capacity(desired.len());
    let mut acc = 0.0;
    for i in 0..desired.len() {
        if i > 0 {
            acc += gaps.get(i - 1).copied().unwrap_or(0.0);
        }
        offsets.push(acc);
    }

    // (sum, count) per pooled block.
    let mut blocks: Vec<(f64, usize)> = Vec::new();
    for (d, o) in desired.iter().zip(&offsets) {
        blocks.push((d - o, 1));
        while blocks.len() >= 2 {
            let (s2, c2) = blocks[blocks.len() - 1];
            let (s1, c1) = blocks[blocks.len() - 2];
            if s1 / c1 as f64 <= s2 / c2 as f64 {
                break;
            }
            blocks.pop();
            let last = blocks.len() - 1;
            blocks[last] = (s1 + s2, c1 + c2);
        }
    }

    let mut out: Vec<f64> = Vec::with_capacity(desired.len());
    for (sum, count) in blocks {
        let mean = sum / count as f64;
        for _ in 0..count {
            out.push(mean + offsets[out.len()]);
        }
    }
    out
}

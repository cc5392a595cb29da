//! Long edge normalisation.
//!
//! After ranking, an edge may span several ranks. Ordering and positioning only reason about
//! edges between adjacent ranks, so every long edge is replaced by a chain of zero-size dummy
//! nodes, one per intermediate rank. [`undo`] removes the dummies and restores the original edge.

use crate::graphlib::EdgeKey;
use crate::{EdgeLabel, LayoutGraph, NodeLabel, util};

const DUMMY_PREFIX: &str = "_edge_dummy";

#[derive(Debug, Clone, PartialEq)]
pub struct DummyChain {
    pub edge: EdgeKey,
    pub label: EdgeLabel,
    pub dummies: Vec<String>,
}

pub fn run(g: &mut LayoutGraph) {
    let mut counter = 0usize;
    let mut chains: Vec<DummyChain> = Vec::new();

    for e in g.edge_keys() {
        let (Some(v_rank), Some(w_rank)) = (
            g.node(&e.v).and_then(|n| n.rank),
            g.node(&e.w).and_then(|n| n.rank),
        ) else {
            continue;
        };
        if w_rank - v_rank <= 1 {
            continue;
        }
        let Some(label) = g.remove_edge(&e.v, &e.w) else {
            continue;
        };

        let mut dummies: Vec<String> = Vec::new();
        let mut prev = e.v.clone();
        for rank in (v_rank + 1)..w_rank {
            let id = util::unique_id(g, DUMMY_PREFIX, &mut counter);
            g.set_node(
                id.clone(),
                NodeLabel {
                    rank: Some(rank),
                    dummy: true,
                    ..Default::default()
                },
            );
            g.set_edge_with_label(
                prev,
                id.clone(),
                EdgeLabel {
                    minlen: 1,
                    weight: label.weight,
                    reversed: false,
                },
            );
            prev = id.clone();
            dummies.push(id);
        }
        g.set_edge_with_label(
            prev,
            e.w.clone(),
            EdgeLabel {
                minlen: 1,
                weight: label.weight,
                reversed: false,
            },
        );

        chains.push(DummyChain {
            edge: e,
            label,
            dummies,
        });
    }

    tracing::trace!(chains = chains.len(), "normalize");
    g.graph_mut().dummy_chains = chains;
}

pub fn undo(g: &mut LayoutGraph) {
    let chains = std::mem::take(&mut g.graph_mut().dummy_chains);
    for chain in chains {
        for dummy in &chain.dummies {
            g.remove_node(dummy);
        }
        g.set_edge_with_label(chain.edge.v, chain.edge.w, chain.label);
    }
}

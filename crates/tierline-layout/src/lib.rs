//! Rank-based layered graph layout.
//!
//! The pipeline follows the classic Sugiyama shape used by dagre: break cycles, assign ranks,
//! split long edges into dummy chains, order each rank to reduce crossings, then assign
//! coordinates. Node coordinates written back to [`NodeLabel::x`] / [`NodeLabel::y`] are box
//! centers with the top-left corner of the whole drawing at the origin.
//!
//! Every pass is deterministic: ties are broken by node and edge insertion order.

pub use tierline_graphlib as graphlib;

pub mod acyclic;
pub mod coordinate_system;
pub mod normalize;
pub mod order;
pub mod position;
pub mod rank;
pub mod util;

use graphlib::EdgeKey;

pub type LayoutGraph = graphlib::Graph<NodeLabel, EdgeLabel, GraphLabel>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankDir {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

impl RankDir {
    pub fn is_horizontal(self) -> bool {
        matches!(self, RankDir::LR | RankDir::RL)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphLabel {
    pub rankdir: RankDir,
    /// Gap between two real nodes of the same rank.
    pub nodesep: f64,
    /// Gap between two consecutive ranks.
    pub ranksep: f64,
    /// Gap between two edge dummies of the same rank.
    pub edgesep: f64,

    /// Bounding box of the drawing, filled in by [`layout`].
    pub width: f64,
    pub height: f64,

    pub dummy_chains: Vec<normalize::DummyChain>,
    pub merged_reversals: Vec<(EdgeKey, EdgeLabel)>,
}

impl Default for GraphLabel {
    fn default() -> Self {
        Self {
            rankdir: RankDir::TB,
            nodesep: 50.0,
            ranksep: 50.0,
            edgesep: 10.0,
            width: 0.0,
            height: 0.0,
            dummy_chains: Vec::new(),
            merged_reversals: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeLabel {
    pub width: f64,
    pub height: f64,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub rank: Option<i32>,
    pub order: Option<usize>,
    pub dummy: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    pub minlen: usize,
    pub weight: f64,
    pub reversed: bool,
}

impl Default for EdgeLabel {
    fn default() -> Self {
        Self {
            minlen: 1,
            weight: 1.0,
            reversed: false,
        }
    }
}

/// Lays out `g` in place.
///
/// Self loops are kept in the graph but take no part in ranking or ordering.
pub fn layout(g: &mut LayoutGraph) {
    let span = tracing::debug_span!(
        "layout",
        nodes = g.node_count(),
        edges = g.edge_count(),
        rankdir = ?g.graph().rankdir
    );
    let _guard = span.enter();

    let self_loops = util::take_self_loops(g);

    coordinate_system::adjust(g);
    acyclic::run(g);
    rank::rank(g);
    normalize::run(g);
    order::order(g);
    position::position(g);
    normalize::undo(g);
    coordinate_system::undo(g);
    util::translate(g);
    acyclic::undo(g);

    for (key, label) in self_loops {
        g.set_edge_with_label(key.v, key.w, label);
    }

    tracing::trace!(
        width = g.graph().width,
        height = g.graph().height,
        "layout finished"
    );
}

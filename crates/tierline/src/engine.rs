//! The seam between the adapter and whatever computes node positions.

use crate::config::LayoutConfig;
use crate::direction::Direction;
use crate::error::{Error, Result};
use crate::model::Point;
use rustc_hash::FxHashMap;
use tierline_layout::{GraphLabel, LayoutGraph, NodeLabel};

#[derive(Debug, Clone, PartialEq)]
pub struct EngineNode {
    pub id: String,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineEdge {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Copy)]
pub struct LayoutRequest<'a> {
    pub nodes: &'a [EngineNode],
    pub edges: &'a [EngineEdge],
    pub direction: Direction,
    pub config: &'a LayoutConfig,
}

/// Node id to box center.
pub type Positions = FxHashMap<String, Point>;

/// Computes a center point for every requested node.
///
/// Sources must rank before targets along the direction's axis. Implementations must be
/// deterministic: the same request always yields the same positions.
pub trait GraphLayoutEngine {
    fn layout(&self, request: &LayoutRequest<'_>) -> Result<Positions>;
}

impl<T> GraphLayoutEngine for &T
where
    T: GraphLayoutEngine + ?Sized,
{
    fn layout(&self, request: &LayoutRequest<'_>) -> Result<Positions> {
        (**self).layout(request)
    }
}

impl<T> GraphLayoutEngine for Box<T>
where
    T: GraphLayoutEngine + ?Sized,
{
    fn layout(&self, request: &LayoutRequest<'_>) -> Result<Positions> {
        (**self).layout(request)
    }
}

/// Default engine backed by `tierline-layout`.
///
/// A new layout graph is built for every request; nothing is shared between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayeredEngine;

impl GraphLayoutEngine for LayeredEngine {
    fn layout(&self, request: &LayoutRequest<'_>) -> Result<Positions> {
        let mut g = LayoutGraph::new();
        g.set_graph(GraphLabel {
            rankdir: request.direction.into(),
            nodesep: request.config.node_sep,
            ranksep: request.config.rank_sep,
            edgesep: request.config.edge_sep,
            ..Default::default()
        });

        for n in request.nodes {
            g.set_node(
                n.id.clone(),
                NodeLabel {
                    width: n.width,
                    height: n.height,
                    ..Default::default()
                },
            );
        }
        for e in request.edges {
            if !g.has_node(&e.source) || !g.has_node(&e.target) {
                return Err(Error::LayoutEngineFailure {
                    message: format!("edge {} -> {} has no endpoint node", e.source, e.target),
                });
            }
            g.set_edge(e.source.clone(), e.target.clone());
        }

        tierline_layout::layout(&mut g);

        let mut positions = Positions::default();
        for id in g.nodes() {
            let Some(label) = g.node(id) else {
                continue;
            };
            if let (Some(x), Some(y)) = (label.x, label.y) {
                positions.insert(id.to_string(), Point::new(x, y));
            }
        }
        Ok(positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layered_engine_reports_centers() {
        let config = LayoutConfig::default();
        let nodes = vec![
            EngineNode {
                id: "a".to_string(),
                width: 180.0,
                height: 80.0,
            },
            EngineNode {
                id: "b".to_string(),
                width: 180.0,
                height: 80.0,
            },
        ];
        let edges = vec![EngineEdge {
            source: "a".to_string(),
            target: "b".to_string(),
        }];
        let positions = LayeredEngine
            .layout(&LayoutRequest {
                nodes: &nodes,
                edges: &edges,
                direction: Direction::TB,
                config: &config,
            })
            .unwrap();

        assert_eq!(positions["a"], Point::new(90.0, 40.0));
        assert_eq!(positions["b"], Point::new(90.0, 200.0));
    }

    #[test]
    fn layered_engine_rejects_edges_without_endpoints() {
        let config = LayoutConfig::default();
        let edges = vec![EngineEdge {
            source: "a".to_string(),
            target: "b".to_string(),
        }];
        let err = LayeredEngine
            .layout(&LayoutRequest {
                nodes: &[],
                edges: &edges,
                direction: Direction::LR,
                config: &config,
            })
            .unwrap_err();
        assert!(matches!(err, Error::LayoutEngineFailure { .. }));
    }
}

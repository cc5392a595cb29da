//! Automatic layout of node/edge diagrams.
//!
//! The adapter validates the diagram, hands uniformly sized boxes and precedence edges to a
//! [`GraphLayoutEngine`], and maps the reported box centers back to the top-left convention of
//! the diagram surface. Only `position`, `targetPosition` and `sourcePosition` of a node change;
//! node order, every other node field, and the edge list pass through untouched.

use crate::config::LayoutConfig;
use crate::direction::Direction;
use crate::engine::{EngineEdge, EngineNode, GraphLayoutEngine, LayeredEngine, LayoutRequest};
use crate::error::{Error, Result};
use crate::model::{Edge, Node, Point};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Lays out `nodes` and `edges` with the default engine and spacing.
pub fn compute_layout(nodes: &[Node], edges: &[Edge], direction: Direction) -> Result<LayoutResult> {
    LayoutAdapter::new().compute(nodes, edges, direction)
}

/// Checks that node ids are unique and that every edge endpoint names a node.
///
/// Edges pointing at missing nodes are rejected rather than dropped: a silently ignored edge
/// changes the ranking without any visible trace.
pub fn validate(nodes: &[Node], edges: &[Edge]) -> Result<()> {
    let mut ids: FxHashSet<&str> = FxHashSet::default();
    for n in nodes {
        if !ids.insert(n.id.as_str()) {
            return Err(Error::DuplicateNodeId { id: n.id.clone() });
        }
    }
    for e in edges {
        for endpoint in [&e.source, &e.target] {
            if !ids.contains(endpoint.as_str()) {
                return Err(Error::DanglingEdgeReference {
                    edge_id: e.id.clone(),
                    node_id: endpoint.clone(),
                });
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct LayoutAdapter<E = LayeredEngine> {
    engine: E,
    config: LayoutConfig,
}

impl LayoutAdapter<LayeredEngine> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E> LayoutAdapter<E>
where
    E: GraphLayoutEngine,
{
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine,
            config: LayoutConfig::default(),
        }
    }

    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn compute(
        &self,
        nodes: &[Node],
        edges: &[Edge],
        direction: Direction,
    ) -> Result<LayoutResult> {
        self.config.validate()?;
        validate(nodes, edges)?;

        if nodes.is_empty() {
            return Ok(LayoutResult {
                nodes: Vec::new(),
                edges: edges.to_vec(),
            });
        }

        let cfg = &self.config;
        let engine_nodes: Vec<EngineNode> = nodes
            .iter()
            .map(|n| EngineNode {
                id: n.id.clone(),
                width: cfg.node_width,
                height: cfg.node_height,
            })
            .collect();
        let engine_edges: Vec<EngineEdge> = edges
            .iter()
            .map(|e| EngineEdge {
                source: e.source.clone(),
                target: e.target.clone(),
            })
            .collect();

        tracing::debug!(
            nodes = engine_nodes.len(),
            edges = engine_edges.len(),
            %direction,
            "computing layout"
        );

        let centers = self.engine.layout(&LayoutRequest {
            nodes: &engine_nodes,
            edges: &engine_edges,
            direction,
            config: cfg,
        })?;

        let (target_position, source_position) = direction.anchors();
        let mut out: Vec<Node> = Vec::with_capacity(nodes.len());
        for node in nodes {
            let Some(center) = centers.get(&node.id) else {
                return Err(Error::LayoutEngineFailure {
                    message: format!("no position reported for node {}", node.id),
                });
            };
            if !(center.x.is_finite() && center.y.is_finite()) {
                return Err(Error::LayoutEngineFailure {
                    message: format!(
                        "non-finite position ({}, {}) reported for node {}",
                        center.x, center.y, node.id
                    ),
                });
            }

            let mut laid_out = node.clone();
            laid_out.position = Point::new(
                center.x - cfg.node_width / 2.0,
                center.y - cfg.node_height / 2.0,
            );
            laid_out.target_position = Some(target_position);
            laid_out.source_position = Some(source_position);
            out.push(laid_out);
        }

        tracing::trace!(nodes = out.len(), "layout applied");
        Ok(LayoutResult {
            nodes: out,
            edges: edges.to_vec(),
        })
    }
}

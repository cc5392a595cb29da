//! Tab state of the diagram dashboard.
//!
//! A dashboard shows either one of its flow diagrams (an editable node/edge graph that can be
//! re-laid out) or one of the fixed tool views. Selecting a flow view replaces the working node
//! and edge collections with a fresh copy of that diagram; tool views leave them alone.

use crate::direction::Direction;
use crate::engine::{GraphLayoutEngine, LayeredEngine};
use crate::error::{Error, Result};
use crate::layout::LayoutAdapter;
use crate::model::{Edge, Node};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolView {
    #[serde(rename = "chartdb")]
    ChartDb,
    #[serde(rename = "techradar")]
    TechRadar,
    #[serde(rename = "apidocs")]
    ApiDocs,
    #[serde(rename = "diagrams")]
    Diagrams,
}

impl ToolView {
    pub const ALL: [ToolView; 4] = [
        ToolView::ChartDb,
        ToolView::TechRadar,
        ToolView::ApiDocs,
        ToolView::Diagrams,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ToolView::ChartDb => "chartdb",
            ToolView::TechRadar => "techradar",
            ToolView::ApiDocs => "apidocs",
            ToolView::Diagrams => "diagrams",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.key() == key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewKey {
    Flow(String),
    Tool(ToolView),
}

impl ViewKey {
    /// Tool keys win over flow diagrams of the same name.
    pub fn parse(key: &str) -> Self {
        match ToolView::from_key(key) {
            Some(tool) => ViewKey::Tool(tool),
            None => ViewKey::Flow(key.to_string()),
        }
    }

    pub fn is_flow(&self) -> bool {
        matches!(self, ViewKey::Flow(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            ViewKey::Flow(key) => key,
            ViewKey::Tool(tool) => tool.key(),
        }
    }
}

impl fmt::Display for ViewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub label: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// Flow diagrams keyed by view key, in tab order.
pub type Catalog = IndexMap<String, Diagram>;

pub struct Dashboard<E = LayeredEngine> {
    diagrams: Catalog,
    adapter: LayoutAdapter<E>,
    current: ViewKey,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    direction: Direction,
}

impl Dashboard<LayeredEngine> {
    pub fn new(diagrams: Catalog) -> Result<Self> {
        Self::with_adapter(diagrams, LayoutAdapter::new())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let diagrams: Catalog = serde_json::from_str(json)?;
        Self::new(diagrams)
    }
}

impl<E> Dashboard<E>
where
    E: GraphLayoutEngine,
{
    /// Opens on the first diagram of the catalog.
    pub fn with_adapter(diagrams: Catalog, adapter: LayoutAdapter<E>) -> Result<Self> {
        let Some((key, first)) = diagrams.first() else {
            return Err(Error::EmptyCatalog);
        };
        let current = ViewKey::Flow(key.clone());
        let nodes = first.nodes.clone();
        let edges = first.edges.clone();
        Ok(Self {
            diagrams,
            adapter,
            current,
            nodes,
            edges,
            direction: Direction::default(),
        })
    }

    pub fn diagrams(&self) -> &Catalog {
        &self.diagrams
    }

    pub fn current_view(&self) -> &ViewKey {
        &self.current
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Direction of the last successful layout.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn layout_enabled(&self) -> bool {
        self.current.is_flow()
    }

    pub fn select_view(&mut self, key: &str) -> Result<&ViewKey> {
        let view = ViewKey::parse(key);
        if let ViewKey::Flow(flow) = &view {
            let Some(diagram) = self.diagrams.get(flow) else {
                return Err(Error::UnknownView {
                    key: key.to_string(),
                });
            };
            self.nodes = diagram.nodes.clone();
            self.edges = diagram.edges.clone();
        }
        tracing::debug!(view = %view, "view selected");
        self.current = view;
        Ok(&self.current)
    }

    /// Re-lays out the working diagram. On failure the previous layout and direction stay.
    pub fn apply_layout(&mut self, direction: Direction) -> Result<()> {
        if !self.layout_enabled() {
            return Err(Error::LayoutUnavailable {
                key: self.current.to_string(),
            });
        }
        match self.adapter.compute(&self.nodes, &self.edges, direction) {
            Ok(result) => {
                self.nodes = result.nodes;
                self.edges = result.edges;
                self.direction = direction;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, view = %self.current, "layout failed; keeping previous layout");
                Err(err)
            }
        }
    }

    /// Adds a `source -> target` edge to the working diagram. Returns `false` when that
    /// connection already exists.
    pub fn connect(&mut self, source: &str, target: &str) -> Result<bool> {
        let id = format!("xy-edge__{source}-{target}");
        for endpoint in [source, target] {
            if !self.nodes.iter().any(|n| n.id == endpoint) {
                return Err(Error::DanglingEdgeReference {
                    edge_id: id,
                    node_id: endpoint.to_string(),
                });
            }
        }
        if self
            .edges
            .iter()
            .any(|e| e.source == source && e.target == target)
        {
            return Ok(false);
        }
        self.edges.push(Edge::new(id, source, target));
        Ok(true)
    }
}

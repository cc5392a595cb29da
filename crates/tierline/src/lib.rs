#![forbid(unsafe_code)]

//! Automatic layered layout for node/edge diagrams.
//!
//! [`compute_layout`] takes the nodes and edges of a diagram plus a [`Direction`] and returns the
//! same diagram with every node moved to a computed top-left position and its connector anchors
//! set for that direction. Positions come from a [`GraphLayoutEngine`]; the default
//! [`LayeredEngine`] runs the rank-based pipeline of `tierline-layout` on a fresh graph per call.
//!
//! ```
//! use tierline::{Direction, Edge, Node, compute_layout};
//!
//! let nodes = vec![Node::new("n1"), Node::new("n2"), Node::new("n3")];
//! let edges = vec![Edge::new("e1", "n1", "n2"), Edge::new("e2", "n2", "n3")];
//! let out = compute_layout(&nodes, &edges, Direction::TB).unwrap();
//! assert!(out.nodes[0].position.y < out.nodes[1].position.y);
//! ```

pub mod config;
pub mod dashboard;
pub mod direction;
pub mod engine;
pub mod error;
pub mod export;
pub mod layout;
pub mod model;

pub use config::LayoutConfig;
pub use dashboard::{Catalog, Dashboard, Diagram, ToolView, ViewKey};
pub use direction::Direction;
pub use engine::{
    EngineEdge, EngineNode, GraphLayoutEngine, LayeredEngine, LayoutRequest, Positions,
};
pub use error::{Error, ErrorKind, Result};
pub use export::{SchemaDocument, Workflow};
pub use layout::{LayoutAdapter, LayoutResult, compute_layout, validate};
pub use model::{Anchor, Edge, Node, Point};

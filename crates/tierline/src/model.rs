//! Node and edge documents as exchanged with the diagram surface.
//!
//! Field names follow the surface's JSON (`type`, `targetPosition`, `sourcePosition`). Fields the
//! layout does not know about are kept verbatim in `extra` so a document survives a layout round
//! trip unchanged apart from positions and anchors.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Side of a node box that connector lines attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Top,
    Bottom,
    Left,
    Right,
}

impl Anchor {
    pub fn as_str(self) -> &'static str {
        match self {
            Anchor::Top => "top",
            Anchor::Bottom => "bottom",
            Anchor::Left => "left",
            Anchor::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Top-left corner of the node box.
    #[serde(default)]
    pub position: Point,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_position: Option<Anchor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_position: Option<Anchor>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: None,
            position: Point::default(),
            data: Value::Null,
            target_position: None,
            source_position: None,
            extra: Map::new(),
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Point::new(x, y);
        self
    }

    /// `data.label` when it is a string.
    pub fn label(&self) -> Option<&str> {
        self.data.get("label").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Edge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            kind: None,
            label: None,
            extra: Map::new(),
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn node_json_keeps_unknown_fields() {
        let raw = json!({
            "id": "nginx",
            "type": "custom",
            "position": { "x": 225.0, "y": 150.0 },
            "data": { "label": "Nginx", "port": "80" },
            "draggable": false
        });
        let node: Node = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(node.kind.as_deref(), Some("custom"));
        assert_eq!(node.label(), Some("Nginx"));
        assert_eq!(node.extra.get("draggable"), Some(&json!(false)));
        assert_eq!(serde_json::to_value(&node).unwrap(), raw);
    }

    #[test]
    fn node_anchors_use_surface_names() {
        let mut node = Node::new("a");
        node.target_position = Some(Anchor::Left);
        node.source_position = Some(Anchor::Right);
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["targetPosition"], json!("left"));
        assert_eq!(value["sourcePosition"], json!("right"));
    }

    #[test]
    fn minimal_node_and_edge_parse() {
        let node: Node = serde_json::from_value(json!({ "id": "n1" })).unwrap();
        assert_eq!(node.position, Point::default());
        assert!(node.data.is_null());

        let edge: Edge =
            serde_json::from_value(json!({ "id": "e1", "source": "n1", "target": "n2", "type": "smoothstep" }))
                .unwrap();
        assert_eq!(edge.kind.as_deref(), Some("smoothstep"));
        assert!(edge.extra.is_empty());
    }
}

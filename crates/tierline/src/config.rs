use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Spacing used for every layout call.
///
/// All nodes share one box size regardless of their rendered content, so long labels can
/// overflow their slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    /// Gap between nodes of the same rank.
    pub node_sep: f64,
    /// Gap between consecutive ranks.
    pub rank_sep: f64,
    /// Gap between edges routed through the same rank.
    pub edge_sep: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 180.0,
            node_height: 80.0,
            node_sep: 50.0,
            rank_sep: 80.0,
            edge_sep: 20.0,
        }
    }
}

impl LayoutConfig {
    pub fn node_size(mut self, width: f64, height: f64) -> Self {
        self.node_width = width;
        self.node_height = height;
        self
    }

    pub fn node_sep(mut self, value: f64) -> Self {
        self.node_sep = value;
        self
    }

    pub fn rank_sep(mut self, value: f64) -> Self {
        self.rank_sep = value;
        self
    }

    pub fn edge_sep(mut self, value: f64) -> Self {
        self.edge_sep = value;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("nodeWidth", self.node_width),
            ("nodeHeight", self.node_height),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfig { field, value });
            }
        }

        let non_negative = [
            ("nodeSep", self.node_sep),
            ("rankSep", self.rank_sep),
            ("edgeSep", self.edge_sep),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidConfig { field, value });
            }
        }
        Ok(())
    }
}

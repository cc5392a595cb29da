//! Graph container APIs used by `tierline-layout`.
//!
//! The container is a simple directed graph: at most one edge per ordered `(v, w)` pair, nodes
//! and edges iterated in insertion order. Layout passes rely on that ordering for deterministic
//! tie-breaking, so no API here reorders entries except the removals.

use rustc_hash::FxBuildHasher;
use std::cell::RefCell;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub v: String,
    pub w: String,
}

impl EdgeKey {
    pub fn new(v: impl Into<String>, w: impl Into<String>) -> Self {
        Self {
            v: v.into(),
            w: w.into(),
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.v == self.w
    }
}

#[derive(Debug, Clone)]
struct NodeEntry<N> {
    id: String,
    label: N,
}

#[derive(Debug, Clone)]
struct EdgeEntry<E> {
    key: EdgeKey,
    label: E,
}

#[derive(Debug, Clone)]
struct AdjCache {
    generation: u64,
    out: Vec<Vec<usize>>,
    in_: Vec<Vec<usize>>,
}

pub struct Graph<N, E, G>
where
    N: Default,
    E: Default,
    G: Default,
{
    graph_label: G,

    nodes: Vec<NodeEntry<N>>,
    node_index: HashMap<String, usize>,

    edges: Vec<EdgeEntry<E>>,
    edge_index: HashMap<EdgeKey, usize>,

    // Layout passes query neighbours far more often than they mutate the graph, so adjacency is
    // rebuilt lazily from the edge list whenever the generation moves.
    adj_gen: u64,
    adj_cache: RefCell<Option<AdjCache>>,
}

impl<N, E, G> Default for Graph<N, E, G>
where
    N: Default,
    E: Default,
    G: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E, G> Graph<N, E, G>
where
    N: Default,
    E: Default,
    G: Default,
{
    pub fn new() -> Self {
        Self {
            graph_label: G::default(),
            nodes: Vec::new(),
            node_index: HashMap::default(),
            edges: Vec::new(),
            edge_index: HashMap::default(),
            adj_gen: 0,
            adj_cache: RefCell::new(None),
        }
    }

    fn invalidate_adj(&mut self) {
        self.adj_gen = self.adj_gen.wrapping_add(1);
        *self.adj_cache.get_mut() = None;
    }

    fn with_adj<R>(&self, f: impl FnOnce(&AdjCache) -> R) -> R {
        let mut cache = self.adj_cache.borrow_mut();
        let stale = cache
            .as_ref()
            .map(|c| c.generation != self.adj_gen)
            .unwrap_or(true);
        if stale {
            let mut out: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
            let mut in_: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
            for (edge_idx, e) in self.edges.iter().enumerate() {
                let (Some(&v_idx), Some(&w_idx)) =
                    (self.node_index.get(&e.key.v), self.node_index.get(&e.key.w))
                else {
                    continue;
                };
                out[v_idx].push(edge_idx);
                in_[w_idx].push(edge_idx);
            }
            *cache = Some(AdjCache {
                generation: self.adj_gen,
                out,
                in_,
            });
        }
        match cache.as_ref() {
            Some(c) => f(c),
            None => unreachable!("adjacency cache is populated above"),
        }
    }

    pub fn set_graph(&mut self, label: G) -> &mut Self {
        self.graph_label = label;
        self
    }

    pub fn graph(&self) -> &G {
        &self.graph_label
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph_label
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> &mut Self {
        let id = id.into();
        if let Some(&idx) = self.node_index.get(&id) {
            self.nodes[idx].label = label;
            return self;
        }
        self.invalidate_adj();
        let idx = self.nodes.len();
        self.nodes.push(NodeEntry {
            id: id.clone(),
            label,
        });
        self.node_index.insert(id, idx);
        self
    }

    pub fn ensure_node(&mut self, id: impl Into<String>) -> &mut Self {
        let id = id.into();
        if self.node_index.contains_key(&id) {
            return self;
        }
        self.set_node(id, N::default())
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx].label)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        self.node_index
            .get(id)
            .copied()
            .map(move |idx| &mut self.nodes[idx].label)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    pub fn for_each_node_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&str, &mut N),
    {
        for n in &mut self.nodes {
            f(&n.id, &mut n.label);
        }
    }

    pub fn remove_node(&mut self, id: &str) -> bool {
        let Some(idx) = self.node_index.remove(id) else {
            return false;
        };

        self.invalidate_adj();
        self.nodes.remove(idx);
        for (i, n) in self.nodes.iter().enumerate().skip(idx) {
            if let Some(slot) = self.node_index.get_mut(n.id.as_str()) {
                *slot = i;
            }
        }

        let before = self.edges.len();
        self.edges.retain(|e| e.key.v != id && e.key.w != id);
        if self.edges.len() != before {
            self.reindex_edges();
        }
        true
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeKey> {
        self.edges.iter().map(|e| &e.key)
    }

    pub fn edge_keys(&self) -> Vec<EdgeKey> {
        self.edges.iter().map(|e| e.key.clone()).collect()
    }

    /// Adds `v -> w` with a default label, creating missing endpoints. An existing edge keeps
    /// its label.
    pub fn set_edge(&mut self, v: impl Into<String>, w: impl Into<String>) -> &mut Self {
        self.upsert_edge(v.into(), w.into(), None)
    }

    pub fn set_edge_with_label(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        label: E,
    ) -> &mut Self {
        self.upsert_edge(v.into(), w.into(), Some(label))
    }

    fn upsert_edge(&mut self, v: String, w: String, label: Option<E>) -> &mut Self {
        self.ensure_node(v.clone());
        self.ensure_node(w.clone());

        let key = EdgeKey { v, w };
        if let Some(&idx) = self.edge_index.get(&key) {
            if let Some(label) = label {
                self.edges[idx].label = label;
            }
            return self;
        }

        self.invalidate_adj();
        let idx = self.edges.len();
        self.edges.push(EdgeEntry {
            key: key.clone(),
            label: label.unwrap_or_default(),
        });
        self.edge_index.insert(key, idx);
        self
    }

    pub fn has_edge(&self, v: &str, w: &str) -> bool {
        self.edge_index.contains_key(&EdgeKey::new(v, w))
    }

    pub fn edge(&self, v: &str, w: &str) -> Option<&E> {
        self.edge_by_key(&EdgeKey::new(v, w))
    }

    pub fn edge_mut(&mut self, v: &str, w: &str) -> Option<&mut E> {
        self.edge_mut_by_key(&EdgeKey::new(v, w))
    }

    pub fn edge_by_key(&self, key: &EdgeKey) -> Option<&E> {
        let idx = *self.edge_index.get(key)?;
        Some(&self.edges[idx].label)
    }

    pub fn edge_mut_by_key(&mut self, key: &EdgeKey) -> Option<&mut E> {
        let idx = *self.edge_index.get(key)?;
        Some(&mut self.edges[idx].label)
    }

    /// Removes `v -> w` and returns its label.
    pub fn remove_edge(&mut self, v: &str, w: &str) -> Option<E> {
        let idx = self.edge_index.remove(&EdgeKey::new(v, w))?;
        self.invalidate_adj();
        let entry = self.edges.remove(idx);
        self.reindex_edges();
        Some(entry.label)
    }

    fn reindex_edges(&mut self) {
        self.invalidate_adj();
        self.edge_index.clear();
        for (i, e) in self.edges.iter().enumerate() {
            self.edge_index.insert(e.key.clone(), i);
        }
    }

    pub fn out_edges(&self, v: &str) -> Vec<EdgeKey> {
        let Some(&v_idx) = self.node_index.get(v) else {
            return Vec::new();
        };
        self.with_adj(|adj| {
            adj.out[v_idx]
                .iter()
                .map(|&i| self.edges[i].key.clone())
                .collect()
        })
    }

    pub fn in_edges(&self, v: &str) -> Vec<EdgeKey> {
        let Some(&v_idx) = self.node_index.get(v) else {
            return Vec::new();
        };
        self.with_adj(|adj| {
            adj.in_[v_idx]
                .iter()
                .map(|&i| self.edges[i].key.clone())
                .collect()
        })
    }

    pub fn successors(&self, v: &str) -> Vec<&str> {
        let Some(&v_idx) = self.node_index.get(v) else {
            return Vec::new();
        };
        self.with_adj(|adj| {
            adj.out[v_idx]
                .iter()
                .map(|&i| self.edges[i].key.w.as_str())
                .collect()
        })
    }

    pub fn predecessors(&self, v: &str) -> Vec<&str> {
        let Some(&v_idx) = self.node_index.get(v) else {
            return Vec::new();
        };
        self.with_adj(|adj| {
            adj.in_[v_idx]
                .iter()
                .map(|&i| self.edges[i].key.v.as_str())
                .collect()
        })
    }

    /// Nodes without incoming edges, in insertion order.
    pub fn sources(&self) -> Vec<&str> {
        self.with_adj(|adj| {
            self.nodes
                .iter()
                .enumerate()
                .filter(|(i, _)| adj.in_[*i].is_empty())
                .map(|(_, n)| n.id.as_str())
                .collect()
        })
    }

    /// Nodes without outgoing edges, in insertion order.
    pub fn sinks(&self) -> Vec<&str> {
        self.with_adj(|adj| {
            self.nodes
                .iter()
                .enumerate()
                .filter(|(i, _)| adj.out[*i].is_empty())
                .map(|(_, n)| n.id.as_str())
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_node_drops_incident_edges_and_keeps_order() {
        let mut g: Graph<(), (), ()> = Graph::new();
        g.set_edge("a", "b");
        g.set_edge("b", "c");
        g.set_edge("a", "c");

        assert!(g.remove_node("b"));
        assert_eq!(g.node_ids(), vec!["a".to_string(), "c".to_string()]);
        assert_eq!(g.edge_keys(), vec![EdgeKey::new("a", "c")]);
        assert_eq!(g.successors("a"), vec!["c"]);
        assert!(!g.remove_node("b"));
    }

    #[test]
    fn adjacency_tracks_mutations() {
        let mut g: Graph<(), (), ()> = Graph::new();
        g.set_edge("a", "b");
        assert_eq!(g.predecessors("b"), vec!["a"]);

        g.set_edge("c", "b");
        assert_eq!(g.predecessors("b"), vec!["a", "c"]);

        assert!(g.remove_edge("a", "b").is_some());
        assert_eq!(g.predecessors("b"), vec!["c"]);
        assert!(g.out_edges("a").is_empty());
    }
}

//! Graph: node arena, id registry and dataset lifecycle.

use crate::config::{truncate_id, GraphConfig};
use crate::dataset::{DatasetHeader, DatasetReader};
use crate::error::{GraphError, InsertError, Result};
use crate::keyed_store::KeyedStore;
use crate::node::{GraphNode, NodeKey};
use crate::record::Record;
use crate::traversal::{self, PathStats};
use slotmap::SlotMap;
use std::io::BufRead;
use std::path::Path;
use tracing::{info, warn};

// Upper bound on what an untrusted header may pre-reserve.
const MAX_RESERVE: usize = 1 << 20;

/// What a dataset load produced.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DatasetSummary {
    pub source: String,
    pub header: DatasetHeader,
    pub nodes: usize,
    /// Pairs read from the input, duplicates included.
    pub edges_read: usize,
    /// Distinct undirected edges installed.
    pub edges: usize,
}

/// Undirected graph. The arena is the only owner of nodes; the registry and
/// every adjacency store hold `NodeKey`s into it, so every id reachable
/// through adjacency is also registered.
#[derive(Debug)]
pub struct Graph {
    config: GraphConfig,
    nodes: SlotMap<NodeKey, GraphNode>,
    registry: KeyedStore<NodeKey>,
    order: Vec<NodeKey>, // creation order
    edges: usize,
    active_dataset: Option<String>, // None: no dataset loaded
}

impl Graph {
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            config,
            nodes: SlotMap::with_key(),
            registry: KeyedStore::with_config(config.store),
            order: Vec::new(),
            edges: 0,
            active_dataset: None,
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    fn bound<'a>(&self, id: &'a str) -> &'a str {
        truncate_id(id, self.config.max_id_len)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Distinct undirected edges, self-loops counted once.
    pub fn edge_count(&self) -> usize {
        self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Source label of the loaded dataset; `None` when nothing is loaded.
    pub fn active_dataset(&self) -> Option<&str> {
        self.active_dataset.as_deref()
    }

    pub fn key_of(&self, id: &str) -> Option<NodeKey> {
        self.registry.get(self.bound(id)).copied()
    }

    pub fn get(&self, key: NodeKey) -> Option<&GraphNode> {
        self.nodes.get(key)
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.key_of(id).and_then(|k| self.nodes.get(k))
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut GraphNode> {
        let k = self.key_of(id)?;
        self.nodes.get_mut(k)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.key_of(id).is_some()
    }

    /// Node ids in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.order
            .iter()
            .filter_map(|&k| self.nodes.get(k).map(GraphNode::id))
    }

    /// Register a new node whose record uses the id as its display name.
    pub fn add_node(&mut self, id: &str) -> std::result::Result<NodeKey, InsertError> {
        let id = self.bound(id);
        if self.registry.contains_key(id) {
            return Err(InsertError::DuplicateKey);
        }
        Ok(self.insert_node(id))
    }

    // `id` is bounded and not yet registered.
    fn insert_node(&mut self, id: &str) -> NodeKey {
        let record = Record::new(id, id, self.config.max_id_len);
        let key = self.nodes.insert(GraphNode::new(record, self.config.store));
        let registered = self.registry.put(id, key);
        debug_assert!(registered.is_ok(), "node id {id:?} registered twice");
        self.order.push(key);
        key
    }

    fn resolve_or_add(&mut self, id: &str) -> NodeKey {
        match self.key_of(id) {
            Some(k) => k,
            None => self.insert_node(id),
        }
    }

    /// Connect two nodes, creating either one if needed. Returns false when
    /// the edge already existed; the graph is unchanged in that case.
    pub fn add_edge(&mut self, source: &str, target: &str) -> bool {
        let (source, target) = (self.bound(source), self.bound(target));
        let a = self.resolve_or_add(source);
        let b = self.resolve_or_add(target);
        let added = self.nodes[a].link(target, b);
        if a != b {
            self.nodes[b].link(source, a);
        }
        if added {
            self.edges += 1;
        }
        added
    }

    /// Ids adjacent to `id`, in adjacency-store order.
    pub fn neighbors(&self, id: &str) -> Result<Vec<&str>> {
        let node = self
            .node(id)
            .ok_or_else(|| GraphError::InvalidId(id.to_owned()))?;
        Ok(node.neighbor_ids().collect())
    }

    pub fn degree(&self, id: &str) -> Result<usize> {
        self.node(id)
            .map(GraphNode::degree)
            .ok_or_else(|| GraphError::InvalidId(id.to_owned()))
    }

    /// Shortest connection from `source` to `target`, both ends included.
    pub fn find_path(&self, source: &str, target: &str) -> Result<Vec<&str>> {
        traversal::find_path(self, source, target)
    }

    pub fn find_path_with_stats(
        &self,
        source: &str,
        target: &str,
    ) -> Result<(Vec<&str>, PathStats)> {
        traversal::find_path_with_stats(self, source, target)
    }

    /// Replace the graph with the dataset at `path`. On any error the
    /// current graph is left exactly as it was.
    pub fn load_dataset(&mut self, path: impl AsRef<Path>) -> Result<DatasetSummary> {
        let path = path.as_ref();
        let reader = DatasetReader::open(path)?;
        self.ingest(path.display().to_string(), reader)
    }

    /// [`load_dataset`](Self::load_dataset) over an in-memory or custom reader.
    pub fn load_reader<R: BufRead>(&mut self, source: &str, reader: R) -> Result<DatasetSummary> {
        self.ingest(source.to_owned(), DatasetReader::new(source, reader))
    }

    fn ingest<R: BufRead>(
        &mut self,
        source: String,
        mut reader: DatasetReader<R>,
    ) -> Result<DatasetSummary> {
        let header = reader.read_header()?;
        let mut fresh = Graph::with_config(self.config);
        fresh.order.reserve(header.declared_nodes.min(MAX_RESERVE));

        let mut edges_read = 0;
        for edge in reader {
            let (a, b) = edge?;
            fresh.add_edge(&a, &b);
            edges_read += 1;
        }
        fresh.active_dataset = Some(source.clone());

        if edges_read != header.declared_edges || fresh.node_count() != header.declared_nodes {
            warn!(
                source = %source,
                declared_nodes = header.declared_nodes,
                declared_edges = header.declared_edges,
                nodes = fresh.node_count(),
                edges_read,
                "dataset header disagrees with contents"
            );
        }

        let summary = DatasetSummary {
            source,
            header,
            nodes: fresh.node_count(),
            edges_read,
            edges: fresh.edge_count(),
        };
        info!(
            source = %summary.source,
            nodes = summary.nodes,
            edges = summary.edges,
            "dataset loaded"
        );
        *self = fresh;
        Ok(summary)
    }

    /// Drop every node and return to the empty, no-dataset state. A no-op
    /// when already empty.
    pub fn clear(&mut self) {
        if self.active_dataset.is_none() && self.nodes.is_empty() {
            return;
        }
        let dropped = self.nodes.len();
        // Adjacency stores go with their nodes; they own nothing else.
        self.nodes.clear();
        self.registry.clear();
        self.order = Vec::new();
        self.edges = 0;
        if let Some(source) = self.active_dataset.take() {
            info!(source = %source, nodes = dropped, "dataset cleared");
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

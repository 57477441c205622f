//! GraphNode: one vertex with its payload and adjacency.

use crate::config::StoreConfig;
use crate::keyed_store::KeyedStore;
use crate::record::Record;

slotmap::new_key_type! {
    /// Generational handle of a node inside its graph's arena.
    pub struct NodeKey;
}

/// A vertex. Adjacency maps neighbor id to the neighbor's arena handle; the
/// handles do not own anything, the graph's arena does.
#[derive(Debug)]
pub struct GraphNode {
    record: Record,
    adjacency: KeyedStore<NodeKey>,
}

impl GraphNode {
    pub(crate) fn new(record: Record, store: StoreConfig) -> Self {
        Self {
            record,
            adjacency: KeyedStore::with_config(store),
        }
    }

    pub fn id(&self) -> &str {
        self.record.id()
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }

    /// One direction of an undirected edge. Returns false when `other_id` was
    /// already adjacent.
    pub(crate) fn link(&mut self, other_id: &str, other: NodeKey) -> bool {
        self.adjacency.put(other_id, other).is_ok()
    }

    pub fn adjacency(&self) -> &KeyedStore<NodeKey> {
        &self.adjacency
    }

    pub fn neighbor_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.adjacency.keys()
    }

    pub fn degree(&self) -> usize {
        self.adjacency.count()
    }

    pub fn is_adjacent(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }
}

//! social-graph: an in-memory, single-threaded graph of people with
//! neighbor listing and shortest connection paths.
//!
//! Internal Design:
//!
//! Summary
//! - Layers, leaves first:
//!   - KeyedStore<V, S>: string-keyed chained hash table. Bucket arrays are
//!     sized `2^n - 1`, chains hang off bucket heads, entries live in a
//!     slot map. It is the only lookup structure in the crate: node
//!     registry, adjacency and BFS visited sets all use it.
//!   - GraphNode: one vertex with its `Record` payload and an adjacency
//!     KeyedStore from neighbor id to `NodeKey`.
//!   - Graph: owns every node in a slot-map arena, maps ids to `NodeKey`s,
//!     installs edges symmetrically and runs dataset loads and clears.
//!   - traversal: breadth-first path search over a Graph, with
//!     per-query visited and predecessor state.
//!
//! Constraints
//! - Single-threaded; no interior mutability, no locking.
//! - Duplicate keys are rejected, never overwritten. Edge idempotence
//!   relies on this: re-adding an edge fails both adjacency inserts.
//! - Adjacency holds `NodeKey`s, not references. Nodes are only removed
//!   by `Graph::clear` or a reload, which drop the arena wholesale, so a
//!   key in any adjacency store always resolves.
//!
//! Hashing and resizing
//! - Keys are hashed with Murmur3 (x86, 32-bit, seed 0) over their raw
//!   bytes; the bucket is `hash % limit`.
//! - After a successful insert the store grows to `limit * 2 + 1` when
//!   the average chain length exceeds 1.1 and at least half the buckets
//!   are occupied. Growth stops below `2^30` buckets; past that chains
//!   simply get longer.
//! - Each entry keeps its hash, so growing relinks entries one by one
//!   without rehashing keys. Chain order is not preserved.
//!
//! Datasets
//! - A header `nodes edges` then whitespace-separated `source target`
//!   pairs. Loads build a fresh graph and replace the current one only on
//!   success.
//!
//! Notes and non-goals
//! - No persistence, no directed edges, no removal of single nodes.

pub mod config;
pub mod dataset;
pub mod error;
pub mod graph;
pub mod keyed_store;
mod keyed_store_proptest;
pub mod murmur;
pub mod node;
pub mod record;
pub mod traversal;

// Public surface
pub use config::{GraphConfig, StoreConfig};
pub use dataset::{DatasetHeader, DatasetReader};
pub use error::{GraphError, InsertError};
pub use graph::{DatasetSummary, Graph};
pub use keyed_store::KeyedStore;
pub use murmur::{murmur3_32, BuildMurmur3, Murmur3Hasher};
pub use node::{GraphNode, NodeKey};
pub use record::Record;
pub use traversal::{find_path, PathStats};

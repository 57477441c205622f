//! Breadth-first connection search.
//!
//! The frontier is a FIFO of node handles. Visits are recorded in a
//! `KeyedStore` keyed by node id: a neighbor is marked when it is first
//! enqueued, and the node being expanded is marked once its neighbors have
//! been scanned. Predecessors live in a map owned by the call, so queries
//! never write to the graph. The path is rebuilt by walking predecessors
//! back from the target onto a stack and popping it.

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::keyed_store::KeyedStore;
use crate::node::NodeKey;
use slotmap::SecondaryMap;
use std::collections::VecDeque;
use tracing::debug;

/// Work done by one path query.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PathStats {
    /// Nodes dequeued and scanned for neighbors.
    pub expanded: usize,
    /// Nodes pushed onto the frontier, the source included.
    pub enqueued: usize,
}

/// Shortest path by edge count from `source` to `target`, both included.
///
/// Unknown ids fail with `InvalidId` before any search; an exhausted search
/// fails with `NoPath`. When several shortest paths exist, the one found
/// depends on adjacency-store order.
pub fn find_path<'g>(graph: &'g Graph, source: &str, target: &str) -> Result<Vec<&'g str>> {
    find_path_with_stats(graph, source, target).map(|(path, _)| path)
}

pub fn find_path_with_stats<'g>(
    graph: &'g Graph,
    source: &str,
    target: &str,
) -> Result<(Vec<&'g str>, PathStats)> {
    let src = graph
        .key_of(source)
        .ok_or_else(|| GraphError::InvalidId(source.to_owned()))?;
    let dst = graph
        .key_of(target)
        .ok_or_else(|| GraphError::InvalidId(target.to_owned()))?;

    let mut visited: KeyedStore<()> = KeyedStore::with_config(graph.config().store);
    let mut prev: SecondaryMap<NodeKey, NodeKey> = SecondaryMap::new();
    let mut queue = VecDeque::from([src]);
    let mut stats = PathStats {
        expanded: 0,
        enqueued: 1,
    };

    let mut reached = false;
    while let Some(head) = queue.pop_front() {
        if head == dst {
            reached = true;
            break;
        }
        let Some(node) = graph.get(head) else {
            continue;
        };
        stats.expanded += 1;
        for (id, &next) in node.adjacency() {
            // A failed put means `next` was already seen.
            if visited.put(id, ()).is_err() {
                continue;
            }
            prev.insert(next, head);
            queue.push_back(next);
            stats.enqueued += 1;
        }
        let _ = visited.put(node.id(), ());
    }

    debug!(
        from = source,
        to = target,
        reached,
        expanded = stats.expanded,
        enqueued = stats.enqueued,
        "path query finished"
    );

    let no_path = || GraphError::NoPath {
        from: source.to_owned(),
        to: target.to_owned(),
    };
    if !reached {
        return Err(no_path());
    }

    let mut stack = Vec::new();
    let mut cursor = dst;
    while cursor != src {
        stack.push(cursor);
        cursor = *prev.get(cursor).ok_or_else(no_path)?;
    }
    stack.push(src);

    let mut path = Vec::with_capacity(stack.len());
    while let Some(k) = stack.pop() {
        if let Some(node) = graph.get(k) {
            path.push(node.id());
        }
    }
    Ok((path, stats))
}

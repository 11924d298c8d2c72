//! Structured export of a reconstructed graph.
//!
//! Plain data with `Facet` derives so external tooling can consume a graph
//! without speaking DOT. Vertex ids are assigned lazily on first encounter
//! during a worklist traversal from the head, guarded by a visited set, so
//! converging (or even defensively cyclic) structures are walked safely and
//! a snapshot's ids match what [`crate::async_graph_to_dot`] would emit.

use std::collections::{BTreeMap, BTreeSet};

use facet::Facet;

use crate::graph::{AsyncGraph, NodeBody, NodeIdx};

/// Point-in-time structural dump of an [`AsyncGraph`].
#[derive(Debug, Clone, Facet)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
}

/// One vertex: stable id (within this snapshot), kind, raw label.
#[derive(Debug, Clone, Facet)]
pub struct NodeSnapshot {
    pub id: u64,
    pub kind: NodeKind,
    pub label: String,
}

/// Which node variant a vertex wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Facet)]
#[repr(u8)]
pub enum NodeKind {
    Frame,
    Awaitable,
    Error,
}

/// One directed edge, earlier → later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Facet)]
pub struct EdgeSnapshot {
    pub from: u64,
    pub to: u64,
}

impl AsyncGraph {
    /// Walk the graph from its head and dump every reachable node exactly
    /// once, every edge exactly once. No order guarantee beyond that.
    pub fn snapshot(&self) -> GraphSnapshot {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        let mut seen: BTreeSet<NodeIdx> = BTreeSet::new();
        let mut ids: BTreeMap<NodeIdx, u64> = BTreeMap::new();
        let mut next_id: u64 = 0;

        let mut queue = vec![self.head()];
        while let Some(idx) = queue.pop() {
            if !seen.insert(idx) {
                continue;
            }
            let node = self.node(idx);
            let id = vertex_id(&mut ids, &mut next_id, idx);
            nodes.push(NodeSnapshot {
                id,
                kind: match node.body() {
                    NodeBody::Frame(_) => NodeKind::Frame,
                    NodeBody::Awaitable(_) => NodeKind::Awaitable,
                    NodeBody::Error(_) => NodeKind::Error,
                },
                label: node.label(),
            });
            for child in node.awaited_by() {
                queue.push(child);
                let child_id = vertex_id(&mut ids, &mut next_id, child);
                edges.push(EdgeSnapshot {
                    from: id,
                    to: child_id,
                });
            }
        }

        GraphSnapshot { nodes, edges }
    }
}

fn vertex_id(ids: &mut BTreeMap<NodeIdx, u64>, next_id: &mut u64, idx: NodeIdx) -> u64 {
    *ids.entry(idx).or_insert_with(|| {
        *next_id += 1;
        *next_id
    })
}

impl GraphSnapshot {
    /// Edges pointing at the vertex with the given label. Test/diagnostic
    /// convenience; labels are not unique in general.
    pub fn inbound_to_label(&self, label: &str) -> Vec<EdgeSnapshot> {
        let targets: BTreeSet<u64> = self
            .nodes
            .iter()
            .filter(|node| node.label == label)
            .map(|node| node.id)
            .collect();
        self.edges
            .iter()
            .filter(|edge| targets.contains(&edge.to))
            .copied()
            .collect()
    }
}

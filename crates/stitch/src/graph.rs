//! Arena-backed causal graph and the reconstruction algorithm.
//!
//! [`get_async_graph`] stitches two notions of "caller" into one directed
//! graph: stack-frame linkage within a synchronous chain, and awaits/
//! is-awaited-by linkage between suspended computations. Nodes live in an
//! arena and are identified by index, so edge sets are plain index sets
//! and no ownership cycles can form.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, trace};

use crate::awaitable::{AwaitableHandle, AwaitableId, RuntimeHook};
use crate::frame::Frame;

// ── Node model ──────────────────────────────────────────────────

/// Index of a node in its [`AsyncGraph`] arena. Node identity: two nodes
/// with identical labels are distinct vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIdx(u32);

impl NodeIdx {
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// What a graph vertex wraps.
pub enum NodeBody {
    /// One synchronous call-stack entry.
    Frame(Frame),
    /// A participating awaitable; the label delegates to its `Display`.
    Awaitable(AwaitableHandle),
    /// Synthetic vertex inserted where linkage could not be established.
    /// Carries a human-readable diagnostic; owns its (empty) edge set like
    /// any other node.
    Error(String),
}

/// A vertex: body plus forward edges, earlier → later in causal time.
pub struct GraphNode {
    body: NodeBody,
    awaited_by: BTreeSet<NodeIdx>,
}

impl GraphNode {
    pub fn body(&self) -> &NodeBody {
        &self.body
    }

    pub fn label(&self) -> String {
        match &self.body {
            NodeBody::Frame(frame) => frame.to_string(),
            NodeBody::Awaitable(awaitable) => awaitable.to_string(),
            NodeBody::Error(text) => text.clone(),
        }
    }

    pub fn awaited_by(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        self.awaited_by.iter().copied()
    }
}

/// The reconstructed causal graph: an arena of nodes plus the head (the
/// node for the original calling point, from which rendering starts).
pub struct AsyncGraph {
    nodes: Vec<GraphNode>,
    head: NodeIdx,
}

impl AsyncGraph {
    fn new() -> AsyncGraph {
        AsyncGraph {
            nodes: Vec::new(),
            head: NodeIdx(0),
        }
    }

    pub fn head(&self) -> NodeIdx {
        self.head
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, idx: NodeIdx) -> &GraphNode {
        &self.nodes[idx.as_usize()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeIdx, &GraphNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeIdx(i as u32), node))
    }

    pub fn add_frame_node(&mut self, frame: Frame) -> NodeIdx {
        self.alloc(NodeBody::Frame(frame))
    }

    pub fn add_awaitable_node(&mut self, awaitable: AwaitableHandle) -> NodeIdx {
        self.alloc(NodeBody::Awaitable(awaitable))
    }

    pub fn add_error_node(&mut self, text: impl Into<String>) -> NodeIdx {
        self.alloc(NodeBody::Error(text.into()))
    }

    pub fn add_edge(&mut self, from: NodeIdx, to: NodeIdx) {
        self.nodes[from.as_usize()].awaited_by.insert(to);
    }

    fn alloc(&mut self, body: NodeBody) -> NodeIdx {
        let idx = NodeIdx(self.nodes.len() as u32);
        self.nodes.push(GraphNode {
            body,
            awaited_by: BTreeSet::new(),
        });
        idx
    }

    /// Forward-edge set of an awaitable node, read live from the awaitable.
    fn awaiters_of(&self, idx: NodeIdx) -> Vec<AwaitableHandle> {
        match &self.nodes[idx.as_usize()].body {
            NodeBody::Awaitable(awaitable) => awaitable.awaiters(),
            NodeBody::Frame(_) | NodeBody::Error(_) => Vec::new(),
        }
    }
}

// ── Graph construction ──────────────────────────────────────────

/// Reconstruct the logical causal graph from `calling_frame` back to the
/// program entry point.
///
/// With no current schedulable unit the result is a plain linear stack
/// walk. Otherwise the current unit's awaiter dependency graph is expanded
/// (each distinct awaitable exactly once) and the caller's frame chain is
/// grafted onto both ends. Linkage failures become [`NodeBody::Error`]
/// vertices; the graph stays valid and renderable.
///
/// Runs synchronously to completion: it reads live scheduler-owned awaiter
/// sets and must not yield control while traversing them.
pub fn get_async_graph(hook: &dyn RuntimeHook, calling_frame: &Frame) -> AsyncGraph {
    let mut graph = AsyncGraph::new();

    let Some(unit) = hook.current_unit() else {
        build_fallback_graph(&mut graph, calling_frame);
        return graph;
    };

    // Traverse the graph of dependent awaitables. Units unroll to a chain
    // of frame nodes for their local call stacks.
    let unit_handle: AwaitableHandle = unit.clone();
    let (task_node, task_head) = unit_handle.clone().make_graph_nodes(&mut graph);

    let mut node_q = vec![task_node];
    let mut terminal_async_nodes: BTreeSet<NodeIdx> = BTreeSet::new();
    let mut awaitable_to_head_node: HashMap<AwaitableId, NodeIdx> = HashMap::new();
    awaitable_to_head_node.insert(AwaitableId::of(&unit_handle), task_head);

    // No visitation-order guarantee; only "each awaitable expanded once".
    while let Some(node) = node_q.pop() {
        let awaiters = graph.awaiters_of(node);
        trace!(
            node = node.as_usize(),
            awaiters = awaiters.len(),
            "expanding awaiter set"
        );
        if awaiters.is_empty() {
            terminal_async_nodes.insert(node);
        }
        for child in awaiters {
            let child_id = AwaitableId::of(&child);
            if let Some(&child_head) = awaitable_to_head_node.get(&child_id) {
                // Converge on the already-expanded sub-graph.
                graph.add_edge(node, child_head);
            } else {
                let (child_node, child_head) = child.make_graph_nodes(&mut graph);
                awaitable_to_head_node.insert(child_id, child_head);
                node_q.push(child_node);
                graph.add_edge(node, child_head);
            }
        }
    }

    assert!(
        !terminal_async_nodes.is_empty(),
        "awaiter traversal found no terminal nodes; \
         the runtime's awaiter registration graph is broken"
    );

    // Top graft: zero or more caller frames down to the first frame covered
    // by the current unit's own stack.
    let mut head = task_head;
    let mut frame_cursor = Some(calling_frame.clone());

    let exit_frame = match graph.node(task_head).body() {
        NodeBody::Frame(frame) => Some(frame.clone()),
        _ => None,
    };
    if let Some(exit_frame) = exit_frame {
        let mut chain_head: Option<NodeIdx> = None;
        let mut tail: Option<NodeIdx> = None;
        while let Some(frame) = frame_cursor.clone() {
            if frame.same(&exit_frame) {
                break;
            }
            let node = graph.add_frame_node(frame.clone());
            chain_head.get_or_insert(node);
            if let Some(prev) = tail {
                graph.add_edge(prev, node);
            }
            tail = Some(node);
            frame_cursor = frame.back().cloned();
            if frame_cursor.is_none() {
                let err = graph.add_error_node("Could not find exit frame for current task");
                graph.add_edge(node, err);
                tail = Some(err);
                break;
            }
        }
        if let Some(tail) = tail {
            graph.add_edge(tail, task_head);
        }
        if let Some(chain_head) = chain_head {
            head = chain_head;
        }
    }

    // Bottom graft: everything past the unit's entry frame leads to the
    // program entry point and is shared by all terminal branches.
    let mut found_entry = false;
    if let Some(entry_frame) = unit.entry_frame() {
        while let Some(frame) = frame_cursor.clone() {
            frame_cursor = frame.back().cloned();
            if frame.same(&entry_frame) {
                found_entry = true;
                break;
            }
        }
    }

    if found_entry {
        let mut tail: Option<NodeIdx> = None;
        while let Some(frame) = frame_cursor.clone() {
            let node = graph.add_frame_node(frame.clone());
            match tail {
                None => {
                    for &terminal in &terminal_async_nodes {
                        graph.add_edge(terminal, node);
                    }
                }
                Some(prev) => graph.add_edge(prev, node),
            }
            tail = Some(node);
            frame_cursor = frame.back().cloned();
        }
    } else {
        let err = graph.add_error_node("Could not link current task to entry point.");
        for &terminal in &terminal_async_nodes {
            graph.add_edge(terminal, err);
        }
    }

    graph.head = head;
    debug!(
        nodes = graph.len(),
        terminals = terminal_async_nodes.len(),
        "reconstructed async causal graph"
    );
    graph
}

fn build_fallback_graph(graph: &mut AsyncGraph, calling_frame: &Frame) {
    let head = graph.add_frame_node(calling_frame.clone());
    let mut tail = head;
    let mut frame_cursor = calling_frame.back().cloned();
    while let Some(frame) = frame_cursor {
        let node = graph.add_frame_node(frame.clone());
        graph.add_edge(tail, node);
        tail = node;
        frame_cursor = frame.back().cloned();
    }
    graph.head = head;
    debug!(nodes = graph.len(), "built plain stack-walk graph");
}

// ── Tests ───────────────────────────────────────────────────────

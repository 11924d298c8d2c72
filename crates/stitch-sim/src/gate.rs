//! Simulated synchronization primitives.

use std::fmt;
use std::sync::Arc;

use stitch::{AsyncGraph, Awaitable, AwaitableHandle, AwaiterSet, NodeIdx};

/// A gate: a synchronization point several awaitables can park on, like a
/// task group's join barrier or a notify handle.
pub struct SimGate {
    name: String,
    awaiters: AwaiterSet,
}

impl SimGate {
    pub fn new(name: impl Into<String>) -> Arc<SimGate> {
        Arc::new(SimGate {
            name: name.into(),
            awaiters: AwaiterSet::new(),
        })
    }

    pub fn handle(self: &Arc<Self>) -> AwaitableHandle {
        Arc::clone(self) as AwaitableHandle
    }
}

impl fmt::Display for SimGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gate:{}", self.name)
    }
}

impl Awaitable for SimGate {
    fn awaiters(&self) -> Vec<AwaitableHandle> {
        self.awaiters.snapshot()
    }

    fn add_awaiter(&self, awaiter: &AwaitableHandle) {
        self.awaiters.add(awaiter);
    }

    fn make_graph_nodes(self: Arc<Self>, graph: &mut AsyncGraph) -> (NodeIdx, NodeIdx) {
        let node = graph.add_awaitable_node(self);
        (node, node)
    }
}

//! Simulated deferred results.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::trace;

use stitch::{AsyncGraph, Awaitable, AwaitableHandle, AwaiterSet, NodeIdx};

/// A value-holder that becomes available asynchronously.
///
/// The awaiter set grows while pending and freezes at completion:
/// registrations after [`SimFuture::complete`] are dropped, mirroring how
/// a scheduler stops registering waits on resolved results.
pub struct SimFuture {
    name: String,
    awaiters: AwaiterSet,
    completed: AtomicBool,
}

impl SimFuture {
    pub fn new(name: impl Into<String>) -> Arc<SimFuture> {
        Arc::new(SimFuture {
            name: name.into(),
            awaiters: AwaiterSet::new(),
            completed: AtomicBool::new(false),
        })
    }

    pub fn complete(&self) {
        self.completed.store(true, Ordering::Release);
    }

    pub fn is_completed(&self) -> bool {
        self.completed.load(Ordering::Acquire)
    }

    pub fn handle(self: &Arc<Self>) -> AwaitableHandle {
        Arc::clone(self) as AwaitableHandle
    }
}

impl fmt::Display for SimFuture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "future:{}", self.name)
    }
}

impl Awaitable for SimFuture {
    fn awaiters(&self) -> Vec<AwaitableHandle> {
        self.awaiters.snapshot()
    }

    fn add_awaiter(&self, awaiter: &AwaitableHandle) {
        if self.is_completed() {
            trace!(future = %self.name, "awaiter registered after completion, dropped");
            return;
        }
        self.awaiters.add(awaiter);
    }

    fn make_graph_nodes(self: Arc<Self>, graph: &mut AsyncGraph) -> (NodeIdx, NodeIdx) {
        let node = graph.add_awaitable_node(self);
        (node, node)
    }
}

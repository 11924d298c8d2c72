//! Simulated schedulable units.

use std::fmt;
use std::sync::{Arc, Mutex};

use stitch::{
    AsyncGraph, Awaitable, AwaitableHandle, AwaiterSet, Frame, NodeIdx, SchedulableUnit,
};

/// A schedulable unit with a saved local call stack.
///
/// `frames` runs outermost → innermost, the frames of the unit's suspended
/// computation. For the currently running unit these are live frames (the
/// same handles appear on the caller's chain); for suspended units they
/// are detached saved chains.
pub struct SimTask {
    name: String,
    frames: Mutex<Vec<Frame>>,
    awaiters: AwaiterSet,
}

impl SimTask {
    pub fn new(name: impl Into<String>) -> Arc<SimTask> {
        Arc::new(SimTask {
            name: name.into(),
            frames: Mutex::new(Vec::new()),
            awaiters: AwaiterSet::new(),
        })
    }

    /// Replace the unit's saved stack, outermost first.
    pub fn set_frames(&self, frames: Vec<Frame>) {
        *self.frames.lock().unwrap() = frames;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type-erased handle, for awaiter registration.
    pub fn handle(self: &Arc<Self>) -> AwaitableHandle {
        Arc::clone(self) as AwaitableHandle
    }
}

impl fmt::Display for SimTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task:{}", self.name)
    }
}

impl Awaitable for SimTask {
    fn awaiters(&self) -> Vec<AwaitableHandle> {
        self.awaiters.snapshot()
    }

    fn add_awaiter(&self, awaiter: &AwaitableHandle) {
        self.awaiters.add(awaiter);
    }

    /// Chain of frame nodes for the saved stack (head = innermost frame),
    /// terminating in the unit's own node (tail).
    fn make_graph_nodes(self: Arc<Self>, graph: &mut AsyncGraph) -> (NodeIdx, NodeIdx) {
        let frames = self.frames.lock().unwrap().clone();
        let task_node = graph.add_awaitable_node(self);
        let mut head = task_node;
        let mut tail: Option<NodeIdx> = None;
        for (i, frame) in frames.iter().rev().enumerate() {
            let node = graph.add_frame_node(frame.clone());
            if i == 0 {
                head = node;
            }
            if let Some(prev) = tail {
                graph.add_edge(prev, node);
            }
            tail = Some(node);
        }
        if let Some(last) = tail {
            graph.add_edge(last, task_node);
        }
        (task_node, head)
    }
}

impl SchedulableUnit for SimTask {
    fn entry_frame(&self) -> Option<Frame> {
        self.frames.lock().unwrap().first().cloned()
    }
}

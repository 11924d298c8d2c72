//! The awaitable capability: the contract a dependency object (schedulable
//! unit, deferred result, gate) must satisfy to participate in graph
//! construction.
//!
//! The awaiter-tracking logic is a composable helper ([`AwaiterSet`]) rather
//! than a base type: each concrete kind implements [`Awaitable`] and
//! delegates to an owned set.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::frame::Frame;
use crate::graph::{AsyncGraph, NodeIdx};

/// Shared handle to a participating awaitable.
pub type AwaitableHandle = Arc<dyn Awaitable>;

/// Identity key for an awaitable, derived from its allocation.
///
/// Keys the construction-time memoization map and [`AwaiterSet`]; two
/// handles to the same allocation compare equal, handles to different
/// allocations never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AwaitableId(usize);

impl AwaitableId {
    pub fn of(handle: &AwaitableHandle) -> AwaitableId {
        AwaitableId(Arc::as_ptr(handle) as *const () as usize)
    }
}

/// A dependency object others can suspend on.
///
/// The graph builder only ever *reads* awaiter sets; registration
/// (`add_awaiter`) is the runtime's job, performed as a side effect of
/// suspension. `Display` provides the node label.
pub trait Awaitable: fmt::Display + Send + Sync {
    /// Point-in-time copy of the set of awaitables currently suspended
    /// waiting on this one.
    ///
    /// A copy rather than a live reference: registration can happen from
    /// other OS threads, and the builder's visit-each-awaitable-once
    /// guarantee needs a consistent snapshot.
    fn awaiters(&self) -> Vec<AwaitableHandle>;

    /// Register a dependent awaiter. Idempotent per identity. Invoked by
    /// the runtime, never by the graph builder.
    fn add_awaiter(&self, awaiter: &AwaitableHandle);

    /// Expand this awaitable into a sub-graph, returning `(tail, head)`.
    ///
    /// `tail` represents "this awaitable reached this point" and is the
    /// node whose awaiters the builder chases next; `head` is the node to
    /// wire to whatever comes causally before this awaitable. A schedulable
    /// unit typically yields a chain of frame nodes for its saved local
    /// stack (head = innermost frame) terminating in its own node (tail);
    /// a deferred result yields a single node (tail == head).
    fn make_graph_nodes(self: Arc<Self>, graph: &mut AsyncGraph) -> (NodeIdx, NodeIdx);
}

/// A schedulable unit: an awaitable the scheduler can resume, owning a
/// suspended computation.
pub trait SchedulableUnit: Awaitable {
    /// The unit's entry-point frame (the outermost saved frame of its
    /// suspended computation); the bottom graft searches the live chain
    /// for it. `None` degrades to an entry-point linkage error node, not
    /// a crash.
    fn entry_frame(&self) -> Option<Frame>;
}

/// The runtime's "who is running right now" query, threaded explicitly into
/// graph construction so fallback-vs-cooperative is testable with a stub.
pub trait RuntimeHook {
    fn current_unit(&self) -> Option<Arc<dyn SchedulableUnit>>;
}

// ── Awaiter-set helper ──────────────────────────────────────────

/// Mutex-guarded awaiter set, deduplicated by identity.
///
/// Concrete awaitable kinds own one of these and forward the trait's
/// `awaiters`/`add_awaiter` to it. The set only grows during an
/// awaitable's pending lifetime; nothing here ever removes entries.
#[derive(Default)]
pub struct AwaiterSet {
    inner: Mutex<BTreeMap<AwaitableId, AwaitableHandle>>,
}

impl AwaiterSet {
    pub fn new() -> AwaiterSet {
        AwaiterSet::default()
    }

    pub fn add(&self, awaiter: &AwaitableHandle) {
        self.inner
            .lock()
            .unwrap()
            .insert(AwaitableId::of(awaiter), Arc::clone(awaiter));
    }

    pub fn snapshot(&self) -> Vec<AwaitableHandle> {
        self.inner.lock().unwrap().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }
}

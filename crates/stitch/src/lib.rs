//! stitch - logical causal graphs for cooperatively scheduled programs.
//!
//! Reconstructs, on demand, the causal graph leading from a diagnostic
//! call back to the program entry point, stitching together conventional
//! stack-frame linkage with awaits/is-awaited-by linkage between suspended
//! computations. The result is a point-in-time snapshot graph for
//! debugging deadlocks, unexpected fan-out, or unexpected serialization in
//! concurrent pipelines.
//!
//! - [`get_async_graph`] builds the graph, given a [`RuntimeHook`] (the
//!   scheduler's "who is running" query) and the calling [`Frame`]. With
//!   no active unit it degrades to a plain stack walk.
//! - [`async_graph_to_dot`] renders the graph for GraphViz.
//! - [`AsyncGraph::snapshot`] exports the structure as plain data.
//!
//! The scheduler itself is an external collaborator: it registers awaiters
//! on [`Awaitable`]s as a side effect of suspension and answers the hook;
//! this crate only reads.

mod awaitable;
mod dot;
mod frame;
mod graph;
mod snapshot;

pub use awaitable::{
    Awaitable, AwaitableHandle, AwaitableId, AwaiterSet, RuntimeHook, SchedulableUnit,
};
pub use dot::async_graph_to_dot;
pub use frame::Frame;
pub use graph::{AsyncGraph, GraphNode, NodeBody, NodeIdx, get_async_graph};
pub use snapshot::{EdgeSnapshot, GraphSnapshot, NodeKind, NodeSnapshot};

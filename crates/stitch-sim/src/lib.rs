//! Simulated cooperative runtime for stitch.
//!
//! The real scheduler is an external collaborator; this crate is the
//! injectable stand-in: schedulable units with saved frame lists, deferred
//! results, gates, and a current-unit hook. Scenario drivers and
//! integration tests assemble a world with these, then call
//! `stitch::get_async_graph` at the diagnostic point.
//!
//! Awaiter registration here plays the scheduler's role: call
//! [`suspend`] wherever the simulated program would suspend one awaitable
//! on another.

mod future;
mod gate;
mod runtime;
mod task;

pub use future::SimFuture;
pub use gate::SimGate;
pub use runtime::{SimRuntime, suspend};
pub use task::SimTask;

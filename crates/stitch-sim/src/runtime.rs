//! The simulated scheduler surface: which task is "running" right now, and
//! how awaitables get parked on one another.

use std::sync::{Arc, Mutex};

use stitch::{AwaitableHandle, RuntimeHook, SchedulableUnit};
use tracing::trace;

use crate::task::SimTask;

/// Tracks the currently-entered task, the way a real scheduler would around
/// each poll. Scenarios call [`SimRuntime::enter`] before taking a graph
/// capture and [`SimRuntime::leave`] after.
pub struct SimRuntime {
    current: Mutex<Option<Arc<SimTask>>>,
}

impl SimRuntime {
    pub fn new() -> SimRuntime {
        SimRuntime {
            current: Mutex::new(None),
        }
    }

    /// Marks `task` as the running task.
    pub fn enter(&self, task: &Arc<SimTask>) {
        trace!(task = %task.name(), "entering task");
        *self.current.lock().unwrap() = Some(Arc::clone(task));
    }

    /// Clears the running task, as if control returned to the scheduler.
    pub fn leave(&self) {
        trace!("leaving current task");
        *self.current.lock().unwrap() = None;
    }
}

impl Default for SimRuntime {
    fn default() -> Self {
        SimRuntime::new()
    }
}

impl RuntimeHook for SimRuntime {
    fn current_unit(&self) -> Option<Arc<dyn SchedulableUnit>> {
        self.current
            .lock()
            .unwrap()
            .as_ref()
            .map(|task| Arc::clone(task) as Arc<dyn SchedulableUnit>)
    }
}

/// Records that `waiter` is suspended on `on`: once `on` resolves, `waiter`
/// is the thing that resumes. This is the edge the graph capture follows.
pub fn suspend(waiter: &AwaitableHandle, on: &AwaitableHandle) {
    trace!(waiter = %waiter, on = %on, "registering awaiter");
    on.add_awaiter(waiter);
}

//! No cooperative scheduler at all: the capture degrades to a plain walk
//! of the synchronous call stack.

use stitch::{Frame, async_graph_to_dot, get_async_graph};
use stitch_sim::SimRuntime;

pub fn run() {
    let runtime = SimRuntime::new();

    let calling = Frame::root("main")
        .push("do_work")
        .push("inner_helper")
        .push("print_graph");

    let graph = get_async_graph(&runtime, &calling);
    print!("{}", async_graph_to_dot(&graph));
}

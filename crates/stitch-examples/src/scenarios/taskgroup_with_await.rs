//! Like `taskgroup`, but the parent is itself suspended deeper in its own
//! coroutine stack while the group's join gate waits on the child.

use stitch::{Frame, async_graph_to_dot, get_async_graph};
use stitch_sim::{SimGate, SimRuntime, SimTask, suspend};

pub fn run() {
    let main = Frame::root("main");
    let run_loop = main.push("run_loop");
    let coro = run_loop.push("coro_print_graph");
    let calling = coro.push("print_graph");

    let child = SimTask::new("child");
    child.set_frames(vec![coro.clone()]);

    // Parent blocked inside other_coro, three frames deep.
    let run_coro = Frame::root("run");
    let use_tg = run_coro.push("use_task_group");
    let other = use_tg.push("other_coro");
    let parent = SimTask::new("run");
    parent.set_frames(vec![run_coro, use_tg, other]);

    let join = SimGate::new("tg_join");
    suspend(&join.handle(), &child.handle());
    suspend(&parent.handle(), &join.handle());

    let runtime = SimRuntime::new();
    runtime.enter(&child);

    let graph = get_async_graph(&runtime, &calling);
    print!("{}", async_graph_to_dot(&graph));

    runtime.leave();
}

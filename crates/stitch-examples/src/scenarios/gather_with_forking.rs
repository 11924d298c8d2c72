//! Two sibling tasks both wait on the current task, and a single gathering
//! future waits on both of them, so the branches fork on the way out and
//! converge again on the shared future.

use stitch::{Frame, async_graph_to_dot, get_async_graph};
use stitch_sim::{SimFuture, SimRuntime, SimTask, suspend};

pub fn run() {
    let main = Frame::root("main");
    let run_loop = main.push("run_loop");
    let coro = run_loop.push("coro_print_graph");
    let calling = coro.push("print_graph");

    let tc = SimTask::new("tc");
    tc.set_frames(vec![coro.clone()]);

    let t1 = SimTask::new("t1_tc");
    let t2 = SimTask::new("t2_tc");
    let gather = SimFuture::new("gather");
    let run = SimTask::new("run");

    suspend(&t1.handle(), &tc.handle());
    suspend(&t2.handle(), &tc.handle());
    suspend(&gather.handle(), &t1.handle());
    suspend(&gather.handle(), &t2.handle());
    suspend(&run.handle(), &gather.handle());

    let runtime = SimRuntime::new();
    runtime.enter(&tc);

    let graph = get_async_graph(&runtime, &calling);
    print!("{}", async_graph_to_dot(&graph));

    runtime.leave();
}

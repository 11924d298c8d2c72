//! End-to-end captures over simulated runtime states.

use std::collections::BTreeMap;

use stitch::{AwaitableHandle, Frame, GraphSnapshot, NodeKind, async_graph_to_dot, get_async_graph};
use stitch_sim::{SimFuture, SimGate, SimRuntime, SimTask, suspend};

/// Follow the unique outgoing edge from the snapshot's first node (the
/// graph head) and collect labels; panics on fan-out.
fn linear_labels(snapshot: &GraphSnapshot) -> Vec<String> {
    let by_id: BTreeMap<u64, &str> = snapshot
        .nodes
        .iter()
        .map(|node| (node.id, node.label.as_str()))
        .collect();
    let mut out = Vec::new();
    let mut cursor = snapshot.nodes[0].id;
    loop {
        out.push(by_id[&cursor].to_string());
        let next: Vec<u64> = snapshot
            .edges
            .iter()
            .filter(|edge| edge.from == cursor)
            .map(|edge| edge.to)
            .collect();
        match next.as_slice() {
            [] => break,
            [single] => cursor = *single,
            more => panic!("expected a linear chain, found fan-out of {}", more.len()),
        }
    }
    out
}

#[test]
fn idle_runtime_captures_a_plain_stack_walk() {
    let runtime = SimRuntime::new();
    let calling = Frame::root("main").push("setup").push("capture_graph");

    let graph = get_async_graph(&runtime, &calling);
    let snapshot = graph.snapshot();

    assert_eq!(
        linear_labels(&snapshot),
        vec!["capture_graph", "setup", "main"]
    );
    assert!(
        snapshot
            .nodes
            .iter()
            .all(|node| node.kind == NodeKind::Frame)
    );
}

#[test]
fn running_task_grafts_caller_and_entry_chains() {
    // Live chain: main -> run_loop -> coro -> capture_graph.
    let main = Frame::root("main");
    let run_loop = main.push("run_loop");
    let coro = run_loop.push("coro");
    let calling = coro.push("capture_graph");

    let task = SimTask::new("tc");
    task.set_frames(vec![coro.clone()]);

    let runtime = SimRuntime::new();
    runtime.enter(&task);

    let graph = get_async_graph(&runtime, &calling);
    assert_eq!(
        linear_labels(&graph.snapshot()),
        vec!["capture_graph", "coro", "task:tc", "run_loop", "main"]
    );
}

#[test]
fn leave_restores_fallback_capture() {
    let coro = Frame::root("main").push("coro");
    let task = SimTask::new("tc");
    task.set_frames(vec![coro.clone()]);

    let runtime = SimRuntime::new();
    runtime.enter(&task);
    runtime.leave();

    let graph = get_async_graph(&runtime, &coro);
    assert_eq!(linear_labels(&graph.snapshot()), vec!["coro", "main"]);
}

#[test]
fn shared_future_converges_to_a_single_vertex() {
    // Two sibling tasks wait on the current task's result; both are in
    // turn waited on by the same gathering future, which the root task
    // waits on.
    let main = Frame::root("main");
    let coro = main.push("coro");
    let calling = coro.push("capture_graph");

    let current = SimTask::new("current");
    current.set_frames(vec![coro.clone()]);
    let t1 = SimTask::new("t1");
    let t2 = SimTask::new("t2");
    let gather = SimFuture::new("gather");
    let root = SimTask::new("root");

    suspend(&t1.handle(), &current.handle());
    suspend(&t2.handle(), &current.handle());
    suspend(&gather.handle(), &t1.handle());
    suspend(&gather.handle(), &t2.handle());
    suspend(&root.handle(), &gather.handle());

    let runtime = SimRuntime::new();
    runtime.enter(&current);

    let snapshot = get_async_graph(&runtime, &calling).snapshot();

    let gather_nodes: Vec<u64> = snapshot
        .nodes
        .iter()
        .filter(|node| node.label == "future:gather")
        .map(|node| node.id)
        .collect();
    assert_eq!(gather_nodes.len(), 1, "shared future expanded exactly once");

    let inbound = snapshot.inbound_to_label("future:gather");
    assert_eq!(inbound.len(), 2, "both branches converge on the future");
}

#[test]
fn join_gate_sits_between_child_and_parent() {
    let main = Frame::root("main");
    let coro = main.push("child_coro");

    let child = SimTask::new("child");
    child.set_frames(vec![coro.clone()]);
    let join = SimGate::new("join");
    let parent = SimTask::new("parent");

    suspend(&join.handle(), &child.handle());
    suspend(&parent.handle(), &join.handle());

    let runtime = SimRuntime::new();
    runtime.enter(&child);

    let snapshot = get_async_graph(&runtime, &coro).snapshot();

    let labels: Vec<&str> = snapshot
        .nodes
        .iter()
        .map(|node| node.label.as_str())
        .collect();
    assert!(labels.contains(&"gate:join"));
    assert!(labels.contains(&"task:parent"));

    // child -> gate -> parent, one edge each way through the gate.
    assert_eq!(snapshot.inbound_to_label("gate:join").len(), 1);
    assert_eq!(snapshot.inbound_to_label("task:parent").len(), 1);
}

#[test]
fn completed_future_ignores_late_registration() {
    let done = SimFuture::new("done");
    done.complete();

    let waiter = SimTask::new("late");
    suspend(&waiter.handle(), &done.handle());

    let handle: AwaitableHandle = done.handle();
    assert!(handle.awaiters().is_empty());
}

#[test]
fn detached_entry_frame_yields_a_single_error_sink() {
    let main = Frame::root("main");
    let coro = main.push("coro");
    let calling = coro.push("capture_graph");

    // The task remembers an entry frame that is not on the live chain.
    let task = SimTask::new("orphan");
    task.set_frames(vec![Frame::root("lost_entry"), coro.clone()]);
    let waiter = SimTask::new("waiter");
    suspend(&waiter.handle(), &task.handle());

    let runtime = SimRuntime::new();
    runtime.enter(&task);

    let snapshot = get_async_graph(&runtime, &calling).snapshot();

    let errors: Vec<&stitch::NodeSnapshot> = snapshot
        .nodes
        .iter()
        .filter(|node| node.kind == NodeKind::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].label, "Could not link current task to entry point.");

    // It is a sink: nothing leads out of it.
    assert!(snapshot.edges.iter().all(|edge| edge.from != errors[0].id));
}

#[test]
fn dot_output_names_every_vertex() {
    let main = Frame::root("main");
    let coro = main.push("coro");

    let task = SimTask::new("tc");
    task.set_frames(vec![coro.clone()]);
    let waiter = SimTask::new("waiter");
    suspend(&waiter.handle(), &task.handle());

    let runtime = SimRuntime::new();
    runtime.enter(&task);

    let graph = get_async_graph(&runtime, &coro);
    let dot = async_graph_to_dot(&graph);

    assert!(dot.starts_with("digraph {\n"));
    assert!(dot.ends_with("}\n"));
    for label in ["coro", "task:tc", "task:waiter", "main"] {
        assert!(dot.contains(&format!("[label=\"{label}\" shape=box]")));
    }
    assert!(dot.contains(" -> "));
}

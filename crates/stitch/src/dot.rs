//! DOT rendering of a reconstructed graph, suitable for GraphViz.

use tracing::debug;

use crate::graph::AsyncGraph;

/// Render a causal graph as a GraphViz `digraph` document.
///
/// Box-shaped vertices, edges running earlier → later. Vertex ids come
/// from [`AsyncGraph::snapshot`]: assigned on first encounter, stable for
/// one render, self-consistent between vertex and edge lines.
pub fn async_graph_to_dot(graph: &AsyncGraph) -> String {
    let snapshot = graph.snapshot();

    let mut out = String::from("digraph {\n");
    for node in &snapshot.nodes {
        out.push_str(&format!(
            "  n{} [label=\"{}\" shape=box];\n",
            node.id,
            escape_label(&node.label)
        ));
    }
    for edge in &snapshot.edges {
        out.push_str(&format!("  n{} -> n{};\n", edge.from, edge.to));
    }
    out.push_str("}\n");

    debug!(
        vertices = snapshot.nodes.len(),
        edges = snapshot.edges.len(),
        "rendered graph to dot"
    );
    out
}

fn escape_label(label: &str) -> String {
    label
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::awaitable::RuntimeHook;
    use crate::frame::Frame;
    use crate::graph::get_async_graph;

    struct NoRuntime;

    impl RuntimeHook for NoRuntime {
        fn current_unit(&self) -> Option<std::sync::Arc<dyn crate::SchedulableUnit>> {
            None
        }
    }

    #[test]
    fn linear_chain_renders_vertices_and_edges() {
        let calling = Frame::root("main").push("work");
        let graph = get_async_graph(&NoRuntime, &calling);

        let dot = async_graph_to_dot(&graph);
        assert!(dot.starts_with("digraph {\n"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("  n1 [label=\"work\" shape=box];\n"));
        assert!(dot.contains("  n2 [label=\"main\" shape=box];\n"));
        assert!(dot.contains("  n1 -> n2;\n"));
    }

    #[test]
    fn labels_with_quotes_and_newlines_are_escaped() {
        let calling = Frame::root("entry \"quoted\"\nsecond line");
        let graph = get_async_graph(&NoRuntime, &calling);

        let dot = async_graph_to_dot(&graph);
        assert!(dot.contains(r#"[label="entry \"quoted\"\nsecond line" shape=box]"#));
        // One open token, one vertex line, one close token.
        assert_eq!(dot.lines().count(), 3);
    }

    #[test]
    fn backslashes_are_escaped() {
        let calling = Frame::root(r"ns\func");
        let dot = async_graph_to_dot(&get_async_graph(&NoRuntime, &calling));
        assert!(dot.contains(r#"[label="ns\\func" shape=box]"#));
    }

    #[test]
    fn rendering_twice_is_identical() {
        let calling = Frame::root("main").push("a").push("b");
        let graph = get_async_graph(&NoRuntime, &calling);

        assert_eq!(async_graph_to_dot(&graph), async_graph_to_dot(&graph));
    }
}

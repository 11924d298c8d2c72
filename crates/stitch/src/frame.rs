//! Execution frames: opaque handles to synchronous call-stack entries.
//!
//! Frames are supplied by the host runtime, never fabricated by the graph
//! builder. Each frame carries a textual label and a nullable link to its
//! caller; identity is reference identity, so the builder can recognize
//! "the same frame" across the live chain and a task's saved stack.

use std::fmt;
use std::sync::Arc;

/// One synchronous call-stack entry.
///
/// Cheap to clone; clones share identity (see [`Frame::same`]). Immutable
/// once built, which is all graph construction needs: the chain is read as
/// a point-in-time snapshot.
#[derive(Clone)]
pub struct Frame {
    inner: Arc<FrameInner>,
}

struct FrameInner {
    label: String,
    back: Option<Frame>,
}

impl Frame {
    /// A frame with no caller: the top of a chain (program entry point).
    pub fn root(label: impl Into<String>) -> Frame {
        Frame {
            inner: Arc::new(FrameInner {
                label: label.into(),
                back: None,
            }),
        }
    }

    /// A new frame whose caller is `self`.
    pub fn push(&self, label: impl Into<String>) -> Frame {
        Frame {
            inner: Arc::new(FrameInner {
                label: label.into(),
                back: Some(self.clone()),
            }),
        }
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// The calling frame, or `None` at the top of the chain.
    pub fn back(&self) -> Option<&Frame> {
        self.inner.back.as_ref()
    }

    /// Reference identity. Two frames with equal labels are still distinct
    /// unless they are clones of one handle.
    pub fn same(&self, other: &Frame) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.label)
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({})", self.inner.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_links_back_to_root() {
        let main = Frame::root("main");
        let inner = main.push("run").push("work");

        assert_eq!(inner.label(), "work");
        let run = inner.back().unwrap();
        assert_eq!(run.label(), "run");
        let top = run.back().unwrap();
        assert!(top.same(&main));
        assert!(top.back().is_none());
    }

    #[test]
    fn identity_is_per_handle_not_per_label() {
        let a = Frame::root("f");
        let b = Frame::root("f");
        assert!(!a.same(&b));
        assert!(a.same(&a.clone()));
    }

    #[test]
    fn display_is_the_label() {
        let f = Frame::root("main").push("coro_print_graph");
        assert_eq!(f.to_string(), "coro_print_graph");
    }
}

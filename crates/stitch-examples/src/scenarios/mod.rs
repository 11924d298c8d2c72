//! Canned runtime states, each printing the DOT rendering of its causal
//! graph to stdout.

pub mod gather_with_forking;
pub mod plain_stack;
pub mod taskgroup;
pub mod taskgroup_with_await;

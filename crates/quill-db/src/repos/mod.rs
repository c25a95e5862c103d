//! Repository methods on [`QuillDb`](crate::QuillDb).

pub mod audit;

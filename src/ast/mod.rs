//! The AST: an arena-backed tree of named nodes plus the masking builder
//! that produces it from source bytes under a [`crate::rule::Rule`] graph.

mod tree;

pub use tree::{build, Content, NodeId, Tree, BLOCK_ERROR, INLINE_ERROR};

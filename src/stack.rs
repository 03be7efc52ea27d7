//! Stack module.
//!
//! The middleware runner with its handler traits, resolvers and error
//! rendering.

pub use stackline_stack::*;

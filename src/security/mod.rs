//! Security module for Sandgate

pub mod resolver;

pub use resolver::{ContainmentError, ResolvedPath, WorkingRoot};

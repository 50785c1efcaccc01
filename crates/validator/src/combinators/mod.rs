//! Combinators wrapping constraints.

pub mod optional;

pub use optional::{Optional, optional};

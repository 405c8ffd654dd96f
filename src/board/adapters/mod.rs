//! Port implementations for the task board.

pub mod http;
pub mod memory;

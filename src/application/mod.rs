//! Application layer - use-case handlers coordinating domain and ports.

pub mod handlers;

//! Adapters - implementations of the ports against concrete technology.

pub mod ai;

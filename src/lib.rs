//! Rep Coach - Role-Play Training Coordinator
//!
//! This crate drives a scripted, stateful role-play conversation between a
//! trainee pharmaceutical sales rep and a simulated doctor persona, with an
//! automated coaching critique after each trainee turn and a final summary
//! report at the end of training.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

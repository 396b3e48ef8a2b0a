//! Application core.
//!
//! The task graph and its shared state. All interaction with hardware,
//! storage and the network happens through the **port traits** in
//! [`ports`], so this layer runs unchanged against mocks.

pub mod context;
pub mod events;
pub mod orchestrator;
pub mod ports;

//! Greenhouse climate controller library.
//!
//! Pure control logic in [`control`], the task graph in [`app`], hardware
//! drivers in [`drivers`] and port implementations in [`adapters`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod diagnostics;
pub mod drivers;
pub mod error;
pub mod safety;
pub mod scheduler;
pub mod signals;
pub mod stats;

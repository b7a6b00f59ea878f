//! Core of `covwatch`: the shared report state, the run executor that fills
//! it, and the change watcher that decides when to run.

pub mod api;
pub mod config;
pub mod error;
pub mod runner;
pub mod state;
pub mod watcher;

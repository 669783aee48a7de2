//! Background inbox sweeping for FamVault.
//!
//! This crate provides:
//! - A sweeper that runs the inbox orchestrator for every family with
//!   pending inbox files
//! - A worker runner that polls for pending files and sweeps them
//! - A cron scheduler for the periodic full sweep

pub mod runner;
pub mod scheduler;
pub mod sweep;

pub use runner::WorkerRunner;
pub use scheduler::SweepScheduler;
pub use sweep::{InboxSweeper, SweepStats};

// src/lib.rs
// Library interface for breach-monitor
pub mod cli;
pub mod config;
pub mod delay;
pub mod filter;
pub mod monitor;
pub mod output;
pub mod progress;
pub mod providers;
pub mod report;
pub mod types;

//! Sentinel alarm controller library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod fsm;
pub mod inputs;
pub mod pins;
pub mod scheduler;

// Platform adapters and drivers compile on every target; the hardware
// paths inside are cfg-gated.
pub mod adapters;
pub mod drivers;

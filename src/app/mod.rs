//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for the Sentinel controller:
//! command vocabulary, the effect list the controller returns, and the
//! [`AlarmController`](controller::AlarmController) that arbitrates
//! between input channels. All interaction with hardware and network
//! happens through **port traits** defined in [`ports`], keeping this
//! layer fully testable without real peripherals.

pub mod commands;
pub mod controller;
pub mod effects;
pub mod log_line;
pub mod ports;

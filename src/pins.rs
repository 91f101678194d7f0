//! GPIO pin assignments for the Sentinel controller board (ESP32 DevKit).
//!
//! Single source of truth: `main.rs` and the hardware init path reference
//! this module rather than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// HC-SR501 PIR motion sensor output. HIGH = motion.
pub const PIR_GPIO: i32 = 13;

/// 433 MHz superheterodyne receiver data line.
/// Decoded by the external RF decoder, which feeds [`crate::adapters::rf`].
pub const RF_RECEIVER_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// User input
// ---------------------------------------------------------------------------

/// Arm/disarm push-button. Active-low, internal pull-up enabled.
pub const BUTTON_GPIO: i32 = 27;

// ---------------------------------------------------------------------------
// Actuators
// ---------------------------------------------------------------------------

/// Relay module driving the siren. HIGH = siren on.
pub const SIREN_RELAY_GPIO: i32 = 12;

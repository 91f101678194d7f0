//! Hardware adapter: bridges GPIO pins to domain port traits.
//!
//! Wraps `embedded-hal` 1.0 pins, so the same code drives
//! `esp_idf_hal::gpio::PinDriver` on the device and plain fakes in tests.
//! This and the button adapter are the only places that touch pin levels.

use embedded_hal::digital::{InputPin, OutputPin};
use log::{info, warn};

use crate::app::ports::{MotionSensor, SirenPort};

// ── Siren relay ───────────────────────────────────────────────

/// Relay on [`SIREN_RELAY_GPIO`](crate::pins::SIREN_RELAY_GPIO); high
/// energises the siren.
pub struct PinSiren<P: OutputPin> {
    pin: P,
    on: bool,
}

impl<P: OutputPin> PinSiren<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, on: false }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}

impl<P: OutputPin> SirenPort for PinSiren<P> {
    fn set_siren(&mut self, on: bool) {
        let result = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        match result {
            Ok(()) => {
                if on != self.on {
                    info!("Siren {}", if on { "ON" } else { "OFF" });
                }
                self.on = on;
            }
            Err(e) => warn!("Siren: relay write failed: {:?}", e),
        }
    }
}

// ── PIR sensor ────────────────────────────────────────────────

/// PIR output on [`PIR_GPIO`](crate::pins::PIR_GPIO); high while motion is
/// reported.
pub struct PinMotionSensor<P: InputPin> {
    pin: P,
}

impl<P: InputPin> PinMotionSensor<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: InputPin> MotionSensor for PinMotionSensor<P> {
    fn motion_detected(&mut self) -> bool {
        self.pin.is_high().unwrap_or_else(|e| {
            warn!("PIR: read failed: {:?}", e);
            false
        })
    }
}

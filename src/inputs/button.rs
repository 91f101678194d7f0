//! Physical arm/disarm push-button.
//!
//! ## Hardware
//!
//! Momentary switch to ground on [`BUTTON_GPIO`](crate::pins::BUTTON_GPIO)
//! with the internal pull-up enabled, so the pin reads low while pressed.
//! The pin is sampled every cycle and run through a [`Debouncer`]; each
//! settled press toggles the alarm relative to the current state.

use embedded_hal::digital::InputPin;
use log::{info, warn};

use super::InputAdapter;
use crate::app::commands::{Command, Source};
use crate::drivers::debounce::{Debouncer, Edge};
use crate::fsm::SystemState;

pub struct ButtonAdapter<P: InputPin> {
    pin: P,
    debouncer: Debouncer,
    window_ms: u32,
}

impl<P: InputPin> ButtonAdapter<P> {
    pub fn new(pin: P, window_ms: u32) -> Self {
        Self {
            pin,
            // Released is the idle level.
            debouncer: Debouncer::new(false),
            window_ms,
        }
    }

    pub fn pin_mut(&mut self) -> &mut P {
        &mut self.pin
    }
}

impl<P: InputPin> InputAdapter for ButtonAdapter<P> {
    fn poll(&mut self, now_ms: u64, state: &SystemState) -> Option<Command> {
        // Active-low.
        let pressed = match self.pin.is_low() {
            Ok(level) => level,
            Err(e) => {
                warn!("Button: pin read failed: {:?}", e);
                return None;
            }
        };

        match self.debouncer.sample(pressed, now_ms, self.window_ms)? {
            Edge::Pressed => {
                let source = Source::PhysicalButton;
                info!("Button: pressed while {}", if state.armed { "armed" } else { "disarmed" });
                Some(if state.armed {
                    Command::Disarm { source }
                } else {
                    Command::Arm { source }
                })
            }
            Edge::Released => None,
        }
    }
}

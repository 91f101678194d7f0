//! 433 MHz receiver mailbox.
//!
//! ## Hardware
//!
//! A superheterodyne 433 MHz module drives [`RF_RECEIVER_GPIO`].
//! [`Rf433Receiver::enable_receive`] only configures that pin as an input;
//! this crate registers no interrupt and contains no pulse decoder.
//!
//! ## Decoder extension point
//!
//! [`rf_isr_deliver`] is where a fixed-code decoder plugs in: a GPIO ISR
//! (or decoder task) that times the pulses and calls it once per complete
//! code. Until one is installed the mailbox never fills on the device and
//! the radio channel stays silent; host tests call it directly.
//!
//! The mailbox holds one code. While a code is waiting, further codes are
//! dropped, so a held remote button cannot flood the loop. The main loop
//! reads it through [`Rf433Receiver`] and acknowledges it with
//! `reset_available`.
//!
//! [`RF_RECEIVER_GPIO`]: crate::pins::RF_RECEIVER_GPIO

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::app::ports::RadioChannel;

/// Last decoded code. Written by the ISR, read by the main loop.
static RF_CODE: AtomicU32 = AtomicU32::new(0);
/// Set by the ISR after `RF_CODE` is written; cleared by the main loop.
static RF_AVAILABLE: AtomicBool = AtomicBool::new(false);

/// ISR entry point for the decoder. Lock-free; safe in interrupt context.
pub fn rf_isr_deliver(code: u32) {
    if RF_AVAILABLE.load(Ordering::Acquire) {
        return;
    }
    RF_CODE.store(code, Ordering::Relaxed);
    RF_AVAILABLE.store(true, Ordering::Release);
}

/// Main-loop side of the mailbox.
pub struct Rf433Receiver {
    gpio: i32,
}

impl Rf433Receiver {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }

    /// Configure the data pin as an input and start accepting codes.
    #[cfg(target_os = "espidf")]
    pub fn enable_receive(&mut self) -> Result<(), crate::error::Error> {
        use esp_idf_svc::sys::{ESP_OK, gpio_mode_t_GPIO_MODE_INPUT, gpio_set_direction};

        // SAFETY: plain register configuration of a pin owned by this
        // receiver, done once before the loop starts.
        let ret = unsafe { gpio_set_direction(self.gpio, gpio_mode_t_GPIO_MODE_INPUT) };
        if ret != ESP_OK as i32 {
            return Err(crate::error::Error::Init("RF receiver pin config failed"));
        }
        RF_AVAILABLE.store(false, Ordering::Release);
        log::info!("RF: receiver enabled on GPIO {}", self.gpio);
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn enable_receive(&mut self) -> Result<(), crate::error::Error> {
        RF_AVAILABLE.store(false, Ordering::Release);
        log::info!("RF(sim): receiver enabled on GPIO {}", self.gpio);
        Ok(())
    }
}

impl RadioChannel for Rf433Receiver {
    fn available(&self) -> bool {
        RF_AVAILABLE.load(Ordering::Acquire)
    }

    fn take_code(&mut self) -> u64 {
        u64::from(RF_CODE.load(Ordering::Relaxed))
    }

    fn reset_available(&mut self) {
        RF_AVAILABLE.store(false, Ordering::Release);
    }
}

//! Sentinel firmware entry point.
//!
//! Hexagonal architecture with a single cooperative loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  PinSiren / PinMotionSensor   FileEventLog   Esp32Clock        │
//! │  (SirenPort, MotionSensor)    (EventLog)     (Clock)           │
//! │  WifiAdapter    TelegramBot               Rf433Receiver        │
//! │  (Connectivity) (Notifier + ChatChannel)  (RadioChannel)       │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            AlarmController (pure logic)                │    │
//! │  │            FSM · status · log dump                     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Dispatcher: LinkMonitor · Chat · RF · Button · PIR            │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{error, info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio::{PinDriver, Pull};
use esp_idf_svc::hal::prelude::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::sntp::EspSntp;
use esp_idf_svc::wifi::EspWifi;

use sentinel::adapters::event_log::{FileEventLog, mount_storage};
use sentinel::adapters::hardware::{PinMotionSensor, PinSiren};
use sentinel::adapters::rf::Rf433Receiver;
use sentinel::adapters::telegram::TelegramBot;
use sentinel::adapters::time::Esp32Clock;
use sentinel::adapters::wifi::WifiAdapter;
use sentinel::app::ports::SirenPort;
use sentinel::config::SystemConfig;
use sentinel::dispatcher::{Dispatcher, LinkMonitor, Ports};
use sentinel::inputs::{ButtonAdapter, ChatAdapter, RadioAdapter};
use sentinel::pins;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Sentinel v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::from_build_env()?;
    config.validate()?;

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // ── 3. Pins (siren forced off before anything else) ───────
    let mut siren = PinSiren::new(PinDriver::output(peripherals.pins.gpio12)?);
    siren.set_siren(false);
    let mut motion = PinMotionSensor::new(PinDriver::input(peripherals.pins.gpio13)?);
    let mut button_pin = PinDriver::input(peripherals.pins.gpio27)?;
    button_pin.set_pull(Pull::Up)?;

    // ── 4. Storage + event log ────────────────────────────────
    if let Err(e) = mount_storage() {
        // Keep running; appends will fail and be reported on the console.
        error!("{}; event log unavailable", e);
    }
    let mut event_log = FileEventLog::new(config.log_path.as_str());

    // ── 5. RF receiver ────────────────────────────────────────
    // Codes only arrive once a decoder feeds `rf_isr_deliver`.
    let mut rf = Rf433Receiver::new(pins::RF_RECEIVER_GPIO);
    if let Err(e) = rf.enable_receive() {
        warn!("{}; RF remote disabled", e);
    }

    // ── 6. Wi-Fi + time sync ──────────────────────────────────
    let mut wifi = WifiAdapter::new();
    if let Err(e) = wifi.set_credentials(config.wifi_ssid.as_str(), config.wifi_password.as_str()) {
        warn!("WiFi: {}", e);
    }
    wifi.attach_driver(EspWifi::new(peripherals.modem, sysloop, Some(nvs))?);
    let _sntp = EspSntp::new_default()?;
    let clock = Esp32Clock::new(config.utc_offset_secs);

    // ── 7. Chat bot ───────────────────────────────────────────
    let bot = TelegramBot::new(config.bot_token.as_str(), config.chat_id);
    let mut notifier = bot.clone();

    // ── 8. Dispatcher ─────────────────────────────────────────
    let mut dispatcher = Dispatcher::new(
        ChatAdapter::new(bot, config.chat_poll_interval_ms),
        RadioAdapter::new(rf, config.rf_arm_code, config.rf_disarm_code),
        ButtonAdapter::new(button_pin, config.debounce_window_ms),
        LinkMonitor::new(config.link_check_interval_ms, config.connect_timeout_ms),
    );

    let mut ports = Ports {
        motion: &mut motion,
        siren: &mut siren,
        notifier: &mut notifier,
        event_log: &mut event_log,
        clock: &clock,
        link: &mut wifi,
    };
    dispatcher.start(&mut ports);

    info!("System ready. Entering main loop.");

    // ── 9. Main loop ──────────────────────────────────────────
    loop {
        dispatcher.cycle(&mut ports);
        FreeRtos::delay_ms(config.loop_period_ms);
    }
}

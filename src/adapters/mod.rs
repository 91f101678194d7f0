//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements             | Connects to                 |
//! |-------------|------------------------|-----------------------------|
//! | `event_log` | EventLog               | SPIFFS file (std::fs)       |
//! | `hardware`  | SirenPort, MotionSensor| relay and PIR GPIO          |
//! | `rf`        | RadioChannel           | 433 MHz decoder ISR mailbox |
//! | `telegram`  | Notifier, ChatChannel  | Telegram Bot API over HTTPS |
//! | `time`      | Clock                  | ESP32 system timer, SNTP    |
//! | `wifi`      | Connectivity           | ESP-IDF WiFi STA            |

pub mod event_log;
pub mod hardware;
pub mod rf;
pub mod telegram;
pub mod time;
pub mod wifi;

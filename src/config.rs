//! System configuration parameters
//!
//! All tunable parameters for the Sentinel controller. Credentials ship as
//! placeholders; `main.rs` overrides them from build-time environment
//! variables.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Polling ---
    /// Minimum interval between chat-channel polls (milliseconds)
    pub chat_poll_interval_ms: u32,
    /// Interval between network link checks (milliseconds)
    pub link_check_interval_ms: u32,
    /// Upper bound on a single blocking association attempt (milliseconds)
    pub connect_timeout_ms: u32,
    /// Main loop pacing delay (milliseconds)
    pub loop_period_ms: u32,

    // --- Button ---
    /// Contact debounce window (milliseconds)
    pub debounce_window_ms: u32,

    // --- RF remote ---
    /// Fixed code that arms the system
    pub rf_arm_code: u64,
    /// Fixed code that disarms the system
    pub rf_disarm_code: u64,

    // --- Event log ---
    /// Absolute path of the append-only event log
    pub log_path: String,
    /// Offset from UTC applied to log timestamps (seconds)
    pub utc_offset_secs: i32,

    // --- Credentials ---
    pub wifi_ssid: heapless::String<32>,
    pub wifi_password: heapless::String<64>,
    pub bot_token: String,
    pub chat_id: i64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Polling
            chat_poll_interval_ms: 3_000,   // flood prevention
            link_check_interval_ms: 10_000,
            connect_timeout_ms: 15_000,
            loop_period_ms: 10,

            // Button
            debounce_window_ms: 50,

            // RF remote
            rf_arm_code: 1_234_567,
            rf_disarm_code: 7_654_321,

            // Event log
            log_path: String::from("/spiffs/sentinel_log.txt"),
            utc_offset_secs: -3 * 3600, // UTC-3

            // Credentials
            wifi_ssid: heapless::String::new(),
            wifi_password: heapless::String::new(),
            bot_token: String::new(),
            chat_id: 0,
        }
    }
}

impl SystemConfig {
    /// Defaults with credentials taken from the build environment
    /// (`SENTINEL_WIFI_SSID`, `SENTINEL_WIFI_PASS`, `SENTINEL_BOT_TOKEN`,
    /// `SENTINEL_CHAT_ID`), so secrets never live in the source tree.
    pub fn from_build_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_credentials(
            option_env!("SENTINEL_WIFI_SSID"),
            option_env!("SENTINEL_WIFI_PASS"),
            option_env!("SENTINEL_BOT_TOKEN"),
            option_env!("SENTINEL_CHAT_ID"),
        )?;
        Ok(config)
    }

    /// Overwrite whichever credentials are given.
    pub fn apply_credentials(
        &mut self,
        ssid: Option<&str>,
        password: Option<&str>,
        bot_token: Option<&str>,
        chat_id: Option<&str>,
    ) -> Result<()> {
        if let Some(ssid) = ssid {
            self.wifi_ssid.clear();
            self.wifi_ssid
                .push_str(ssid)
                .map_err(|()| Error::Config("Wi-Fi SSID longer than 32 bytes"))?;
        }
        if let Some(password) = password {
            self.wifi_password.clear();
            self.wifi_password
                .push_str(password)
                .map_err(|()| Error::Config("Wi-Fi password longer than 64 bytes"))?;
        }
        if let Some(token) = bot_token {
            self.bot_token = token.to_string();
        }
        if let Some(id) = chat_id {
            self.chat_id = id
                .trim()
                .parse()
                .map_err(|_| Error::Config("chat id is not an integer"))?;
        }
        Ok(())
    }

    /// Reject combinations that would break the scheduling guarantees.
    pub fn validate(&self) -> Result<()> {
        if self.chat_poll_interval_ms == 0 || self.link_check_interval_ms == 0 {
            return Err(Error::Config("poll intervals must be non-zero"));
        }
        if self.connect_timeout_ms == 0 {
            return Err(Error::Config("connect timeout must be non-zero"));
        }
        if self.debounce_window_ms >= self.chat_poll_interval_ms {
            return Err(Error::Config("debounce window must be shorter than the chat poll interval"));
        }
        if self.rf_arm_code == self.rf_disarm_code {
            return Err(Error::Config("RF arm and disarm codes must differ"));
        }
        if self.utc_offset_secs.abs() > 14 * 3600 {
            return Err(Error::Config("UTC offset out of range"));
        }
        if self.log_path.is_empty() {
            return Err(Error::Config("log path is empty"));
        }
        Ok(())
    }
}

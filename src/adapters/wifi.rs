//! Wi-Fi station-mode adapter.
//!
//! Implements [`Connectivity`], the hexagonal boundary for the network
//! link the chat bot rides on.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF driver via `esp_idf_svc::wifi`.
//! - **all other targets**: a scripted simulation for host-side tests.
//!
//! ## Reconnection policy
//!
//! The adapter never retries on its own. The dispatcher's link monitor
//! decides when to call [`Connectivity::connect`], and every attempt is
//! bounded by the timeout it passes in.

use log::{info, warn};

use crate::app::ports::{ConnectError, Connectivity};

#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi};

/// Interval between link-state checks while an association is pending.
#[cfg(target_os = "espidf")]
const ASSOC_POLL_MS: u32 = 500;

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

pub fn validate_ssid(ssid: &str) -> Result<(), ConnectError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(ConnectError::InvalidSsid);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ConnectError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Host simulation
// ───────────────────────────────────────────────────────────────

/// Deterministic stand-in for the radio link on non-ESP targets.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
pub struct SimLink {
    pub up: bool,
    /// Number of upcoming attempts that will time out.
    pub failures_left: u32,
    pub attempts: u32,
}

// ───────────────────────────────────────────────────────────────
// Wi-Fi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    #[cfg(target_os = "espidf")]
    driver: Option<EspWifi<'static>>,
    #[cfg(not(target_os = "espidf"))]
    sim: SimLink,
}

impl WifiAdapter {
    pub fn new() -> Self {
        Self {
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            #[cfg(target_os = "espidf")]
            driver: None,
            #[cfg(not(target_os = "espidf"))]
            sim: SimLink::default(),
        }
    }

    /// Hand over the station driver created in `main`.
    #[cfg(target_os = "espidf")]
    pub fn attach_driver(&mut self, driver: EspWifi<'static>) {
        self.driver = Some(driver);
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_mut(&mut self) -> &mut SimLink {
        &mut self.sim
    }

    pub fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        self.ssid.clear();
        self.ssid.push_str(ssid).map_err(|()| ConnectError::InvalidSsid)?;
        self.password.clear();
        self.password
            .push_str(password)
            .map_err(|()| ConnectError::InvalidPassword)?;
        info!("WiFi: credentials updated (SSID='{}')", self.ssid);
        Ok(())
    }

    pub fn ssid(&self) -> &str {
        self.ssid.as_str()
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self, timeout_ms: u32) -> Result<(), ConnectError> {
        use esp_idf_svc::hal::delay::FreeRtos;

        let ssid = self.ssid.as_str().try_into().map_err(|()| ConnectError::InvalidSsid)?;
        let password = self
            .password
            .as_str()
            .try_into()
            .map_err(|()| ConnectError::InvalidPassword)?;
        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };

        let driver = self.driver.as_mut().ok_or(ConnectError::Driver)?;
        let conf = Configuration::Client(ClientConfiguration {
            ssid,
            password,
            auth_method,
            ..Default::default()
        });
        driver.set_configuration(&conf).map_err(|e| {
            warn!("WiFi(espidf): set_configuration failed: {}", e);
            ConnectError::Driver
        })?;
        if !driver.is_started().unwrap_or(false) {
            driver.start().map_err(|e| {
                warn!("WiFi(espidf): start failed: {}", e);
                ConnectError::Driver
            })?;
        }
        driver.connect().map_err(|e| {
            warn!("WiFi(espidf): connect failed: {}", e);
            ConnectError::Driver
        })?;

        let mut waited_ms = 0;
        while waited_ms < timeout_ms {
            if driver.is_up().unwrap_or(false) {
                return Ok(());
            }
            FreeRtos::delay_ms(ASSOC_POLL_MS);
            waited_ms += ASSOC_POLL_MS;
        }
        // Leave the driver idle so the next attempt starts clean.
        let _ = driver.disconnect();
        Err(ConnectError::Timeout)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self, timeout_ms: u32) -> Result<(), ConnectError> {
        self.sim.attempts += 1;
        if self.sim.failures_left > 0 {
            self.sim.failures_left -= 1;
            warn!(
                "WiFi(sim): attempt {} timed out after {} ms",
                self.sim.attempts, timeout_ms
            );
            return Err(ConnectError::Timeout);
        }
        self.sim.up = true;
        info!("WiFi(sim): connected to '{}' (attempt {})", self.ssid, self.sim.attempts);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_is_connected(&self) -> bool {
        self.driver
            .as_ref()
            .is_some_and(|d| d.is_up().unwrap_or(false))
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_connected(&self) -> bool {
        self.sim.up
    }
}

impl Default for WifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// Connectivity
// ───────────────────────────────────────────────────────────────

impl Connectivity for WifiAdapter {
    fn is_connected(&self) -> bool {
        self.platform_is_connected()
    }

    fn connect(&mut self, timeout_ms: u32) -> Result<(), ConnectError> {
        if self.ssid.is_empty() {
            return Err(ConnectError::NoCredentials);
        }
        if self.platform_is_connected() {
            return Ok(());
        }
        info!("WiFi: connecting to '{}' (timeout {} ms)", self.ssid, timeout_ms);
        self.platform_connect(timeout_ms)
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────

//! ESP32 clock adapter.
//!
//! Implements [`Clock`] for the Sentinel controller.
//!
//! - **`target_os = "espidf"`**: monotonic time from `esp_timer_get_time()`
//!   (microsecond precision). The wall clock comes from `gettimeofday()`
//!   once SNTP has set it and is split into local time by `localtime_r`,
//!   using the `TZ` variable set when the clock is created.
//! - **`not(target_os = "espidf")`**: `std::time::Instant` for host-side
//!   testing and simulation; the wall clock is never synchronised.

use log::info;

use crate::app::log_line::{CalendarTime, EPOCH_2020};
use crate::app::ports::Clock;

/// POSIX `TZ` string for a fixed offset east of UTC.
///
/// POSIX counts westward offsets as positive, so UTC-3 becomes `<-03>3`.
pub fn posix_tz(utc_offset_secs: i32) -> String {
    if utc_offset_secs == 0 {
        return String::from("UTC0");
    }
    let abs = utc_offset_secs.unsigned_abs();
    let (hours, minutes) = (abs / 3_600, abs % 3_600 / 60);
    let (name_sign, posix_sign) = if utc_offset_secs < 0 { ('-', "") } else { ('+', "-") };
    if minutes == 0 {
        format!("<{name_sign}{hours:02}>{posix_sign}{hours}")
    } else {
        format!("<{name_sign}{hours:02}{minutes:02}>{posix_sign}{hours}:{minutes:02}")
    }
}

/// Clock adapter for the ESP32 platform.
pub struct Esp32Clock {
    tz: String,
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Esp32Clock {
    /// Creates the clock and installs the local time zone. Construct it
    /// once, at boot.
    pub fn new(utc_offset_secs: i32) -> Self {
        let tz = posix_tz(utc_offset_secs);
        Self::apply_timezone(&tz);
        info!("Clock: TZ={}", tz);
        Self {
            tz,
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    pub fn timezone(&self) -> &str {
        &self.tz
    }

    #[cfg(target_os = "espidf")]
    fn apply_timezone(tz: &str) {
        let Ok(value) = std::ffi::CString::new(tz) else {
            log::warn!("Clock: invalid TZ string {:?}", tz);
            return;
        };
        // SAFETY: called once at boot before anything reads the time zone;
        // both strings are NUL-terminated and outlive the calls.
        unsafe {
            esp_idf_svc::sys::setenv(c"TZ".as_ptr(), value.as_ptr(), 1);
            esp_idf_svc::sys::tzset();
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn apply_timezone(_tz: &str) {}

    /// Microseconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since boot (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    /// Seconds since the Unix epoch as reported by the system clock.
    #[cfg(target_os = "espidf")]
    fn unix_secs(&self) -> Option<i64> {
        let mut tv = esp_idf_svc::sys::timeval {
            tv_sec: 0,
            tv_usec: 0,
        };
        if unsafe { esp_idf_svc::sys::gettimeofday(&mut tv, core::ptr::null_mut()) } != 0 {
            return None;
        }
        Some(tv.tv_sec as i64)
    }

    /// On non-ESP targets (simulation) the wall clock is never synced.
    #[cfg(not(target_os = "espidf"))]
    fn unix_secs(&self) -> Option<i64> {
        None
    }

    #[cfg(target_os = "espidf")]
    fn local_time(&self, unix_secs: i64) -> Option<CalendarTime> {
        let secs = unix_secs as esp_idf_svc::sys::time_t;
        let mut tm: esp_idf_svc::sys::tm = unsafe { core::mem::zeroed() };
        if unsafe { esp_idf_svc::sys::localtime_r(&secs, &mut tm) }.is_null() {
            return None;
        }
        CalendarTime::from_tm(tm.tm_year, tm.tm_mon, tm.tm_mday, tm.tm_hour, tm.tm_min, tm.tm_sec)
    }

    #[cfg(not(target_os = "espidf"))]
    fn local_time(&self, _unix_secs: i64) -> Option<CalendarTime> {
        None
    }
}

impl Clock for Esp32Clock {
    fn now_ms(&self) -> u64 {
        self.uptime_us() / 1000
    }

    fn wall_clock(&self) -> Option<CalendarTime> {
        let secs = self.unix_secs()?;
        // Before 2020 the RTC still holds its power-on value.
        if secs < EPOCH_2020 {
            return None;
        }
        self.local_time(secs)
    }
}

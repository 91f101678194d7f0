//! File-backed event log.
//!
//! Implements [`EventLog`] as an append-only UTF-8 text file, one line per
//! event. On the device the file lives on the SPIFFS partition mounted at
//! [`STORAGE_BASE_PATH`]; on the host any writable path works.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::app::ports::{EventLog, LogError};
use crate::error::Error;

/// VFS mount point of the storage partition.
pub const STORAGE_BASE_PATH: &str = "/spiffs";

fn map_io_error(e: &io::Error) -> LogError {
    match e.kind() {
        io::ErrorKind::NotFound => LogError::NotFound,
        io::ErrorKind::StorageFull => LogError::Full,
        _ => LogError::Io,
    }
}

pub struct FileEventLog {
    path: PathBuf,
}

impl FileEventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        info!("Event log at {}", path.display());
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventLog for FileEventLog {
    fn append(&mut self, line: &str) -> Result<(), LogError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| map_io_error(&e))?;
        // One write per line keeps a torn write to a single line.
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        file.write_all(buf.as_bytes()).map_err(|e| map_io_error(&e))?;
        debug!("Event log: appended {} bytes", buf.len());
        Ok(())
    }

    fn dump(&self) -> Result<Vec<u8>, LogError> {
        fs::read(&self.path).map_err(|e| map_io_error(&e))
    }
}

// ── Storage mount ─────────────────────────────────────────────

/// Mount the SPIFFS partition at [`STORAGE_BASE_PATH`], formatting it on
/// first boot.
#[cfg(target_os = "espidf")]
pub fn mount_storage() -> Result<(), Error> {
    use esp_idf_svc::sys::{ESP_OK, esp_vfs_spiffs_conf_t, esp_vfs_spiffs_register};

    let conf = esp_vfs_spiffs_conf_t {
        base_path: c"/spiffs".as_ptr(),
        partition_label: core::ptr::null(),
        max_files: 4,
        format_if_mount_failed: true,
    };
    // SAFETY: called once from main() before the loop starts; `conf`
    // outlives the call and the base path is a static C string.
    let ret = unsafe { esp_vfs_spiffs_register(&conf) };
    if ret != ESP_OK as i32 {
        return Err(Error::Init("SPIFFS mount failed"));
    }
    info!("Storage: SPIFFS mounted at {}", STORAGE_BASE_PATH);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn mount_storage() -> Result<(), Error> {
    info!("Storage(sim): mount skipped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log(name: &str) -> FileEventLog {
        let path = std::env::temp_dir().join(format!(
            "sentinel-{}-{}.txt",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        FileEventLog::new(path)
    }

    #[test]
    fn dump_before_first_append_is_not_found() {
        let log = temp_log("missing");
        assert_eq!(log.dump(), Err(LogError::NotFound));
    }

    #[test]
    fn appends_one_line_per_event() {
        let mut log = temp_log("append");
        log.append("[sincronizando relogio...] System started and configured.")
            .unwrap();
        log.append("[2025-06-12 09:05:07] System armed by chat.").unwrap();

        let text = String::from_utf8(log.dump().unwrap()).unwrap();
        assert_eq!(
            text,
            "[sincronizando relogio...] System started and configured.\n\
             [2025-06-12 09:05:07] System armed by chat.\n"
        );
        let _ = fs::remove_file(log.path());
    }

    #[test]
    fn unwritable_path_reports_error() {
        let mut log = FileEventLog::new("/nonexistent-dir/sentinel/log.txt");
        assert!(log.append("x").is_err());
    }
}

// Sysfs attribute access for tacho motors
//
// The kernel exposes one directory per motor under the class root and one
// file per attribute. Reads and writes are plain text; every access here
// goes straight to the file, nothing is cached.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::TACHO_MOTOR_ROOT;

/// Named motor attributes and the file each one maps to inside a device
/// directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Port,
    RegulationMode,
    SpeedRead,
    SpeedWrite,
    PowerRead,
    PowerWrite,
    Run,
    StopMode,
    Position,
    DutyCycleRead,
    DutyCycleWrite,
}

impl Attribute {
    /// File name within the device directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Attribute::Port => "port_name",
            Attribute::RegulationMode => "regulation_mode",
            Attribute::SpeedRead => "pulses_per_second",
            Attribute::SpeedWrite => "pulses_per_second_sp",
            Attribute::PowerRead => "power",
            Attribute::PowerWrite => "power_sp",
            Attribute::Run => "run",
            Attribute::StopMode => "stop_mode",
            Attribute::Position => "position",
            Attribute::DutyCycleRead => "duty_cycle",
            Attribute::DutyCycleWrite => "duty_cycle_sp",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Error types for motor attribute access and command validation
#[derive(Debug, thiserror::Error)]
pub enum MotorError {
    #[error("attribute I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("device {device}: attribute {attribute} holds non-numeric text {text:?}")]
    Parse {
        device: String,
        attribute: Attribute,
        text: String,
    },

    #[error("{what} must be in range [{min}, {max}], got {value}")]
    OutOfRange {
        what: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },
}

pub type Result<T> = std::result::Result<T, MotorError>;

/// Uncached access to the attribute files of motor devices under one root.
#[derive(Debug, Clone)]
pub struct AttributeStore {
    root: PathBuf,
}

impl AttributeStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Class root this store operates on.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, device: &str, attribute: Attribute) -> PathBuf {
        self.root.join(device).join(attribute.file_name())
    }

    /// Read an attribute's text, with trailing newlines stripped.
    ///
    /// Fails when the device or attribute file does not exist or cannot be
    /// read (unplugged, permission denied).
    pub fn read(&self, device: &str, attribute: Attribute) -> Result<String> {
        let mut text = fs::read_to_string(self.path(device, attribute))?;
        while text.ends_with('\n') {
            text.pop();
        }
        debug!("read {}/{}: {:?}", device, attribute, text);
        Ok(text)
    }

    /// Overwrite an attribute with the stringified value.
    ///
    /// Takes effect as soon as the write completes; writing to the run
    /// attribute starts or stops the motor immediately.
    pub fn write(&self, device: &str, attribute: Attribute, value: impl fmt::Display) -> Result<()> {
        let value = value.to_string();
        debug!("write {}/{}: {:?}", device, attribute, value);
        fs::write(self.path(device, attribute), value)?;
        Ok(())
    }
}

impl Default for AttributeStore {
    fn default() -> Self {
        Self::new(TACHO_MOTOR_ROOT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with_device(device: &str) -> (TempDir, AttributeStore) {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(device)).unwrap();
        let store = AttributeStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_attribute_file_names() {
        assert_eq!(Attribute::Port.file_name(), "port_name");
        assert_eq!(Attribute::SpeedWrite.file_name(), "pulses_per_second_sp");
        assert_eq!(Attribute::DutyCycleRead.file_name(), "duty_cycle");
        assert_eq!(Attribute::Run.file_name(), "run");
    }

    #[test]
    fn test_read_strips_trailing_newlines() {
        let (dir, store) = store_with_device("motor0");
        fs::write(dir.path().join("motor0/duty_cycle"), "75\n").unwrap();
        assert_eq!(store.read("motor0", Attribute::DutyCycleRead).unwrap(), "75");

        fs::write(dir.path().join("motor0/stop_mode"), "brake\n\n").unwrap();
        assert_eq!(store.read("motor0", Attribute::StopMode).unwrap(), "brake");
    }

    #[test]
    fn test_read_strips_only_trailing_newlines() {
        let (dir, store) = store_with_device("motor0");
        fs::write(dir.path().join("motor0/port_name"), "outA\n").unwrap();
        assert_eq!(store.read("motor0", Attribute::Port).unwrap(), "outA");

        // interior whitespace is device text, not ours to touch
        fs::write(dir.path().join("motor0/position"), "12 34\n").unwrap();
        assert_eq!(store.read("motor0", Attribute::Position).unwrap(), "12 34");
    }

    #[test]
    fn test_write_overwrites() {
        let (dir, store) = store_with_device("motor0");
        store.write("motor0", Attribute::SpeedWrite, 1500).unwrap();
        store.write("motor0", Attribute::SpeedWrite, -20).unwrap();
        let stored = fs::read_to_string(dir.path().join("motor0/pulses_per_second_sp")).unwrap();
        assert_eq!(stored, "-20");
    }

    #[test]
    fn test_missing_device_is_io_error() {
        let (_dir, store) = store_with_device("motor0");
        let err = store.read("motor7", Attribute::Run).unwrap_err();
        assert!(matches!(err, MotorError::Io(_)));

        let err = store.write("motor7", Attribute::Run, 1).unwrap_err();
        assert!(matches!(err, MotorError::Io(_)));
    }

    #[test]
    fn test_missing_attribute_is_io_error() {
        let (_dir, store) = store_with_device("motor0");
        let err = store.read("motor0", Attribute::Position).unwrap_err();
        assert!(matches!(err, MotorError::Io(_)));
    }
}

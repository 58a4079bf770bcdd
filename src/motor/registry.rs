// Port-to-device resolution
//
// The kernel names motor directories by detection order (motor0, motor1,
// ...), not by which socket the cable is in. Each device reports its socket
// through the port_name attribute, so finding "the motor in port A" is a
// linear scan over the current listing.

use std::fmt;
use std::fs;

use tracing::{debug, warn};

use super::attributes::{Attribute, AttributeStore, Result};

/// Physical output socket on the controller hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Port {
    A,
    B,
    C,
    D,
}

/// All output ports, in label order
pub const ALL_PORTS: [Port; 4] = [Port::A, Port::B, Port::C, Port::D];

impl Port {
    /// Platform name reported by a device's port_name attribute.
    pub fn name(self) -> &'static str {
        match self {
            Port::A => "outA",
            Port::B => "outB",
            Port::C => "outC",
            Port::D => "outD",
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handle to a detected motor: the name of its device directory.
///
/// Purely a lookup key. The device can be unplugged at any time, so callers
/// re-resolve the port rather than holding on to a handle across operations
/// they expect to survive a replug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Motor(String);

impl Motor {
    pub fn new(device: impl Into<String>) -> Self {
        Self(device.into())
    }

    /// Device directory name under the class root.
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Motor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Enumerates detected motors and resolves ports to device directories.
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    store: AttributeStore,
}

impl DeviceRegistry {
    pub fn new(store: AttributeStore) -> Self {
        Self { store }
    }

    /// List the device directory names currently visible under the root.
    ///
    /// Order is whatever the kernel hands back, no stability guaranteed.
    pub fn list_devices(&self) -> Result<Vec<String>> {
        let mut devices = Vec::new();
        for entry in fs::read_dir(self.store.root())? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                devices.push(name.to_string());
            }
        }
        debug!("detected devices: {:?}", devices);
        Ok(devices)
    }

    /// Find the motor plugged into `port`, if any.
    ///
    /// Scans the current listing and returns the first device whose
    /// port_name attribute matches. `Ok(None)` means nothing is plugged into
    /// that port. A device that vanishes between listing and the attribute
    /// read is skipped so the remaining ports stay reachable.
    pub fn resolve_port(&self, port: Port) -> Result<Option<Motor>> {
        let target = port.name();
        for device in self.list_devices()? {
            match self.store.read(&device, Attribute::Port) {
                Ok(name) if name == target => {
                    debug!("port {} resolved to {}", port, device);
                    return Ok(Some(Motor::new(device)));
                }
                Ok(_) => {}
                Err(e) => warn!("skipping device {}: {}", device, e),
            }
        }
        debug!("no device found in port {}", port);
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fake_root(devices: &[(&str, Option<&str>)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (device, port) in devices {
            fs::create_dir(dir.path().join(device)).unwrap();
            if let Some(port) = port {
                fs::write(dir.path().join(device).join("port_name"), format!("{port}\n"))
                    .unwrap();
            }
        }
        dir
    }

    fn registry(dir: &TempDir) -> DeviceRegistry {
        DeviceRegistry::new(AttributeStore::new(dir.path()))
    }

    #[test]
    fn test_list_devices() {
        let dir = fake_root(&[("motor0", Some("outA")), ("motor1", Some("outB"))]);
        let mut devices = registry(&dir).list_devices().unwrap();
        devices.sort();
        assert_eq!(devices, vec!["motor0", "motor1"]);
    }

    #[test]
    fn test_list_devices_ignores_plain_files() {
        let dir = fake_root(&[("motor0", Some("outA"))]);
        fs::write(dir.path().join("uevent"), "").unwrap();
        assert_eq!(registry(&dir).list_devices().unwrap(), vec!["motor0"]);
    }

    #[test]
    fn test_resolve_port_finds_matching_device() {
        let dir = fake_root(&[("motor0", Some("outB")), ("motor1", Some("outA"))]);
        let motor = registry(&dir).resolve_port(Port::A).unwrap().unwrap();
        assert_eq!(motor.id(), "motor1");
    }

    #[test]
    fn test_resolve_port_empty_when_no_match() {
        let dir = fake_root(&[("motor0", Some("outB"))]);
        assert_eq!(registry(&dir).resolve_port(Port::C).unwrap(), None);
    }

    #[test]
    fn test_resolve_port_skips_device_without_port_attribute() {
        // A device unplugged between listing and read loses its attributes;
        // resolution should still reach the other devices.
        let dir = fake_root(&[("motor0", None), ("motor1", Some("outD"))]);
        let motor = registry(&dir).resolve_port(Port::D).unwrap().unwrap();
        assert_eq!(motor.id(), "motor1");
    }

    #[test]
    fn test_resolve_port_missing_root_is_error() {
        let registry = DeviceRegistry::new(AttributeStore::new("/nonexistent/tacho-motor"));
        assert!(registry.resolve_port(Port::A).is_err());
    }

    #[test]
    fn test_port_names() {
        assert_eq!(Port::A.name(), "outA");
        assert_eq!(Port::D.name(), "outD");
        assert_eq!(ALL_PORTS.len(), 4);
    }
}

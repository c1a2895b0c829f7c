//! Battery charge sources for the battery status field.

use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Something that can report the current battery charge.
pub trait BatterySource {
    /// Charge in percent, `None` when it cannot be read.
    fn charge_percent(&self) -> Option<u8>;
}

/// Reads a Linux power-supply `capacity` file.
#[derive(Clone, Debug)]
pub struct SysfsBattery {
    path: PathBuf,
}

impl SysfsBattery {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BatterySource for SysfsBattery {
    fn charge_percent(&self) -> Option<u8> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(path = %self.path.display(), "battery capacity unavailable: {}", e);
                return None;
            }
        };

        contents
            .trim()
            .parse::<u8>()
            .ok()
            .map(|percent| percent.min(100))
    }
}

/// Always reports the same charge. Used by demo mode and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedBattery(pub Option<u8>);

impl BatterySource for FixedBattery {
    fn charge_percent(&self) -> Option<u8> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_sysfs_battery_reads_capacity() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "76").unwrap();

        let battery = SysfsBattery::new(file.path());
        assert_eq!(battery.charge_percent(), Some(76));
    }

    #[test]
    fn test_sysfs_battery_rejects_garbage() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "full").unwrap();

        let battery = SysfsBattery::new(file.path());
        assert_eq!(battery.charge_percent(), None);
    }

    #[test]
    fn test_missing_battery() {
        let battery = SysfsBattery::new("/nonexistent/capacity");
        assert_eq!(battery.charge_percent(), None);
    }
}

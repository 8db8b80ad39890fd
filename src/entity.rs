//! Entity identity
//!
//! Every per-game record and asset is keyed by the hardware-style serial,
//! falling back to the checksum string when the serial is unknown.

/// Identifiers known for one configured item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityId {
    pub serial: String,
    pub checksum: String,
}

impl EntityId {
    pub fn new(serial: impl Into<String>, checksum: impl Into<String>) -> Self {
        Self {
            serial: serial.into(),
            checksum: checksum.into(),
        }
    }

    /// Identity with only a serial
    pub fn serial(serial: impl Into<String>) -> Self {
        Self::new(serial, "")
    }

    /// The key used for file names, or `None` when neither identifier is set.
    pub fn key(&self) -> Option<&str> {
        let serial = self.serial.trim();
        if !serial.is_empty() {
            return Some(serial);
        }
        let checksum = self.checksum.trim();
        if !checksum.is_empty() {
            return Some(checksum);
        }
        None
    }
}

impl From<&str> for EntityId {
    fn from(serial: &str) -> Self {
        Self::serial(serial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_preferred_over_checksum() {
        let id = EntityId::new("SLUS-20062", "A1B2C3D4");
        assert_eq!(id.key(), Some("SLUS-20062"));
    }

    #[test]
    fn test_checksum_fallback() {
        let id = EntityId::new("", "A1B2C3D4");
        assert_eq!(id.key(), Some("A1B2C3D4"));

        let id = EntityId::new("   ", "A1B2C3D4");
        assert_eq!(id.key(), Some("A1B2C3D4"));
    }

    #[test]
    fn test_no_identifier() {
        assert_eq!(EntityId::default().key(), None);
        assert_eq!(EntityId::new(" ", "").key(), None);
    }
}

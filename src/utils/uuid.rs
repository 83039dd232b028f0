use uuid::Uuid;
use std::fmt;
use std::str::FromStr;

#[derive(
    Ord, PartialOrd, PartialEq, Eq, Hash,
    Copy, Clone,
    Serialize, Deserialize
)]
pub struct UUID {
    bytes: [u8; 16],
}

pub static NIL_UUID: UUID = UUID { bytes: [0u8; 16] };

impl UUID {
    pub fn rand() -> UUID {
        let uuid = Uuid::new_v4();
        UUID {
            bytes: *(uuid.as_bytes())
        }
    }
    pub fn nil() -> UUID {
        NIL_UUID
    }
    pub fn from_bytes(bytes: [u8; 16]) -> UUID {
        UUID { bytes }
    }
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.bytes
    }
}

impl fmt::Display for UUID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, b) in self.bytes.iter().enumerate() {
            if i == 4 || i == 6 || i == 8 || i == 10 {
                write!(f, "-")?;
            }
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl fmt::Debug for UUID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "UUID({})", self)
    }
}

impl FromStr for UUID {
    type Err = String;

    fn from_str(s: &str) -> Result<UUID, String> {
        let uuid = Uuid::parse_str(s).map_err(|e| format!("invalid uuid {}: {:?}", s, e))?;
        Ok(UUID {
            bytes: *(uuid.as_bytes())
        })
    }
}

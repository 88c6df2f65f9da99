//! USB descriptor strings and the packets that write them.

use crate::Error;
use crate::commands::{Command, StringDescriptor};
use crate::constants::{MAX_STRING_UNITS, STRING_PACKETS};

/// USB string descriptor type, sent in the first packet after the length byte.
const STRING_DESCRIPTOR_TYPE: u16 = 0x03;

/// String with at most 63 UTF-16 code units.
///
/// The manufacturer and product strings stored by the MCP2200 are limited to
/// 126 bytes of UTF-16-encoded text. Longer strings are refused when the
/// `DeviceString` is created, so nothing is sent to the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceString(String);

impl TryFrom<String> for DeviceString {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let length = value.encode_utf16().count();
        if length <= MAX_STRING_UNITS {
            Ok(Self(value))
        } else {
            Err(Error::StringTooLong { length })
        }
    }
}

impl TryFrom<&str> for DeviceString {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_from(value.to_owned())
    }
}

impl std::str::FromStr for DeviceString {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl std::fmt::Display for DeviceString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl DeviceString {
    /// The string as UTF-8.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split the string into the 16 Set String packets written to the device.
    ///
    /// Packet 0 starts with the descriptor header, a length byte (covering the
    /// header and the text) followed by the descriptor type 0x03, and then carries
    /// the first 3 code units. Packets 1 to 15 carry 4 code units each. Slots past
    /// the end of the string are zero.
    pub(crate) fn packets(&self, descriptor: StringDescriptor) -> [Command; STRING_PACKETS] {
        let units: Vec<u16> = self.0.encode_utf16().collect();
        // At most 63 units, so the byte length (128 at most) fits the length byte.
        let byte_length = (units.len() * 2 + 2) as u16;
        let header = STRING_DESCRIPTOR_TYPE | (byte_length << 8);

        // Lay out every slot of every packet: the header, the text, then padding.
        let mut slots = [0u16; STRING_PACKETS * 4];
        slots[0] = header;
        slots[1..=units.len()].copy_from_slice(&units);

        std::array::from_fn(|index| {
            let mut chars = [0u16; 4];
            chars.copy_from_slice(&slots[index * 4..index * 4 + 4]);
            Command::SetString {
                descriptor,
                index: index as u8,
                chars,
            }
        })
    }
}

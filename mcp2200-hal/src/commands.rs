//! HID commands understood by the MCP2200 and the responses it returns.
//!
//! Every command and response is a 16-byte report. Byte 0 selects the command,
//! and the remaining 15 bytes are interpreted according to that command. All
//! multi-byte integers are big-endian.

use crate::configuration::Configuration;
use crate::constants::REPORT_SIZE;

/// Command code written to byte 0 of every report.
///
/// Each command occupies its own bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum CommandType {
    /// Change the USB VID/PID or descriptor strings.
    BaseConfigure = 0x01,
    /// Drive GPIO outputs high or low.
    SetClearOutputs = 0x08,
    /// Write the chip configuration.
    Configure = 0x10,
    /// Read one byte of user EEPROM.
    ReadEeprom = 0x20,
    /// Write one byte of user EEPROM.
    WriteEeprom = 0x40,
    /// Read the configuration and current GPIO values.
    ReadAll = 0x80,
}

/// What a Base Configure command changes (byte 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum ConfigurationType {
    SetVidPid = 0x00,
    SetManufacturer = 0x01,
    SetProduct = 0x02,
}

/// USB descriptor strings that can be rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringDescriptor {
    /// USB manufacturer descriptor.
    Manufacturer,
    /// USB product descriptor.
    Product,
}

impl From<StringDescriptor> for ConfigurationType {
    fn from(value: StringDescriptor) -> Self {
        match value {
            StringDescriptor::Manufacturer => Self::SetManufacturer,
            StringDescriptor::Product => Self::SetProduct,
        }
    }
}

/// A single command sent to the MCP2200.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    /// Set and clear GPIO outputs.
    ///
    /// Pins with their bit set in `set` are driven high, those in `clear` are
    /// driven low. Bytes 11 and 12.
    SetClearOutputs { set: u8, clear: u8 },
    /// Write the chip configuration (bytes 4 to 9).
    Configure(Configuration),
    /// Request the configuration and GPIO values.
    ReadAll,
    /// Read the EEPROM byte at `address` (byte 1).
    ReadEeprom { address: u8 },
    /// Write `value` (byte 2) to the EEPROM at `address` (byte 1).
    WriteEeprom { address: u8, value: u8 },
    /// Change the USB vendor and product IDs (bytes 2..=3 and 4..=5).
    SetVidPid { vendor_id: u16, product_id: u16 },
    /// One packet of a descriptor string write.
    ///
    /// `index` (byte 2) counts from 0 to 15, and `chars` are four UTF-16 code units
    /// at bytes 3 to 10. Packet 0 uses its first slot for the descriptor header.
    SetString {
        descriptor: StringDescriptor,
        index: u8,
        chars: [u16; 4],
    },
}

impl Command {
    pub(crate) fn command_type(&self) -> CommandType {
        match self {
            Command::SetClearOutputs { .. } => CommandType::SetClearOutputs,
            Command::Configure(_) => CommandType::Configure,
            Command::ReadAll => CommandType::ReadAll,
            Command::ReadEeprom { .. } => CommandType::ReadEeprom,
            Command::WriteEeprom { .. } => CommandType::WriteEeprom,
            Command::SetVidPid { .. } | Command::SetString { .. } => CommandType::BaseConfigure,
        }
    }

    /// True if the device answers this command with a report.
    pub(crate) fn has_response(&self) -> bool {
        matches!(self, Command::ReadAll | Command::ReadEeprom { .. })
    }

    /// Encode the command as the 16-byte report sent to the device.
    ///
    /// Bytes not used by the command are zero.
    pub(crate) fn to_report(&self) -> [u8; REPORT_SIZE] {
        let mut buf = [0u8; REPORT_SIZE];
        buf[0] = self.command_type() as u8;
        match *self {
            Command::SetClearOutputs { set, clear } => {
                buf[11] = set;
                buf[12] = clear;
            }
            Command::Configure(configuration) => configuration.apply_to_report(&mut buf),
            Command::ReadAll => {}
            Command::ReadEeprom { address } => buf[1] = address,
            Command::WriteEeprom { address, value } => {
                buf[1] = address;
                buf[2] = value;
            }
            Command::SetVidPid {
                vendor_id,
                product_id,
            } => {
                buf[1] = ConfigurationType::SetVidPid as u8;
                buf[2..=3].copy_from_slice(&vendor_id.to_be_bytes());
                buf[4..=5].copy_from_slice(&product_id.to_be_bytes());
            }
            Command::SetString {
                descriptor,
                index,
                chars,
            } => {
                buf[1] = ConfigurationType::from(descriptor) as u8;
                buf[2] = index;
                for (slot, unit) in chars.iter().enumerate() {
                    let pos = 3 + 2 * slot;
                    buf[pos..pos + 2].copy_from_slice(&unit.to_be_bytes());
                }
            }
        }
        buf
    }
}

/// Response to the Read All command.
///
/// Contains the chip configuration, the current GPIO pin values, and the EEPROM
/// address and value fields echoed by the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadAllResponse {
    /// Chip configuration.
    pub configuration: Configuration,
    /// Current logic level of each GP pin (byte 10).
    pub gpio_values: u8,
    /// EEPROM address field (byte 1).
    pub eeprom_address: u8,
    /// EEPROM value field (byte 3).
    pub eeprom_value: u8,
}

impl ReadAllResponse {
    pub(crate) fn from_report(buf: &[u8; REPORT_SIZE]) -> Self {
        Self {
            configuration: Configuration::from_report(buf),
            gpio_values: buf[10],
            eeprom_address: buf[1],
            eeprom_value: buf[3],
        }
    }
}

/// Response to the Read EEPROM command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EepromResponse {
    pub(crate) address: u8,
    pub(crate) value: u8,
}

impl EepromResponse {
    pub(crate) fn from_report(buf: &[u8; REPORT_SIZE]) -> Self {
        Self {
            address: buf[1],
            value: buf[3],
        }
    }
}

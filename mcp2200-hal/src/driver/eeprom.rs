use super::MCP2200;
use crate::Error;
use crate::commands::{Command, EepromResponse};
use crate::transport::Transport;

/// # User EEPROM
///
/// The MCP2200 has 256 bytes of EEPROM for application use. It is read and
/// written one byte at a time.
impl<T: Transport> MCP2200<T> {
    /// Read the EEPROM byte at `address`.
    pub fn eeprom_read(&self, address: u8) -> Result<u8, Error> {
        let buf = self.query(&Command::ReadEeprom { address })?;
        let response = EepromResponse::from_report(&buf);
        if response.address != address {
            log::warn!(
                "EEPROM read of {address:#04X} answered for {:#04X}",
                response.address
            );
        }
        Ok(response.value)
    }

    /// Write `value` to the EEPROM byte at `address`.
    pub fn eeprom_write(&self, address: u8, value: u8) -> Result<(), Error> {
        self.send(&Command::WriteEeprom { address, value })
    }
}

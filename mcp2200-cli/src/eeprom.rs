use mcp2200_hal::{MCP2200, Transport};

pub(crate) fn get<T: Transport>(
    device: &MCP2200<T>,
    address: u8,
) -> Result<(), mcp2200_hal::Error> {
    println!("EEPROM value: {:02x}", device.eeprom_read(address)?);
    Ok(())
}

pub(crate) fn set<T: Transport>(
    device: &MCP2200<T>,
    address: u8,
    value: u8,
) -> Result<(), mcp2200_hal::Error> {
    device.eeprom_write(address, value)
}

use mcp2200_hal::{MCP2200, Transport};

use crate::util;

pub(crate) fn get<T: Transport>(device: &MCP2200<T>) -> Result<(), mcp2200_hal::Error> {
    let values = device.gpio_read()?;
    println!("GPIO values: {}", util::bits_to_string(values, '0', '1'));
    Ok(())
}

pub(crate) fn set<T: Transport>(device: &MCP2200<T>, values: u8) -> Result<(), mcp2200_hal::Error> {
    device.gpio_write(values)
}

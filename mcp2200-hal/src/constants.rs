/// Microchip's USB vendor ID.
pub(crate) const MICROCHIP_VID: u16 = 0x04D8;
/// Default USB product ID of the MCP2200.
pub(crate) const MCP2200_PID: u16 = 0x00DF;
/// Size of every HID report exchanged with the MCP2200.
pub(crate) const REPORT_SIZE: usize = 16;
/// Clock from which the UART baud rate divisor is derived.
pub(crate) const BAUD_CLOCK: u32 = 12_000_000;
/// Largest accepted difference between the requested and produced baud rate.
pub(crate) const BAUD_TOLERANCE_PERCENT: u32 = 3;
/// Longest USB descriptor string the MCP2200 accepts, in UTF-16 code units.
pub(crate) const MAX_STRING_UNITS: usize = 63;
/// Number of Set String packets needed for any descriptor string.
pub(crate) const STRING_PACKETS: usize = 16;

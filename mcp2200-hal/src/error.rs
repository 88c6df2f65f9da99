/// Wrapper for problems when communicating with the MCP2200.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Fewer bytes were written to the device than the full report.
    #[error("short write to device: {written} of {expected} bytes")]
    ShortWrite {
        /// Number of bytes that should have been written.
        expected: usize,
        /// Number of bytes actually written.
        written: usize,
    },
    /// Fewer bytes were read from the device than the full report.
    ///
    /// A read that times out without any data is also reported this way, with
    /// `read` set to 0.
    #[error("short read from device: {read} of {expected} bytes")]
    ShortRead {
        /// Number of bytes that should have been read.
        expected: usize,
        /// Number of bytes actually read.
        read: usize,
    },
    /// A USB descriptor string is longer than the MCP2200 can store.
    ///
    /// The limit is 63 UTF-16 code units. The string is rejected before anything
    /// is sent to the device.
    #[error("string is {length} UTF-16 code units long, the maximum is 63")]
    StringTooLong {
        /// Length of the rejected string in UTF-16 code units.
        length: usize,
    },
    /// The requested baud rate cannot be produced by the 16-bit divisor.
    ///
    /// Baud rates must be in the range 184 to 12,000,000, and within 3% of a rate
    /// the divisor can produce.
    #[error("baud rate {0} cannot be configured")]
    BaudRateOutOfRange(u32),
    /// A GP pin could not be used for GPIO because an alternate function owns it.
    ///
    /// The enclosed `u8` is the pin number (0 to 7).
    #[error("GP{0} is reserved by an alternate function")]
    PinReserved(u8),
    /// A GP pin's direction changed underneath the pin struct.
    ///
    /// This happens when the device configuration is altered after the pin was
    /// configured, for instance by another program.
    #[error("GP{0} is no longer configured as expected")]
    PinModeChanged(u8),
    /// An error occurred in the underlying USB HID library.
    #[error(transparent)]
    HidApi(#[from] hidapi::HidError),
}

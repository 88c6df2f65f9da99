//! Exchange of raw 16-byte reports with the device.

use std::time::Duration;

use hidapi::HidDevice;

use crate::Error;
use crate::constants::REPORT_SIZE;

/// Sends and receives MCP2200 HID reports.
///
/// [`MCP2200`] is generic over this trait so the protocol logic can be driven
/// without hardware. It is implemented for [`hidapi::HidDevice`].
///
/// [`MCP2200`]: crate::MCP2200
pub trait Transport {
    /// Write one complete report to the device.
    fn write_report(&self, report: &[u8; REPORT_SIZE]) -> Result<(), Error>;

    /// Read one complete report from the device.
    ///
    /// With `timeout` set to `None` the read blocks until a report arrives.
    fn read_report(&self, timeout: Option<Duration>) -> Result<[u8; REPORT_SIZE], Error>;
}

impl Transport for HidDevice {
    fn write_report(&self, report: &[u8; REPORT_SIZE]) -> Result<(), Error> {
        // hidapi expects the report number first. The MCP2200 does not number
        // its reports, so this is 0 and is not sent over the wire.
        let mut out = [0u8; REPORT_SIZE + 1];
        out[1..].copy_from_slice(report);
        let written = self.write(&out)?;
        if written < REPORT_SIZE {
            return Err(Error::ShortWrite {
                expected: REPORT_SIZE,
                written,
            });
        }
        Ok(())
    }

    fn read_report(&self, timeout: Option<Duration>) -> Result<[u8; REPORT_SIZE], Error> {
        let timeout_ms = match timeout {
            Some(duration) => i32::try_from(duration.as_millis()).unwrap_or(i32::MAX),
            None => -1,
        };
        let mut buf = [0u8; REPORT_SIZE];
        let read = self.read_timeout(&mut buf, timeout_ms)?;
        if read != REPORT_SIZE {
            return Err(Error::ShortRead {
                expected: REPORT_SIZE,
                read,
            });
        }
        Ok(buf)
    }
}

use std::ffi::{CStr, CString};

use hidapi::{HidApi, HidDevice};

use super::MCP2200;
use crate::Error;
use crate::commands::{Command, StringDescriptor};
use crate::constants::{MCP2200_PID, MICROCHIP_VID};
use crate::descriptor::DeviceString;
use crate::transport::Transport;

/// USB HID device found during enumeration.
///
/// Strings the host could not read from the device are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInformation {
    /// Platform-specific device path, usable with [`MCP2200::open_path`].
    pub path: CString,
    /// USB serial number string.
    pub serial_number: Option<String>,
    /// USB manufacturer string.
    pub manufacturer: Option<String>,
    /// USB product string.
    pub product: Option<String>,
    /// Device release number in binary-coded decimal.
    pub release_number: u16,
}

impl DeviceInformation {
    /// Release number formatted as `major.minor`, eg "1.00".
    pub fn release(&self) -> String {
        format!(
            "{:x}.{:02x}",
            self.release_number >> 8,
            self.release_number & 0xFF
        )
    }
}

impl From<&hidapi::DeviceInfo> for DeviceInformation {
    fn from(info: &hidapi::DeviceInfo) -> Self {
        Self {
            path: info.path().to_owned(),
            serial_number: info.serial_number().map(str::to_owned),
            manufacturer: info.manufacturer_string().map(str::to_owned),
            product: info.product_string().map(str::to_owned),
            release_number: info.release_number(),
        }
    }
}

/// List the HID devices with the given vendor and product ID.
///
/// Devices are taken from the list enumerated when `api` was created or last
/// refreshed with [`HidApi::refresh_devices`].
pub fn list_devices(api: &HidApi, vendor_id: u16, product_id: u16) -> Vec<DeviceInformation> {
    let devices: Vec<DeviceInformation> = api
        .device_list()
        .filter(|info| info.vendor_id() == vendor_id && info.product_id() == product_id)
        .map(DeviceInformation::from)
        .collect();
    log::debug!(
        "found {} device(s) with VID {vendor_id:#06X} PID {product_id:#06X}",
        devices.len()
    );
    devices
}

/// # USB device functionality
impl MCP2200 {
    /// Open the first USB device found with the default vendor and product ID.
    ///
    /// The default VID is 1240 (0x4D8) and PID 223 (0xDF).
    ///
    /// # Errors
    ///
    /// An error will be returned if the USB device cannot be opened.
    pub fn open(api: &HidApi) -> Result<Self, Error> {
        MCP2200::open_with_vid_and_pid(api, MICROCHIP_VID, MCP2200_PID)
    }

    /// Open the first USB device found with the given vendor and product ID.
    ///
    /// Use this function if you have changed the USB VID or PID of your MCP2200.
    ///
    /// # Errors
    ///
    /// An error will be returned if the USB device cannot be opened.
    pub fn open_with_vid_and_pid(
        api: &HidApi,
        vendor_id: u16,
        product_id: u16,
    ) -> Result<Self, Error> {
        let device = api.open(vendor_id, product_id)?;
        Ok(Self::from_transport(device))
    }

    /// Open the USB device with the given vendor ID, product ID and serial number.
    ///
    /// # Errors
    ///
    /// An error will be returned if the USB device cannot be opened.
    pub fn open_with_serial(
        api: &HidApi,
        vendor_id: u16,
        product_id: u16,
        serial_number: &str,
    ) -> Result<Self, Error> {
        let device = api.open_serial(vendor_id, product_id, serial_number)?;
        Ok(Self::from_transport(device))
    }

    /// Open the USB device at the given platform-specific path.
    ///
    /// Paths are listed by [`list_devices`].
    ///
    /// # Errors
    ///
    /// An error will be returned if the USB device cannot be opened.
    pub fn open_path(api: &HidApi, path: &CStr) -> Result<Self, Error> {
        let device = api.open_path(path)?;
        Ok(Self::from_transport(device))
    }

    /// Get the USB HID device information from the host's USB interface.
    ///
    /// # Errors
    ///
    /// An error will be returned if the device information cannot be returned
    /// from the underlying USB interface.
    pub fn usb_device_info(&self) -> Result<DeviceInformation, Error> {
        let info = self.inner.get_device_info()?;
        Ok(DeviceInformation::from(&info))
    }

    /// USB manufacturer string as reported to the host.
    pub fn manufacturer(&self) -> Result<Option<String>, Error> {
        Ok(self.inner.get_manufacturer_string()?)
    }

    /// USB product string as reported to the host.
    pub fn product(&self) -> Result<Option<String>, Error> {
        Ok(self.inner.get_product_string()?)
    }

    /// USB serial number string as reported to the host.
    pub fn serial_number(&self) -> Result<Option<String>, Error> {
        Ok(self.inner.get_serial_number_string()?)
    }

    /// Underlying [`hidapi`] device.
    pub fn hid_device(&self) -> &HidDevice {
        &self.inner
    }
}

/// # USB descriptor changes
///
/// These are stored in the MCP2200's flash and take effect when the device next
/// enumerates with the host.
impl<T: Transport> MCP2200<T> {
    /// Change the USB vendor and product IDs.
    ///
    /// <div class="warning">
    ///
    /// After re-enumeration the device can only be opened with the new IDs.
    ///
    /// </div>
    pub fn set_vid_pid(&self, vendor_id: u16, product_id: u16) -> Result<(), Error> {
        self.send(&Command::SetVidPid {
            vendor_id,
            product_id,
        })
    }

    /// Change the USB manufacturer string.
    ///
    /// See [`MCP2200::set_string`].
    pub fn set_manufacturer(&self, manufacturer: &DeviceString) -> Result<(), Error> {
        self.set_string(StringDescriptor::Manufacturer, manufacturer)
    }

    /// Change the USB product string.
    ///
    /// See [`MCP2200::set_string`].
    pub fn set_product(&self, product: &DeviceString) -> Result<(), Error> {
        self.set_string(StringDescriptor::Product, product)
    }

    /// Write a USB descriptor string.
    ///
    /// The string is always sent as 16 separate packets.
    ///
    /// <div class="warning">
    ///
    /// If writing a packet fails the remaining packets are not sent, and the device
    /// is left holding a partially updated string. Write the string again to
    /// recover.
    ///
    /// </div>
    pub fn set_string(
        &self,
        descriptor: StringDescriptor,
        value: &DeviceString,
    ) -> Result<(), Error> {
        for (index, packet) in value.packets(descriptor).iter().enumerate() {
            log::trace!("{descriptor:?} string packet {index}");
            if let Err(e) = self.send(packet) {
                log::warn!("{descriptor:?} string write stopped at packet {index} of 16: {e}");
                return Err(e);
            }
        }
        Ok(())
    }
}

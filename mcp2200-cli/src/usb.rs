use std::ffi::CString;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Args;
use hidapi::HidApi;
use mcp2200_hal::{DeviceString, MCP2200, Transport};

use crate::cli::Target;
use crate::util;

/// Open the device chosen by the command-line options.
///
/// A path wins over a serial number, which wins over the first device found with
/// the vendor and product ID.
pub(crate) fn open(api: &HidApi, target: &Target) -> anyhow::Result<MCP2200> {
    let mut device = if let Some(path) = &target.path {
        let c_path = CString::new(path.as_str()).context("device path contains a NUL byte")?;
        MCP2200::open_path(api, &c_path)
            .with_context(|| format!("could not open device ({path})"))?
    } else if let Some(serial) = &target.serial {
        MCP2200::open_with_serial(api, target.vid, target.pid, serial).with_context(|| {
            format!(
                "could not open device (vendor ID: {:04x}, product ID: {:04x}, serial: {serial})",
                target.vid, target.pid
            )
        })?
    } else {
        MCP2200::open_with_vid_and_pid(api, target.vid, target.pid).with_context(|| {
            format!(
                "could not open device (vendor ID: {:04x}, product ID: {:04x})",
                target.vid, target.pid
            )
        })?
    };
    device.set_read_timeout(target.timeout.map(Duration::from_millis));
    Ok(device)
}

/// Print one line per matching device.
pub(crate) fn list(api: &HidApi, target: &Target) -> anyhow::Result<()> {
    let devices = mcp2200_hal::list_devices(api, target.vid, target.pid);
    if devices.is_empty() {
        bail!(
            "no devices found (vendor ID: {:04x}, product ID: {:04x})",
            target.vid,
            target.pid
        );
    }
    for (index, info) in devices.iter().enumerate() {
        println!(
            "{:>3}, {:?}, {:?}, {:?}, {:?}",
            index + 1,
            info.manufacturer.as_deref().unwrap_or_default(),
            info.product.as_deref().unwrap_or_default(),
            info.serial_number.as_deref().unwrap_or_default(),
            info.path.to_string_lossy(),
        );
    }
    Ok(())
}

#[derive(Debug, Args)]
pub(crate) struct DescribeArgs {
    /// New USB manufacturer string, up to 63 UTF-16 code units.
    #[arg(short = 'm', long, value_parser = device_string)]
    set_manufacturer: Option<DeviceString>,
    /// New USB product string, up to 63 UTF-16 code units.
    #[arg(short = 'p', long, value_parser = device_string)]
    set_product: Option<DeviceString>,
    /// New USB vendor ID in hexadecimal.
    ///
    /// If only one of the IDs is given, the other is taken from --vid or --pid.
    #[arg(long, value_parser = util::u16_from_hex)]
    set_vendor_id: Option<u16>,
    /// New USB product ID in hexadecimal.
    #[arg(long, value_parser = util::u16_from_hex)]
    set_product_id: Option<u16>,
}

fn device_string(value: &str) -> Result<DeviceString, String> {
    value.parse().map_err(|e: mcp2200_hal::Error| e.to_string())
}

/// Print or change the USB descriptors.
///
/// Changes are stored on the device and shown once it re-enumerates.
pub(crate) fn describe(
    device: &MCP2200,
    target: &Target,
    args: DescribeArgs,
) -> anyhow::Result<()> {
    if args.set_manufacturer.is_none()
        && args.set_product.is_none()
        && args.set_vendor_id.is_none()
        && args.set_product_id.is_none()
    {
        println!("Manufacturer: {}", device.manufacturer()?.unwrap_or_default());
        println!("Product: {}", device.product()?.unwrap_or_default());
        println!("Serial: {}", device.serial_number()?.unwrap_or_default());
        return Ok(());
    }
    write_description(device, target, args)
}

fn write_description<T: Transport>(
    device: &MCP2200<T>,
    target: &Target,
    args: DescribeArgs,
) -> anyhow::Result<()> {
    let DescribeArgs {
        set_manufacturer,
        set_product,
        set_vendor_id,
        set_product_id,
    } = args;
    if let Some(manufacturer) = set_manufacturer {
        device
            .set_manufacturer(&manufacturer)
            .context("could not write the manufacturer string")?;
    }
    if let Some(product) = set_product {
        device
            .set_product(&product)
            .context("could not write the product string")?;
    }
    if set_vendor_id.is_some() || set_product_id.is_some() {
        device
            .set_vid_pid(
                set_vendor_id.unwrap_or(target.vid),
                set_product_id.unwrap_or(target.pid),
            )
            .context("could not write the vendor/product IDs")?;
    }
    Ok(())
}

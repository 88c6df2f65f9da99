use crate::configure::ConfigureArgs;
use crate::usb::DescribeArgs;
use crate::util;

use clap::{Args, Parser};

/// CLI for the MCP2200 USB to UART converter
///
/// This exposes the configuration of the Microchip MCP2200 via the command
/// line: GPIO values, power-up pin directions and values, LED and indicator pin
/// functions, UART options, the user EEPROM, and the USB descriptors.
///
/// Bit strings list GP0 first. For GPIO values, 0/f and 1/t are accepted. For
/// GPIO directions, o (output) and i (input) read more naturally.
///
/// Set RUST_LOG (or pass --verbose) to see the reports exchanged with the
/// device.
#[derive(Debug, Parser)]
#[command(name = "mcp2200ctl", version, about)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) target: Target,
    /// Log every report sent to and received from the device.
    #[arg(short, long)]
    pub(crate) verbose: bool,
    #[command(subcommand)]
    pub(crate) command: Commands,
}

/// Which device to talk to.
///
/// A device path is used if given, then a serial number, and otherwise the
/// first device with the vendor and product ID.
#[derive(Debug, Args)]
pub(crate) struct Target {
    /// Device vendor ID in hexadecimal
    #[arg(
        long = "vid",
        env = "MCP2200_VID",
        default_value = "0x04D8",
        value_parser = util::u16_from_hex
    )]
    pub(crate) vid: u16,
    /// Device product ID in hexadecimal
    #[arg(
        long = "pid",
        env = "MCP2200_PID",
        default_value = "0x00DF",
        value_parser = util::u16_from_hex
    )]
    pub(crate) pid: u16,
    /// Device serial number
    #[arg(short = 'S', long, env = "MCP2200_SERIAL")]
    pub(crate) serial: Option<String>,
    /// Platform-specific device path, as shown by the list command
    #[arg(long, env = "MCP2200_PATH")]
    pub(crate) path: Option<String>,
    /// How long to wait for the device to answer, in milliseconds
    #[arg(long, env = "MCP2200_TIMEOUT")]
    pub(crate) timeout: Option<u64>,
}

#[derive(Debug, Parser)]
pub(crate) enum Commands {
    /// List connected devices.
    List,
    /// Read the GPIO values.
    Get,
    /// Set the GPIO values.
    ///
    /// Pins used by an LED or USB indicator function are left unchanged.
    Set {
        /// Up to eight bits, GP0 first.
        #[arg(value_parser = util::bits_from_str)]
        values: u8,
    },
    /// Read or change the device configuration.
    ///
    /// Without options, the full configuration is printed.
    Configure(ConfigureArgs),
    /// Read or change the USB device description.
    ///
    /// Without options, the manufacturer, product and serial number strings
    /// are printed.
    Describe(DescribeArgs),
    /// Read a byte of the user EEPROM.
    GetEeprom {
        /// EEPROM address, 0 to 255.
        #[arg(short, long)]
        address: u8,
    },
    /// Write a byte of the user EEPROM.
    SetEeprom {
        /// EEPROM address, 0 to 255.
        #[arg(short, long)]
        address: u8,
        /// New value in hexadecimal.
        #[arg(value_parser = util::u8_from_hex)]
        value: u8,
    },
}

use clap::builder::BoolishValueParser;
use clap::{Args, ValueEnum};
use mcp2200_hal::{MCP2200, ReadAllResponse, Transport};

use crate::util::{self, on_off};

#[derive(Debug, Args)]
pub(crate) struct ConfigureArgs {
    /// GPIO directions, GP0 first (o for output, i for input).
    ///
    /// Pins used by an LED or USB indicator function are left unchanged.
    #[arg(short, long, value_parser = util::bits_from_str)]
    direction: Option<u8>,
    /// Power-up GPIO output values, GP0 first.
    #[arg(short = 'D', long, value_parser = util::bits_from_str)]
    default: Option<u8>,
    /// Receive LED (GP6) mode.
    #[arg(short, long)]
    rxled: Option<LedMode>,
    /// Transmit LED (GP7) mode.
    #[arg(short, long)]
    txled: Option<LedMode>,
    /// LED blink speed.
    #[arg(short, long)]
    blink: Option<BlinkSpeed>,
    /// Invert the RX, TX, RTS and CTS pins.
    #[arg(short, long, value_parser = BoolishValueParser::new())]
    invert: Option<bool>,
    /// Use GP0 as the USB suspend indicator.
    #[arg(short, long, value_parser = BoolishValueParser::new())]
    suspend: Option<bool>,
    /// Use GP1 as the USB configured indicator.
    #[arg(short, long, value_parser = BoolishValueParser::new())]
    configuration: Option<bool>,
    /// RTS/CTS hardware flow control.
    #[arg(short, long, value_parser = BoolishValueParser::new())]
    flow: Option<bool>,
    /// Default UART baud rate.
    #[arg(long)]
    baud: Option<u32>,
}

impl ConfigureArgs {
    fn is_empty(&self) -> bool {
        self.direction.is_none()
            && self.default.is_none()
            && self.rxled.is_none()
            && self.txled.is_none()
            && self.blink.is_none()
            && self.invert.is_none()
            && self.suspend.is_none()
            && self.configuration.is_none()
            && self.flow.is_none()
            && self.baud.is_none()
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum LedMode {
    /// Pin is a GPIO output held low.
    Off,
    /// Pin is a GPIO output held high.
    On,
    /// LED blinks on UART activity.
    Blink,
    /// LED toggles on UART activity.
    Toggle,
}

impl From<LedMode> for mcp2200_hal::LedMode {
    fn from(value: LedMode) -> mcp2200_hal::LedMode {
        match value {
            LedMode::Off => mcp2200_hal::LedMode::Off,
            LedMode::On => mcp2200_hal::LedMode::On,
            LedMode::Blink => mcp2200_hal::LedMode::Blink,
            LedMode::Toggle => mcp2200_hal::LedMode::Toggle,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum BlinkSpeed {
    Fast,
    Slow,
}

pub(crate) fn action<T: Transport>(
    device: &MCP2200<T>,
    args: ConfigureArgs,
) -> Result<(), mcp2200_hal::Error> {
    if args.is_empty() {
        print!("{}", format_configuration(&device.read_all()?));
        return Ok(());
    }
    device.configure(|c| {
        // LED and indicator functions first, so the directions and default
        // values below skip the pins they claim.
        if let Some(mode) = args.rxled {
            c.set_rx_led_mode(mode.into());
        }
        if let Some(mode) = args.txled {
            c.set_tx_led_mode(mode.into());
        }
        if let Some(suspend) = args.suspend {
            c.set_suspend(suspend);
        }
        if let Some(configuration) = args.configuration {
            c.set_usb_configure(configuration);
        }
        if let Some(invert) = args.invert {
            c.set_invert(invert);
        }
        if let Some(flow) = args.flow {
            c.set_flow_control(flow);
        }
        if let Some(directions) = args.direction {
            c.set_io_directions(directions);
        }
        if let Some(values) = args.default {
            c.set_default_values(values);
        }
        if let Some(speed) = args.blink {
            c.set_blink_slow(matches!(speed, BlinkSpeed::Slow));
        }
        if let Some(baud) = args.baud {
            c.set_baud_rate(baud)?;
        }
        Ok(())
    })
}

pub(crate) fn format_configuration(response: &ReadAllResponse) -> String {
    let c = &response.configuration;
    format!(
        "Default baud rate: {}\n\
         GPIO directions: {}\n\
         GPIO default values: {}\n\
         GPIO values: {}\n\
         RX LED (GPIO pin 6): {}\n\
         TX LED (GPIO pin 7): {}\n\
         Blink speed: {}\n\
         Invert RX/TX/RTS/CTS: {}\n\
         USB suspend pin (GPIO pin 0): {}\n\
         USB configuration pin (GPIO pin 1): {}\n\
         Hardware flow control RTS/CTS: {}\n",
        c.baud_rate(),
        util::bits_to_string(c.io_directions(), 'o', 'i'),
        util::bits_to_string(c.default_values(), '0', '1'),
        util::bits_to_string(response.gpio_values, '0', '1'),
        c.rx_led_mode(),
        c.tx_led_mode(),
        if c.blink_slow() { "slow" } else { "fast" },
        on_off(c.invert()),
        on_off(c.suspend()),
        on_off(c.usb_configure()),
        on_off(c.flow_control()),
    )
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::time::Duration;

    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use mcp2200_hal::{Configuration, Error};

    const READ_ALL: u8 = 0x80;
    const CONFIGURE: u8 = 0x10;

    /// Answers every read with a fixed Read All report and records writes.
    struct Recorder {
        /// Bytes 4..=9 of the Read All response.
        configuration: [u8; 6],
        written: RefCell<Vec<[u8; 16]>>,
    }

    impl Recorder {
        fn new(configuration: [u8; 6]) -> Self {
            Self {
                configuration,
                written: RefCell::new(Vec::new()),
            }
        }

        fn commands(&self) -> Vec<u8> {
            self.written.borrow().iter().map(|r| r[0]).collect()
        }
    }

    impl Transport for &Recorder {
        fn write_report(&self, report: &[u8; 16]) -> Result<(), Error> {
            self.written.borrow_mut().push(*report);
            Ok(())
        }

        fn read_report(&self, _timeout: Option<Duration>) -> Result<[u8; 16], Error> {
            let mut response = [0u8; 16];
            response[0] = READ_ALL;
            response[4..=9].copy_from_slice(&self.configuration);
            Ok(response)
        }
    }

    fn configure_args(options: &[&str]) -> ConfigureArgs {
        let mut argv = vec!["mcp2200ctl", "configure"];
        argv.extend_from_slice(options);
        match Cli::try_parse_from(argv).expect("valid arguments").command {
            Commands::Configure(args) => args,
            other => panic!("parsed as {other:?}"),
        }
    }

    #[test]
    fn options_are_one_read_modify_write() -> Result<(), Error> {
        // All inputs, 9600 baud.
        let chip = Recorder::new([0xFF, 0x00, 0x00, 0x00, 0x04, 0xE1]);
        let device = MCP2200::from_transport(&chip);

        action(&device, configure_args(&["--rxled", "blink", "--direction", "oooooooo"]))?;

        assert_eq!(chip.commands(), [READ_ALL, CONFIGURE]);
        let written = chip.written.borrow();
        // The RX LED claims GP6 before the directions are applied.
        assert_eq!(written[1][4], 0b0100_0000, "directions");
        assert_eq!(written[1][5], 0b0000_1000, "alternate pins");
        assert_eq!(&written[1][8..=9], &[0x04, 0xE1], "baud divisor kept");
        Ok(())
    }

    #[test]
    fn unusable_baud_rate_writes_nothing() {
        let chip = Recorder::new([0xFF, 0x00, 0x00, 0x00, 0x04, 0xE1]);
        let device = MCP2200::from_transport(&chip);

        for baud in ["100", "7000000"] {
            let result = action(&device, configure_args(&["--flow", "on", "--baud", baud]));
            assert!(matches!(result, Err(Error::BaudRateOutOfRange(_))));
        }
        assert_eq!(chip.commands(), [READ_ALL, READ_ALL]);
    }

    #[test]
    fn no_options_only_reads() -> Result<(), Error> {
        let chip = Recorder::new([0xFF, 0x00, 0x00, 0x00, 0x04, 0xE1]);
        let device = MCP2200::from_transport(&chip);

        action(&device, configure_args(&[]))?;
        assert_eq!(chip.commands(), [READ_ALL]);
        Ok(())
    }

    #[test]
    fn configuration_listing() -> Result<(), Error> {
        let mut configuration = Configuration::default();
        configuration
            .set_rx_led_mode(mcp2200_hal::LedMode::Blink)
            .set_flow_control(true)
            .set_baud_rate(9600)?
            .set_io_directions(0b0000_1111);
        let response = ReadAllResponse {
            configuration,
            gpio_values: 0b0000_0011,
            eeprom_address: 0,
            eeprom_value: 0,
        };

        let listing = format_configuration(&response);
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "Default baud rate: 9600");
        // GP6 is claimed by the RX LED, so its direction bit was left alone.
        assert_eq!(lines[1], "GPIO directions: iiiioooo");
        assert_eq!(lines[3], "GPIO values: 11000000");
        assert_eq!(lines[4], "RX LED (GPIO pin 6): blink");
        assert_eq!(lines[5], "TX LED (GPIO pin 7): off");
        assert_eq!(lines[6], "Blink speed: fast");
        assert_eq!(lines[10], "Hardware flow control RTS/CTS: on");
        Ok(())
    }
}

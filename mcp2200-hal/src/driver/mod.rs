use std::cell::Cell;
use std::time::Duration;

use hidapi::HidDevice;

use crate::Error;
use crate::commands::{Command, ReadAllResponse};
use crate::configuration::{Configuration, LedMode};
use crate::constants::REPORT_SIZE;
use crate::gpio::Pins;
use crate::transport::Transport;

mod eeprom;
mod usb;

pub use usb::{DeviceInformation, list_devices};

/// Driver for the MCP2200.
///
/// # Quick start
///
/// Create a [`hidapi::HidApi`] context and pass it to [`MCP2200::open`], or to
/// [`MCP2200::open_with_vid_and_pid`] if you have changed either of the USB vendor
/// ID (VID) or product ID (PID). The context is only needed while opening the
/// device and listing devices with [`list_devices`].
///
/// ```no_run
/// # fn main() -> Result<(), mcp2200_hal::Error> {
/// use mcp2200_hal::{LedMode, MCP2200};
///
/// let api = hidapi::HidApi::new()?;
/// let device = MCP2200::open(&api)?;
/// device.configure(|c| {
///     c.set_rx_led_mode(LedMode::Blink).set_tx_led_mode(LedMode::Blink);
///     c.set_baud_rate(9600).map(|_| ())
/// })?;
/// # Ok(())
/// # }
/// ```
///
/// Every method is a blocking request (and, for queries, a blocking response)
/// over USB. Configuration changes read the current configuration, alter it, and
/// write it back.
///
/// For GPIO digital input and output, use [`MCP2200::take_pins`] and convert the
/// [`GpPin`] objects into [`Input`] or [`Output`] types, which implement the traits
/// from [`embedded_hal::digital`].
///
/// [`GpPin`]: crate::gpio::GpPin
/// [`Input`]: crate::gpio::Input
/// [`Output`]: crate::gpio::Output
#[derive(Debug)]
pub struct MCP2200<T: Transport = HidDevice> {
    /// Underlying report transport, normally a [`hidapi`] device.
    ///
    /// The C hidapi library is not thread safe and the `hidapi` types are
    /// appropriately `!Sync`.
    inner: T,
    /// How long to wait for a response report. `None` waits indefinitely.
    read_timeout: Option<Duration>,
    /// Marker for whether the pin structs have been taken from the driver.
    pins_taken: Cell<bool>,
}

/// Complete set of user-facing configuration, applied in one write.
///
/// See [`MCP2200::configure_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigureSettings {
    /// GPIO directions (1 is input). Pins claimed by an alternate function are
    /// left unchanged.
    pub io_directions: u8,
    /// Default UART baud rate.
    pub baud_rate: u32,
    /// Receive LED (GP6) mode.
    pub rx_led: LedMode,
    /// Transmit LED (GP7) mode.
    pub tx_led: LedMode,
    /// RTS/CTS hardware flow control.
    pub flow_control: bool,
    /// GP1 as the USB configured indicator.
    pub usb_configure: bool,
    /// GP0 as the USB suspend indicator.
    pub suspend: bool,
    /// Invert the UART signals.
    pub invert: bool,
}

impl<T: Transport> MCP2200<T> {
    /// Wrap an already-open transport.
    ///
    /// Use this with your own [`Transport`] implementation. To open a USB device,
    /// see [`MCP2200::open`].
    pub fn from_transport(transport: T) -> Self {
        Self {
            inner: transport,
            read_timeout: None,
            pins_taken: Cell::new(false),
        }
    }

    /// Set how long to wait for the device to answer a query.
    ///
    /// `None` (the default) waits indefinitely.
    pub fn set_read_timeout(&mut self, timeout: Option<Duration>) {
        self.read_timeout = timeout;
    }

    ////////////////////////////////////////////////////////////////////////////////
    // USB report exchange with the MCP2200
    ////////////////////////////////////////////////////////////////////////////////

    /// Write the given command and, if it has one, read the response report.
    fn transfer(&self, command: &Command) -> Result<Option<[u8; REPORT_SIZE]>, Error> {
        let report = command.to_report();
        log::debug!("-> {report:02X?}");
        self.inner.write_report(&report)?;
        if !command.has_response() {
            return Ok(None);
        }
        let response = self.inner.read_report(self.read_timeout)?;
        log::debug!("<- {response:02X?}");
        Ok(Some(response))
    }

    /// Send a command that the device does not answer.
    fn send(&self, command: &Command) -> Result<(), Error> {
        self.transfer(command).map(|_| ())
    }

    /// Send a query and return the response report.
    fn query(&self, command: &Command) -> Result<[u8; REPORT_SIZE], Error> {
        Ok(self
            .transfer(command)?
            .expect("Queries always have a response buffer."))
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Configuration
    ////////////////////////////////////////////////////////////////////////////////

    /// Read the chip configuration and the current GPIO values.
    pub fn read_all(&self) -> Result<ReadAllResponse, Error> {
        let buf = self.query(&Command::ReadAll)?;
        Ok(ReadAllResponse::from_report(&buf))
    }

    /// Change the chip configuration.
    ///
    /// The current configuration is read from the device and passed to `change`.
    /// If `change` succeeds, the altered configuration is written back. Settings
    /// not touched by `change` keep their current values.
    ///
    /// ```no_run
    /// # fn main() -> Result<(), mcp2200_hal::Error> {
    /// # let api = hidapi::HidApi::new()?;
    /// # let device = mcp2200_hal::MCP2200::open(&api)?;
    /// device.configure(|c| {
    ///     c.set_flow_control(true).set_invert(false);
    ///     Ok(())
    /// })?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn configure<F>(&self, change: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Configuration) -> Result<(), Error>,
    {
        let mut configuration = self.read_all()?.configuration;
        change(&mut configuration)?;
        self.send(&Command::Configure(configuration))
    }

    /// Apply every user-facing setting at once.
    ///
    /// Alternate pin functions are applied before the GPIO directions, so the
    /// directions are masked by the new alternate pin settings.
    pub fn configure_all(&self, settings: &ConfigureSettings) -> Result<(), Error> {
        self.configure(|c| {
            c.set_rx_led_mode(settings.rx_led)
                .set_tx_led_mode(settings.tx_led)
                .set_usb_configure(settings.usb_configure)
                .set_suspend(settings.suspend)
                .set_flow_control(settings.flow_control)
                .set_invert(settings.invert)
                .set_baud_rate(settings.baud_rate)?
                .set_io_directions(settings.io_directions);
            Ok(())
        })
    }

    /// Set the default UART baud rate.
    ///
    /// # Errors
    ///
    /// [`Error::BaudRateOutOfRange`] if the rate cannot be configured, in which case
    /// nothing is written to the device.
    pub fn set_baud_rate(&self, baud_rate: u32) -> Result<(), Error> {
        self.configure(|c| c.set_baud_rate(baud_rate).map(|_| ()))
    }

    /// Set the GPIO directions (1 is input) of the pins not claimed by an
    /// alternate function.
    pub fn set_io_directions(&self, directions: u8) -> Result<(), Error> {
        self.configure(|c| {
            c.set_io_directions(directions);
            Ok(())
        })
    }

    /// Set the power-up output values of the pins not claimed by an alternate
    /// function.
    pub fn set_default_values(&self, values: u8) -> Result<(), Error> {
        self.configure(|c| {
            c.set_default_values(values);
            Ok(())
        })
    }

    /// Set the receive LED (GP6) mode.
    pub fn set_rx_led_mode(&self, mode: LedMode) -> Result<(), Error> {
        self.configure(|c| {
            c.set_rx_led_mode(mode);
            Ok(())
        })
    }

    /// Set the transmit LED (GP7) mode.
    pub fn set_tx_led_mode(&self, mode: LedMode) -> Result<(), Error> {
        self.configure(|c| {
            c.set_tx_led_mode(mode);
            Ok(())
        })
    }

    /// Select the slow (true) or fast (false) LED blink speed.
    pub fn set_blink_slow(&self, slow: bool) -> Result<(), Error> {
        self.configure(|c| {
            c.set_blink_slow(slow);
            Ok(())
        })
    }

    /// Invert the polarity of the UART signals.
    pub fn set_invert(&self, invert: bool) -> Result<(), Error> {
        self.configure(|c| {
            c.set_invert(invert);
            Ok(())
        })
    }

    /// Use GP0 as the USB suspend indicator.
    pub fn set_suspend(&self, suspend: bool) -> Result<(), Error> {
        self.configure(|c| {
            c.set_suspend(suspend);
            Ok(())
        })
    }

    /// Use GP1 as the USB configured indicator.
    pub fn set_usb_configure(&self, usb_configure: bool) -> Result<(), Error> {
        self.configure(|c| {
            c.set_usb_configure(usb_configure);
            Ok(())
        })
    }

    /// Enable or disable RTS/CTS hardware flow control.
    pub fn set_flow_control(&self, flow_control: bool) -> Result<(), Error> {
        self.configure(|c| {
            c.set_flow_control(flow_control);
            Ok(())
        })
    }

    ////////////////////////////////////////////////////////////////////////////////
    // GPIO
    ////////////////////////////////////////////////////////////////////////////////

    /// Take the eight GP pin structs for individual GPIO operation.
    ///
    /// This can only be done once, and will return `None` afterwards.
    pub fn take_pins(&self) -> Option<Pins<'_, T>> {
        if self.pins_taken.get() {
            None
        } else {
            self.pins_taken.set(true);
            Some(Pins::new(self))
        }
    }

    /// Current logic level of every GP pin.
    ///
    /// Bit _n_ is the level of GP_n_.
    pub fn gpio_read(&self) -> Result<u8, Error> {
        Ok(self.read_all()?.gpio_values)
    }

    /// Drive the GPIO outputs to `values`.
    ///
    /// Pins claimed by an alternate function (see [`Configuration::io_mask`]) are
    /// neither set nor cleared. This costs an extra read of the configuration.
    pub fn gpio_write(&self, values: u8) -> Result<(), Error> {
        let mask = self.read_all()?.configuration.io_mask();
        self.gpio_set_clear(values & mask, !values & mask)
    }

    /// Drive the pins in `set` high and the pins in `clear` low.
    ///
    /// No masking is applied. Pins in neither are left unchanged.
    pub fn gpio_set_clear(&self, set: u8, clear: u8) -> Result<(), Error> {
        self.send(&Command::SetClearOutputs { set, clear })
    }
}

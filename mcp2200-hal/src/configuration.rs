//! Chip configuration carried by the Configure and Read All commands.
//!
//! The MCP2200 stores its power-up configuration in four bytes and a baud rate
//! divisor. Some of the GP pins can be handed over to an alternate function
//! (the UART traffic LEDs, the USB suspend and USB configured indicators), and
//! such pins must not be disturbed by GPIO direction or default value changes.
//! [`Configuration::io_mask`] derives the set of pins still free for GPIO use.

use bit_field::BitField;

use crate::Error;
use crate::constants::{BAUD_CLOCK, BAUD_TOLERANCE_PERCENT};

/// Alternate pin enable bits (the `alt_pins` byte).
mod alt_pins {
    /// GP0 drives the USB suspend state indicator (SSPND).
    pub(super) const SUSPEND: usize = 7;
    /// GP1 drives the USB configured indicator (USBCFG).
    pub(super) const USB_CONFIGURE: usize = 6;
    /// GP6 drives the UART receive LED.
    pub(super) const RX_LED: usize = 3;
    /// GP7 drives the UART transmit LED.
    pub(super) const TX_LED: usize = 2;
}

/// Alternate pin option bits (the `alt_pin_options` byte).
mod alt_options {
    /// RX LED toggles on traffic rather than blinking.
    pub(super) const RX_TOGGLE: usize = 7;
    /// TX LED toggles on traffic rather than blinking.
    pub(super) const TX_TOGGLE: usize = 6;
    /// LEDs blink slowly (set) or quickly (clear).
    pub(super) const BLINK_SLOW: usize = 5;
    /// UART signals RX/TX/RTS/CTS are inverted.
    pub(super) const INVERT: usize = 1;
    /// RTS/CTS hardware flow control is enabled.
    pub(super) const FLOW_CONTROL: usize = 0;
}

/// GP pin claimed by each alternate function.
mod pins {
    pub(super) const SUSPEND: usize = 0;
    pub(super) const USB_CONFIGURE: usize = 1;
    pub(super) const RX_LED: usize = 6;
    pub(super) const TX_LED: usize = 7;
}

/// Behaviour of the UART traffic LEDs on GP6 (RX) and GP7 (TX).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedMode {
    /// Pin is a GPIO output driven low.
    Off,
    /// Pin is a GPIO output driven high.
    On,
    /// Pin pulses when UART traffic occurs.
    Blink,
    /// Pin changes state when UART traffic occurs.
    Toggle,
}

impl LedMode {
    /// True if the mode hands the pin over to the LED alternate function.
    ///
    /// `Off` and `On` are plain GPIO outputs and do not claim the pin.
    pub fn is_alternate(self) -> bool {
        matches!(self, Self::Blink | Self::Toggle)
    }
}

impl std::fmt::Display for LedMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LedMode::Off => "off",
            LedMode::On => "on",
            LedMode::Blink => "blink",
            LedMode::Toggle => "toggle",
        };
        f.write_str(s)
    }
}

/// The two LEDs share an encoding but use different bits.
#[derive(Clone, Copy)]
struct LedBits {
    enable: usize,
    toggle: usize,
    pin: usize,
}

const RX_LED_BITS: LedBits = LedBits {
    enable: alt_pins::RX_LED,
    toggle: alt_options::RX_TOGGLE,
    pin: pins::RX_LED,
};

const TX_LED_BITS: LedBits = LedBits {
    enable: alt_pins::TX_LED,
    toggle: alt_options::TX_TOGGLE,
    pin: pins::TX_LED,
};

/// MCP2200 chip configuration.
///
/// This is read from the device with [`MCP2200::read_all`], changed locally, and
/// written back with [`MCP2200::configure`]. Nothing is sent to the device until
/// the configuration is written.
///
/// GPIO direction bits are 1 for input and 0 for output. Bit _n_ of each GPIO byte
/// corresponds to pin GP_n_.
///
/// [`MCP2200::read_all`]: crate::MCP2200::read_all
/// [`MCP2200::configure`]: crate::MCP2200::configure
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    io_directions: u8,
    alt_pins: u8,
    default_values: u8,
    alt_pin_options: u8,
    baud_divisor: u16,
}

impl Configuration {
    /// Parse the configuration fields shared by Configure and Read All.
    ///
    /// Bytes 4 to 7 hold the directions, alternate pins, default values and
    /// alternate options. The baud rate divisor is big-endian at bytes 8 and 9.
    pub(crate) fn from_report(buf: &[u8; 16]) -> Self {
        Self {
            io_directions: buf[4],
            alt_pins: buf[5],
            default_values: buf[6],
            alt_pin_options: buf[7],
            baud_divisor: u16::from_be_bytes([buf[8], buf[9]]),
        }
    }

    /// Write the configuration fields into an outgoing report.
    pub(crate) fn apply_to_report(&self, buf: &mut [u8; 16]) {
        buf[4] = self.io_directions;
        buf[5] = self.alt_pins;
        buf[6] = self.default_values;
        buf[7] = self.alt_pin_options;
        buf[8..=9].copy_from_slice(&self.baud_divisor.to_be_bytes());
    }

    ////////////////////////////////////////////////////////////////////////////////
    // UART
    ////////////////////////////////////////////////////////////////////////////////

    /// Default UART baud rate actually produced by the current divisor.
    pub fn baud_rate(&self) -> u32 {
        BAUD_CLOCK / (u32::from(self.baud_divisor) + 1)
    }

    /// Raw baud rate divisor.
    pub fn baud_divisor(&self) -> u16 {
        self.baud_divisor
    }

    /// Set the default UART baud rate.
    ///
    /// The divisor is `12_000_000 / baud_rate - 1`, rounded to the nearest whole
    /// divisor, so rates that do not divide 12 MHz are approximated (115200
    /// becomes 115384). [`baud_rate`] reports the rate that was actually configured.
    ///
    /// [`baud_rate`]: Self::baud_rate
    ///
    /// # Errors
    ///
    /// [`Error::BaudRateOutOfRange`] for zero, for rates above 12 MHz, for rates so
    /// low the divisor would not fit in 16 bits (below 184 baud), and for rates the
    /// nearest divisor misses by more than 3%. The configuration is unchanged.
    pub fn set_baud_rate(&mut self, baud_rate: u32) -> Result<&mut Self, Error> {
        if baud_rate == 0 || baud_rate > BAUD_CLOCK {
            return Err(Error::BaudRateOutOfRange(baud_rate));
        }
        // Ticks per bit, rounded to nearest. At least 1 since baud_rate <= BAUD_CLOCK.
        let ticks = (BAUD_CLOCK + baud_rate / 2) / baud_rate;
        let divisor = u16::try_from(ticks - 1).map_err(|_| Error::BaudRateOutOfRange(baud_rate))?;
        let achieved = BAUD_CLOCK / ticks;
        let error = u64::from(achieved.abs_diff(baud_rate)) * 100;
        if error > u64::from(baud_rate) * u64::from(BAUD_TOLERANCE_PERCENT) {
            return Err(Error::BaudRateOutOfRange(baud_rate));
        }
        self.baud_divisor = divisor;
        Ok(self)
    }

    /// RTS/CTS hardware flow control (alternate options bit 0).
    pub fn flow_control(&self) -> bool {
        self.alt_pin_options.get_bit(alt_options::FLOW_CONTROL)
    }

    /// Enable or disable RTS/CTS hardware flow control.
    pub fn set_flow_control(&mut self, enabled: bool) -> &mut Self {
        self.alt_pin_options.set_bit(alt_options::FLOW_CONTROL, enabled);
        self
    }

    /// Inverted polarity of RX/TX/RTS/CTS (alternate options bit 1).
    pub fn invert(&self) -> bool {
        self.alt_pin_options.get_bit(alt_options::INVERT)
    }

    /// Invert the polarity of the UART signals.
    pub fn set_invert(&mut self, inverted: bool) -> &mut Self {
        self.alt_pin_options.set_bit(alt_options::INVERT, inverted);
        self
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Alternate pin functions
    ////////////////////////////////////////////////////////////////////////////////

    /// GP0 is the USB suspend indicator (alternate pins bit 7).
    pub fn suspend(&self) -> bool {
        self.alt_pins.get_bit(alt_pins::SUSPEND)
    }

    /// Hand GP0 over to (or take it back from) the USB suspend indicator.
    pub fn set_suspend(&mut self, enabled: bool) -> &mut Self {
        self.alt_pins.set_bit(alt_pins::SUSPEND, enabled);
        self
    }

    /// GP1 is the USB configured indicator (alternate pins bit 6).
    pub fn usb_configure(&self) -> bool {
        self.alt_pins.get_bit(alt_pins::USB_CONFIGURE)
    }

    /// Hand GP1 over to (or take it back from) the USB configured indicator.
    pub fn set_usb_configure(&mut self, enabled: bool) -> &mut Self {
        self.alt_pins.set_bit(alt_pins::USB_CONFIGURE, enabled);
        self
    }

    /// LEDs blink slowly rather than quickly (alternate options bit 5).
    pub fn blink_slow(&self) -> bool {
        self.alt_pin_options.get_bit(alt_options::BLINK_SLOW)
    }

    /// Select the slow (true) or fast (false) LED blink speed.
    pub fn set_blink_slow(&mut self, slow: bool) -> &mut Self {
        self.alt_pin_options.set_bit(alt_options::BLINK_SLOW, slow);
        self
    }

    /// Mode of the receive LED on GP6.
    ///
    /// Enable is alternate pins bit 3, toggle is alternate options bit 7.
    pub fn rx_led_mode(&self) -> LedMode {
        self.led_mode(RX_LED_BITS)
    }

    /// Set the mode of the receive LED on GP6.
    pub fn set_rx_led_mode(&mut self, mode: LedMode) -> &mut Self {
        self.set_led_mode(RX_LED_BITS, mode)
    }

    /// Mode of the transmit LED on GP7.
    ///
    /// Enable is alternate pins bit 2, toggle is alternate options bit 6.
    pub fn tx_led_mode(&self) -> LedMode {
        self.led_mode(TX_LED_BITS)
    }

    /// Set the mode of the transmit LED on GP7.
    pub fn set_tx_led_mode(&mut self, mode: LedMode) -> &mut Self {
        self.set_led_mode(TX_LED_BITS, mode)
    }

    fn led_mode(&self, bits: LedBits) -> LedMode {
        if self.alt_pins.get_bit(bits.enable) {
            if self.alt_pin_options.get_bit(bits.toggle) {
                LedMode::Toggle
            } else {
                LedMode::Blink
            }
        } else if self.default_values.get_bit(bits.pin) {
            LedMode::On
        } else {
            LedMode::Off
        }
    }

    fn set_led_mode(&mut self, bits: LedBits, mode: LedMode) -> &mut Self {
        // Off and On release the alternate function and drive the pin as an
        // output, so the direction and default value are written directly rather
        // than through the IO mask.
        let (enable, toggle) = match mode {
            LedMode::Off | LedMode::On => (false, false),
            LedMode::Blink => (true, false),
            LedMode::Toggle => (true, true),
        };
        self.alt_pins.set_bit(bits.enable, enable);
        self.alt_pin_options.set_bit(bits.toggle, toggle);
        if !mode.is_alternate() {
            self.io_directions.set_bit(bits.pin, false);
            self.default_values.set_bit(bits.pin, mode == LedMode::On);
        }
        self
    }

    ////////////////////////////////////////////////////////////////////////////////
    // GPIO
    ////////////////////////////////////////////////////////////////////////////////

    /// Pins available for GPIO use.
    ///
    /// A bit is clear when that pin is claimed by an active alternate function:
    ///
    /// - bit 0 when the USB suspend indicator is enabled,
    /// - bit 1 when the USB configured indicator is enabled,
    /// - bit 6 when the RX LED blinks or toggles,
    /// - bit 7 when the TX LED blinks or toggles.
    ///
    /// LEDs set to [`LedMode::On`] or [`LedMode::Off`] are ordinary outputs and
    /// leave their pins in the mask.
    pub fn io_mask(&self) -> u8 {
        let mut claimed = 0u8;
        claimed.set_bit(pins::SUSPEND, self.suspend());
        claimed.set_bit(pins::USB_CONFIGURE, self.usb_configure());
        claimed.set_bit(pins::RX_LED, self.rx_led_mode().is_alternate());
        claimed.set_bit(pins::TX_LED, self.tx_led_mode().is_alternate());
        !claimed
    }

    /// Power-up GPIO directions (1 is input).
    pub fn io_directions(&self) -> u8 {
        self.io_directions
    }

    /// Set the power-up GPIO directions of the pins in [`io_mask`].
    ///
    /// Bits for pins claimed by an alternate function keep their current value.
    ///
    /// [`io_mask`]: Self::io_mask
    pub fn set_io_directions(&mut self, directions: u8) -> &mut Self {
        self.io_directions = masked_update(self.io_directions, directions, self.io_mask());
        self
    }

    /// Power-up GPIO output values.
    pub fn default_values(&self) -> u8 {
        self.default_values
    }

    /// Set the power-up output values of the pins in [`io_mask`].
    ///
    /// Bits for pins claimed by an alternate function keep their current value.
    ///
    /// [`io_mask`]: Self::io_mask
    pub fn set_default_values(&mut self, values: u8) -> &mut Self {
        self.default_values = masked_update(self.default_values, values, self.io_mask());
        self
    }

    /// Raw alternate pins byte.
    pub fn alt_pins(&self) -> u8 {
        self.alt_pins
    }

    /// Raw alternate pin options byte.
    pub fn alt_pin_options(&self) -> u8 {
        self.alt_pin_options
    }
}

/// Replace the bits of `old` selected by `mask` with those of `new`.
fn masked_update(old: u8, new: u8, mask: u8) -> u8 {
    (old & !mask) | (new & mask)
}

use bit_field::BitField;

use super::{GpioDirection, LogicLevel};
use crate::transport::Transport;
use crate::{Error, MCP2200};

/// A GP pin that can be configured for GPIO input or output.
///
/// Pins claimed by an alternate function (see [`Configuration::io_mask`]) cannot be
/// configured and return [`Error::PinReserved`].
///
/// [`Configuration::io_mask`]: crate::Configuration::io_mask
#[derive(Debug)]
pub struct GpPin<'a, T: Transport> {
    driver: &'a MCP2200<T>,
    pin_number: u8,
}

impl<'a, T: Transport> GpPin<'a, T> {
    /// Number of this pin, 0 to 7.
    pub fn pin_number(&self) -> u8 {
        self.pin_number
    }

    fn set_direction(&self, direction: GpioDirection) -> Result<(), Error> {
        let pin = self.pin_number;
        self.driver.configure(|c| {
            if !c.io_mask().get_bit(pin.into()) {
                return Err(Error::PinReserved(pin));
            }
            let mut directions = c.io_directions();
            directions.set_bit(pin.into(), direction.into());
            c.set_io_directions(directions);
            Ok(())
        })
    }

    /// Current direction of this pin in the device configuration.
    fn direction(&self) -> Result<GpioDirection, Error> {
        let directions = self.driver.read_all()?.configuration.io_directions();
        Ok(directions.get_bit(self.pin_number.into()).into())
    }

    /// Set up the GP pin as a GPIO digital input.
    ///
    /// You can retrieve the pin (for reconfiguration as an output) by calling
    /// [`Input::destroy`].
    pub fn configure_as_digital_input(self) -> Result<Input<'a, T>, Error> {
        self.set_direction(GpioDirection::Input)?;
        Ok(Input(self))
    }

    /// Set up the GP pin as a GPIO digital output.
    ///
    /// You can retrieve the pin (for reconfiguration as an input) by calling
    /// [`Output::destroy`].
    pub fn configure_as_digital_output(self) -> Result<Output<'a, T>, Error> {
        self.set_direction(GpioDirection::Output)?;
        Ok(Output(self))
    }
}

impl<'a, T: Transport> TryFrom<GpPin<'a, T>> for Input<'a, T> {
    type Error = Error;
    fn try_from(pin: GpPin<'a, T>) -> Result<Self, Self::Error> {
        pin.configure_as_digital_input()
    }
}

impl<'a, T: Transport> TryFrom<GpPin<'a, T>> for Output<'a, T> {
    type Error = Error;
    fn try_from(pin: GpPin<'a, T>) -> Result<Self, Self::Error> {
        pin.configure_as_digital_output()
    }
}

/// A GP pin in GPIO input mode.
#[derive(Debug)]
pub struct Input<'a, T: Transport>(GpPin<'a, T>);

impl<'a, T: Transport> Input<'a, T> {
    /// Get the input level of this pin.
    pub fn get_level(&self) -> Result<LogicLevel, Error> {
        let pin = self.0.pin_number;
        let response = self.0.driver.read_all()?;
        if !response.configuration.io_directions().get_bit(pin.into()) {
            return Err(Error::PinModeChanged(pin));
        }
        Ok(response.gpio_values.get_bit(pin.into()).into())
    }

    /// Return the underlying Pin object, so that it can be reconfigured.
    ///
    /// This method does not change any MCP2200 settings.
    pub fn destroy(self) -> GpPin<'a, T> {
        self.0
    }

    /// Switch the pin mode from input to output.
    pub fn try_into_output(self) -> Result<Output<'a, T>, Error> {
        self.0.configure_as_digital_output()
    }
}

impl embedded_hal::digital::Error for Error {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

impl<T: Transport> embedded_hal::digital::ErrorType for Input<'_, T> {
    type Error = Error;
}

impl<T: Transport> embedded_hal::digital::InputPin for Input<'_, T> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.get_level().map(LogicLevel::is_high)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.get_level().map(LogicLevel::is_low)
    }
}

/// A GP pin in GPIO output mode.
#[derive(Debug)]
pub struct Output<'a, T: Transport>(GpPin<'a, T>);

impl<'a, T: Transport> Output<'a, T> {
    /// Set the output level of this pin.
    ///
    /// Only this pin is changed.
    pub fn set_level(&self, level: LogicLevel) -> Result<(), Error> {
        if self.0.direction()? != GpioDirection::Output {
            return Err(Error::PinModeChanged(self.0.pin_number));
        }
        let bit = 1u8 << self.0.pin_number;
        match level {
            LogicLevel::High => self.0.driver.gpio_set_clear(bit, 0),
            LogicLevel::Low => self.0.driver.gpio_set_clear(0, bit),
        }
    }

    /// Get the current level of this pin.
    pub fn get_output_level(&self) -> Result<LogicLevel, Error> {
        let pin = self.0.pin_number;
        let response = self.0.driver.read_all()?;
        if response.configuration.io_directions().get_bit(pin.into()) {
            return Err(Error::PinModeChanged(pin));
        }
        Ok(response.gpio_values.get_bit(pin.into()).into())
    }

    /// Return the underlying Pin object, so that it can be reconfigured.
    pub fn destroy(self) -> GpPin<'a, T> {
        self.0
    }

    /// Switch the pin mode from output to input.
    pub fn try_into_input(self) -> Result<Input<'a, T>, Error> {
        self.0.configure_as_digital_input()
    }
}

impl<T: Transport> embedded_hal::digital::ErrorType for Output<'_, T> {
    type Error = Error;
}

impl<T: Transport> embedded_hal::digital::OutputPin for Output<'_, T> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_level(LogicLevel::Low)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_level(LogicLevel::High)
    }
}

impl<T: Transport> embedded_hal::digital::StatefulOutputPin for Output<'_, T> {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        self.get_output_level().map(LogicLevel::is_high)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        self.get_output_level().map(LogicLevel::is_low)
    }
}

/// The eight MCP2200 GP pins.
#[derive(Debug)]
pub struct Pins<'a, T: Transport> {
    /// Pin GP0, shared with the USB suspend indicator.
    pub gp0: GpPin<'a, T>,
    /// Pin GP1, shared with the USB configured indicator.
    pub gp1: GpPin<'a, T>,
    /// Pin GP2
    pub gp2: GpPin<'a, T>,
    /// Pin GP3
    pub gp3: GpPin<'a, T>,
    /// Pin GP4
    pub gp4: GpPin<'a, T>,
    /// Pin GP5
    pub gp5: GpPin<'a, T>,
    /// Pin GP6, shared with the RX LED.
    pub gp6: GpPin<'a, T>,
    /// Pin GP7, shared with the TX LED.
    pub gp7: GpPin<'a, T>,
}

impl<'a, T: Transport> Pins<'a, T> {
    pub(crate) fn new(driver: &'a MCP2200<T>) -> Self {
        let pin = |pin_number| GpPin { driver, pin_number };
        Self {
            gp0: pin(0),
            gp1: pin(1),
            gp2: pin(2),
            gp3: pin(3),
            gp4: pin(4),
            gp5: pin(5),
            gp6: pin(6),
            gp7: pin(7),
        }
    }
}

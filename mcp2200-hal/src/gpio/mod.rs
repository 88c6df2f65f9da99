//! Individual GP pins as embedded-hal digital inputs and outputs.

mod common;
mod pins;

pub use common::{GpioDirection, LogicLevel};
pub use pins::{GpPin, Input, Output, Pins};

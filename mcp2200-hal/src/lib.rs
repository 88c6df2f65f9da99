#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![deny(unsafe_code)]

mod commands;
mod configuration;
mod constants;
mod descriptor;
mod driver;
mod error;
pub mod gpio;
mod transport;

pub use commands::{ReadAllResponse, StringDescriptor};
pub use configuration::{Configuration, LedMode};
pub use descriptor::DeviceString;
pub use driver::{ConfigureSettings, DeviceInformation, MCP2200, list_devices};
pub use error::Error;
pub use transport::Transport;

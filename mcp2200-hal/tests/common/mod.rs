//! In-memory stand-in for an MCP2200.
//!
//! Commands are interpreted the way the chip interprets them, so the driver can
//! be exercised without hardware. Every report written is recorded.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

use mcp2200_hal::{Error, Transport};

pub const READ_ALL: u8 = 0x80;
pub const CONFIGURE: u8 = 0x10;
pub const SET_CLEAR_OUTPUTS: u8 = 0x08;
pub const READ_EEPROM: u8 = 0x20;
pub const WRITE_EEPROM: u8 = 0x40;
pub const BASE_CONFIGURE: u8 = 0x01;

#[derive(Debug)]
pub struct FakeChip {
    /// Bytes 4..=9 of the last Configure command.
    pub configuration: RefCell<[u8; 6]>,
    pub gpio_values: Cell<u8>,
    pub eeprom: RefCell<[u8; 256]>,
    pub written: RefCell<Vec<[u8; 16]>>,
    responses: RefCell<VecDeque<[u8; 16]>>,
    /// Fail the write with this (zero-based) index.
    pub fail_write: Cell<Option<usize>>,
}

impl FakeChip {
    pub fn new() -> Self {
        Self {
            // Inputs everywhere, 9600 baud.
            configuration: RefCell::new([0xFF, 0x00, 0x00, 0x00, 0x04, 0xE1]),
            gpio_values: Cell::new(0),
            eeprom: RefCell::new([0; 256]),
            written: RefCell::new(Vec::new()),
            responses: RefCell::new(VecDeque::new()),
            fail_write: Cell::new(None),
        }
    }

    pub fn with_configuration(configuration: [u8; 6]) -> Self {
        let chip = Self::new();
        *chip.configuration.borrow_mut() = configuration;
        chip
    }

    pub fn alt_pins(&self) -> u8 {
        self.configuration.borrow()[1]
    }

    pub fn io_directions(&self) -> u8 {
        self.configuration.borrow()[0]
    }

    /// Reports written with the given command code.
    pub fn written_with(&self, command: u8) -> Vec<[u8; 16]> {
        self.written
            .borrow()
            .iter()
            .filter(|r| r[0] == command)
            .copied()
            .collect()
    }

    fn handle(&self, report: &[u8; 16]) {
        match report[0] {
            READ_ALL => {
                let mut response = [0u8; 16];
                response[0] = READ_ALL;
                response[4..=9].copy_from_slice(&*self.configuration.borrow());
                response[10] = self.gpio_values.get();
                self.responses.borrow_mut().push_back(response);
            }
            CONFIGURE => {
                self.configuration.borrow_mut().copy_from_slice(&report[4..=9]);
            }
            SET_CLEAR_OUTPUTS => {
                let (set, clear) = (report[11], report[12]);
                self.gpio_values.set((self.gpio_values.get() | set) & !clear);
            }
            READ_EEPROM => {
                let address = report[1];
                let mut response = [0u8; 16];
                response[0] = READ_EEPROM;
                response[1] = address;
                response[3] = self.eeprom.borrow()[address as usize];
                self.responses.borrow_mut().push_back(response);
            }
            WRITE_EEPROM => {
                self.eeprom.borrow_mut()[report[1] as usize] = report[2];
            }
            _ => {}
        }
    }
}

impl Transport for &FakeChip {
    fn write_report(&self, report: &[u8; 16]) -> Result<(), Error> {
        let index = self.written.borrow().len();
        self.written.borrow_mut().push(*report);
        if self.fail_write.get() == Some(index) {
            return Err(Error::ShortWrite {
                expected: 16,
                written: 0,
            });
        }
        self.handle(report);
        Ok(())
    }

    fn read_report(&self, _timeout: Option<Duration>) -> Result<[u8; 16], Error> {
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or(Error::ShortRead {
                expected: 16,
                read: 0,
            })
    }
}

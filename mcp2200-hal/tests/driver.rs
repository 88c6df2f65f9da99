//! Driver behaviour against an emulated MCP2200.

mod common;

use common::*;
use mcp2200_hal::{ConfigureSettings, DeviceString, Error, LedMode, MCP2200, StringDescriptor};

#[test]
fn read_all_decodes_device_state() -> Result<(), Error> {
    // GP6/GP7 blink, flow control, 19200 baud.
    let chip = FakeChip::with_configuration([0x0F, 0b0000_1100, 0x00, 0x01, 0x02, 0x70]);
    chip.gpio_values.set(0xA5);
    let device = MCP2200::from_transport(&chip);

    let response = device.read_all()?;
    assert_eq!(response.gpio_values, 0xA5);
    assert_eq!(response.configuration.io_directions(), 0x0F);
    assert_eq!(response.configuration.baud_rate(), 19200);
    assert_eq!(response.configuration.rx_led_mode(), LedMode::Blink);
    assert_eq!(response.configuration.tx_led_mode(), LedMode::Blink);
    assert!(response.configuration.flow_control());
    assert_eq!(response.configuration.io_mask(), 0x3F);

    assert_eq!(chip.written.borrow().len(), 1);
    assert_eq!(chip.written.borrow()[0][0], READ_ALL);
    Ok(())
}

#[test]
fn configure_is_read_modify_write() -> Result<(), Error> {
    let chip = FakeChip::with_configuration([0x0F, 0x00, 0x30, 0b0010_0000, 0x04, 0xE1]);
    let device = MCP2200::from_transport(&chip);

    device.set_invert(true)?;

    let writes = chip.written.borrow();
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[0][0], READ_ALL);
    assert_eq!(writes[1][0], CONFIGURE);
    // Untouched fields are written back as read.
    assert_eq!(&writes[1][4..=9], &[0x0F, 0x00, 0x30, 0b0010_0010, 0x04, 0xE1]);
    assert_eq!(writes[1][10], 0);
    Ok(())
}

#[test]
fn directions_skip_pins_claimed_by_alternate_functions() -> Result<(), Error> {
    // USB suspend indicator on GP0, GP0 currently an output.
    let chip = FakeChip::with_configuration([0xFE, 0b1000_0000, 0x00, 0x00, 0x04, 0xE1]);
    let device = MCP2200::from_transport(&chip);

    device.set_io_directions(0xFF)?;
    assert_eq!(chip.io_directions(), 0xFE);

    device.set_io_directions(0x00)?;
    assert_eq!(chip.io_directions(), 0x00);
    Ok(())
}

#[test]
fn default_values_skip_claimed_pins() -> Result<(), Error> {
    // TX LED blinking.
    let chip = FakeChip::with_configuration([0x00, 0b0000_0100, 0x80, 0x00, 0x04, 0xE1]);
    let device = MCP2200::from_transport(&chip);

    device.set_default_values(0x00)?;
    assert_eq!(chip.configuration.borrow()[2], 0x80);
    Ok(())
}

#[test]
fn led_mode_changes() -> Result<(), Error> {
    let chip = FakeChip::new();
    let device = MCP2200::from_transport(&chip);

    device.set_rx_led_mode(LedMode::Toggle)?;
    device.set_tx_led_mode(LedMode::On)?;
    device.set_blink_slow(true)?;

    let configuration = device.read_all()?.configuration;
    assert_eq!(configuration.rx_led_mode(), LedMode::Toggle);
    assert_eq!(configuration.tx_led_mode(), LedMode::On);
    assert!(configuration.blink_slow());
    // TX LED pin turned into an output driven high.
    assert_eq!(configuration.io_directions(), 0x7F);
    assert_eq!(configuration.default_values(), 0x80);
    Ok(())
}

#[test]
fn configure_all_applies_every_setting() -> Result<(), Error> {
    let chip = FakeChip::new();
    let device = MCP2200::from_transport(&chip);

    device.configure_all(&ConfigureSettings {
        io_directions: 0x00,
        baud_rate: 19200,
        rx_led: LedMode::Blink,
        tx_led: LedMode::Off,
        flow_control: true,
        usb_configure: true,
        suspend: false,
        invert: true,
    })?;

    let configuration = device.read_all()?.configuration;
    assert_eq!(configuration.baud_rate(), 19200);
    assert_eq!(configuration.rx_led_mode(), LedMode::Blink);
    assert_eq!(configuration.tx_led_mode(), LedMode::Off);
    assert!(configuration.flow_control());
    assert!(configuration.usb_configure());
    assert!(!configuration.suspend());
    assert!(configuration.invert());
    // GP1 (USB configured) and GP6 (RX LED) were claimed before the directions
    // were applied, so they stay inputs.
    assert_eq!(configuration.io_directions(), 0b0100_0010);
    Ok(())
}

#[test]
fn invalid_baud_rate_is_not_written() {
    let chip = FakeChip::new();
    let device = MCP2200::from_transport(&chip);

    assert!(matches!(
        device.set_baud_rate(0),
        Err(Error::BaudRateOutOfRange(0))
    ));
    assert!(chip.written_with(CONFIGURE).is_empty());
}

#[test]
fn gpio_write_leaves_claimed_pins_alone() -> Result<(), Error> {
    // Suspend indicator on GP0, RX LED toggling on GP6.
    let chip = FakeChip::with_configuration([0x00, 0b1000_1000, 0x00, 0b1000_0000, 0x04, 0xE1]);
    let device = MCP2200::from_transport(&chip);

    device.gpio_write(0xFF)?;
    let sent = chip.written_with(SET_CLEAR_OUTPUTS);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0][11], 0b1011_1110, "set");
    assert_eq!(sent[0][12], 0x00, "clear");

    device.gpio_write(0x00)?;
    let sent = chip.written_with(SET_CLEAR_OUTPUTS);
    assert_eq!(sent[1][11], 0x00, "set");
    assert_eq!(sent[1][12], 0b1011_1110, "clear");
    Ok(())
}

#[test]
fn gpio_read_returns_pin_levels() -> Result<(), Error> {
    let chip = FakeChip::new();
    let device = MCP2200::from_transport(&chip);

    device.gpio_write(0b0011_0101)?;
    assert_eq!(device.gpio_read()?, 0b0011_0101);
    Ok(())
}

#[test]
fn eeprom_round_trip() -> Result<(), Error> {
    let chip = FakeChip::new();
    let device = MCP2200::from_transport(&chip);

    device.eeprom_write(0x10, 0xAB)?;
    device.eeprom_write(0xFF, 0x01)?;
    assert_eq!(device.eeprom_read(0x10)?, 0xAB);
    assert_eq!(device.eeprom_read(0xFF)?, 0x01);
    assert_eq!(device.eeprom_read(0x00)?, 0x00);

    let writes = chip.written_with(WRITE_EEPROM);
    assert_eq!(&writes[0][..3], &[WRITE_EEPROM, 0x10, 0xAB]);
    Ok(())
}

#[test]
fn read_without_response_fails() {
    let chip = FakeChip::new();
    // Swallow the Read All command so no response is queued.
    chip.fail_write.set(Some(0));
    let device = MCP2200::from_transport(&chip);
    assert!(matches!(device.read_all(), Err(Error::ShortWrite { .. })));
}

#[test]
fn set_vid_pid() -> Result<(), Error> {
    let chip = FakeChip::new();
    let device = MCP2200::from_transport(&chip);

    device.set_vid_pid(0x1234, 0xABCD)?;
    let writes = chip.written_with(BASE_CONFIGURE);
    assert_eq!(writes.len(), 1);
    assert_eq!(&writes[0][..6], &[0x01, 0x00, 0x12, 0x34, 0xAB, 0xCD]);
    Ok(())
}

#[test]
fn descriptor_string_is_sent_as_16_packets() -> Result<(), Error> {
    let chip = FakeChip::new();
    let device = MCP2200::from_transport(&chip);

    let product: DeviceString = "x".repeat(63).parse()?;
    device.set_product(&product)?;

    let writes = chip.written_with(BASE_CONFIGURE);
    assert_eq!(writes.len(), 16);
    for (index, report) in writes.iter().enumerate() {
        assert_eq!(report[1], 0x02, "product sub-command");
        assert_eq!(report[2] as usize, index);
    }
    assert_eq!(&writes[0][3..=4], &[128, 0x03]);
    assert_eq!(&writes[15][9..=10], &[0x00, b'x']);
    Ok(())
}

#[test]
fn manufacturer_uses_its_own_sub_command() -> Result<(), Error> {
    let chip = FakeChip::new();
    let device = MCP2200::from_transport(&chip);

    device.set_string(StringDescriptor::Manufacturer, &"ACME".parse()?)?;
    assert!(
        chip.written_with(BASE_CONFIGURE)
            .iter()
            .all(|report| report[1] == 0x01)
    );
    Ok(())
}

#[test]
fn too_long_string_never_reaches_device() {
    let result: Result<DeviceString, _> = "x".repeat(64).parse();
    assert!(matches!(result, Err(Error::StringTooLong { length: 64 })));
}

#[test]
fn failed_packet_stops_string_write() {
    let chip = FakeChip::new();
    chip.fail_write.set(Some(4));
    let device = MCP2200::from_transport(&chip);

    let manufacturer: DeviceString = "Partially written".parse().unwrap();
    assert!(device.set_manufacturer(&manufacturer).is_err());
    // Packets 0 to 4 were attempted, nothing after the failure.
    assert_eq!(chip.written.borrow().len(), 5);
}

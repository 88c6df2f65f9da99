/// Strip an optional `0x` prefix.
fn without_prefix(value: &str) -> &str {
    if value.to_ascii_lowercase().starts_with("0x") {
        &value[2..]
    } else {
        value
    }
}

pub(crate) fn u16_from_hex(value: &str) -> Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(without_prefix(value), 16)
}

pub(crate) fn u8_from_hex(value: &str) -> Result<u8, std::num::ParseIntError> {
    u8::from_str_radix(without_prefix(value), 16)
}

/// Parse a string of up to eight bits, GP0 first.
///
/// `0`, `f` and `o` (output) are clear bits; `1`, `t` and `i` (input) are set
/// bits. Missing trailing bits are clear.
pub(crate) fn bits_from_str(value: &str) -> Result<u8, String> {
    let length = value.chars().count();
    if length > 8 {
        return Err(format!("expected at most 8 bits, got {length}"));
    }
    value
        .chars()
        .enumerate()
        .try_fold(0u8, |bits, (index, c)| match c.to_ascii_lowercase() {
            '0' | 'f' | 'o' => Ok(bits),
            '1' | 't' | 'i' => Ok(bits | 1 << index),
            other => Err(format!("invalid bit '{other}' at position {index}")),
        })
}

/// Format eight bits GP0 first, using `off` and `on` for clear and set bits.
pub(crate) fn bits_to_string(bits: u8, off: char, on: char) -> String {
    (0..8)
        .map(|index| if bits & (1 << index) != 0 { on } else { off })
        .collect()
}

pub(crate) fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

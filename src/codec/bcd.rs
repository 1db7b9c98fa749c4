/// Flag in the RTC hours byte that selects 12-hour mode.
pub const TWELVE_HOUR_FLAG: u8 = 0x40;

/// Extracts the bit-field `mask` from `byte`, shifts it down by `shift` and adds `offset`.
///
/// With `offset == b'0'` a BCD digit becomes its ASCII character. Fields wider than a digit wrap
/// rather than overflow.
pub const fn decode_bcd_field(byte: u8, mask: u8, shift: u8, offset: u8) -> u8 {
    ((byte & mask) >> shift).wrapping_add(offset)
}

/// Low digit of the RTC hours byte.
///
/// In 12-hour mode the chip counts this digit from 2 rather than 0, so the ASCII offset is
/// `'2'` when [`TWELVE_HOUR_FLAG`] is set.
pub const fn hour_ones_digit(hours: u8) -> u8 {
    let offset = if hours & TWELVE_HOUR_FLAG != 0 { b'2' } else { b'0' };

    decode_bcd_field(hours, 0x0F, 0, offset)
}

/// Position of one BCD digit within a register byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BcdField {
    mask: u8,
    shift: u8,
}

impl BcdField {
    pub const fn new(mask: u8, shift: u8) -> Self {
        Self { mask, shift }
    }

    /// The digit as its ASCII character.
    pub const fn ascii(&self, byte: u8) -> u8 {
        decode_bcd_field(byte, self.mask, self.shift, b'0')
    }

    /// The digit as a number.
    pub const fn value(&self, byte: u8) -> u8 {
        decode_bcd_field(byte, self.mask, self.shift, 0)
    }
}

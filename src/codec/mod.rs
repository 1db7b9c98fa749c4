//! Conversions between raw MAX35103 register words and text.
//!
//! Everything in here is pure and allocation-free: outputs are fixed-size arrays whose length is
//! known at compile time.
//!
//! Two hexadecimal transforms are provided:
//! - [`hex_of_u16`] / [`hex_of_u32`] spread the nibbles into byte lanes and pick the ASCII offset
//!   per lane with masks, so there is no branch per digit.
//! - [`hex_lookup`] indexes a 512-byte table of two-digit pairs and supports lowercase output.
//!
//! Both sit behind the [`HexCodec`] trait so record encoders can be built on either one.

mod bcd;
mod hex;
mod tof;

pub use bcd::{decode_bcd_field, hour_ones_digit, BcdField, TWELVE_HOUR_FLAG};
pub use hex::{hex_lookup, hex_of_u16, hex_of_u32};
pub use tof::{compose_tof_text, tof_value, TOF_FIELD_WIDTH, TOF_TERMINATOR, TOF_TEXT_LEN};

/// Renders fixed-width values as hexadecimal ASCII, most significant digit first.
pub trait HexCodec {
    /// Four hex digits for a 16-bit word.
    fn hex_u16(&self, value: u16) -> [u8; 4];

    /// Eight hex digits for a 32-bit word.
    fn hex_u32(&self, value: u32) -> [u8; 8];
}

/// Branchless bit-manipulation transform. Always uppercase.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Branchless;

impl HexCodec for Branchless {
    fn hex_u16(&self, value: u16) -> [u8; 4] {
        hex_of_u16(value)
    }

    fn hex_u32(&self, value: u32) -> [u8; 8] {
        hex_of_u32(value)
    }
}

/// Table-driven transform.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Lookup {
    /// Emit `a`-`f` instead of `A`-`F`.
    pub lowercase: bool,
}

impl HexCodec for Lookup {
    fn hex_u16(&self, value: u16) -> [u8; 4] {
        hex_lookup(value, self.lowercase)
    }

    fn hex_u32(&self, value: u32) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[..4].copy_from_slice(&hex_lookup((value >> 16) as u16, self.lowercase));
        out[4..].copy_from_slice(&hex_lookup(value as u16, self.lowercase));

        out
    }
}

//! ### Measurement results (read-only)
//!
//! The TOF difference is a signed 16.16 fixed-point value split across two registers:
//! [`TofDiffInt`] holds the signed integer part in units of the 4 MHz reference clock and
//! [`TofDiffFrac`] the unsigned fraction in 1/65536 of that unit.

use crate::register::{Readable, Reg};

/// Marker type for the TOF difference integer register (0x62)
pub struct TofDiffInt;
impl Reg for TofDiffInt { const ADDR: u8 = 0x62; }

impl Readable for TofDiffInt {
    type Out = i16;
    fn decode(word: [u8; 2]) -> Self::Out {
        i16::from_be_bytes(word)
    }
}

/// Marker type for the TOF difference fraction register (0x63)
pub struct TofDiffFrac;
impl Reg for TofDiffFrac { const ADDR: u8 = 0x63; }

impl Readable for TofDiffFrac {
    type Out = u16;
    fn decode(word: [u8; 2]) -> Self::Out {
        u16::from_be_bytes(word)
    }
}

pub struct TofCycleCount;
impl Reg for TofCycleCount { const ADDR: u8 = 0x64; }

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleCount {
    /// Range of the TOF difference samples averaged in event timing mode
    pub range: u8,

    /// Number of valid TOF difference samples averaged
    pub count: u8,
}

impl Readable for TofCycleCount {
    type Out = CycleCount;
    fn decode(word: [u8; 2]) -> Self::Out {
        CycleCount { range: word[0], count: word[1] }
    }
}

/// Marker type for the averaged TOF difference integer register (0x65)
pub struct TofDiffAvgInt;
impl Reg for TofDiffAvgInt { const ADDR: u8 = 0x65; }

impl Readable for TofDiffAvgInt {
    type Out = i16;
    fn decode(word: [u8; 2]) -> Self::Out {
        i16::from_be_bytes(word)
    }
}

/// Marker type for the averaged TOF difference fraction register (0x66)
pub struct TofDiffAvgFrac;
impl Reg for TofDiffAvgFrac { const ADDR: u8 = 0x66; }

impl Readable for TofDiffAvgFrac {
    type Out = u16;
    fn decode(word: [u8; 2]) -> Self::Out {
        u16::from_be_bytes(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tof_diff_is_signed() {
        assert_eq!(-5, TofDiffInt::decode([0xFF, 0xFB]));
        assert_eq!(i16::MIN, TofDiffInt::decode([0x80, 0x00]));
        assert_eq!(0x8000, TofDiffFrac::decode([0x80, 0x00]));
        assert_eq!(-1, TofDiffAvgInt::decode([0xFF, 0xFF]));
    }

    #[test]
    fn cycle_count_decode() {
        let reg = TofCycleCount::decode([0x03, 0x10]);
        assert_eq!(CycleCount { range: 3, count: 16 }, reg);
    }
}

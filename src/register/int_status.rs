use crate::register::{Readable, Reg};

/// Marker type for the interrupt status register (0x7E, read-only)
pub struct InterruptStatus;
impl Reg for InterruptStatus { const ADDR: u8 = 0x7E; }

pub const TIMEOUT: u16 = 1 << 15;
pub const TOF_COMPLETE: u16 = 1 << 12;
pub const TEMPERATURE_COMPLETE: u16 = 1 << 11;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptFlags {
    /// Did the last measurement time out waiting for its hits?
    pub timeout: bool,

    /// Has a TOF measurement (up, down or difference) completed?
    ///
    /// The whole register is cleared on read.
    pub tof_complete: bool,

    /// Has a temperature measurement completed?
    pub temperature_complete: bool,

    /// The register word as read, including the flags not decoded above.
    pub raw: u16,
}

impl InterruptFlags {
    pub const fn from_word(raw: u16) -> Self {
        Self {
            timeout: raw & TIMEOUT != 0,
            tof_complete: raw & TOF_COMPLETE != 0,
            temperature_complete: raw & TEMPERATURE_COMPLETE != 0,
            raw,
        }
    }

    pub const fn tof_complete(&self) -> bool {
        self.tof_complete
    }
}

impl Readable for InterruptStatus {
    type Out = InterruptFlags;

    fn decode(word: [u8; 2]) -> Self::Out {
        InterruptFlags::from_word(u16::from_be_bytes(word))
    }
}

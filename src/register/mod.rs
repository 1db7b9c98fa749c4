//! MAX35103 command and register catalog.
//!
//! The chip is driven by single-byte opcodes. Execution commands ([`cmd::Command`]) carry no
//! register address. Register opcodes are the register's 7-bit address for a write and the same
//! address with [`READ_FLAG`] set for a read. [`Register`] enumerates every address, and the
//! submodules hold typed markers for the registers the driver decodes:
//!
//! - [`rtc`]: calendar/time words and the watchdog/alarm registers
//! - [`tof_config`]: TOF1-TOF7, event timing, measurement delay, calibration control
//! - [`results`]: TOF difference results
//! - [`int_status`]: interrupt status flags
//!
//! Every register is 16 bits wide and travels MSB first.

pub mod cmd;
pub mod int_status;
pub mod results;
pub mod rtc;
pub mod tof_config;

/// Set in an opcode to read the addressed register instead of writing it.
pub const READ_FLAG: u8 = 0x80;

pub trait Reg { const ADDR: u8; }

pub trait Readable: Reg {
    type Out;
    const READ_OPCODE: u8 = Self::ADDR | READ_FLAG;
    fn decode(word: [u8; 2]) -> Self::Out;
}

pub trait Writable: Reg {
    type In;
    const WRITE_OPCODE: u8 = Self::ADDR;
    fn encode(v: &Self::In, out: &mut [u8; 2]);
}

/// Defines a marker for a register whose 16-bit word is passed through untouched.
macro_rules! word_register {
    ($(#[$doc:meta])* $name:ident = $addr:literal) => {
        $(#[$doc])*
        pub struct $name;
        impl crate::register::Reg for $name { const ADDR: u8 = $addr; }

        impl crate::register::Readable for $name {
            type Out = u16;
            fn decode(word: [u8; 2]) -> Self::Out {
                u16::from_be_bytes(word)
            }
        }

        impl crate::register::Writable for $name {
            type In = u16;
            fn encode(v: &Self::In, out: &mut [u8; 2]) {
                *out = v.to_be_bytes();
            }
        }
    };
}
pub(crate) use word_register;

/// Whether a register accepts writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Access {
    ReadWrite,
    ReadOnly,
}

/// Returned when a byte is not the address of any MAX35103 register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownRegister(pub u8);

macro_rules! registers {
    ($( $(#[$doc:meta])* $name:ident = $addr:literal, $access:ident; )*) => {
        /// Every register address of the MAX35103.
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        pub enum Register {
            $( $(#[$doc])* $name = $addr, )*
        }

        impl Register {
            pub const fn access(self) -> Access {
                match self {
                    $( Register::$name => Access::$access, )*
                }
            }
        }

        impl TryFrom<u8> for Register {
            type Error = UnknownRegister;

            fn try_from(addr: u8) -> Result<Self, Self::Error> {
                match addr {
                    $( $addr => Ok(Register::$name), )*
                    other => Err(UnknownRegister(other)),
                }
            }
        }
    };
}

registers! {
    // RTC and watchdog
    /// Hundredths of a second and seconds
    RtcSeconds = 0x30, ReadWrite;
    /// Minutes and hours
    RtcMinutesHours = 0x31, ReadWrite;
    /// Day of week and date
    RtcDayDate = 0x32, ReadWrite;
    /// Month and year
    RtcMonthYear = 0x33, ReadWrite;
    WatchdogAlarmCount = 0x34, ReadWrite;
    Alarm = 0x35, ReadWrite;

    // Configuration
    /// Pulse launcher size, divider, stop polarity, bias charge time
    Tof1 = 0x38, ReadWrite;
    /// Stop hits, T2 wave selection, duty cycle, timeout
    Tof2 = 0x39, ReadWrite;
    /// HIT1/HIT2 wave select
    Tof3 = 0x3A, ReadWrite;
    /// HIT3/HIT4 wave select
    Tof4 = 0x3B, ReadWrite;
    /// HIT5/HIT6 wave select
    Tof5 = 0x3C, ReadWrite;
    /// Upstream comparator offsets
    Tof6 = 0x3D, ReadWrite;
    /// Downstream comparator offsets
    Tof7 = 0x3E, ReadWrite;
    EventTiming1 = 0x3F, ReadWrite;
    EventTiming2 = 0x40, ReadWrite;
    /// Delay between pulse launch and receiver enable
    TofMeasurementDelay = 0x41, ReadWrite;
    CalibrationControl = 0x42, ReadWrite;
    RtcControl = 0x43, ReadWrite;

    // Upstream conversion results
    WaveRatioUp = 0x44, ReadOnly;
    Hit1UpInt = 0x45, ReadOnly;
    Hit1UpFrac = 0x46, ReadOnly;
    Hit2UpInt = 0x47, ReadOnly;
    Hit2UpFrac = 0x48, ReadOnly;
    Hit3UpInt = 0x49, ReadOnly;
    Hit3UpFrac = 0x4A, ReadOnly;
    Hit4UpInt = 0x4B, ReadOnly;
    Hit4UpFrac = 0x4C, ReadOnly;
    Hit5UpInt = 0x4D, ReadOnly;
    Hit5UpFrac = 0x4E, ReadOnly;
    Hit6UpInt = 0x4F, ReadOnly;
    Hit6UpFrac = 0x50, ReadOnly;
    AvgUpInt = 0x51, ReadOnly;
    AvgUpFrac = 0x52, ReadOnly;

    // Downstream conversion results
    WaveRatioDown = 0x53, ReadOnly;
    Hit1DownInt = 0x54, ReadOnly;
    Hit1DownFrac = 0x55, ReadOnly;
    Hit2DownInt = 0x56, ReadOnly;
    Hit2DownFrac = 0x57, ReadOnly;
    Hit3DownInt = 0x58, ReadOnly;
    Hit3DownFrac = 0x59, ReadOnly;
    Hit4DownInt = 0x5A, ReadOnly;
    Hit4DownFrac = 0x5B, ReadOnly;
    Hit5DownInt = 0x5C, ReadOnly;
    Hit5DownFrac = 0x5D, ReadOnly;
    Hit6DownInt = 0x5E, ReadOnly;
    Hit6DownFrac = 0x5F, ReadOnly;
    AvgDownInt = 0x60, ReadOnly;
    AvgDownFrac = 0x61, ReadOnly;

    // TOF difference
    TofDiffInt = 0x62, ReadOnly;
    TofDiffFrac = 0x63, ReadOnly;
    /// Range in bits 15..8, cycle count in bits 7..0
    TofCycleCount = 0x64, ReadOnly;
    TofDiffAvgInt = 0x65, ReadOnly;
    TofDiffAvgFrac = 0x66, ReadOnly;

    // Temperature
    T1Int = 0x67, ReadOnly;
    T1Frac = 0x68, ReadOnly;
    T2Int = 0x69, ReadOnly;
    T2Frac = 0x6A, ReadOnly;
    T3Int = 0x6B, ReadOnly;
    T3Frac = 0x6C, ReadOnly;
    T4Int = 0x6D, ReadOnly;
    T4Frac = 0x6E, ReadOnly;
    TempCycleCount = 0x6F, ReadOnly;
    T1AvgInt = 0x70, ReadOnly;
    T1AvgFrac = 0x71, ReadOnly;
    T2AvgInt = 0x72, ReadOnly;
    T2AvgFrac = 0x73, ReadOnly;
    T3AvgInt = 0x74, ReadOnly;
    T3AvgFrac = 0x75, ReadOnly;
    T4AvgInt = 0x76, ReadOnly;
    T4AvgFrac = 0x77, ReadOnly;

    CalibrationInt = 0x78, ReadOnly;
    CalibrationFrac = 0x79, ReadOnly;

    // Status
    InterruptStatus = 0x7E, ReadOnly;
    /// Can only be written with zero
    Control = 0x7F, ReadWrite;
}

impl Register {
    pub const fn addr(self) -> u8 {
        self as u8
    }

    pub const fn read_opcode(self) -> u8 {
        self as u8 | READ_FLAG
    }

    /// The write opcode, or `None` for result and status registers.
    pub const fn write_opcode(self) -> Option<u8> {
        match self.access() {
            Access::ReadWrite => Some(self as u8),
            Access::ReadOnly => None,
        }
    }
}

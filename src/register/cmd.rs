//! ### Execution opcodes (1 byte, write-only)
//!
//! A command is a single opcode byte with no register address and no payload. It makes the
//! MAX35103 start an action:
//! - TOF measurements: up, down, or a difference of both
//! - temperature measurement
//! - reset, initialize, or committing the configuration registers to flash
//! - event timing modes, halt
//! - LDO control and calibration
//!
//! ### Examples
//! ```rust,no_run
//! # use max35103_rs::{Max35103, Max35103Result};
//! # use max35103_rs::bus::Bus;
//! # async fn demo<B: Bus>(mut device: Max35103<B>) -> Max35103Result<(), B::Error> {
//! use max35103_rs::register::cmd::Command;
//!
//! // Start a TOF difference measurement; the chip raises its interrupt when it completes.
//! device.command(Command::TofDiff).await?;
//! # Ok(()) }
//! ```
#![doc(alias = "opcode")]

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Single upstream TOF measurement.
    TofUp = 0x00,

    /// Single downstream TOF measurement.
    TofDown = 0x01,

    /// Upstream and downstream measurements, reporting their difference.
    TofDiff = 0x02,

    Temperature = 0x03,

    /// Resets the chip. Configuration registers are reloaded from flash.
    Reset = 0x04,

    /// Initializes the measurement engine. Required after reset and configuration.
    Initialize = 0x05,

    /// Commits the configuration registers to flash.
    TxConfigFlash = 0x06,

    EventTiming1 = 0x07,
    EventTiming2 = 0x08,
    EventTiming3 = 0x09,

    /// Stops any event timing mode in progress.
    Halt = 0x0A,

    LdoTimed = 0x0B,
    LdoOn = 0x0C,
    LdoOff = 0x0D,

    Calibrate = 0x0E,
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> Self {
        cmd as u8
    }
}

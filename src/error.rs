//! Errors that can occur when using the MAX35103 device.
//!
//! This module provides an error type that encapsulates all possible errors that can occur while
//! talking to the MAX35103 or running its acquisition cycle. It is generic over the underlying
//! SPI error type.

use core::fmt;

/// This represents all possible errors that can occur when using the MAX35103 device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Max35103Error<BusError> {
    /// An error has occurred in the SPI driver
    Bus(BusError),

    /// A bus transaction did not complete within the configured bus timeout.
    ///
    /// Could possibly indicate a stuck chip-select or a wedged SPI peripheral.
    Timeout,

    /// The TOF complete flag stayed clear for `ticks` consecutive polls.
    ///
    /// The chip is most likely not measuring. The next tick starts a new measurement and polling
    /// carries on; a chip that keeps stalling needs to be re-initialized by the caller.
    ProtocolStall { ticks: u32 },
}

impl<BusError> From<BusError> for Max35103Error<BusError> {
    fn from(e: BusError) -> Self {
        Max35103Error::Bus(e)
    }
}

impl<BusError: fmt::Debug> fmt::Display for Max35103Error<BusError> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Max35103Error::Bus(e) => write!(f, "bus error: {:?}", e),
            Max35103Error::Timeout => f.write_str("bus transaction timed out"),
            Max35103Error::ProtocolStall { ticks } => {
                write!(f, "no TOF result after {} status polls", ticks)
            }
        }
    }
}

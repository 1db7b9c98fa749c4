//! Async driver for the MAX35103 ultrasonic time-of-flight converter.
//!
//! The crate talks to the chip over an [`embedded_hal_async::spi::SpiDevice`] and turns each
//! TOF difference measurement, stamped with the chip's RTC, into a fixed-size text record.
//!
//! - [`Max35103`]: typed register access, initialization and composite reads
//! - [`acquisition::Acquisition`]: the interrupt/tick driven measurement cycle
//! - [`record`]: hex and ASCII record encoders
//! - [`codec`]: allocation-free hex, BCD and TOF text conversions
//!
//! # Examples
//!
//! ```rust,no_run
//! # use core::convert::Infallible;
//! # use embedded_hal_async::delay::DelayNs;
//! # use embedded_hal_async::spi::SpiDevice;
//! # use max35103_rs::Max35103Result;
//! use max35103_rs::Max35103;
//! use max35103_rs::acquisition::Acquisition;
//! use max35103_rs::config::Configuration;
//! use max35103_rs::host::{InterruptLine, TextOutput};
//! use max35103_rs::record::AsciiEncoder;
//! # async fn demo<S, D, O, L>(spi: S, delay: D, uart: O, line: L) -> Max35103Result<Infallible, S::Error>
//! # where S: SpiDevice, D: DelayNs, O: TextOutput, L: InterruptLine {
//!
//! let config = Configuration::default();
//! let mut device = Max35103::new_spi(spi);
//! device.initialize(&config).await?;
//!
//! let mut acquisition = Acquisition::new(device, delay, AsciiEncoder, uart, line, &config);
//! acquisition.start().await?;
//! Ok(acquisition.run(|_error| {}).await)
//! # }
//! ```
#![no_std]

#[cfg(test)]
extern crate std;

mod fmt; // must be first module, the others use its macros

pub mod acquisition;
pub mod bus;
pub mod codec;
pub mod config;
pub mod error;
pub mod host;
mod max35103;
pub mod record;
pub mod register;
pub mod sample;

#[cfg(test)]
mod testing;

pub use error::Max35103Error;
pub use max35103::{Max35103, Max35103Result, Max35103Spi};

//! Transaction driver.
//!
//! The MAX35103 speaks three transaction shapes over SPI, each with a fixed length:
//!
//! | Shape | Bytes out | Bytes in |
//! |---|---|---|
//! | command | opcode | - |
//! | register write | opcode, MSB, LSB | - |
//! | register read | opcode, 0, 0 | junk, MSB, LSB |
//!
//! A register read is a single full-duplex transfer, so chip-select stays asserted from the opcode
//! through the payload and nothing can interleave.

use crate::error::Max35103Error;
use crate::register::cmd::Command;
use crate::register::{Readable, Writable};
use embassy_futures::select::{select, Either};
use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;

/// Length of every register transaction in bytes.
pub const FRAME_LEN: usize = 3;

pub trait Bus {
    type Error;

    fn command(&mut self, cmd: Command) -> impl Future<Output = Result<(), Max35103Error<Self::Error>>>;

    fn read<R: Readable>(&mut self) -> impl Future<Output = Result<R::Out, Max35103Error<Self::Error>>>;

    fn write<W: Writable>(&mut self, v: &W::In) -> impl Future<Output = Result<(), Max35103Error<Self::Error>>>;
}

/// The register word carried by a read frame.
///
/// Byte 0 is clocked in while the opcode is clocked out and carries no data.
pub fn frame_payload(frame: &[u8; FRAME_LEN]) -> [u8; 2] {
    [frame[1], frame[2]]
}

pub struct Spi<SpiType> {
    spi: SpiType,
}

impl<SpiType> Spi<SpiType>
where
    SpiType: embedded_hal_async::spi::SpiDevice
{
    pub(crate) fn new(spi: SpiType) -> Self {
        Self { spi }
    }

    pub(crate) fn release(self) -> SpiType {
        self.spi
    }
}

impl<SpiType> Bus for Spi<SpiType>
where
    SpiType: embedded_hal_async::spi::SpiDevice,
{
    type Error = <SpiType as embedded_hal_async::spi::ErrorType>::Error;

    async fn command(&mut self, cmd: Command) -> Result<(), Max35103Error<Self::Error>> {
        self.spi.write(&[cmd.into()]).await?;

        Ok(())
    }

    async fn read<R: Readable>(&mut self) -> Result<R::Out, Max35103Error<Self::Error>> {
        let mut frame = [R::READ_OPCODE, 0, 0];
        self.spi.transfer_in_place(&mut frame).await?;

        Ok(R::decode(frame_payload(&frame)))
    }

    async fn write<W: Writable>(&mut self, v: &W::In) -> Result<(), Max35103Error<Self::Error>> {
        let mut word = [0u8; 2];
        W::encode(v, &mut word);
        self.spi.write(&[W::WRITE_OPCODE, word[0], word[1]]).await?;

        Ok(())
    }
}

/// Bounds every transaction of the wrapped bus.
///
/// Each transaction races a delay of the configured length; if the delay wins the transaction is
/// dropped and [`Max35103Error::Timeout`] is returned.
pub struct Deadline<B, D> {
    bus: B,
    delay: D,
    timeout_us: u32,
}

impl<B, D> Deadline<B, D>
where
    B: Bus,
    D: DelayNs,
{
    pub fn new(bus: B, delay: D, timeout: Duration) -> Self {
        Self {
            bus,
            delay,
            timeout_us: u32::try_from(timeout.as_micros()).unwrap_or(u32::MAX),
        }
    }

    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }
}

impl<B, D> Bus for Deadline<B, D>
where
    B: Bus,
    D: DelayNs,
{
    type Error = B::Error;

    async fn command(&mut self, cmd: Command) -> Result<(), Max35103Error<Self::Error>> {
        match select(self.bus.command(cmd), self.delay.delay_us(self.timeout_us)).await {
            Either::First(result) => result,
            Either::Second(()) => Err(Max35103Error::Timeout),
        }
    }

    async fn read<R: Readable>(&mut self) -> Result<R::Out, Max35103Error<Self::Error>> {
        match select(self.bus.read::<R>(), self.delay.delay_us(self.timeout_us)).await {
            Either::First(result) => result,
            Either::Second(()) => Err(Max35103Error::Timeout),
        }
    }

    async fn write<W: Writable>(&mut self, v: &W::In) -> Result<(), Max35103Error<Self::Error>> {
        match select(self.bus.write::<W>(v), self.delay.delay_us(self.timeout_us)).await {
            Either::First(result) => result,
            Either::Second(()) => Err(Max35103Error::Timeout),
        }
    }
}

use crate::bus::{Bus, Deadline, Spi};
use crate::config::Configuration;
use crate::error::Max35103Error;
use crate::register::cmd::Command;
use crate::register::int_status::{InterruptFlags, InterruptStatus};
use crate::register::results::{TofDiffFrac, TofDiffInt};
use crate::register::rtc::{RtcDayDate, RtcMinutesHours, RtcMonthYear, RtcSeconds};
use crate::register::tof_config::{
    CalibrationControl, Tof1, Tof2, Tof3, Tof4, Tof5, Tof6, Tof7, TofMeasurementDelay,
};
use crate::register::{Readable, Writable};
use crate::sample::{CalendarTime, MeasurementSample, TofDiff};
use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;

/// Type alias for a MAX35103 chip communicating over SPI
pub type Max35103Spi<T> = Max35103<Spi<T>>;

/// Main MAX35103 driver struct
pub struct Max35103<B> {
    pub(crate) bus: B,
}

/// Type alias used to simplify return types throughout the driver
pub type Max35103Result<T, BusError> = Result<T, Max35103Error<BusError>>;

impl<T> Max35103Spi<T>
where
    T: embedded_hal_async::spi::SpiDevice,
{
    /// Constructs a new MAX35103 driver instance that communicates over SPI.
    ///
    /// Nothing is sent to the chip; call [`initialize`](Max35103::initialize) to configure it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use embedded_hal_async::spi::SpiDevice;
    /// # use max35103_rs::Max35103Result;
    ///  use max35103_rs::Max35103;
    ///  use max35103_rs::config::Configuration;
    /// # async fn demo<S: SpiDevice>(spi: S) -> Max35103Result<(), S::Error> {
    ///
    ///  let mut device = Max35103::new_spi(spi);
    ///  device.initialize(&Configuration::default()).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new_spi(spi: T) -> Self {
        Self::new(Spi::new(spi))
    }

    /// Releases the SPI device.
    pub fn release_spi(self) -> T {
        self.bus.release()
    }
}

impl<B> Max35103<B>
where
    B: Bus,
{
    pub fn new(bus: B) -> Self {
        Max35103 { bus }
    }

    pub fn release(self) -> B {
        self.bus
    }

    /// Bounds every transaction of this device by `timeout`, measured with `delay`.
    pub fn with_timeout<D: DelayNs>(self, delay: D, timeout: Duration) -> Max35103<Deadline<B, D>> {
        Max35103::new(Deadline::new(self.bus, delay, timeout))
    }

    /// Brings the chip from any state to ready-to-measure.
    ///
    /// This function will:
    /// - Reset the chip
    /// - Write TOF1-TOF7, the measurement delay and the calibration/control word
    /// - Commit them to flash if [`Configuration::commit_to_flash`] is set
    /// - Initialize the measurement engine
    pub async fn initialize(&mut self, config: &Configuration) -> Max35103Result<(), B::Error> {
        debug!("resetting MAX35103");
        self.command(Command::Reset).await?;

        self.apply_configuration(config).await?;

        if config.commit_to_flash {
            self.command(Command::TxConfigFlash).await?;
        }

        self.command(Command::Initialize).await?;
        info!("MAX35103 initialized");

        Ok(())
    }

    /// Applies the given configuration by writing to the corresponding registers.
    ///
    /// The written values are lost on reset unless committed with [`Command::TxConfigFlash`].
    pub async fn apply_configuration(&mut self, config: &Configuration) -> Max35103Result<(), B::Error> {
        let [tof1, tof2, tof3, tof4, tof5, tof6, tof7] = config.tof;

        self.bus.write::<Tof1>(&tof1).await?;
        self.bus.write::<Tof2>(&tof2).await?;
        self.bus.write::<Tof3>(&tof3).await?;
        self.bus.write::<Tof4>(&tof4).await?;
        self.bus.write::<Tof5>(&tof5).await?;
        self.bus.write::<Tof6>(&tof6).await?;
        self.bus.write::<Tof7>(&tof7).await?;
        self.bus.write::<TofMeasurementDelay>(&config.measurement_delay).await?;
        self.bus.write::<CalibrationControl>(&config.calibration_control).await?;

        Ok(())
    }

    /// Read a register using a **typed marker**.
    ///
    /// You pass a marker type from [`crate::register`] (e.g. `register::results::TofDiffInt`),
    /// and you get back its decoded value (`R::Out`). The transaction is a single 3-byte
    /// full-duplex transfer to `R::READ_OPCODE`.
    ///
    /// [`InterruptStatus`] is **cleared on read**.
    ///
    /// # Examples
    /// ```rust,no_run
    /// # use max35103_rs::{register, Max35103, Max35103Result};
    /// # use max35103_rs::bus::Bus;
    /// # async fn demo<B: Bus>(mut device: Max35103<B>) -> Max35103Result<(), B::Error> {
    /// let tof: i16 = device.read::<register::results::TofDiffInt>().await?;
    /// # Ok(()) }
    /// ```
    pub async fn read<R: Readable>(&mut self) -> Max35103Result<R::Out, B::Error> {
        self.bus.read::<R>().await
    }

    /// Write a register using a **typed marker**.
    ///
    /// ```rust,no_run
    /// # use max35103_rs::{register, Max35103, Max35103Result};
    /// # use max35103_rs::bus::Bus;
    /// # async fn demo<B: Bus>(mut device: Max35103<B>) -> Max35103Result<(), B::Error> {
    /// device.write::<register::tof_config::TofMeasurementDelay>(&0x00C8).await?;
    /// # Ok(()) }
    /// ```
    pub async fn write<W: Writable>(&mut self, v: &W::In) -> Max35103Result<(), B::Error> {
        self.bus.write::<W>(v).await
    }

    /// Sends an execution opcode.
    pub async fn command(&mut self, cmd: Command) -> Max35103Result<(), B::Error> {
        trace!("command {:?}", cmd);
        self.bus.command(cmd).await
    }

    /// Reads (and thereby clears) the interrupt status register.
    pub async fn interrupt_status(&mut self) -> Max35103Result<InterruptFlags, B::Error> {
        self.bus.read::<InterruptStatus>().await
    }

    /// Starts a TOF difference measurement. Completion is signalled through the interrupt status.
    pub async fn start_tof_diff(&mut self) -> Max35103Result<(), B::Error> {
        self.command(Command::TofDiff).await
    }

    /// Reads the RTC in the order month/year, day/date, minutes/hours, seconds.
    pub async fn read_calendar(&mut self) -> Max35103Result<CalendarTime, B::Error> {
        let month_year = self.bus.read::<RtcMonthYear>().await?;
        let day_date = self.bus.read::<RtcDayDate>().await?;
        let minutes_hours = self.bus.read::<RtcMinutesHours>().await?;
        let seconds = self.bus.read::<RtcSeconds>().await?;

        Ok(CalendarTime { month_year, day_date, minutes_hours, seconds })
    }

    /// Reads the integer and then the fractional part of the last TOF difference.
    pub async fn read_tof_diff(&mut self) -> Max35103Result<TofDiff, B::Error> {
        let integer = self.bus.read::<TofDiffInt>().await?;
        let fraction = self.bus.read::<TofDiffFrac>().await?;

        Ok(TofDiff { integer, fraction })
    }

    /// Reads the calendar followed by the TOF difference.
    pub async fn read_sample(&mut self) -> Max35103Result<MeasurementSample, B::Error> {
        let time = self.read_calendar().await?;
        let tof = self.read_tof_diff().await?;

        Ok(MeasurementSample { time, tof })
    }
}

//! Acquisition cycle.
//!
//! Two triggers drive the chip through a measurement: the chip's interrupt line and a periodic
//! tick. The interrupt handler only latches the status register. The tick handler either polls the
//! status again or, once a TOF result is flagged, reads the sample, encodes it and sends the
//! record out before starting the next measurement.
//!
//! ```text
//!  Idle --interrupt--> StatusPending --tick, TOF flag--> Acquiring -> Formatting -> Emitting --> Idle
//!                        ^        |
//!                        +--tick--+  (flag clear: poll status)
//! ```
//!
//! The line is masked from the interrupt until the record has been sent, so a cycle is never
//! interleaved with the next interrupt. Both handlers take `&mut self`; [`Acquisition::run`]
//! serves both triggers from one task.

use crate::bus::{Bus, Deadline};
use crate::config::Configuration;
use crate::error::Max35103Error;
use crate::host::{InterruptLine, TextOutput};
use crate::max35103::{Max35103, Max35103Result};
use crate::record::RecordEncoder;
use crate::register::int_status::InterruptFlags;
use crate::sample::MeasurementSample;
use core::convert::Infallible;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Ticker};
use embedded_hal_async::delay::DelayNs;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcquisitionState {
    /// Waiting for the chip to signal a result.
    Idle,
    /// The status register has been read; waiting for the next tick.
    StatusPending,
    Acquiring,
    Formatting,
    Emitting,
}

/// What a tick did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleOutcome {
    /// No TOF result yet; the status was polled again.
    NotReady,
    /// A record was sent and the next measurement started.
    Emitted,
    /// The record could not be sent, even after a retry. The next measurement was started anyway.
    OutputDropped,
}

/// Attempts per record before it is dropped.
const TRANSMIT_ATTEMPTS: u32 = 2;

pub struct Acquisition<B, D, E, O, L> {
    device: Max35103<Deadline<B, D>>,
    encoder: E,
    output: O,
    line: L,
    state: AcquisitionState,
    status: InterruptFlags,
    sample: MeasurementSample,
    stalled_ticks: u32,
    stall_limit: Option<u32>,
    tick_period: Duration,
    /// The next measurement has to be started again on the next tick.
    restart_pending: bool,
    #[cfg(test)]
    transitions: heapless::Vec<AcquisitionState, 32>,
}

impl<B, D, E, O, L> Acquisition<B, D, E, O, L>
where
    B: Bus,
    D: DelayNs,
    E: RecordEncoder,
    O: TextOutput,
    L: InterruptLine,
{
    /// Takes ownership of an (initialized) device and the host collaborators.
    ///
    /// Every bus transaction is bounded by [`Configuration::bus_timeout`], measured with `delay`.
    pub fn new(
        device: Max35103<B>,
        delay: D,
        encoder: E,
        output: O,
        line: L,
        config: &Configuration,
    ) -> Self {
        Acquisition {
            device: device.with_timeout(delay, config.bus_timeout),
            encoder,
            output,
            line,
            state: AcquisitionState::Idle,
            status: InterruptFlags::default(),
            sample: MeasurementSample::default(),
            stalled_ticks: 0,
            stall_limit: config.stall_limit,
            tick_period: config.tick_period,
            restart_pending: false,
            #[cfg(test)]
            transitions: heapless::Vec::new(),
        }
    }

    pub fn state(&self) -> AcquisitionState {
        self.state
    }

    /// The status flags latched by the last interrupt or poll.
    pub fn status(&self) -> InterruptFlags {
        self.status
    }

    /// The sample of the last completed acquisition.
    pub fn sample(&self) -> &MeasurementSample {
        &self.sample
    }

    pub fn stalled_ticks(&self) -> u32 {
        self.stalled_ticks
    }

    pub fn device(&mut self) -> &mut Max35103<Deadline<B, D>> {
        &mut self.device
    }

    pub fn release(self) -> (Max35103<Deadline<B, D>>, E, O, L) {
        (self.device, self.encoder, self.output, self.line)
    }

    fn set_state(&mut self, state: AcquisitionState) {
        trace!("acquisition {:?} -> {:?}", self.state, state);
        #[cfg(test)]
        let _ = self.transitions.push(state);

        self.state = state;
    }

    /// Kicks off the first measurement and arms the interrupt line.
    pub async fn start(&mut self) -> Max35103Result<(), B::Error> {
        self.device.start_tof_diff().await?;
        self.restart_pending = false;
        // Clears whatever the chip flagged before we were listening.
        self.device.interrupt_status().await?;

        self.status = InterruptFlags::default();
        self.stalled_ticks = 0;
        self.line.clear();
        self.line.enable();
        self.set_state(AcquisitionState::Idle);
        info!("acquisition started, {:?} records", E::FORMAT);

        Ok(())
    }

    /// Handles an assertion of the interrupt line.
    ///
    /// Masks the line and latches the status register. The line stays masked until a record
    /// has been sent. Flags latched by an earlier poll are kept; the chip clears them on read.
    pub async fn on_interrupt(&mut self) -> Max35103Result<(), B::Error> {
        self.line.disable();
        let status = self.device.interrupt_status().await;
        self.line.clear();
        self.set_state(AcquisitionState::StatusPending);

        self.status = InterruptFlags::from_word(self.status.raw | status?.raw);
        trace!("interrupt status {:x}", self.status.raw);

        Ok(())
    }

    /// Handles a periodic tick.
    ///
    /// Without a latched TOF result this polls the status register and returns
    /// [`CycleOutcome::NotReady`], or [`Max35103Error::ProtocolStall`] once the stall limit is
    /// reached. With one, it runs a full cycle.
    ///
    /// A bus error while reading the sample keeps the result latched and the line masked, so the
    /// next tick retries the acquisition. If the next measurement could not be started, or the
    /// chip stalled, the next tick starts it again before polling.
    pub async fn on_tick(&mut self) -> Max35103Result<CycleOutcome, B::Error> {
        if !self.status.tof_complete() {
            if self.restart_pending {
                self.device.start_tof_diff().await?;
                self.restart_pending = false;
                debug!("measurement restarted");
            }

            return self.poll_status().await;
        }

        self.set_state(AcquisitionState::Acquiring);
        self.sample = match self.device.read_sample().await {
            Ok(sample) => sample,
            Err(e) => {
                self.set_state(AcquisitionState::StatusPending);
                return Err(e);
            }
        };

        self.set_state(AcquisitionState::Formatting);
        let record = self.encoder.encode(&self.sample);

        self.set_state(AcquisitionState::Emitting);
        let outcome = self.emit(record.as_ref());

        self.status = InterruptFlags::default();
        self.stalled_ticks = 0;
        self.line.enable();
        self.set_state(AcquisitionState::Idle);
        if let Err(e) = self.device.start_tof_diff().await {
            warn!("next measurement not started");
            self.restart_pending = true;
            return Err(e);
        }

        Ok(outcome)
    }

    async fn poll_status(&mut self) -> Max35103Result<CycleOutcome, B::Error> {
        self.set_state(AcquisitionState::StatusPending);
        self.status = self.device.interrupt_status().await?;

        if self.status.tof_complete() {
            self.stalled_ticks = 0;
            return Ok(CycleOutcome::NotReady);
        }

        self.stalled_ticks += 1;
        match self.stall_limit {
            Some(limit) if self.stalled_ticks >= limit => {
                let ticks = self.stalled_ticks;
                self.stalled_ticks = 0;
                self.restart_pending = true;
                warn!("no TOF result after {} ticks", ticks);

                Err(Max35103Error::ProtocolStall { ticks })
            }
            _ => Ok(CycleOutcome::NotReady),
        }
    }

    fn emit(&mut self, record: &[u8]) -> CycleOutcome {
        for attempt in 1..=TRANSMIT_ATTEMPTS {
            if self.output.transmit(record).is_ok() {
                return CycleOutcome::Emitted;
            }

            debug!("transmit attempt {} failed", attempt);
        }

        warn!("dropped {} byte record", record.len());

        CycleOutcome::OutputDropped
    }

    /// Serves the tick and the interrupt line forever.
    ///
    /// Call [`start`](Self::start) first. Errors from either handler are passed to `on_error`
    /// and the loop carries on.
    pub async fn run<F>(&mut self, mut on_error: F) -> Infallible
    where
        F: FnMut(Max35103Error<B::Error>),
    {
        let mut ticker = Ticker::every(self.tick_period);

        loop {
            let event = select(ticker.next(), self.line.wait_asserted()).await;
            let result = match event {
                Either::First(()) => self.on_tick().await.map(|_| ()),
                Either::Second(()) => self.on_interrupt().await,
            };

            if let Err(e) = result {
                on_error(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{AsciiEncoder, HexEncoder};
    use crate::register::int_status::InterruptStatus;
    use crate::register::results::{TofDiffFrac, TofDiffInt};
    use crate::register::rtc::{RtcDayDate, RtcMinutesHours, RtcMonthYear, RtcSeconds};
    use crate::testing::{Bench, Event, FakeBus, FakeBusError, FakeDelay, FakeLine, FakeOutput};
    use AcquisitionState::*;

    type TestAcquisition<'a, E> = Acquisition<FakeBus<'a>, FakeDelay, E, FakeOutput<'a>, FakeLine<'a>>;

    fn chip(bench: &Bench, status: u16) {
        bench.with_response::<InterruptStatus>(status);
        bench.with_response::<RtcMonthYear>(0x1224);
        bench.with_response::<RtcDayDate>(0x0231);
        bench.with_response::<RtcMinutesHours>(0x5923);
        bench.with_response::<RtcSeconds>(0x7658);
        bench.with_response::<TofDiffInt>(0xFFFB);
        bench.with_response::<TofDiffFrac>(0x8000);
    }

    fn acquisition<'a, E: RecordEncoder>(bench: &'a Bench, encoder: E, config: &Configuration) -> TestAcquisition<'a, E> {
        Acquisition::new(
            Max35103::new(FakeBus::new(bench)),
            FakeDelay,
            encoder,
            FakeOutput::new(bench),
            FakeLine::new(bench),
            config,
        )
    }

    fn is_sample_read(event: &Event) -> bool {
        matches!(event, Event::Read(0xB0..=0xB3) | Event::Read(0xE2) | Event::Read(0xE3))
    }

    #[tokio::test]
    async fn start_arms_the_line() {
        let bench = Bench::new();
        chip(&bench, 0x1000);
        let mut acq = acquisition(&bench, AsciiEncoder, &Configuration::default());

        acq.start().await.unwrap();

        assert_eq!(Idle, acq.state());
        assert!(!acq.status().tof_complete());
        assert_eq!(
            &[Event::Command(0x02), Event::Read(0xFE), Event::LineCleared, Event::LineEnabled],
            &bench.events()[..]
        );
    }

    #[tokio::test]
    async fn full_cycle_when_tof_flagged() {
        let bench = Bench::new();
        chip(&bench, 0x1000);
        let mut acq = acquisition(&bench, AsciiEncoder, &Configuration::default());

        acq.on_interrupt().await.unwrap();
        assert_eq!(StatusPending, acq.state());
        assert!(acq.status().tof_complete());

        assert_eq!(Ok(CycleOutcome::Emitted), acq.on_tick().await);

        assert_eq!(
            &[
                Event::LineDisabled,
                Event::Read(0xFE),
                Event::LineCleared,
                Event::Read(0xB3),
                Event::Read(0xB2),
                Event::Read(0xB1),
                Event::Read(0xB0),
                Event::Read(0xE2),
                Event::Read(0xE3),
                Event::Transmit(35),
                Event::LineEnabled,
                Event::Command(0x02),
            ],
            &bench.events()[..]
        );
        assert_eq!(&[StatusPending, Acquiring, Formatting, Emitting, Idle], &acq.transitions[..]);
        assert_eq!(b"12/31/24\t23:59:58:76\t        -4.5\n\r", &bench.transmitted()[..]);
        assert!(!acq.status().tof_complete());
        assert_eq!(-4.5, acq.sample().tof.value());
    }

    #[tokio::test]
    async fn hex_records_are_sent_whole() {
        let bench = Bench::new();
        chip(&bench, 0x1000);
        let mut acq = acquisition(&bench, HexEncoder::new(), &Configuration::default());

        acq.on_interrupt().await.unwrap();
        assert_eq!(Ok(CycleOutcome::Emitted), acq.on_tick().await);

        assert_eq!(1, bench.count(|e| matches!(e, Event::Transmit(_))));
        assert_eq!(1, bench.count(|e| *e == Event::Transmit(48)));
        assert_eq!(b"FFFB \0\0\0", &bench.transmitted()[..8]);
    }

    #[tokio::test]
    async fn tick_without_flag_polls_status() {
        let bench = Bench::new();
        chip(&bench, 0x0000);
        let mut acq = acquisition(&bench, AsciiEncoder, &Configuration::default());

        acq.on_interrupt().await.unwrap();
        bench.clear_events();

        assert_eq!(Ok(CycleOutcome::NotReady), acq.on_tick().await);

        assert_eq!(&[Event::Read(0xFE)], &bench.events()[..]);
        assert_eq!(0, bench.count(is_sample_read));
        assert_eq!(0, bench.count(|e| matches!(e, Event::Transmit(_))));
        assert_eq!(StatusPending, acq.state());
        assert_eq!(1, acq.stalled_ticks());
    }

    #[tokio::test]
    async fn poll_that_finds_the_flag_acquires_on_next_tick() {
        let bench = Bench::new();
        chip(&bench, 0x0000);
        let mut acq = acquisition(&bench, AsciiEncoder, &Configuration::default());

        assert_eq!(Ok(CycleOutcome::NotReady), acq.on_tick().await);
        assert_eq!(1, acq.stalled_ticks());

        chip(&bench, 0x1000);
        assert_eq!(Ok(CycleOutcome::NotReady), acq.on_tick().await);
        assert_eq!(0, acq.stalled_ticks());

        assert_eq!(Ok(CycleOutcome::Emitted), acq.on_tick().await);
        assert_eq!(6, bench.count(is_sample_read));
    }

    #[tokio::test]
    async fn stall_limit_reports_protocol_stall() {
        let bench = Bench::new();
        chip(&bench, 0x0000);
        let config = Configuration::default().stall_limit(Some(3));
        let mut acq = acquisition(&bench, AsciiEncoder, &config);

        assert_eq!(Ok(CycleOutcome::NotReady), acq.on_tick().await);
        assert_eq!(Ok(CycleOutcome::NotReady), acq.on_tick().await);
        assert_eq!(Err(Max35103Error::ProtocolStall { ticks: 3 }), acq.on_tick().await);

        // The measurement is started again and polling carries on with a fresh count.
        assert_eq!(0, acq.stalled_ticks());
        bench.clear_events();
        assert_eq!(Ok(CycleOutcome::NotReady), acq.on_tick().await);
        assert_eq!(1, acq.stalled_ticks());
        assert_eq!(&[Event::Command(0x02), Event::Read(0xFE)], &bench.events()[..]);

        // Only once per stall.
        bench.clear_events();
        assert_eq!(Ok(CycleOutcome::NotReady), acq.on_tick().await);
        assert_eq!(&[Event::Read(0xFE)], &bench.events()[..]);
    }

    #[tokio::test]
    async fn failed_start_command_is_retried_next_tick() {
        let bench = Bench::new();
        chip(&bench, 0x1000);
        let mut acq = acquisition(&bench, AsciiEncoder, &Configuration::default());

        acq.on_interrupt().await.unwrap();
        bench.fail_commands(true);
        assert_eq!(Err(Max35103Error::Bus(FakeBusError)), acq.on_tick().await);
        assert_eq!(1, bench.count(|e| *e == Event::Transmit(35)));
        assert_eq!(Idle, acq.state());

        // Still failing: the command is tried again and nothing is polled.
        bench.clear_events();
        chip(&bench, 0x0000);
        assert_eq!(Err(Max35103Error::Bus(FakeBusError)), acq.on_tick().await);
        assert_eq!(&[Event::Command(0x02)], &bench.events()[..]);

        bench.fail_commands(false);
        bench.clear_events();
        assert_eq!(Ok(CycleOutcome::NotReady), acq.on_tick().await);
        assert_eq!(&[Event::Command(0x02), Event::Read(0xFE)], &bench.events()[..]);

        bench.clear_events();
        assert_eq!(Ok(CycleOutcome::NotReady), acq.on_tick().await);
        assert_eq!(0, bench.count(|e| *e == Event::Command(0x02)));
    }

    #[tokio::test]
    async fn interrupt_keeps_flag_latched_by_poll() {
        let bench = Bench::new();
        chip(&bench, 0x1000);
        let mut acq = acquisition(&bench, AsciiEncoder, &Configuration::default());

        assert_eq!(Ok(CycleOutcome::NotReady), acq.on_tick().await);
        assert!(acq.status().tof_complete());

        // The poll cleared the chip's register before the interrupt handler got to it.
        chip(&bench, 0x0000);
        acq.on_interrupt().await.unwrap();
        assert!(acq.status().tof_complete());

        assert_eq!(Ok(CycleOutcome::Emitted), acq.on_tick().await);
    }

    #[tokio::test]
    async fn run_serves_interrupt_then_tick() {
        use embassy_time::Timer;

        let bench = Bench::new();
        chip(&bench, 0x1000);
        bench.assert_line(1);
        let config = Configuration::default()
            .tick_period(Duration::from_millis(10))
            .stall_limit(None);
        let mut acq = acquisition(&bench, AsciiEncoder, &config);

        let mut errors = 0;
        match select(acq.run(|_| errors += 1), Timer::after_millis(55)).await {
            Either::First(never) => match never {},
            Either::Second(()) => {}
        }

        assert_eq!(0, errors);
        let events = bench.events();
        assert_eq!(
            &[
                Event::LineDisabled,
                Event::Read(0xFE),
                Event::LineCleared,
                Event::Read(0xB3),
                Event::Read(0xB2),
                Event::Read(0xB1),
                Event::Read(0xB0),
                Event::Read(0xE2),
                Event::Read(0xE3),
                Event::Transmit(35),
                Event::LineEnabled,
                Event::Command(0x02),
            ],
            &events[..12]
        );
        assert_eq!(StatusPending, acq.transitions[0]);
    }

    #[tokio::test]
    async fn unbounded_polling() {
        let bench = Bench::new();
        chip(&bench, 0x0000);
        let config = Configuration::default().stall_limit(None);
        let mut acq = acquisition(&bench, AsciiEncoder, &config);

        for _ in 0..20 {
            assert_eq!(Ok(CycleOutcome::NotReady), acq.on_tick().await);
        }
        assert_eq!(20, acq.stalled_ticks());
    }

    #[tokio::test]
    async fn stalled_bus_times_out() {
        let bench = Bench::new();
        chip(&bench, 0x1000);
        bench.stall_bus(true);
        let mut acq = acquisition(&bench, AsciiEncoder, &Configuration::default());

        assert_eq!(Err(Max35103Error::Timeout), acq.on_interrupt().await);
        assert_eq!(StatusPending, acq.state());
        assert!(!acq.status().tof_complete());
    }

    #[tokio::test]
    async fn bus_error_during_acquisition_is_retried_next_tick() {
        let bench = Bench::new();
        chip(&bench, 0x1000);
        let mut acq = acquisition(&bench, AsciiEncoder, &Configuration::default());

        acq.on_interrupt().await.unwrap();

        bench.fail_bus(true);
        assert_eq!(Err(Max35103Error::Bus(FakeBusError)), acq.on_tick().await);
        assert_eq!(StatusPending, acq.state());
        assert!(acq.status().tof_complete());
        assert_eq!(0, bench.count(|e| *e == Event::LineEnabled));

        bench.fail_bus(false);
        bench.clear_events();
        assert_eq!(Ok(CycleOutcome::Emitted), acq.on_tick().await);
        assert_eq!(6, bench.count(is_sample_read));
    }

    #[tokio::test]
    async fn failed_transmit_is_retried_once() {
        let bench = Bench::new();
        chip(&bench, 0x1000);
        bench.fail_transmits(1);
        let mut acq = acquisition(&bench, AsciiEncoder, &Configuration::default());

        acq.on_interrupt().await.unwrap();
        assert_eq!(Ok(CycleOutcome::Emitted), acq.on_tick().await);

        assert_eq!(1, bench.count(|e| *e == Event::TransmitFailed));
        assert_eq!(1, bench.count(|e| *e == Event::Transmit(35)));
    }

    #[tokio::test]
    async fn record_dropped_after_second_failure() {
        let bench = Bench::new();
        chip(&bench, 0x1000);
        bench.fail_transmits(2);
        let mut acq = acquisition(&bench, AsciiEncoder, &Configuration::default());

        acq.on_interrupt().await.unwrap();
        assert_eq!(Ok(CycleOutcome::OutputDropped), acq.on_tick().await);

        assert_eq!(2, bench.count(|e| *e == Event::TransmitFailed));
        assert_eq!(0, bench.count(|e| matches!(e, Event::Transmit(_))));

        // The cycle still completes and the next measurement starts.
        let events = bench.events();
        assert_eq!(&[Event::LineEnabled, Event::Command(0x02)], &events[events.len() - 2..]);
        assert_eq!(Idle, acq.state());
    }
}

use crate::bus::Bus;
use crate::error::Max35103Error;
use crate::host::{InterruptLine, TextOutput};
use crate::register::cmd::Command;
use crate::register::{Readable, Writable};
use core::cell::{Cell, RefCell};
use embedded_hal_async::delay::DelayNs;
use heapless::{LinearMap, Vec};

/// Something a fake collaborator observed, in global order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Read(u8),
    Write(u8, u16),
    Command(u8),
    Transmit(usize),
    TransmitFailed,
    LineEnabled,
    LineDisabled,
    LineCleared,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FakeBusError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FakeTxError;

/// Shared state behind every fake: the chip's registers, failure knobs and the journal.
pub struct Bench {
    journal: RefCell<Vec<Event, 128>>,
    registers: RefCell<LinearMap<u8, u16, 16>>,
    transmitted: RefCell<Vec<u8, 64>>,
    bus_fails: Cell<bool>,
    bus_stalls: Cell<bool>,
    commands_fail: Cell<bool>,
    tx_failures: Cell<u32>,
    line_assertions: Cell<u32>,
}

impl Bench {
    pub fn new() -> Self {
        Bench {
            journal: RefCell::new(Vec::new()),
            registers: RefCell::new(LinearMap::new()),
            transmitted: RefCell::new(Vec::new()),
            bus_fails: Cell::new(false),
            bus_stalls: Cell::new(false),
            commands_fail: Cell::new(false),
            tx_failures: Cell::new(0),
            line_assertions: Cell::new(0),
        }
    }

    pub fn with_response<R: Readable>(&self, word: u16) {
        self.registers.borrow_mut().insert(R::READ_OPCODE, word).unwrap();
    }

    pub fn fail_bus(&self, fail: bool) {
        self.bus_fails.set(fail);
    }

    pub fn stall_bus(&self, stall: bool) {
        self.bus_stalls.set(stall);
    }

    /// Only execution commands fail; register transactions still succeed.
    pub fn fail_commands(&self, fail: bool) {
        self.commands_fail.set(fail);
    }

    /// The chip asserts its interrupt line `count` more times.
    pub fn assert_line(&self, count: u32) {
        self.line_assertions.set(count);
    }

    /// The next `count` transmits fail.
    pub fn fail_transmits(&self, count: u32) {
        self.tx_failures.set(count);
    }

    pub fn record(&self, event: Event) {
        self.journal.borrow_mut().push(event).unwrap();
    }

    pub fn events(&self) -> Vec<Event, 128> {
        self.journal.borrow().clone()
    }

    pub fn clear_events(&self) {
        self.journal.borrow_mut().clear();
    }

    pub fn count(&self, filter: impl Fn(&Event) -> bool) -> usize {
        self.journal.borrow().iter().filter(|e| filter(e)).count()
    }

    /// The last record that was transmitted successfully.
    pub fn transmitted(&self) -> Vec<u8, 64> {
        self.transmitted.borrow().clone()
    }
}

pub struct FakeBus<'a> {
    bench: &'a Bench,
}

impl<'a> FakeBus<'a> {
    pub fn new(bench: &'a Bench) -> Self {
        FakeBus { bench }
    }

    async fn transact(&mut self, event: Event) -> Result<(), Max35103Error<FakeBusError>> {
        self.bench.record(event);

        if self.bench.bus_stalls.get() {
            core::future::pending::<()>().await;
        }

        if self.bench.bus_fails.get() {
            return Err(Max35103Error::Bus(FakeBusError));
        }

        Ok(())
    }
}

impl Bus for FakeBus<'_> {
    type Error = FakeBusError;

    async fn command(&mut self, cmd: Command) -> Result<(), Max35103Error<Self::Error>> {
        self.transact(Event::Command(cmd.into())).await?;

        if self.bench.commands_fail.get() {
            return Err(Max35103Error::Bus(FakeBusError));
        }

        Ok(())
    }

    async fn read<R: Readable>(&mut self) -> Result<R::Out, Max35103Error<Self::Error>> {
        self.transact(Event::Read(R::READ_OPCODE)).await?;

        match self.bench.registers.borrow().get(&R::READ_OPCODE) {
            Some(word) => Ok(R::decode(word.to_be_bytes())),
            None => panic!("No mocked value for opcode 0x{:02x}", R::READ_OPCODE),
        }
    }

    async fn write<W: Writable>(&mut self, v: &W::In) -> Result<(), Max35103Error<Self::Error>> {
        let mut word = [0u8; 2];
        W::encode(v, &mut word);

        self.transact(Event::Write(W::WRITE_OPCODE, u16::from_be_bytes(word))).await
    }
}

pub struct FakeOutput<'a> {
    bench: &'a Bench,
}

impl<'a> FakeOutput<'a> {
    pub fn new(bench: &'a Bench) -> Self {
        FakeOutput { bench }
    }
}

impl TextOutput for FakeOutput<'_> {
    type Error = FakeTxError;

    fn transmit(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        let failures = self.bench.tx_failures.get();
        if failures > 0 {
            self.bench.tx_failures.set(failures - 1);
            self.bench.record(Event::TransmitFailed);
            return Err(FakeTxError);
        }

        self.bench.record(Event::Transmit(bytes.len()));
        let mut transmitted = self.bench.transmitted.borrow_mut();
        transmitted.clear();
        transmitted.extend_from_slice(bytes).unwrap();

        Ok(())
    }
}

pub struct FakeLine<'a> {
    bench: &'a Bench,
}

impl<'a> FakeLine<'a> {
    pub fn new(bench: &'a Bench) -> Self {
        FakeLine { bench }
    }
}

impl InterruptLine for FakeLine<'_> {
    fn enable(&mut self) {
        self.bench.record(Event::LineEnabled);
    }

    fn disable(&mut self) {
        self.bench.record(Event::LineDisabled);
    }

    fn clear(&mut self) {
        self.bench.record(Event::LineCleared);
    }

    async fn wait_asserted(&mut self) {
        let assertions = self.bench.line_assertions.get();
        if assertions > 0 {
            self.bench.line_assertions.set(assertions - 1);
            return;
        }

        core::future::pending::<()>().await
    }
}

pub struct FakeDelay;

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, _: u32) {

    }
}

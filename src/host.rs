//! Host collaborators of the acquisition cycle.
//!
//! The driver does not own the UART or the interrupt controller. It reaches them through
//! [`TextOutput`] and [`InterruptLine`], which the host implements for whatever it runs on.
//! [`GatedPin`] covers the common case of an interrupt wired to a GPIO.

use embedded_hal_async::digital::Wait;

/// Sink for finished records.
///
/// `transmit` must not block; a record that cannot be queued is reported as an error and the
/// caller decides whether to retry.
pub trait TextOutput {
    type Error;

    fn transmit(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// The chip's interrupt request line, as seen by the host interrupt controller.
pub trait InterruptLine {
    /// Unmask the line.
    fn enable(&mut self);

    /// Mask the line. An edge arriving while masked is not delivered.
    fn disable(&mut self);

    /// Acknowledge a pending request.
    fn clear(&mut self);

    /// Resolves when the chip asserts the line while it is enabled.
    fn wait_asserted(&mut self) -> impl Future<Output = ()>;
}

/// [`InterruptLine`] over an async GPIO input. The MAX35103 pulls `INT` low to signal.
///
/// Masking is done in software: while disabled, [`wait_asserted`](InterruptLine::wait_asserted)
/// never resolves.
pub struct GatedPin<P> {
    pin: P,
    enabled: bool,
}

impl<P: Wait> GatedPin<P> {
    /// Starts masked.
    pub fn new(pin: P) -> Self {
        Self { pin, enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: Wait> InterruptLine for GatedPin<P> {
    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn clear(&mut self) {}

    async fn wait_asserted(&mut self) {
        if self.enabled {
            if self.pin.wait_for_falling_edge().await.is_ok() {
                return;
            }

            warn!("interrupt pin failed, parking line until re-enabled");
        }

        core::future::pending::<()>().await
    }
}

use embassy_time::Duration;

/// Number of TOF configuration words (TOF1-TOF7).
pub const TOF_WORDS: usize = 7;

/// Chip configuration written by [`Max35103::initialize`](crate::Max35103::initialize), plus the
/// timing of the acquisition cycle.
///
/// The default register words are those of a working flow-meter front end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Configuration {
    pub(crate) tof: [u16; TOF_WORDS],
    pub(crate) measurement_delay: u16,
    pub(crate) calibration_control: u16,
    pub(crate) commit_to_flash: bool,
    pub(crate) tick_period: Duration,
    pub(crate) bus_timeout: Duration,
    pub(crate) stall_limit: Option<u32>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            tof: [0x0C10, 0xA100, 0x0506, 0x0708, 0x090A, 0x230A, 0x230A],
            measurement_delay: 0x00C8,
            calibration_control: 0x0FDF,
            commit_to_flash: true,
            tick_period: Duration::from_millis(1000),
            bus_timeout: Duration::from_millis(10),
            stall_limit: Some(10),
        }
    }
}

impl Configuration {
    /// Sets the TOF1-TOF7 words, in register order.
    pub fn tof_words(mut self, words: [u16; TOF_WORDS]) -> Self {
        self.tof = words;

        self
    }

    pub fn measurement_delay(mut self, delay: u16) -> Self {
        self.measurement_delay = delay;

        self
    }

    pub fn calibration_control(mut self, word: u16) -> Self {
        self.calibration_control = word;

        self
    }

    /// Whether initialization stores the configuration registers in the chip's flash.
    ///
    /// Flash has limited endurance; disable this when the configuration is rewritten on every boot.
    pub fn commit_to_flash(mut self, commit: bool) -> Self {
        self.commit_to_flash = commit;

        self
    }

    /// Period of the status poll and acquisition tick.
    pub fn tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;

        self
    }

    /// Upper bound for a single bus transaction.
    pub fn bus_timeout(mut self, timeout: Duration) -> Self {
        self.bus_timeout = timeout;

        self
    }

    /// Number of consecutive ticks without a TOF result before
    /// [`ProtocolStall`](crate::error::Max35103Error::ProtocolStall) is reported. `None` polls
    /// forever.
    pub fn stall_limit(mut self, limit: Option<u32>) -> Self {
        self.stall_limit = limit;

        self
    }
}

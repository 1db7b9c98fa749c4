//! Output records.
//!
//! Every acquisition cycle turns a [`MeasurementSample`] into exactly one fixed-size record that
//! is handed to the text output in a single call. The layout is chosen at build time by picking an
//! encoder:
//!
//! - [`HexEncoder`]: six register words as hex, each followed by a 4-byte delimiter.
//! - [`AsciiEncoder`]: a human-readable `MM/DD/YY\tHH:MM:SS:ff\t<tof>\n\r` line.

use crate::codec::{compose_tof_text, hour_ones_digit, Branchless, HexCodec, TOF_TEXT_LEN};
use crate::register::rtc::{
    DATE_ONES, DATE_TENS, HOUR_TENS, HUNDREDTHS, MINUTE_ONES, MINUTE_TENS, MONTH_ONES, MONTH_TENS,
    SECOND_ONES, SECOND_TENS, TENTHS, YEAR_ONES, YEAR_TENS,
};
use crate::sample::MeasurementSample;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputFormat {
    Hex,
    Ascii,
}

pub trait RecordEncoder {
    type Record: AsRef<[u8]>;

    const FORMAT: OutputFormat;

    fn encode(&self, sample: &MeasurementSample) -> Self::Record;
}

pub const HEX_RECORD_LEN: usize = 48;

/// Follows every hex field: the 32-bit word `0x0000_0020` in little-endian byte order.
pub const FIELD_DELIMITER: [u8; 4] = 0x0000_0020u32.to_le_bytes();

const HEX_FIELD_LEN: usize = 4 + FIELD_DELIMITER.len();

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HexRecord(pub [u8; HEX_RECORD_LEN]);

impl AsRef<[u8]> for HexRecord {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Encodes, in order: TOF integer, TOF fraction, month/year, day/date, minutes/hours, seconds.
#[derive(Copy, Clone, Debug, Default)]
pub struct HexEncoder<C = Branchless> {
    codec: C,
}

impl HexEncoder<Branchless> {
    pub const fn new() -> Self {
        Self { codec: Branchless }
    }
}

impl<C: HexCodec> HexEncoder<C> {
    pub const fn with_codec(codec: C) -> Self {
        Self { codec }
    }
}

impl<C: HexCodec> RecordEncoder for HexEncoder<C> {
    type Record = HexRecord;

    const FORMAT: OutputFormat = OutputFormat::Hex;

    fn encode(&self, sample: &MeasurementSample) -> HexRecord {
        let time = &sample.time;
        let words = [
            sample.tof.integer as u16,
            sample.tof.fraction,
            time.month_year.word(),
            time.day_date.word(),
            time.minutes_hours.word(),
            time.seconds.word(),
        ];

        let mut out = [0u8; HEX_RECORD_LEN];
        for (field, word) in out.chunks_exact_mut(HEX_FIELD_LEN).zip(words) {
            field[..4].copy_from_slice(&self.codec.hex_u16(word));
            field[4..].copy_from_slice(&FIELD_DELIMITER);
        }

        HexRecord(out)
    }
}

pub const ASCII_RECORD_LEN: usize = 21 + TOF_TEXT_LEN;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AsciiRecord(pub [u8; ASCII_RECORD_LEN]);

impl AsRef<[u8]> for AsciiRecord {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct AsciiEncoder;

impl RecordEncoder for AsciiEncoder {
    type Record = AsciiRecord;

    const FORMAT: OutputFormat = OutputFormat::Ascii;

    fn encode(&self, sample: &MeasurementSample) -> AsciiRecord {
        let time = &sample.time;
        let month = time.month_year.month;
        let year = time.month_year.year;
        let date = time.day_date.date;
        let hours = time.minutes_hours.hours;
        let minutes = time.minutes_hours.minutes;
        let seconds = time.seconds.seconds;
        let hundredths = time.seconds.hundredths;

        let mut out = [0u8; ASCII_RECORD_LEN];
        out[..21].copy_from_slice(&[
            MONTH_TENS.ascii(month),
            MONTH_ONES.ascii(month),
            b'/',
            DATE_TENS.ascii(date),
            DATE_ONES.ascii(date),
            b'/',
            YEAR_TENS.ascii(year),
            YEAR_ONES.ascii(year),
            b'\t',
            HOUR_TENS.ascii(hours),
            hour_ones_digit(hours),
            b':',
            MINUTE_TENS.ascii(minutes),
            MINUTE_ONES.ascii(minutes),
            b':',
            SECOND_TENS.ascii(seconds),
            SECOND_ONES.ascii(seconds),
            b':',
            TENTHS.ascii(hundredths),
            HUNDREDTHS.ascii(hundredths),
            b'\t',
        ]);
        out[21..].copy_from_slice(&compose_tof_text(sample.tof.integer, sample.tof.fraction));

        AsciiRecord(out)
    }
}

//! ### RTC registers (`0x30`-`0x35`, 2 bytes each, R/W)
//!
//! The calendar is spread over four words, each packing two BCD bytes:
//!
//! | Register | Opcode (R/W) | MSB | LSB |
//! |---|---|---|---|
//! | [`RtcSeconds`] | `0xB0`/`0x30` | tenths, hundredths | seconds |
//! | [`RtcMinutesHours`] | `0xB1`/`0x31` | minutes | hours (+ 12-hour flag) |
//! | [`RtcDayDate`] | `0xB2`/`0x32` | day of week | date |
//! | [`RtcMonthYear`] | `0xB3`/`0x33` | month | year |
//!
//! The `*_TENS`/`*_ONES` constants locate each digit within its byte.

use crate::codec::BcdField;
use crate::register::{word_register, Readable, Reg, Writable};

pub const MONTH_TENS: BcdField = BcdField::new(0x10, 4);
pub const MONTH_ONES: BcdField = BcdField::new(0x0F, 0);
pub const YEAR_TENS: BcdField = BcdField::new(0xF0, 4);
pub const YEAR_ONES: BcdField = BcdField::new(0x0F, 0);
pub const DATE_TENS: BcdField = BcdField::new(0x30, 4);
pub const DATE_ONES: BcdField = BcdField::new(0x0F, 0);
/// The low hour digit depends on the 12-hour flag, see [`crate::codec::hour_ones_digit`].
pub const HOUR_TENS: BcdField = BcdField::new(0x30, 4);
pub const MINUTE_TENS: BcdField = BcdField::new(0x70, 4);
pub const MINUTE_ONES: BcdField = BcdField::new(0x0F, 0);
pub const SECOND_TENS: BcdField = BcdField::new(0x70, 4);
pub const SECOND_ONES: BcdField = BcdField::new(0x0F, 0);
pub const TENTHS: BcdField = BcdField::new(0xF0, 4);
pub const HUNDREDTHS: BcdField = BcdField::new(0x0F, 0);

macro_rules! rtc_word {
    ($(#[$doc:meta])* $marker:ident = $addr:literal => $fields:ident { $hi:ident, $lo:ident }) => {
        $(#[$doc])*
        pub struct $marker;
        impl Reg for $marker { const ADDR: u8 = $addr; }

        /// Raw BCD bytes of the register, MSB first.
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        pub struct $fields {
            pub $hi: u8,
            pub $lo: u8,
        }

        impl $fields {
            pub fn word(&self) -> u16 {
                u16::from_be_bytes([self.$hi, self.$lo])
            }
        }

        impl Readable for $marker {
            type Out = $fields;
            fn decode(word: [u8; 2]) -> Self::Out {
                $fields { $hi: word[0], $lo: word[1] }
            }
        }

        impl Writable for $marker {
            type In = $fields;
            fn encode(v: &Self::In, out: &mut [u8; 2]) {
                *out = [v.$hi, v.$lo];
            }
        }
    };
}

rtc_word! {
    /// Marker type for the RTC seconds register (0x30)
    RtcSeconds = 0x30 => Seconds { hundredths, seconds }
}

rtc_word! {
    /// Marker type for the RTC minutes/hours register (0x31)
    RtcMinutesHours = 0x31 => MinutesHours { minutes, hours }
}

rtc_word! {
    /// Marker type for the RTC day/date register (0x32)
    RtcDayDate = 0x32 => DayDate { day, date }
}

rtc_word! {
    /// Marker type for the RTC month/year register (0x33)
    RtcMonthYear = 0x33 => MonthYear { month, year }
}

word_register! {
    /// Marker type for the watchdog alarm count register (0x34)
    WatchdogAlarmCount = 0x34
}

word_register! {
    /// Marker type for the alarm register (0x35)
    Alarm = 0x35
}

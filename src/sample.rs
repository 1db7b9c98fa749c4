//! One measurement as read from the chip.

use crate::codec::tof_value;
use crate::register::rtc::{DayDate, MinutesHours, MonthYear, Seconds};

/// The four RTC words, still in packed BCD.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalendarTime {
    pub month_year: MonthYear,
    pub day_date: DayDate,
    pub minutes_hours: MinutesHours,
    pub seconds: Seconds,
}

/// TOF difference in units of the 4 MHz reference clock, as a signed 16.16 fixed-point pair.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TofDiff {
    pub integer: i16,
    pub fraction: u16,
}

impl TofDiff {
    pub fn value(&self) -> f64 {
        tof_value(self.integer, self.fraction)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MeasurementSample {
    pub time: CalendarTime,
    pub tof: TofDiff,
}

//! ### TOF configuration registers (`0x38`-`0x43`, 2 bytes each, R/W)
//!
//! The driver passes these words through untouched; see [`crate::config::Configuration`] for
//! the values written at start-up. Written values only survive a reset once committed with
//! [`crate::register::cmd::Command::TxConfigFlash`].

use crate::register::word_register;

word_register! {
    /// Marker type for TOF1 (0x38): pulse launcher size, clock divider, stop polarity, bias
    /// charge time
    Tof1 = 0x38
}

word_register! {
    /// Marker type for TOF2 (0x39): stop hit count, T2 wave selection, duty cycle, timeout
    Tof2 = 0x39
}

word_register! {
    /// Marker type for TOF3 (0x3A): HIT1 and HIT2 wave selection
    Tof3 = 0x3A
}

word_register! {
    /// Marker type for TOF4 (0x3B): HIT3 and HIT4 wave selection
    Tof4 = 0x3B
}

word_register! {
    /// Marker type for TOF5 (0x3C): HIT5 and HIT6 wave selection
    Tof5 = 0x3C
}

word_register! {
    /// Marker type for TOF6 (0x3D): upstream comparator offset and return
    Tof6 = 0x3D
}

word_register! {
    /// Marker type for TOF7 (0x3E): downstream comparator offset and return
    Tof7 = 0x3E
}

word_register! {
    EventTiming1 = 0x3F
}

word_register! {
    EventTiming2 = 0x40
}

word_register! {
    /// Marker type for the TOF measurement delay register (0x41)
    TofMeasurementDelay = 0x41
}

word_register! {
    /// Marker type for the calibration and control register (0x42)
    CalibrationControl = 0x42
}

word_register! {
    RtcControl = 0x43
}

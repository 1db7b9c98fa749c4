use core::fmt::Write;
use heapless::String;

/// Width of the right-aligned TOF value.
pub const TOF_FIELD_WIDTH: usize = 12;

/// Line terminator that follows the TOF value.
pub const TOF_TERMINATOR: [u8; 2] = *b"\n\r";

/// Total length of [`compose_tof_text`] output.
pub const TOF_TEXT_LEN: usize = TOF_FIELD_WIDTH + TOF_TERMINATOR.len();

// Beyond this many decimals the 16-bit fraction carries no more information.
const MAX_PRECISION: usize = 10;

/// Combines a TOF difference register pair into a real value: `int_part + frac_part / 65536`.
pub fn tof_value(int_part: i16, frac_part: u16) -> f64 {
    int_part as f64 + frac_part as f64 / 65536.0
}

/// Renders a TOF difference as a right-aligned, space-padded field of [`TOF_FIELD_WIDTH`]
/// characters followed by [`TOF_TERMINATOR`].
///
/// The value is printed with as many decimals as fit in the field, trailing zeros removed.
pub fn compose_tof_text(int_part: i16, frac_part: u16) -> [u8; TOF_TEXT_LEN] {
    let value = tof_value(int_part, frac_part);

    let mut out = [b' '; TOF_TEXT_LEN];
    // The longest rendering, "-32768.0000000000", is 17 characters.
    let mut scratch: String<24> = String::new();

    for precision in (0..=MAX_PRECISION).rev() {
        scratch.clear();
        if write!(scratch, "{:.*}", precision, value).is_err() {
            continue;
        }

        let digits = trim_fraction(scratch.as_str()).as_bytes();
        if digits.len() <= TOF_FIELD_WIDTH {
            out[TOF_FIELD_WIDTH - digits.len()..TOF_FIELD_WIDTH].copy_from_slice(digits);
            break;
        }
    }

    out[TOF_FIELD_WIDTH..].copy_from_slice(&TOF_TERMINATOR);

    out
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

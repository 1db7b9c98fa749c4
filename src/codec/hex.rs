/// Uppercase hex digits of `value`, most significant first.
///
/// The nibbles are first reversed so that the most significant one lands in the lowest byte
/// lane, then widened so that every nibble owns a byte of a `u64`. Adding 6 to each lane sets
/// bit 4 exactly for the nibbles `A`-`F`; that bit turns into a per-lane mask choosing between
/// the `'0'` and `'A' - 10` offsets. The little-endian bytes of the result are the text.
pub fn hex_of_u32(value: u32) -> [u8; 8] {
    let mut b = value;
    b = ((b & 0xF0F0_F0F0) >> 4) | ((b & 0x0F0F_0F0F) << 4);
    b = ((b & 0xFF00_FF00) >> 8) | ((b & 0x00FF_00FF) << 8);
    b = b.rotate_left(16);

    let mut x = b as u64;
    x = ((x & 0x0000_0000_FFFF_0000) << 16) | (x & 0x0000_0000_0000_FFFF);
    x = ((x & 0x0000_FF00_0000_FF00) << 8) | (x & 0x0000_00FF_0000_00FF);
    x = ((x & 0x00F0_00F0_00F0_00F0) << 4) | (x & 0x000F_000F_000F_000F);

    x += 0x0606_0606_0606_0606;
    let m = ((x & 0x1010_1010_1010_1010) >> 4) + 0x7F7F_7F7F_7F7F_7F7F;
    x += (m & 0x2A2A_2A2A_2A2A_2A2A) | (!m & 0x3131_3131_3131_3131);

    x.to_le_bytes()
}

/// Uppercase hex digits of `value`, most significant first.
///
/// Same lane trick as [`hex_of_u32`], on a `u32` holding four lanes.
pub fn hex_of_u16(value: u16) -> [u8; 4] {
    let mut b = value;
    b = ((b & 0xF0F0) >> 4) | ((b & 0x0F0F) << 4);
    b = b.rotate_left(8);

    let mut x = b as u32;
    x = ((x & 0x0000_FF00) << 8) | (x & 0x0000_00FF);
    x = ((x & 0x00F0_00F0) << 4) | (x & 0x000F_000F);

    x += 0x0606_0606;
    let m = ((x & 0x1010_1010) >> 4) + 0x7F7F_7F7F;
    x += (m & 0x2A2A_2A2A) | (!m & 0x3131_3131);

    x.to_le_bytes()
}

const fn digit_pairs(alphabet: &[u8; 16]) -> [u8; 512] {
    let mut table = [0u8; 512];
    let mut i = 0;
    while i < 256 {
        table[i * 2] = alphabet[i >> 4];
        table[i * 2 + 1] = alphabet[i & 0x0F];
        i += 1;
    }

    table
}

static UPPER_PAIRS: [u8; 512] = digit_pairs(b"0123456789ABCDEF");
static LOWER_PAIRS: [u8; 512] = digit_pairs(b"0123456789abcdef");

/// Hex digits of `value` taken from a table of precomputed digit pairs.
pub fn hex_lookup(value: u16, lowercase: bool) -> [u8; 4] {
    let table = if lowercase { &LOWER_PAIRS } else { &UPPER_PAIRS };

    let mut out = [0u8; 4];
    for (pair, byte) in out.chunks_exact_mut(2).zip(value.to_be_bytes()) {
        let pos = byte as usize * 2;
        pair.copy_from_slice(&table[pos..pos + 2]);
    }

    out
}

//! Bit utilities.

/// Count the set bits in a 64-bit value.
///
/// Uses the classic SWAR form of the Hamming weight computation: fold
/// pair counts, then nibble counts, then sum the per-byte counts with
/// one multiply.
///
/// # Examples
///
/// ```
/// use bruin_core::bits::bit_count;
///
/// assert_eq!(bit_count(0), 0);
/// assert_eq!(bit_count(0xff), 8);
/// ```
pub const fn bit_count(value: u64) -> u32 {
    let mut v = value - ((value >> 1) & 0x5555_5555_5555_5555);
    v = (v & 0x3333_3333_3333_3333) + ((v >> 2) & 0x3333_3333_3333_3333);
    v = (v + (v >> 4)) & 0x0f0f_0f0f_0f0f_0f0f;
    (v.wrapping_mul(0x0101_0101_0101_0101) >> 56) as u32
}

//! Linear range mapping

/// Maps `value` linearly from `[in_lo, in_hi]` onto `[out_lo, out_hi]` and clamps the
/// result to the output range.
///
/// Integer arithmetic truncating towards zero, as a microcontroller `map()` does.
/// `out_lo` may be greater than `out_hi` for a falling ramp. A degenerate input range
/// yields `out_lo`.
pub fn map_clamped(value: i32, in_lo: i32, in_hi: i32, out_lo: i32, out_hi: i32) -> i32 {
    if in_lo == in_hi {
        return out_lo;
    }

    // widen so out-of-range sensor values cannot overflow the product
    let scaled = (i64::from(value) - i64::from(in_lo)) * (i64::from(out_hi) - i64::from(out_lo))
        / (i64::from(in_hi) - i64::from(in_lo))
        + i64::from(out_lo);

    let (lo, hi) = if out_lo <= out_hi {
        (out_lo, out_hi)
    } else {
        (out_hi, out_lo)
    };
    scaled.clamp(i64::from(lo), i64::from(hi)) as i32
}

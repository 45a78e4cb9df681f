use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
pub type Fixed64 = I32F32;

/// Ticks are the atomic unit of simulation time: one economy turn, or one
/// countdown interval of the clock.
pub type Ticks = u64;

/// Convert an f64 to Fixed64. Use only for initialization, never in the
/// turn loop.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// Convert Fixed64 to f64. Use only for display/FFI.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}

/// Convert an integer count to Fixed64, saturating at the representable
/// range.
#[inline]
pub fn u64_to_fixed64(v: u64) -> Fixed64 {
    Fixed64::saturating_from_num(v)
}

/// Integer power by repeated saturating multiplication.
pub fn pow(base: Fixed64, exp: u32) -> Fixed64 {
    let mut out = Fixed64::ONE;
    for _ in 0..exp {
        out = out.saturating_mul(base);
    }
    out
}

/// Scale an integer quantity by `multiplier`, flooring the result back to
/// an integer. Saturates instead of overflowing.
pub fn scale_floor(base: u64, multiplier: Fixed64) -> u64 {
    let scaled = u64_to_fixed64(base).saturating_mul(multiplier);
    let floored: i64 = scaled.to_num();
    if floored < 0 { 0 } else { floored as u64 }
}

//! Software rendition of the AVX512-BF16 dot-product instruction family.
//!
//! bf16 significands carry 8 bits, so every pairwise product is exact in
//! f32. Each 32-bit lane therefore rounds exactly twice: once summing the
//! two products and once accumulating. The portable loops below commit to
//! that ordering, which makes the results reproducible on every platform
//! without emitting the native instructions.

use halfpack_core::convert::{bf16_to_f32, f32_to_bf16_nearest};

/// Number of f32 accumulator lanes in one 512-bit register.
pub const LANES: usize = 16;

/// bf16 elements feeding one 512-bit register (two per 32-bit lane).
pub const ELEMS: usize = 2 * LANES;

#[inline]
fn lane_pair(a: &[u16; ELEMS], b: &[u16; ELEMS], lane: usize) -> f32 {
    // Element 0 of a lane occupies the low 16 bits.
    let lo = bf16_to_f32(a[2 * lane]) * bf16_to_f32(b[2 * lane]);
    let hi = bf16_to_f32(a[2 * lane + 1]) * bf16_to_f32(b[2 * lane + 1]);
    lo + hi
}

/// Dot-product accumulate: per lane, `acc + a_lo * b_lo + a_hi * b_hi`.
pub fn dpbf16_ps(acc: [f32; LANES], a: &[u16; ELEMS], b: &[u16; ELEMS]) -> [f32; LANES] {
    let mut out = acc;
    for lane in 0..LANES {
        out[lane] = acc[lane] + lane_pair(a, b, lane);
    }
    out
}

/// Merge-masked variant: lanes with a clear mask bit keep their `acc` value.
pub fn mask_dpbf16_ps(
    acc: [f32; LANES],
    mask: u16,
    a: &[u16; ELEMS],
    b: &[u16; ELEMS],
) -> [f32; LANES] {
    let mut out = acc;
    for lane in 0..LANES {
        if mask & (1 << lane) != 0 {
            out[lane] = acc[lane] + lane_pair(a, b, lane);
        }
    }
    out
}

/// Zero-masked variant: lanes with a clear mask bit are forced to +0.0.
pub fn maskz_dpbf16_ps(
    mask: u16,
    acc: [f32; LANES],
    a: &[u16; ELEMS],
    b: &[u16; ELEMS],
) -> [f32; LANES] {
    let mut out = [0.0f32; LANES];
    for lane in 0..LANES {
        if mask & (1 << lane) != 0 {
            out[lane] = acc[lane] + lane_pair(a, b, lane);
        }
    }
    out
}

/// Convert two f32 registers into one packed bf16 register.
///
/// `b` fills the low sixteen words and `a` the high sixteen, mirroring the
/// operand order of the hardware instruction. Rounding is to nearest even.
pub fn cvtne2ps_pbh(a: &[f32; LANES], b: &[f32; LANES]) -> [u16; ELEMS] {
    let mut out = [0u16; ELEMS];
    for i in 0..LANES {
        out[i] = f32_to_bf16_nearest(b[i]);
        out[LANES + i] = f32_to_bf16_nearest(a[i]);
    }
    out
}

/// Convert one f32 register into sixteen bf16 words, rounding to nearest even.
pub fn cvtneps_pbh(a: &[f32; LANES]) -> [u16; LANES] {
    let mut out = [0u16; LANES];
    for i in 0..LANES {
        out[i] = f32_to_bf16_nearest(a[i]);
    }
    out
}

/// Dot product of two bf16 slices through the 16-lane accumulator model.
///
/// Full 32-element blocks feed [`dpbf16_ps`]; the tail is zero padded into
/// one final block, then the lanes are reduced left to right. Every backend
/// and platform reproduces the same bits because the operation order is
/// fixed.
pub fn dot_bf16(a: &[u16], b: &[u16]) -> f32 {
    assert_eq!(a.len(), b.len(), "slices must have equal length");
    let mut acc = [0.0f32; LANES];
    let mut i = 0;

    while i + ELEMS <= a.len() {
        let mut block_a = [0u16; ELEMS];
        let mut block_b = [0u16; ELEMS];
        block_a.copy_from_slice(&a[i..i + ELEMS]);
        block_b.copy_from_slice(&b[i..i + ELEMS]);
        acc = dpbf16_ps(acc, &block_a, &block_b);
        i += ELEMS;
    }

    if i < a.len() {
        // Zero pad the tail; zero elements contribute exact +0.0 products.
        let rest = a.len() - i;
        let mut block_a = [0u16; ELEMS];
        let mut block_b = [0u16; ELEMS];
        block_a[..rest].copy_from_slice(&a[i..]);
        block_b[..rest].copy_from_slice(&b[i..]);
        acc = dpbf16_ps(acc, &block_a, &block_b);
    }

    let mut sum = 0.0f32;
    for lane in acc {
        sum += lane;
    }
    sum
}

//! Scalar bit-level conversion between f32 and the 16-bit formats.
//!
//! These functions are the reference implementation: every SIMD batch kernel
//! in `halfpack-accel` must produce lane-for-lane identical bits. All
//! functions are total — every input maps to a defined output, there is no
//! invalid bit pattern and nothing ever panics.

/// All-ones mask when `cond` holds, all-zeros otherwise.
#[inline(always)]
const fn mask_if(cond: bool) -> u32 {
    (cond as u32).wrapping_neg()
}

/// Bitwise select: `a` where `mask` bits are set, `b` elsewhere.
#[inline(always)]
const fn select(mask: u32, a: u32, b: u32) -> u32 {
    (a & mask) | (b & !mask)
}

/// Convert an f32 to an IEEE binary16 bit pattern.
///
/// Rounding is performed by adding `0x0000_1000` to the magnitude bits
/// before truncating the mantissa at bit 13, so halfway cases round away
/// from zero rather than to even. Out-of-range magnitudes saturate to the
/// signed infinity pattern; NaN inputs canonicalize to `sign | 0x7E00`
/// (payload bits are not preserved).
///
/// The result is chosen among three arithmetic candidates (normal,
/// subnormal, overflow) with mask/select operations instead of
/// data-dependent branches, which keeps the scalar path in lockstep with
/// the vectorized kernels.
#[inline]
pub const fn f32_to_f16(value: f32) -> u16 {
    let bits = value.to_bits();
    let sign = (bits >> 16) & 0x8000;
    let abs = bits & 0x7FFF_FFFF;

    let is_nan = mask_if(abs > 0x7F80_0000);

    // Round-to-nearest at the 10-bit mantissa truncation point. A carry out
    // of the mantissa field bumps the exponent, which also converts a
    // rounded-up 0x7BFF into the infinity pattern for magnitudes >= 65520.
    let rounded = abs.wrapping_add(0x0000_1000);
    let exp = rounded >> 23;
    let mant = rounded & 0x007F_FFFF;

    // Candidate (a): normal — rebias 127 -> 15, mantissa 23 -> 10 bits.
    let normal = (exp.wrapping_sub(112) << 10) | (mant >> 13);

    // Candidate (b): subnormal — denormalize with an exponent-dependent
    // right shift of the mantissa plus its implicit leading bit. The shift
    // reaches 31 for magnitudes below the subnormal range, flushing to zero.
    let shift = {
        let s = 126u32.saturating_sub(exp);
        if s > 31 { 31 } else { s }
    };
    let subnormal = (0x0080_0000 | mant) >> shift;

    // Candidate (c): overflow — signed infinity.
    let is_subnormal = mask_if(exp < 113);
    let is_overflow = mask_if(exp > 142);

    let magnitude = select(is_subnormal, subnormal, normal);
    let magnitude = select(is_overflow, 0x7C00, magnitude);
    let magnitude = select(is_nan, 0x7E00, magnitude);

    (sign | magnitude) as u16
}

/// Convert an IEEE binary16 bit pattern to f32.
///
/// Exact for every one of the 65,536 possible patterns: normals are
/// rebiased, subnormals are renormalized, signed zero keeps its sign and
/// NaN payloads are shifted up with the quiet bit forced.
#[inline]
pub fn f16_to_f32(bits: u16) -> f32 {
    let sign = ((bits as u32) & 0x8000) << 16;
    let exp = ((bits >> 10) & 0x1F) as u32;
    let mant = (bits & 0x03FF) as u32;

    if exp == 0x1F {
        // Infinity (mantissa zero) or NaN. NaN keeps its payload shifted
        // into the f32 mantissa and gets the quiet bit forced on.
        let mant32 = if mant == 0 {
            0
        } else {
            (mant << 13) | 0x0040_0000
        };
        return f32::from_bits(sign | 0x7F80_0000 | mant32);
    }

    if exp == 0 {
        if mant == 0 {
            return f32::from_bits(sign);
        }
        // Subnormal. The biased exponent of `mant as f32` encodes the
        // position of the leading mantissa bit, standing in for an explicit
        // leading-zero count (the conversion is exact for mant < 1024).
        let probe = (mant as f32).to_bits();
        let top = (probe >> 23) - 127; // 0..=9
        let exp32 = top + 103; // 127 - 24 + top
        let mant32 = (mant << (23 - top)) & 0x007F_FFFF;
        return f32::from_bits(sign | (exp32 << 23) | mant32);
    }

    f32::from_bits(sign | ((exp + 112) << 23) | (mant << 13))
}

/// Convert an f32 to a bfloat16 bit pattern by truncation.
///
/// This is the canonical bf16 conversion policy: the upper 16 bits of the
/// binary32 pattern, i.e. round-toward-zero. Special values need no
/// handling — the sign, the full exponent and the top of the mantissa all
/// survive the shift, so ±0, ±inf and NaN map to their bf16 counterparts.
/// For the round-to-nearest-even policy used by the emulated hardware
/// conversion instructions see [`f32_to_bf16_nearest`].
#[inline(always)]
pub const fn f32_to_bf16(value: f32) -> u16 {
    (value.to_bits() >> 16) as u16
}

/// Convert an f32 to a bfloat16 bit pattern, rounding to nearest even.
///
/// Matches the semantics of the hardware BF16 conversion instructions
/// (`VCVTNEPS2BF16`): round to nearest with ties to even, NaN quieted with
/// its truncated payload preserved. Kept separate from the canonical
/// truncating [`f32_to_bf16`]; the two are not interchangeable.
#[inline]
pub fn f32_to_bf16_nearest(value: f32) -> u16 {
    let bits = value.to_bits();
    if value.is_nan() {
        return ((bits >> 16) as u16) | 0x0040;
    }
    let lsb = (bits >> 16) & 1;
    (bits.wrapping_add(0x7FFF + lsb) >> 16) as u16
}

/// Convert a bfloat16 bit pattern to f32 by zero-extending into the high
/// half of a 32-bit word. Exact for every pattern; special values fall out
/// of the shared binary32 layout.
#[inline(always)]
pub const fn bf16_to_f32(bits: u16) -> f32 {
    f32::from_bits((bits as u32) << 16)
}

//! AVX-512F batch conversion kernels for x86_64, 16 lanes per iteration.
//! Compiled only with the `avx512` cargo feature; selection is still runtime.
//!
//! Same lane-for-lane semantics as the scalar codec and the AVX2 kernels,
//! expressed with mask registers instead of blend vectors.

#![cfg(all(target_arch = "x86_64", feature = "avx512"))]

use std::arch::x86_64::*;

use halfpack_core::convert::{bf16_to_f32, f16_to_f32, f32_to_bf16, f32_to_f16};

const F32_TWO_POW_NEG24: f32 = 5.960_464_5e-8;

/// Decode sixteen f16 lanes into sixteen f32 bit patterns.
///
/// # Safety
/// Requires AVX-512F.
#[inline]
#[target_feature(enable = "avx512f")]
unsafe fn f16_decode_x16(src: *const u16) -> __m512i { unsafe {
    let v = _mm512_cvtepu16_epi32(_mm256_loadu_si256(src as *const __m256i));
    let sign = _mm512_slli_epi32(_mm512_and_si512(v, _mm512_set1_epi32(0x8000)), 16);
    let exp = _mm512_and_si512(_mm512_srli_epi32(v, 10), _mm512_set1_epi32(0x1F));
    let mant = _mm512_and_si512(v, _mm512_set1_epi32(0x3FF));

    let normal = _mm512_or_si512(
        _mm512_slli_epi32(_mm512_add_epi32(exp, _mm512_set1_epi32(112)), 23),
        _mm512_slli_epi32(mant, 13),
    );

    // mant * 2^-24 is exact, covering subnormals and zero at once.
    let subnormal = _mm512_castps_si512(_mm512_mul_ps(
        _mm512_cvtepi32_ps(mant),
        _mm512_set1_ps(F32_TWO_POW_NEG24),
    ));

    let mant_nonzero = _mm512_cmpneq_epi32_mask(mant, _mm512_setzero_si512());
    let quiet = _mm512_maskz_mov_epi32(mant_nonzero, _mm512_set1_epi32(0x0040_0000));
    let special = _mm512_or_si512(
        _mm512_set1_epi32(0x7F80_0000),
        _mm512_or_si512(_mm512_slli_epi32(mant, 13), quiet),
    );

    let exp_zero = _mm512_cmpeq_epi32_mask(exp, _mm512_setzero_si512());
    let exp_max = _mm512_cmpeq_epi32_mask(exp, _mm512_set1_epi32(0x1F));
    let r = _mm512_mask_blend_epi32(exp_zero, normal, subnormal);
    let r = _mm512_mask_blend_epi32(exp_max, r, special);
    _mm512_or_si512(r, sign)
}}

/// Encode sixteen f32 lanes into sixteen f16 lanes (as u32, low half used).
///
/// # Safety
/// Requires AVX-512F.
#[inline]
#[target_feature(enable = "avx512f")]
unsafe fn f16_encode_x16(src: *const f32) -> __m512i { unsafe {
    let bits = _mm512_castps_si512(_mm512_loadu_ps(src));
    let sign = _mm512_srli_epi32(_mm512_and_si512(bits, _mm512_set1_epi32(i32::MIN)), 16);
    let abs = _mm512_and_si512(bits, _mm512_set1_epi32(0x7FFF_FFFF));
    let is_nan = _mm512_cmpgt_epi32_mask(abs, _mm512_set1_epi32(0x7F80_0000));

    let rounded = _mm512_add_epi32(abs, _mm512_set1_epi32(0x1000));
    let exp = _mm512_srli_epi32(rounded, 23);
    let mant = _mm512_and_si512(rounded, _mm512_set1_epi32(0x007F_FFFF));

    let normal = _mm512_or_si512(
        _mm512_slli_epi32(_mm512_sub_epi32(exp, _mm512_set1_epi32(112)), 10),
        _mm512_srli_epi32(mant, 13),
    );

    // Counts >= 32 shift to zero, matching the scalar saturation.
    let shift = _mm512_sub_epi32(_mm512_set1_epi32(126), exp);
    let subnormal = _mm512_srlv_epi32(
        _mm512_or_si512(_mm512_set1_epi32(0x0080_0000), mant),
        shift,
    );

    let is_subnormal = _mm512_cmplt_epi32_mask(exp, _mm512_set1_epi32(113));
    let is_overflow = _mm512_cmpgt_epi32_mask(exp, _mm512_set1_epi32(142));

    let magnitude = _mm512_mask_blend_epi32(is_subnormal, normal, subnormal);
    let magnitude = _mm512_mask_blend_epi32(is_overflow, magnitude, _mm512_set1_epi32(0x7C00));
    let magnitude = _mm512_mask_blend_epi32(is_nan, magnitude, _mm512_set1_epi32(0x7E00));
    _mm512_or_si512(sign, magnitude)
}}

/// AVX-512 f16 -> f32 batch decode.
///
/// # Safety
/// Caller must verify is_x86_feature_detected!("avx512f").
#[target_feature(enable = "avx512f")]
pub unsafe fn f16_decode_batch(input: &[u16], output: &mut [f32]) { unsafe {
    assert_eq!(input.len(), output.len(), "slices must have equal length");
    let len = input.len();
    let mut i = 0;

    while i + 16 <= len {
        let decoded = f16_decode_x16(input.as_ptr().add(i));
        _mm512_storeu_ps(output.as_mut_ptr().add(i), _mm512_castsi512_ps(decoded));
        i += 16;
    }

    // Scalar tail
    while i < len {
        output[i] = f16_to_f32(input[i]);
        i += 1;
    }
}}

/// AVX-512 f32 -> f16 batch encode.
///
/// # Safety
/// Caller must verify is_x86_feature_detected!("avx512f").
#[target_feature(enable = "avx512f")]
pub unsafe fn f16_encode_batch(input: &[f32], output: &mut [u16]) { unsafe {
    assert_eq!(input.len(), output.len(), "slices must have equal length");
    let len = input.len();
    let mut i = 0;

    while i + 16 <= len {
        let encoded = f16_encode_x16(input.as_ptr().add(i));
        let narrowed = _mm512_cvtepi32_epi16(encoded);
        _mm256_storeu_si256(output.as_mut_ptr().add(i) as *mut __m256i, narrowed);
        i += 16;
    }

    while i < len {
        output[i] = f32_to_f16(input[i]);
        i += 1;
    }
}}

/// AVX-512 bf16 -> f32 batch decode (pure left shift).
///
/// # Safety
/// Caller must verify is_x86_feature_detected!("avx512f").
#[target_feature(enable = "avx512f")]
pub unsafe fn bf16_decode_batch(input: &[u16], output: &mut [f32]) { unsafe {
    assert_eq!(input.len(), output.len(), "slices must have equal length");
    let len = input.len();
    let mut i = 0;

    while i + 16 <= len {
        let v = _mm512_cvtepu16_epi32(_mm256_loadu_si256(input.as_ptr().add(i) as *const __m256i));
        let wide = _mm512_slli_epi32(v, 16);
        _mm512_storeu_ps(output.as_mut_ptr().add(i), _mm512_castsi512_ps(wide));
        i += 16;
    }

    while i < len {
        output[i] = bf16_to_f32(input[i]);
        i += 1;
    }
}}

/// AVX-512 f32 -> bf16 batch encode (truncating).
///
/// # Safety
/// Caller must verify is_x86_feature_detected!("avx512f").
#[target_feature(enable = "avx512f")]
pub unsafe fn bf16_encode_batch(input: &[f32], output: &mut [u16]) { unsafe {
    assert_eq!(input.len(), output.len(), "slices must have equal length");
    let len = input.len();
    let mut i = 0;

    while i + 16 <= len {
        let bits = _mm512_castps_si512(_mm512_loadu_ps(input.as_ptr().add(i)));
        let narrowed = _mm512_cvtepi32_epi16(_mm512_srli_epi32(bits, 16));
        _mm256_storeu_si256(output.as_mut_ptr().add(i) as *mut __m256i, narrowed);
        i += 16;
    }

    while i < len {
        output[i] = f32_to_bf16(input[i]);
        i += 1;
    }
}}

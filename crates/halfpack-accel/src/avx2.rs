//! AVX2 batch conversion kernels for x86_64, 8 lanes per iteration.
//! All functions require runtime detection via is_x86_feature_detected!("avx2").
//!
//! Every kernel reproduces the scalar codec bit for bit, including NaN
//! quieting, saturation to infinity, and subnormal handling.

#![cfg(target_arch = "x86_64")]

use std::arch::x86_64::*;

use halfpack_core::convert::{bf16_to_f32, f16_to_f32, f32_to_bf16, f32_to_f16};

const F32_TWO_POW_NEG24: f32 = 5.960_464_5e-8;

/// Narrow eight u32 lanes (each <= 0xFFFF) to eight u16 and store them.
///
/// # Safety
/// Requires AVX2. `dst` must be valid for writing 8 u16.
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn store_u16x8(dst: *mut u16, v: __m256i) { unsafe {
    // packus duplicates within each 128-bit half; permute gathers the two
    // distinct qwords into the low 128 bits.
    let packed = _mm256_packus_epi32(v, v);
    let ordered = _mm256_permute4x64_epi64(packed, 0xD8);
    _mm_storeu_si128(dst as *mut __m128i, _mm256_castsi256_si128(ordered));
}}

/// Decode eight f16 lanes into eight f32 bit patterns.
///
/// # Safety
/// Requires AVX2.
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn f16_decode_x8(src: *const u16) -> __m256i { unsafe {
    let v = _mm256_cvtepu16_epi32(_mm_loadu_si128(src as *const __m128i));
    let sign = _mm256_slli_epi32(_mm256_and_si256(v, _mm256_set1_epi32(0x8000)), 16);
    let exp = _mm256_and_si256(_mm256_srli_epi32(v, 10), _mm256_set1_epi32(0x1F));
    let mant = _mm256_and_si256(v, _mm256_set1_epi32(0x3FF));

    let normal = _mm256_or_si256(
        _mm256_slli_epi32(_mm256_add_epi32(exp, _mm256_set1_epi32(112)), 23),
        _mm256_slli_epi32(mant, 13),
    );

    // Subnormals (and zero): mant * 2^-24 is exact in f32, so the float
    // path yields the same bits the integer renormalization would.
    let subnormal = _mm256_castps_si256(_mm256_mul_ps(
        _mm256_cvtepi32_ps(mant),
        _mm256_set1_ps(F32_TWO_POW_NEG24),
    ));

    // Infinity keeps a zero mantissa; NaN payloads shift up and gain the
    // quiet bit.
    let mant_zero = _mm256_cmpeq_epi32(mant, _mm256_setzero_si256());
    let quiet = _mm256_andnot_si256(mant_zero, _mm256_set1_epi32(0x0040_0000));
    let special = _mm256_or_si256(
        _mm256_set1_epi32(0x7F80_0000),
        _mm256_or_si256(_mm256_slli_epi32(mant, 13), quiet),
    );

    let exp_zero = _mm256_cmpeq_epi32(exp, _mm256_setzero_si256());
    let exp_max = _mm256_cmpeq_epi32(exp, _mm256_set1_epi32(0x1F));
    let r = _mm256_blendv_epi8(normal, subnormal, exp_zero);
    let r = _mm256_blendv_epi8(r, special, exp_max);
    _mm256_or_si256(r, sign)
}}

/// Encode eight f32 lanes into eight f16 lanes (as u32, low half used).
///
/// # Safety
/// Requires AVX2.
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn f16_encode_x8(src: *const f32) -> __m256i { unsafe {
    let bits = _mm256_castps_si256(_mm256_loadu_ps(src));
    let sign = _mm256_srli_epi32(_mm256_and_si256(bits, _mm256_set1_epi32(i32::MIN)), 16);
    let abs = _mm256_and_si256(bits, _mm256_set1_epi32(0x7FFF_FFFF));
    // abs fits in a non-negative i32, so signed compares are safe.
    let is_nan = _mm256_cmpgt_epi32(abs, _mm256_set1_epi32(0x7F80_0000));

    let rounded = _mm256_add_epi32(abs, _mm256_set1_epi32(0x1000));
    let exp = _mm256_srli_epi32(rounded, 23);
    let mant = _mm256_and_si256(rounded, _mm256_set1_epi32(0x007F_FFFF));

    let normal = _mm256_or_si256(
        _mm256_slli_epi32(_mm256_sub_epi32(exp, _mm256_set1_epi32(112)), 10),
        _mm256_srli_epi32(mant, 13),
    );

    // srlv yields zero for any count >= 32 (negative counts are huge as
    // unsigned), which matches the scalar saturation.
    let shift = _mm256_sub_epi32(_mm256_set1_epi32(126), exp);
    let subnormal = _mm256_srlv_epi32(
        _mm256_or_si256(_mm256_set1_epi32(0x0080_0000), mant),
        shift,
    );

    let is_subnormal = _mm256_cmpgt_epi32(_mm256_set1_epi32(113), exp);
    let is_overflow = _mm256_cmpgt_epi32(exp, _mm256_set1_epi32(142));

    let magnitude = _mm256_blendv_epi8(normal, subnormal, is_subnormal);
    let magnitude = _mm256_blendv_epi8(magnitude, _mm256_set1_epi32(0x7C00), is_overflow);
    let magnitude = _mm256_blendv_epi8(magnitude, _mm256_set1_epi32(0x7E00), is_nan);
    _mm256_or_si256(sign, magnitude)
}}

/// AVX2 f16 -> f32 batch decode.
///
/// # Safety
/// Caller must verify is_x86_feature_detected!("avx2").
#[target_feature(enable = "avx2")]
pub unsafe fn f16_decode_batch(input: &[u16], output: &mut [f32]) { unsafe {
    assert_eq!(input.len(), output.len(), "slices must have equal length");
    let len = input.len();
    let mut i = 0;

    while i + 8 <= len {
        let decoded = f16_decode_x8(input.as_ptr().add(i));
        _mm256_storeu_ps(output.as_mut_ptr().add(i), _mm256_castsi256_ps(decoded));
        i += 8;
    }

    // Scalar tail
    while i < len {
        output[i] = f16_to_f32(input[i]);
        i += 1;
    }
}}

/// AVX2 f32 -> f16 batch encode.
///
/// # Safety
/// Caller must verify is_x86_feature_detected!("avx2").
#[target_feature(enable = "avx2")]
pub unsafe fn f16_encode_batch(input: &[f32], output: &mut [u16]) { unsafe {
    assert_eq!(input.len(), output.len(), "slices must have equal length");
    let len = input.len();
    let mut i = 0;

    while i + 8 <= len {
        let encoded = f16_encode_x8(input.as_ptr().add(i));
        store_u16x8(output.as_mut_ptr().add(i), encoded);
        i += 8;
    }

    while i < len {
        output[i] = f32_to_f16(input[i]);
        i += 1;
    }
}}

/// AVX2 bf16 -> f32 batch decode (pure left shift).
///
/// # Safety
/// Caller must verify is_x86_feature_detected!("avx2").
#[target_feature(enable = "avx2")]
pub unsafe fn bf16_decode_batch(input: &[u16], output: &mut [f32]) { unsafe {
    assert_eq!(input.len(), output.len(), "slices must have equal length");
    let len = input.len();
    let mut i = 0;

    while i + 8 <= len {
        let v = _mm256_cvtepu16_epi32(_mm_loadu_si128(input.as_ptr().add(i) as *const __m128i));
        let wide = _mm256_slli_epi32(v, 16);
        _mm256_storeu_ps(output.as_mut_ptr().add(i), _mm256_castsi256_ps(wide));
        i += 8;
    }

    while i < len {
        output[i] = bf16_to_f32(input[i]);
        i += 1;
    }
}}

/// AVX2 f32 -> bf16 batch encode (truncating).
///
/// # Safety
/// Caller must verify is_x86_feature_detected!("avx2").
#[target_feature(enable = "avx2")]
pub unsafe fn bf16_encode_batch(input: &[f32], output: &mut [u16]) { unsafe {
    assert_eq!(input.len(), output.len(), "slices must have equal length");
    let len = input.len();
    let mut i = 0;

    while i + 8 <= len {
        let bits = _mm256_castps_si256(_mm256_loadu_ps(input.as_ptr().add(i)));
        let narrowed = _mm256_srli_epi32(bits, 16);
        store_u16x8(output.as_mut_ptr().add(i), narrowed);
        i += 8;
    }

    while i < len {
        output[i] = f32_to_bf16(input[i]);
        i += 1;
    }
}}

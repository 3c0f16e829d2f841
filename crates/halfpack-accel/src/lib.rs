//! SIMD-accelerated batch conversion for the halfpack 16-bit float formats.
//!
//! This crate provides runtime-dispatched kernels for f16 and bf16 batch
//! encode/decode plus a software rendition of the AVX512-BF16 dot-product
//! instructions. Every operation has a portable scalar fallback, and every
//! SIMD path is bit-identical to that fallback: callers get the same output
//! on every machine, only faster where the hardware allows.
//!
//! CPU features are probed once per process. The chosen [`Backend`] can be
//! inspected, and the pure [`Backend::select`] mapping is available for
//! callers that manage feature detection themselves.

pub mod scalar;

#[cfg(target_arch = "x86_64")]
pub mod avx2;

#[cfg(all(target_arch = "x86_64", feature = "avx512"))]
pub mod avx512;

pub mod bf16dot;

pub use bf16dot::{
    cvtne2ps_pbh, cvtneps_pbh, dot_bf16, dpbf16_ps, mask_dpbf16_ps, maskz_dpbf16_ps,
};

use std::sync::OnceLock;

/// CPU features relevant to 16-bit float conversion, probed at runtime.
///
/// `f16c` and `avx512bf16` are reported for inspection even though the
/// kernels never emit those instructions; the software paths already match
/// their results bit for bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuFeatures {
    pub avx2: bool,
    pub f16c: bool,
    pub avx512f: bool,
    pub avx512bf16: bool,
}

impl CpuFeatures {
    /// Probe the running CPU. Non-x86_64 targets report everything false.
    pub fn probe() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            return CpuFeatures {
                avx2: is_x86_feature_detected!("avx2"),
                f16c: is_x86_feature_detected!("f16c"),
                avx512f: is_x86_feature_detected!("avx512f"),
                avx512bf16: is_x86_feature_detected!("avx512bf16"),
            };
        }

        #[allow(unreachable_code)]
        CpuFeatures {
            avx2: false,
            f16c: false,
            avx512f: false,
            avx512bf16: false,
        }
    }

    /// Probe once and cache for the lifetime of the process.
    pub fn cached() -> Self {
        static FEATURES: OnceLock<CpuFeatures> = OnceLock::new();
        *FEATURES.get_or_init(Self::probe)
    }
}

/// Available conversion backends, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// x86_64 AVX-512F, 16 lanes (requires the `avx512` cargo feature)
    Avx512,
    /// x86_64 AVX2, 8 lanes
    Avx2,
    /// Portable scalar fallback
    Scalar,
}

impl Backend {
    /// Map a feature set to the backend the dispatcher would use.
    pub fn select(features: CpuFeatures) -> Backend {
        #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
        {
            if features.avx512f {
                return Backend::Avx512;
            }
        }

        #[cfg(target_arch = "x86_64")]
        {
            if features.avx2 {
                return Backend::Avx2;
            }
        }

        let _ = features;
        Backend::Scalar
    }

    /// The backend used by the dispatching entry points, decided once.
    pub fn cached() -> Backend {
        static BACKEND: OnceLock<Backend> = OnceLock::new();
        *BACKEND.get_or_init(|| Backend::select(CpuFeatures::cached()))
    }
}

// ---------------------------------------------------------------------------
// Public API — auto-dispatched
// ---------------------------------------------------------------------------

/// Decode a batch of f16 bit patterns into f32 values.
///
/// Panics if the slices differ in length.
pub fn f16_decode_batch(input: &[u16], output: &mut [f32]) {
    match Backend::cached() {
        #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
        Backend::Avx512 => unsafe { avx512::f16_decode_batch(input, output) },

        #[cfg(target_arch = "x86_64")]
        Backend::Avx2 => unsafe { avx2::f16_decode_batch(input, output) },

        _ => scalar::f16_decode_batch(input, output),
    }
}

/// Encode a batch of f32 values into f16 bit patterns.
///
/// Panics if the slices differ in length.
pub fn f16_encode_batch(input: &[f32], output: &mut [u16]) {
    match Backend::cached() {
        #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
        Backend::Avx512 => unsafe { avx512::f16_encode_batch(input, output) },

        #[cfg(target_arch = "x86_64")]
        Backend::Avx2 => unsafe { avx2::f16_encode_batch(input, output) },

        _ => scalar::f16_encode_batch(input, output),
    }
}

/// Decode a batch of bf16 bit patterns into f32 values.
///
/// Panics if the slices differ in length.
pub fn bf16_decode_batch(input: &[u16], output: &mut [f32]) {
    match Backend::cached() {
        #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
        Backend::Avx512 => unsafe { avx512::bf16_decode_batch(input, output) },

        #[cfg(target_arch = "x86_64")]
        Backend::Avx2 => unsafe { avx2::bf16_decode_batch(input, output) },

        _ => scalar::bf16_decode_batch(input, output),
    }
}

/// Encode a batch of f32 values into bf16 bit patterns (truncating).
///
/// Panics if the slices differ in length.
pub fn bf16_encode_batch(input: &[f32], output: &mut [u16]) {
    match Backend::cached() {
        #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
        Backend::Avx512 => unsafe { avx512::bf16_encode_batch(input, output) },

        #[cfg(target_arch = "x86_64")]
        Backend::Avx2 => unsafe { avx2::bf16_encode_batch(input, output) },

        _ => scalar::bf16_encode_batch(input, output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_patterns() -> Vec<u16> {
        (0..=u16::MAX).collect()
    }

    // A sweep of f32 inputs that exercises every encoder branch: normals,
    // subnormal targets, overflow, NaN payloads, signed zero.
    fn encode_sweep() -> Vec<f32> {
        let mut v: Vec<f32> = (0u32..=0xFFFF)
            .map(|i| f32::from_bits(i.wrapping_mul(0x0001_0003)))
            .collect();
        v.extend_from_slice(&[
            0.0,
            -0.0,
            1.0,
            -1.0,
            65504.0,
            65504.1,
            65520.0,
            -65520.0,
            f32::INFINITY,
            f32::NEG_INFINITY,
            f32::NAN,
            f32::from_bits(0xFFC0_0001),
            f32::from_bits(0x0000_0001),
            f32::from_bits(0x3880_0000), // 2^-14
            f32::from_bits(0x3800_0000), // 2^-15
            f32::from_bits(0x3300_0000), // 2^-25
        ]);
        v
    }

    #[test]
    fn f16_decode_dispatch_matches_scalar_exhaustively() {
        let input = all_patterns();
        let mut got = vec![0.0f32; input.len()];
        let mut want = vec![0.0f32; input.len()];
        f16_decode_batch(&input, &mut got);
        scalar::f16_decode_batch(&input, &mut want);
        for i in 0..input.len() {
            assert_eq!(
                got[i].to_bits(),
                want[i].to_bits(),
                "pattern {:#06x}",
                input[i]
            );
        }
    }

    #[test]
    fn f16_encode_dispatch_matches_scalar() {
        let input = encode_sweep();
        let mut got = vec![0u16; input.len()];
        let mut want = vec![0u16; input.len()];
        f16_encode_batch(&input, &mut got);
        scalar::f16_encode_batch(&input, &mut want);
        for i in 0..input.len() {
            assert_eq!(got[i], want[i], "input bits {:#010x}", input[i].to_bits());
        }
    }

    #[test]
    fn bf16_decode_dispatch_matches_scalar_exhaustively() {
        let input = all_patterns();
        let mut got = vec![0.0f32; input.len()];
        let mut want = vec![0.0f32; input.len()];
        bf16_decode_batch(&input, &mut got);
        scalar::bf16_decode_batch(&input, &mut want);
        for i in 0..input.len() {
            assert_eq!(got[i].to_bits(), want[i].to_bits());
        }
    }

    #[test]
    fn bf16_encode_dispatch_matches_scalar() {
        let input = encode_sweep();
        let mut got = vec![0u16; input.len()];
        let mut want = vec![0u16; input.len()];
        bf16_encode_batch(&input, &mut got);
        scalar::bf16_encode_batch(&input, &mut want);
        assert_eq!(got, want);
    }

    #[test]
    fn prime_length_batch_exercises_the_tail() {
        // 17 elements: two full 8-lane blocks plus one scalar tail element,
        // or one 16-lane block plus one.
        let input: Vec<u16> = (0..17).map(|i| (i as u16).wrapping_mul(0x1357)).collect();
        let mut decoded = vec![0.0f32; 17];
        f16_decode_batch(&input, &mut decoded);

        let mut reencoded = vec![0u16; 17];
        f16_encode_batch(&decoded, &mut reencoded);

        for i in 0..17 {
            let p = input[i];
            if decoded[i].is_nan() {
                assert_eq!(reencoded[i], (p & 0x8000) | 0x7E00);
            } else {
                assert_eq!(reencoded[i], p);
            }
        }
    }

    #[test]
    fn decode_matches_half_crate_exhaustively() {
        let input = all_patterns();
        let mut got = vec![0.0f32; input.len()];
        f16_decode_batch(&input, &mut got);
        for (i, &p) in input.iter().enumerate() {
            let oracle = half::f16::from_bits(p).to_f32();
            if oracle.is_nan() {
                assert!(got[i].is_nan());
            } else {
                assert_eq!(got[i].to_bits(), oracle.to_bits());
            }
        }
    }

    #[test]
    fn backend_selection_is_stable() {
        assert_eq!(Backend::cached(), Backend::select(CpuFeatures::cached()));
        assert_eq!(Backend::cached(), Backend::cached());
        assert_eq!(CpuFeatures::cached(), CpuFeatures::probe());
    }

    #[test]
    fn scalar_features_select_scalar_backend() {
        let none = CpuFeatures {
            avx2: false,
            f16c: false,
            avx512f: false,
            avx512bf16: false,
        };
        assert_eq!(Backend::select(none), Backend::Scalar);
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn avx2_kernels_match_scalar_directly() {
        if !is_x86_feature_detected!("avx2") {
            return;
        }
        let input = all_patterns();
        let mut got = vec![0.0f32; input.len()];
        let mut want = vec![0.0f32; input.len()];
        unsafe { avx2::f16_decode_batch(&input, &mut got) };
        scalar::f16_decode_batch(&input, &mut want);
        for i in 0..input.len() {
            assert_eq!(got[i].to_bits(), want[i].to_bits(), "pattern {:#06x}", input[i]);
        }

        let sweep = encode_sweep();
        let mut enc_got = vec![0u16; sweep.len()];
        let mut enc_want = vec![0u16; sweep.len()];
        unsafe { avx2::f16_encode_batch(&sweep, &mut enc_got) };
        scalar::f16_encode_batch(&sweep, &mut enc_want);
        assert_eq!(enc_got, enc_want);

        let mut b_got = vec![0u16; sweep.len()];
        let mut b_want = vec![0u16; sweep.len()];
        unsafe { avx2::bf16_encode_batch(&sweep, &mut b_got) };
        scalar::bf16_encode_batch(&sweep, &mut b_want);
        assert_eq!(b_got, b_want);
    }

    #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
    #[test]
    fn avx512_kernels_match_scalar_directly() {
        if !is_x86_feature_detected!("avx512f") {
            return;
        }
        let input = all_patterns();
        let mut got = vec![0.0f32; input.len()];
        let mut want = vec![0.0f32; input.len()];
        unsafe { avx512::f16_decode_batch(&input, &mut got) };
        scalar::f16_decode_batch(&input, &mut want);
        for i in 0..input.len() {
            assert_eq!(got[i].to_bits(), want[i].to_bits(), "pattern {:#06x}", input[i]);
        }

        let sweep = encode_sweep();
        let mut enc_got = vec![0u16; sweep.len()];
        let mut enc_want = vec![0u16; sweep.len()];
        unsafe { avx512::f16_encode_batch(&sweep, &mut enc_got) };
        scalar::f16_encode_batch(&sweep, &mut enc_want);
        assert_eq!(enc_got, enc_want);
    }

    #[test]
    fn empty_and_single_element_batches() {
        f16_decode_batch(&[], &mut []);
        let mut one = [0.0f32];
        f16_decode_batch(&[0x3C00], &mut one);
        assert_eq!(one[0], 1.0);

        let mut bits = [0u16];
        f16_encode_batch(&[-2.0], &mut bits);
        assert_eq!(bits[0], 0xC000);
    }
}
